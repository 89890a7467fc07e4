//! Session state as a value plus a single transition function.
//!
//! [`SessionState::reduce`] is the pure form; [`crate::SessionController`]
//! drives the same [`SessionState::apply`] in place and adds the effectful
//! load and submit steps.

use std::sync::Arc;

use medsurvey_core::models::attempt::{SubmissionBatch, SurveyProgress};
use medsurvey_core::models::question::Question;
use serde::Serialize;
use uuid::Uuid;

use crate::answers::AnswerStore;
use crate::batch::build_batch;
use crate::cursor::SessionCursor;
use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
    Open,
    /// Terminal. Further intents are ignored.
    Submitted { attempt_id: Uuid },
}

/// A user intent that only touches local state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AnswerEntered(String),
    Next,
    Previous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    survey_id: Uuid,
    cursor: SessionCursor,
    answers: AnswerStore,
    status: SessionStatus,
}

impl SessionState {
    pub fn new(survey_id: Uuid, questions: impl Into<Arc<[Question]>>) -> Self {
        Self {
            survey_id,
            cursor: SessionCursor::new(questions),
            answers: AnswerStore::new(),
            status: SessionStatus::Open,
        }
    }

    /// Start a session pre-populated with prior progress. The cursor still
    /// starts at the first question.
    pub fn resume(
        survey_id: Uuid,
        questions: impl Into<Arc<[Question]>>,
        progress: Option<&SurveyProgress>,
    ) -> Self {
        let mut state = Self::new(survey_id, questions);
        if let Some(progress) = progress {
            if progress.survey_id != survey_id {
                tracing::warn!(
                    %survey_id,
                    progress_survey_id = %progress.survey_id,
                    "ignoring progress for a different survey"
                );
                return state;
            }
            let questions = state.cursor.questions();
            let known = |id: Uuid| questions.iter().any(|q| q.id == id);
            let applied = state.answers.seed(&progress.answers, known);
            tracing::debug!(%survey_id, applied, "seeded answers from prior progress");
        }
        state
    }

    /// Pure transition: consume the state and return its successor.
    pub fn reduce(mut self, intent: Intent) -> Self {
        self.apply(intent);
        self
    }

    /// In-place transition shared by [`Self::reduce`] and the controller.
    pub fn apply(&mut self, intent: Intent) {
        if self.is_submitted() {
            return;
        }
        match intent {
            Intent::AnswerEntered(text) => {
                if let Some(question) = self.cursor.current_question() {
                    let id = question.id;
                    self.answers.set_answer(id, text);
                }
            }
            Intent::Next => {
                if self.can_go_next() {
                    self.cursor.advance();
                }
            }
            Intent::Previous => self.cursor.retreat(),
        }
    }

    /// "Next" requires a non-blank answer and is replaced by submit on the
    /// last question.
    pub fn can_go_next(&self) -> bool {
        !self.is_submitted() && !self.cursor.is_last() && self.current_has_answer()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitted() && self.cursor.is_last()
    }

    /// The batch to hand to the submission collaborator.
    pub fn prepare_submission(&self) -> Result<SubmissionBatch, SessionError> {
        if self.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }
        if !self.cursor.is_last() {
            return Err(SessionError::NotOnLastQuestion);
        }
        build_batch(self.survey_id, &self.answers)
    }

    pub fn mark_submitted(&mut self, attempt_id: Uuid) {
        self.status = SessionStatus::Submitted { attempt_id };
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.cursor
            .current_question()
            .and_then(|q| self.answers.answer(q.id))
    }

    fn current_has_answer(&self) -> bool {
        self.cursor
            .current_question()
            .is_some_and(|q| self.answers.has_answer(q.id))
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.status, SessionStatus::Submitted { .. })
    }

    pub fn survey_id(&self) -> Uuid {
        self.survey_id
    }

    pub fn cursor(&self) -> &SessionCursor {
        &self.cursor
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }
}
