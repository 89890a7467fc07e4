use medsurvey_core::models::attempt::AttemptReceipt;
use medsurvey_core::models::question::Question;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::answers::AnswerStore;
use crate::cursor::SessionCursor;
use crate::error::SessionError;
use crate::provider::{SubmissionSink, SurveyContentProvider};
use crate::state::{Intent, SessionState, SessionStatus};

/// Plain view data for rendering the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub survey_id: Uuid,
    pub index: usize,
    pub len: usize,
    pub progress: f64,
    pub question: Option<Question>,
    pub answer: Option<String>,
    pub is_first: bool,
    pub is_last: bool,
    pub can_go_next: bool,
    pub can_submit: bool,
    pub status: SessionStatus,
}

/// Owns one survey-taking session from load until submission or drop.
///
/// Intents are applied one at a time through `&mut self`; the only await
/// points are the collaborator calls in [`Self::open`] and
/// [`Self::on_submit`].
#[derive(Debug, Clone)]
pub struct SessionController {
    state: SessionState,
}

impl SessionController {
    pub fn new(survey_id: Uuid, questions: Vec<Question>) -> Self {
        Self {
            state: SessionState::new(survey_id, questions),
        }
    }

    pub fn from_state(state: SessionState) -> Self {
        Self { state }
    }

    /// Load the question sequence and any prior progress, then start at the
    /// first question.
    pub async fn open<P>(provider: &P, survey_id: Uuid) -> Result<Self, SessionError>
    where
        P: SurveyContentProvider,
    {
        let questions = provider.load_questions(survey_id).await?;
        let progress = provider.load_progress(survey_id).await?;

        info!(
            %survey_id,
            questions = questions.len(),
            resumed = progress.is_some(),
            "survey session opened"
        );

        Ok(Self {
            state: SessionState::resume(survey_id, questions, progress.as_ref()),
        })
    }

    /// Store `text` for the current question. Never advances.
    pub fn on_answer_entered(&mut self, text: impl Into<String>) {
        self.state.apply(Intent::AnswerEntered(text.into()));
    }

    /// Move forward when the current answer is non-blank and this is not
    /// the last question. Returns whether the cursor moved.
    pub fn on_next(&mut self) -> bool {
        let before = self.state.cursor().index();
        self.state.apply(Intent::Next);
        let moved = self.state.cursor().index() != before;
        if !moved {
            debug!(survey_id = %self.state.survey_id(), index = before, "next ignored");
        }
        moved
    }

    /// Move back without any validation. Returns whether the cursor moved.
    pub fn on_previous(&mut self) -> bool {
        let before = self.state.cursor().index();
        self.state.apply(Intent::Previous);
        self.state.cursor().index() != before
    }

    /// Assemble the batch and hand it to `sink`.
    ///
    /// On any error the session stays open and unchanged so the user can
    /// edit and retry; a retry resends the full batch.
    pub async fn on_submit<S>(&mut self, sink: &S) -> Result<AttemptReceipt, SessionError>
    where
        S: SubmissionSink,
    {
        let batch = self.state.prepare_submission()?;
        let survey_id = batch.survey_id;
        let entries = batch.len();

        match sink.submit(&batch).await {
            Ok(receipt) => {
                info!(
                    %survey_id,
                    attempt_id = %receipt.attempt_id,
                    entries,
                    "survey submitted"
                );
                self.state.mark_submitted(receipt.attempt_id);
                Ok(receipt)
            }
            Err(e) => {
                warn!(%survey_id, error = %e, "survey submission failed");
                Err(e.into())
            }
        }
    }

    pub fn can_go_next(&self) -> bool {
        self.state.can_go_next()
    }

    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.state.cursor().current_question()
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.state.current_answer()
    }

    pub fn progress(&self) -> f64 {
        self.state.cursor().progress()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn cursor(&self) -> &SessionCursor {
        self.state.cursor()
    }

    pub fn answers(&self) -> &AnswerStore {
        self.state.answers()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let cursor = self.state.cursor();
        SessionSnapshot {
            survey_id: self.state.survey_id(),
            index: cursor.index(),
            len: cursor.len(),
            progress: cursor.progress(),
            question: cursor.current_question().cloned(),
            answer: self.state.current_answer().map(str::to_string),
            is_first: cursor.is_first(),
            is_last: cursor.is_last(),
            can_go_next: self.state.can_go_next(),
            can_submit: self.state.can_submit(),
            status: self.state.status(),
        }
    }
}
