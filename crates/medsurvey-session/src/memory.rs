//! In-memory collaborator for running sessions without a backend.
//!
//! `InMemoryBackend` serves pre-configured questions and progress and
//! records every submitted batch. Useful in tests and offline demos.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use medsurvey_core::models::attempt::{AttemptReceipt, SubmissionBatch, SurveyProgress};
use medsurvey_core::models::question::Question;
use uuid::Uuid;

use crate::error::ProviderError;
use crate::provider::{SubmissionSink, SurveyContentProvider};

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    questions: HashMap<Uuid, Vec<Question>>,
    progress: HashMap<Uuid, SurveyProgress>,
    submissions: Mutex<Vec<SubmissionBatch>>,
    next_failure: Mutex<Option<ProviderError>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_survey(mut self, survey_id: Uuid, questions: Vec<Question>) -> Self {
        self.questions.insert(survey_id, questions);
        self
    }

    pub fn with_progress(mut self, progress: SurveyProgress) -> Self {
        self.progress.insert(progress.survey_id, progress);
        self
    }

    /// Make the next `submit` call fail with `error`. Later calls succeed.
    pub fn fail_next_submit(&self, error: ProviderError) {
        *self
            .next_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Every batch accepted so far, in submission order.
    pub fn submissions(&self) -> Vec<SubmissionBatch> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SurveyContentProvider for InMemoryBackend {
    async fn load_questions(&self, survey_id: Uuid) -> Result<Vec<Question>, ProviderError> {
        self.questions
            .get(&survey_id)
            .cloned()
            .ok_or_else(|| ProviderError::Server {
                status: 404,
                message: format!("survey {survey_id} not found"),
            })
    }

    async fn load_progress(&self, survey_id: Uuid) -> Result<Option<SurveyProgress>, ProviderError> {
        Ok(self.progress.get(&survey_id).cloned())
    }
}

impl SubmissionSink for InMemoryBackend {
    async fn submit(&self, batch: &SubmissionBatch) -> Result<AttemptReceipt, ProviderError> {
        let failure = self
            .next_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(error) = failure {
            return Err(error);
        }

        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(batch.clone());

        Ok(AttemptReceipt {
            attempt_id: Uuid::new_v4(),
        })
    }
}
