//! Collaborator contracts: where questions come from and where answers go.

use std::future::Future;

use medsurvey_core::models::attempt::{AttemptReceipt, SubmissionBatch, SurveyProgress};
use medsurvey_core::models::question::Question;
use uuid::Uuid;

use crate::error::ProviderError;

/// Supplies the ordered question sequence and any prior progress.
pub trait SurveyContentProvider {
    fn load_questions(
        &self,
        survey_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Question>, ProviderError>> + Send;

    /// `None` when the patient has not started this survey.
    fn load_progress(
        &self,
        survey_id: Uuid,
    ) -> impl Future<Output = Result<Option<SurveyProgress>, ProviderError>> + Send;
}

/// Transmits a finished batch. No retries are expected of implementors.
pub trait SubmissionSink {
    fn submit(
        &self,
        batch: &SubmissionBatch,
    ) -> impl Future<Output = Result<AttemptReceipt, ProviderError>> + Send;
}
