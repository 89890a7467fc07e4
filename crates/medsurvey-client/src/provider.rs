//! Session collaborator implementations over HTTP.

use medsurvey_core::api_paths;
use medsurvey_core::models::attempt::{AttemptReceipt, SubmissionBatch, SurveyProgress};
use medsurvey_core::models::question::Question;
use medsurvey_session::{ProviderError, SubmissionSink, SurveyContentProvider};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ClientError;

impl SurveyContentProvider for ApiClient {
    async fn load_questions(&self, survey_id: Uuid) -> Result<Vec<Question>, ProviderError> {
        Ok(self.list_questions(survey_id).await?)
    }

    /// A survey the patient never started has no progress resource.
    async fn load_progress(&self, survey_id: Uuid) -> Result<Option<SurveyProgress>, ProviderError> {
        match self
            .get_json::<SurveyProgress>(&api_paths::survey_progress(survey_id))
            .await
        {
            Ok(progress) => Ok(Some(progress)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl SubmissionSink for ApiClient {
    async fn submit(&self, batch: &SubmissionBatch) -> Result<AttemptReceipt, ProviderError> {
        Ok(self
            .post_json(&api_paths::survey_attempts(batch.survey_id), batch)
            .await?)
    }
}
