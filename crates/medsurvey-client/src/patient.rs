//! Calls made from the patient's side: browsing assigned surveys and
//! managing the doctors they are associated with.

use medsurvey_core::api_paths;
use medsurvey_core::models::survey::AssignedSurvey;
use medsurvey_core::models::user::DoctorSummary;
use tracing::info;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ClientError;

impl ApiClient {
    /// Surveys assigned to the signed-in patient, soonest due first.
    pub async fn assigned_surveys(&self) -> Result<Vec<AssignedSurvey>, ClientError> {
        let mut surveys: Vec<AssignedSurvey> = self.get_json(api_paths::PATIENT_SURVEYS).await?;
        // Undated surveys sort last.
        surveys.sort_by_key(|s| (s.due_on.is_none(), s.due_on));
        Ok(surveys)
    }

    /// The patient's current care team.
    pub async fn my_doctors(&self) -> Result<Vec<DoctorSummary>, ClientError> {
        self.get_json(api_paths::PATIENT_DOCTORS).await
    }

    /// The full doctor directory.
    pub async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, ClientError> {
        self.get_json(api_paths::DOCTORS).await
    }

    pub async fn add_doctor(&self, doctor_id: Uuid) -> Result<(), ClientError> {
        self.post_unit::<()>(&api_paths::patient_doctor(doctor_id), None)
            .await?;
        info!(%doctor_id, "doctor added to care team");
        Ok(())
    }

    pub async fn remove_doctor(&self, doctor_id: Uuid) -> Result<(), ClientError> {
        self.delete(&api_paths::patient_doctor(doctor_id)).await?;
        info!(%doctor_id, "doctor removed from care team");
        Ok(())
    }
}
