//! Calls made from the doctor's side: authoring surveys, scheduling
//! appointments and reviewing submitted attempts.

use medsurvey_core::api_paths;
use medsurvey_core::models::appointment::{Appointment, NewAppointment};
use medsurvey_core::models::attempt::Attempt;
use medsurvey_core::models::question::{NewQuestion, Question};
use medsurvey_core::models::survey::{NewSurvey, Survey};
use tracing::info;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ClientError;

impl ApiClient {
    /// Surveys authored by the signed-in doctor.
    pub async fn list_surveys(&self) -> Result<Vec<Survey>, ClientError> {
        self.get_json(api_paths::SURVEYS).await
    }

    pub async fn get_survey(&self, survey_id: Uuid) -> Result<Survey, ClientError> {
        self.get_json(&api_paths::survey(survey_id)).await
    }

    /// Validated locally before anything is sent.
    pub async fn create_survey(&self, survey: &NewSurvey) -> Result<Survey, ClientError> {
        survey.validate()?;
        let created: Survey = self.post_json(api_paths::SURVEYS, survey).await?;
        info!(survey_id = %created.id, title = %created.title, "survey created");
        Ok(created)
    }

    pub async fn delete_survey(&self, survey_id: Uuid) -> Result<(), ClientError> {
        self.delete(&api_paths::survey(survey_id)).await?;
        info!(%survey_id, "survey deleted");
        Ok(())
    }

    pub async fn list_questions(&self, survey_id: Uuid) -> Result<Vec<Question>, ClientError> {
        self.get_json(&api_paths::survey_questions(survey_id)).await
    }

    /// Validated locally before anything is sent.
    pub async fn add_question(
        &self,
        survey_id: Uuid,
        question: &NewQuestion,
    ) -> Result<Question, ClientError> {
        question.validate()?;
        let created: Question = self
            .post_json(&api_paths::survey_questions(survey_id), question)
            .await?;
        info!(%survey_id, question_id = %created.id, "question added");
        Ok(created)
    }

    pub async fn delete_question(&self, question_id: Uuid) -> Result<(), ClientError> {
        self.delete(&api_paths::question(question_id)).await
    }

    /// Validated locally before anything is sent.
    pub async fn schedule_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, ClientError> {
        appointment.validate()?;
        let created: Appointment = self.post_json(api_paths::APPOINTMENTS, appointment).await?;
        info!(
            appointment_id = %created.id,
            survey_id = %created.survey_id,
            patient_id = %created.patient_id,
            recurrence = ?created.recurrence,
            "appointment scheduled"
        );
        Ok(created)
    }

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, ClientError> {
        self.get_json(api_paths::APPOINTMENTS).await
    }

    pub async fn cancel_appointment(&self, appointment_id: Uuid) -> Result<(), ClientError> {
        self.delete(&api_paths::appointment(appointment_id)).await?;
        info!(%appointment_id, "appointment cancelled");
        Ok(())
    }

    /// Every attempt patients have submitted for a survey.
    pub async fn list_attempts(&self, survey_id: Uuid) -> Result<Vec<Attempt>, ClientError> {
        self.get_json(&api_paths::survey_attempts(survey_id)).await
    }

    pub async fn get_attempt(&self, attempt_id: Uuid) -> Result<Attempt, ClientError> {
        self.get_json(&api_paths::attempt(attempt_id)).await
    }
}
