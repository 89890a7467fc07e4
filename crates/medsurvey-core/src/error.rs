use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid survey: {0}")]
    InvalidSurvey(String),

    #[error("invalid question: {0}")]
    InvalidQuestion(String),

    #[error("invalid appointment: {0}")]
    InvalidAppointment(String),
}
