use thiserror::Error;

/// Failure reported by a content provider or submission collaborator.
/// The session never interprets these beyond forwarding the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no non-blank answers to submit")]
    EmptyBatch,

    #[error("submission is only possible from the last question")]
    NotOnLastQuestion,

    #[error("session already submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl SessionError {
    /// Short message suitable for a transient notice in the UI.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::EmptyBatch => {
                "Please answer at least one question before submitting.".to_string()
            }
            SessionError::NotOnLastQuestion => {
                "Answer the remaining questions before submitting.".to_string()
            }
            SessionError::AlreadySubmitted => "This survey was already submitted.".to_string(),
            SessionError::Provider(ProviderError::Network(msg)) => {
                format!("Could not reach the server: {msg}")
            }
            SessionError::Provider(ProviderError::Server { message, .. }) => message.clone(),
        }
    }
}
