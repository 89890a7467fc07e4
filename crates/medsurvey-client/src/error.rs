use medsurvey_core::error::CoreError;
use medsurvey_session::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("cannot reach server at {0}")]
    Network(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("not signed in or session expired")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server answered, but the body did not have the expected shape.
    #[error("unexpected response (HTTP {status}): {reason}")]
    Decode { status: u16, reason: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

impl From<ClientError> for ProviderError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Network(_) | ClientError::Timeout(_) | ClientError::Http(_) => {
                ProviderError::Network(e.to_string())
            }
            ClientError::Unauthorized => ProviderError::Server {
                status: 401,
                message: "Your session has expired, please sign in again.".to_string(),
            },
            ClientError::NotFound(what) => ProviderError::Server {
                status: 404,
                message: format!("{what} was not found"),
            },
            ClientError::Server { status, message } => ProviderError::Server { status, message },
            ClientError::Decode { status, reason } => {
                tracing::debug!(status, %reason, "undecodable response");
                ProviderError::Server {
                    status,
                    message: "The server sent a response this app could not read.".to_string(),
                }
            }
            ClientError::InvalidBaseUrl { .. } => ProviderError::Network(e.to_string()),
            ClientError::Invalid(_) => ProviderError::Server {
                status: 400,
                message: e.to_string(),
            },
        }
    }
}
