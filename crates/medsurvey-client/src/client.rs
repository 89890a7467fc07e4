use std::time::Duration;

use medsurvey_core::models::user::AuthSession;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the survey backend.
///
/// Holds the signed-in [`AuthSession`] (if any) and attaches its token as a
/// bearer header. Performs no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    timeout_secs: u64,
    session: Option<AuthSession>,
}

/// Error body shapes the backend is known to return.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            timeout_secs,
            session: None,
        })
    }

    pub fn with_session(mut self, session: AuthSession) -> Self {
        self.session = Some(session);
        self
    }

    pub fn set_session(&mut self, session: Option<AuthSession>) {
        self.session = session;
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.http.request(method, url);
        match &self.session {
            Some(session) => req.bearer_auth(&session.token),
            None => req,
        }
    }

    /// Send and map transport failures and non-success statuses.
    async fn send(&self, path: &str, req: RequestBuilder) -> Result<Response, ClientError> {
        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                ClientError::Network(self.base_url.clone())
            } else {
                ClientError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "api response");

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(path.to_string())),
            _ => {
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        debug!(path, status = status.as_u16(), error = %e, "error body unreadable");
                        String::new()
                    }
                };
                let message = serde_json::from_str::<ErrorBody>(&body)
                    .map(|b| b.error)
                    .unwrap_or_else(|_| {
                        if body.trim().is_empty() {
                            status
                                .canonical_reason()
                                .unwrap_or("unknown error")
                                .to_string()
                        } else {
                            body
                        }
                    });
                Err(ClientError::Server {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status().as_u16();
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode {
                status,
                reason: e.to_string(),
            })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(path, self.request(Method::GET, path)).await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(path, self.request(Method::POST, path).json(body))
            .await?;
        Self::decode(response).await
    }

    /// POST where the response body is ignored.
    pub(crate) async fn post_unit<B>(&self, path: &str, body: Option<&B>) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut req = self.request(Method::POST, path);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send(path, req).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(path, self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}
