//! Sign-in, registration and the password-reset flow.
//!
//! The reset flow spans three screens. Each step returns a value carrying
//! the email forward, so the next step takes it as an argument instead of
//! reading it from shared state.

use medsurvey_core::api_paths;
use medsurvey_core::models::user::{AuthSession, Credentials, Registration, UserProfile};
use serde::Serialize;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ClientError;

/// Issued once a reset code has been requested for `email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetTicket {
    email: String,
}

impl PasswordResetTicket {
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Issued once the emailed code has been confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedReset {
    email: String,
    code: String,
}

impl VerifiedReset {
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[derive(Serialize)]
struct ForgotRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct ResetRequest<'a> {
    email: &'a str,
    code: &'a str,
    new_password: &'a str,
}

impl ApiClient {
    /// Sign in and keep the returned session on this client.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        info!(email, "signing in");
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session: AuthSession = self.post_json(api_paths::LOGIN, &credentials).await?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    pub async fn register(&mut self, registration: &Registration) -> Result<AuthSession, ClientError> {
        info!(email = %registration.email, role = ?registration.role, "registering");
        let session: AuthSession = self.post_json(api_paths::REGISTER, registration).await?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    pub fn logout(&mut self) {
        self.set_session(None);
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        self.get_json(api_paths::ME).await
    }

    /// Ask the backend to email a reset code.
    pub async fn forgot_password(&self, email: &str) -> Result<PasswordResetTicket, ClientError> {
        info!(email, "requesting password reset code");
        self.post_unit(api_paths::PASSWORD_FORGOT, Some(&ForgotRequest { email }))
            .await?;
        Ok(PasswordResetTicket {
            email: email.to_string(),
        })
    }

    pub async fn verify_reset_code(
        &self,
        ticket: &PasswordResetTicket,
        code: &str,
    ) -> Result<VerifiedReset, ClientError> {
        let body = VerifyRequest {
            email: &ticket.email,
            code: code.trim(),
        };
        self.post_unit(api_paths::PASSWORD_VERIFY, Some(&body)).await?;
        Ok(VerifiedReset {
            email: ticket.email.clone(),
            code: code.trim().to_string(),
        })
    }

    pub async fn reset_password(
        &self,
        verified: VerifiedReset,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let body = ResetRequest {
            email: &verified.email,
            code: &verified.code,
            new_password,
        };
        self.post_unit(api_paths::PASSWORD_RESET, Some(&body)).await?;
        info!(email = %verified.email, "password reset");
        Ok(())
    }
}
