//! medsurvey-client
//!
//! Thin async REST client for the survey backend. Implements the session
//! collaborator traits and the doctor/patient CRUD calls.

pub mod auth;
pub mod client;
pub mod doctor;
pub mod error;
pub mod patient;
pub mod provider;

pub use client::ApiClient;
pub use error::ClientError;
