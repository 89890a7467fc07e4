//! medsurvey-core
//!
//! Pure domain types and REST path conventions.
//! No HTTP dependency; this is the shared vocabulary of the medsurvey client.

pub mod api_paths;
pub mod error;
pub mod models;

/// A string is blank when it is empty or consists only of whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
