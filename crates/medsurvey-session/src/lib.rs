//! medsurvey-session
//!
//! The survey-taking session: an answer store keyed by question id, a cursor
//! over a fixed question sequence, the submission assembler, and the
//! controller that gates forward progress. No network dependency: loading
//! and submitting go through the traits in [`provider`].

pub mod answers;
pub mod batch;
pub mod controller;
pub mod cursor;
pub mod error;
pub mod memory;
pub mod provider;
pub mod state;

pub use answers::AnswerStore;
pub use batch::build_batch;
pub use controller::{SessionController, SessionSnapshot};
pub use cursor::SessionCursor;
pub use error::{ProviderError, SessionError};
pub use provider::{SubmissionSink, SurveyContentProvider};
pub use state::{Intent, SessionState, SessionStatus};
