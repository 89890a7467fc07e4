//! REST path conventions.
//!
//! Pure string functions with no HTTP dependency. These define the canonical
//! layout of the backend API relative to its base URL.

use uuid::Uuid;

pub const LOGIN: &str = "/auth/login";

pub const REGISTER: &str = "/auth/register";

pub const PASSWORD_FORGOT: &str = "/auth/password/forgot";

pub const PASSWORD_VERIFY: &str = "/auth/password/verify";

pub const PASSWORD_RESET: &str = "/auth/password/reset";

pub const ME: &str = "/me";

pub const SURVEYS: &str = "/surveys";

pub fn survey(id: Uuid) -> String {
    format!("/surveys/{id}")
}

pub fn survey_questions(id: Uuid) -> String {
    format!("/surveys/{id}/questions")
}

pub fn question(id: Uuid) -> String {
    format!("/questions/{id}")
}

pub fn survey_progress(id: Uuid) -> String {
    format!("/surveys/{id}/progress")
}

pub fn survey_attempts(id: Uuid) -> String {
    format!("/surveys/{id}/attempts")
}

pub fn attempt(id: Uuid) -> String {
    format!("/attempts/{id}")
}

pub const PATIENT_SURVEYS: &str = "/patients/me/surveys";

pub const PATIENT_DOCTORS: &str = "/patients/me/doctors";

pub fn patient_doctor(doctor_id: Uuid) -> String {
    format!("/patients/me/doctors/{doctor_id}")
}

pub const DOCTORS: &str = "/doctors";

pub const APPOINTMENTS: &str = "/appointments";

pub fn appointment(id: Uuid) -> String {
    format!("/appointments/{id}")
}
