use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::is_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub doctor_id: Uuid,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSurvey {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl NewSurvey {
    pub fn validate(&self) -> Result<(), CoreError> {
        if is_blank(&self.title) {
            return Err(CoreError::InvalidSurvey("title is blank".to_string()));
        }
        Ok(())
    }
}

/// A survey as seen by the patient it is assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedSurvey {
    pub survey: Survey,
    #[serde(default)]
    pub appointment_id: Option<Uuid>,
    #[serde(default)]
    pub due_on: Option<jiff::civil::Date>,
    #[serde(default)]
    pub answered_count: u32,
    #[serde(default)]
    pub question_count: u32,
}

impl AssignedSurvey {
    pub fn is_started(&self) -> bool {
        self.answered_count > 0
    }
}
