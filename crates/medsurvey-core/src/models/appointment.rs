use jiff::Span;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Upper bound on how many occurrences one appointment may expand into.
pub const MAX_OCCURRENCES: u32 = 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Once,
    Daily,
    Weekly,
    /// Same day of month; clamped to the month's last day when shorter.
    Monthly,
}

impl Recurrence {
    fn offset(self, n: u32) -> Result<Span, jiff::Error> {
        let n = i64::from(n);
        match self {
            Recurrence::Once | Recurrence::Daily => Span::new().try_days(n),
            Recurrence::Weekly => Span::new().try_weeks(n),
            Recurrence::Monthly => Span::new().try_months(n),
        }
    }
}

/// A recurring schedule under which a patient is asked to answer a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub starts_on: Date,
    pub recurrence: Recurrence,
    pub occurrences: u32,
    pub created_at: jiff::Timestamp,
}

impl Appointment {
    /// Every date on which the survey is due, in order.
    pub fn due_dates(&self) -> Vec<Date> {
        due_dates(self.starts_on, self.recurrence, self.occurrences)
    }

    /// The first due date on or after `today`.
    pub fn next_due(&self, today: Date) -> Option<Date> {
        self.due_dates().into_iter().find(|d| *d >= today)
    }
}

fn due_dates(starts_on: Date, recurrence: Recurrence, occurrences: u32) -> Vec<Date> {
    let count = match recurrence {
        Recurrence::Once => occurrences.min(1),
        _ => occurrences,
    };
    // Offsets are always taken from the start date so monthly clamping does
    // not drift (Jan 31 -> Feb 29 -> Mar 31).
    (0..count)
        .map_while(|i| {
            recurrence
                .offset(i)
                .ok()
                .and_then(|span| starts_on.checked_add(span).ok())
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub survey_id: Uuid,
    pub patient_id: Uuid,
    pub starts_on: Date,
    pub recurrence: Recurrence,
    pub occurrences: u32,
}

impl NewAppointment {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.occurrences == 0 {
            return Err(CoreError::InvalidAppointment(
                "occurrences must be at least 1".to_string(),
            ));
        }
        if self.occurrences > MAX_OCCURRENCES {
            return Err(CoreError::InvalidAppointment(format!(
                "occurrences {} exceeds maximum of {MAX_OCCURRENCES}",
                self.occurrences
            )));
        }
        if self.recurrence == Recurrence::Once && self.occurrences != 1 {
            return Err(CoreError::InvalidAppointment(
                "a one-off appointment has exactly one occurrence".to_string(),
            ));
        }
        Ok(())
    }

    pub fn due_dates(&self) -> Vec<Date> {
        due_dates(self.starts_on, self.recurrence, self.occurrences)
    }
}
