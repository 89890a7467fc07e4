use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One (question, answer) pair as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: Uuid,
    pub answer: String,
}

/// The set of non-blank answers sent to the backend in one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionBatch {
    pub survey_id: Uuid,
    pub entries: Vec<AnswerEntry>,
}

impl SubmissionBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn answer_for(&self, question_id: Uuid) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.question_id == question_id)
            .map(|e| e.answer.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptReceipt {
    pub attempt_id: Uuid,
}

/// A submitted set of answers, as reviewed by the doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub patient_id: Uuid,
    pub submitted_at: jiff::Timestamp,
    pub answers: Vec<AnswerEntry>,
}

/// Previously saved answers for a survey the patient has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyProgress {
    pub survey_id: Uuid,
    #[serde(default)]
    pub answers: Vec<AnswerEntry>,
}
