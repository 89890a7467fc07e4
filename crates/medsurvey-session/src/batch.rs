use medsurvey_core::is_blank;
use medsurvey_core::models::attempt::{AnswerEntry, SubmissionBatch};
use uuid::Uuid;

use crate::answers::AnswerStore;
use crate::error::SessionError;

/// Assemble the submission for `survey_id` from every non-blank answer,
/// ordered by question id. Fails with [`SessionError::EmptyBatch`] when
/// nothing remains so an empty batch is never sent.
pub fn build_batch(survey_id: Uuid, answers: &AnswerStore) -> Result<SubmissionBatch, SessionError> {
    let entries: Vec<AnswerEntry> = answers
        .iter()
        .filter(|(_, text)| !is_blank(text))
        .map(|(question_id, text)| AnswerEntry {
            question_id: *question_id,
            answer: text.clone(),
        })
        .collect();

    if entries.is_empty() {
        return Err(SessionError::EmptyBatch);
    }

    Ok(SubmissionBatch { survey_id, entries })
}
