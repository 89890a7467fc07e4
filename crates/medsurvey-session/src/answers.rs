use std::collections::BTreeMap;

use medsurvey_core::is_blank;
use medsurvey_core::models::attempt::AnswerEntry;
use uuid::Uuid;

/// Current answer per question for one session. Writing a key again
/// overwrites it; no history is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    values: BTreeMap<Uuid, String>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Empty text is stored as-is.
    pub fn set_answer(&mut self, question_id: Uuid, text: impl Into<String>) {
        self.values.insert(question_id, text.into());
    }

    pub fn answer(&self, question_id: Uuid) -> Option<&str> {
        self.values.get(&question_id).map(String::as_str)
    }

    /// Stored and non-blank.
    pub fn has_answer(&self, question_id: Uuid) -> bool {
        self.answer(question_id).is_some_and(|a| !is_blank(a))
    }

    pub fn all_answers(&self) -> BTreeMap<Uuid, String> {
        self.values.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &String)> {
        self.values.iter()
    }

    /// Number of non-blank entries.
    pub fn answered_count(&self) -> usize {
        self.values.values().filter(|a| !is_blank(a)).count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pre-populate from previously saved answers. Entries for question ids
    /// outside `known` are skipped; returns how many were applied.
    pub fn seed<'a>(
        &mut self,
        entries: impl IntoIterator<Item = &'a AnswerEntry>,
        known: impl Fn(Uuid) -> bool,
    ) -> usize {
        let mut applied = 0;
        for entry in entries {
            if known(entry.question_id) {
                self.set_answer(entry.question_id, entry.answer.clone());
                applied += 1;
            }
        }
        applied
    }
}
