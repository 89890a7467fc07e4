use std::sync::Arc;

use medsurvey_core::models::question::Question;

/// Position within a fixed question sequence.
///
/// Invariant: `index < len`, or `index == 0` when the sequence is empty.
/// Both moves clamp at the boundaries instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCursor {
    questions: Arc<[Question]>,
    index: usize,
}

impl SessionCursor {
    pub fn new(questions: impl Into<Arc<[Question]>>) -> Self {
        Self {
            questions: questions.into(),
            index: 0,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// False for an empty sequence.
    pub fn is_last(&self) -> bool {
        !self.questions.is_empty() && self.index == self.questions.len() - 1
    }

    pub fn advance(&mut self) {
        if self.index + 1 < self.questions.len() {
            self.index += 1;
        }
    }

    pub fn retreat(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Fraction of questions before the current one: 0.0 on the first
    /// question, `(len - 1) / len` on the last.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            0.0
        } else {
            self.index as f64 / self.questions.len() as f64
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
