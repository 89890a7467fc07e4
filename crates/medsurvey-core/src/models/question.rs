use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::is_blank;

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 10;

/// Selects the input widget. The session core only cares whether an answer
/// is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    FreeText,
    /// Integer rating in `RATING_MIN..=RATING_MAX`, stored as text.
    Rating,
    /// One of the question's option labels, stored as text.
    OptionSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub prompt: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub position: u32,
}

impl Question {
    /// Whether `answer` is a well-formed value for this question's input
    /// widget. Blank answers are never accepted.
    pub fn accepts(&self, answer: &str) -> bool {
        if is_blank(answer) {
            return false;
        }
        match self.question_type {
            QuestionType::FreeText => true,
            QuestionType::Rating => answer
                .trim()
                .parse::<i64>()
                .is_ok_and(|v| (RATING_MIN..=RATING_MAX).contains(&v)),
            QuestionType::OptionSelection => self.options.iter().any(|o| o == answer),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub prompt: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
}

impl NewQuestion {
    pub fn validate(&self) -> Result<(), CoreError> {
        if is_blank(&self.prompt) {
            return Err(CoreError::InvalidQuestion("prompt is blank".to_string()));
        }
        match self.question_type {
            QuestionType::OptionSelection => {
                if self.options.len() < 2 {
                    return Err(CoreError::InvalidQuestion(format!(
                        "option selection needs at least 2 options, got {}",
                        self.options.len()
                    )));
                }
                if self.options.iter().any(|o| is_blank(o)) {
                    return Err(CoreError::InvalidQuestion(
                        "option labels must not be blank".to_string(),
                    ));
                }
            }
            QuestionType::FreeText | QuestionType::Rating => {
                if !self.options.is_empty() {
                    return Err(CoreError::InvalidQuestion(format!(
                        "{:?} questions take no options",
                        self.question_type
                    )));
                }
            }
        }
        Ok(())
    }
}
