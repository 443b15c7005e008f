//! Recorded answers.

use serde::{Deserialize, Serialize};

/// Separator used when joining multi-select answers into one field.
pub(crate) const ANSWER_JOIN: &str = ", ";

/// One recorded answer, tied to the question's prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub prompt: String,
    pub answer: String,
}

impl Response {
    /// A free-text answer. Leading and trailing whitespace is dropped.
    #[must_use]
    pub fn text(prompt: impl Into<String>, answer: &str) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.trim().to_string(),
        }
    }

    /// A choice answer. Selected choices are joined in display order;
    /// an empty selection records an empty answer.
    #[must_use]
    pub fn choices<S: AsRef<str>>(prompt: impl Into<String>, selected: &[S]) -> Self {
        Self {
            prompt: prompt.into(),
            answer: selected
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(ANSWER_JOIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_answer_is_trimmed() {
        let r = Response::text("Q", "  hello world \n");
        assert_eq!(r.answer, "hello world");
    }

    #[test]
    fn choice_answers_join_in_order() {
        let r = Response::choices("Q", &["Red", "Blue"]);
        assert_eq!(r.answer, "Red, Blue");
    }

    #[test]
    fn empty_selection_records_empty_answer() {
        let r = Response::choices::<&str>("Q", &[]);
        assert_eq!(r.answer, "");
    }
}
