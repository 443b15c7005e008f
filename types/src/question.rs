//! Survey question records and the pipe-delimited set format.
//!
//! A question set is a text resource where line 1 is a header and every
//! following non-empty line is one record with six `|`-separated fields:
//!
//! ```text
//! prompt | choices | time_limit | multiple | randomize | kind
//! ```
//!
//! `choices` is `;`-separated and may be empty for free-text questions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field separator within a record line.
const FIELD_SEPARATOR: char = '|';

/// Separator within the `choices` field.
const CHOICE_SEPARATOR: char = ';';

/// Number of fields in a record line.
const FIELD_COUNT: usize = 6;

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Pick from the choice list (one, or several when `multiple` is set).
    Choice,
    /// Free text.
    Text,
}

impl QuestionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Choice => "choice",
            Self::Text => "text",
        }
    }
}

/// One survey item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Seconds allowed for this question; 0 means untimed.
    pub time_limit_secs: u32,
    /// Allow more than one choice to be selected.
    pub multiple: bool,
    /// Shuffle the displayed choice order.
    pub randomize: bool,
    pub kind: QuestionKind,
}

impl Question {
    #[must_use]
    pub const fn is_timed(&self) -> bool {
        self.time_limit_secs > 0
    }
}

/// Errors from parsing a question set resource.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected {FIELD_COUNT} '|'-separated fields, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: unknown question kind '{kind}'")]
    UnknownKind { line: usize, kind: String },
    #[error("line {line}: choice question has an empty choice list")]
    NoChoices { line: usize },
    #[error("line {line}: question prompt is empty")]
    EmptyPrompt { line: usize },
    #[error("question set contains no questions")]
    EmptySet,
}

/// Parse a full question set: header line skipped, one record per line.
///
/// Blank lines are ignored. A set that yields no questions is an error.
pub fn parse_question_set(text: &str) -> Result<Vec<Question>, ParseError> {
    let questions = text
        .trim()
        .lines()
        .enumerate()
        .skip(1) // header
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_record(idx + 1, line))
        .collect::<Result<Vec<_>, _>>()?;

    if questions.is_empty() {
        return Err(ParseError::EmptySet);
    }
    Ok(questions)
}

/// Parse one record line. `line_no` is 1-based and only used for errors.
fn parse_record(line_no: usize, line: &str) -> Result<Question, ParseError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount {
            line: line_no,
            found: fields.len(),
        });
    }

    let prompt = fields[0].trim();
    if prompt.is_empty() {
        return Err(ParseError::EmptyPrompt { line: line_no });
    }

    let choices: Vec<String> = if fields[1].trim().is_empty() {
        Vec::new()
    } else {
        fields[1]
            .split(CHOICE_SEPARATOR)
            .map(|c| c.trim().to_string())
            .collect()
    };

    // The source format is hand-edited; a malformed limit means "untimed"
    // rather than a rejected set.
    let time_limit_secs = fields[2].trim().parse().unwrap_or(0);

    let multiple = fields[3].trim() == "true";
    let randomize = fields[4].trim() == "true";

    let kind = match fields[5].trim() {
        "choice" => QuestionKind::Choice,
        "text" => QuestionKind::Text,
        other => {
            return Err(ParseError::UnknownKind {
                line: line_no,
                kind: other.to_string(),
            });
        }
    };

    if kind == QuestionKind::Choice && choices.is_empty() {
        return Err(ParseError::NoChoices { line: line_no });
    }

    Ok(Question {
        prompt: prompt.to_string(),
        choices,
        time_limit_secs,
        multiple,
        randomize,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "question|choices|time_limit|multiple_choice|randomize_order|type\n";

    #[test]
    fn parse_choice_record() {
        let text = format!("{HEADER}Favorite color?|Red;Green;Blue|30|false|true|choice");
        let questions = parse_question_set(&text).unwrap();
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.prompt, "Favorite color?");
        assert_eq!(q.choices, vec!["Red", "Green", "Blue"]);
        assert_eq!(q.time_limit_secs, 30);
        assert!(!q.multiple);
        assert!(q.randomize);
        assert_eq!(q.kind, QuestionKind::Choice);
    }

    #[test]
    fn parse_text_record_with_empty_choices() {
        let text = format!("{HEADER}Any comments?||0|false|false|text");
        let questions = parse_question_set(&text).unwrap();
        assert_eq!(questions[0].kind, QuestionKind::Text);
        assert!(questions[0].choices.is_empty());
        assert!(!questions[0].is_timed());
    }

    #[test]
    fn header_line_is_skipped() {
        let text = format!("{HEADER}Q|A;B|0|false|false|choice");
        let questions = parse_question_set(&text).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt, "Q");
    }

    #[test]
    fn blank_lines_are_ignored() {
        let text = format!("{HEADER}\nQ1|A;B|0|false|false|choice\n\nQ2||0|false|false|text\n");
        let questions = parse_question_set(&text).unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn malformed_time_limit_means_untimed() {
        let text = format!("{HEADER}Q|A;B|soon|false|false|choice");
        let questions = parse_question_set(&text).unwrap();
        assert_eq!(questions[0].time_limit_secs, 0);
    }

    #[test]
    fn flags_require_literal_true() {
        let text = format!("{HEADER}Q|A;B|0|TRUE|yes|choice");
        let questions = parse_question_set(&text).unwrap();
        assert!(!questions[0].multiple);
        assert!(!questions[0].randomize);
    }

    #[test]
    fn flags_tolerate_surrounding_whitespace() {
        let text = format!("{HEADER}Q|A;B|0| true | true |choice");
        let questions = parse_question_set(&text).unwrap();
        assert!(questions[0].multiple);
        assert!(questions[0].randomize);
    }

    #[test]
    fn unknown_kind_is_rejected_with_line_number() {
        let text = format!("{HEADER}Q1|A;B|0|false|false|choice\nQ2||0|false|false|slider");
        let err = parse_question_set(&text).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownKind {
                line: 3,
                kind: "slider".to_string()
            }
        );
    }

    #[test]
    fn missing_fields_are_rejected() {
        let text = format!("{HEADER}Q|A;B|0|false");
        let err = parse_question_set(&text).unwrap_err();
        assert_eq!(err, ParseError::FieldCount { line: 2, found: 5 });
    }

    #[test]
    fn choice_without_choices_is_rejected() {
        let text = format!("{HEADER}Q||10|false|false|choice");
        let err = parse_question_set(&text).unwrap_err();
        assert_eq!(err, ParseError::NoChoices { line: 2 });
    }

    #[test]
    fn header_only_set_is_empty() {
        assert_eq!(parse_question_set(HEADER), Err(ParseError::EmptySet));
        assert_eq!(parse_question_set(""), Err(ParseError::EmptySet));
    }
}
