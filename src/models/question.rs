use serde::Serialize;

/// Every question carries exactly this many options.
pub const NUM_OPTIONS: usize = 4;

/// A single multiple-choice question.
///
/// Serializes with the same field names the model is asked to emit
/// (`question`, `options`, `answer`), so a quiz written back out can be
/// fed through the validator again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    #[serde(rename = "question")]
    text: String,
    options: [String; NUM_OPTIONS],
    /// 1-based, in `1..=NUM_OPTIONS`.
    #[serde(rename = "answer")]
    correct_option_index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuestion {
    #[error("question text is empty")]
    EmptyText,

    #[error("option {0} is empty")]
    EmptyOption(usize),

    #[error("answer {0} is outside 1..=4")]
    AnswerOutOfRange(u8),
}

impl InvalidQuestion {
    /// Name of the wire field the problem was found in.
    pub fn field(&self) -> &'static str {
        match self {
            InvalidQuestion::EmptyText => "question",
            InvalidQuestion::EmptyOption(_) => "options",
            InvalidQuestion::AnswerOutOfRange(_) => "answer",
        }
    }
}

impl Question {
    /// Text and options are stored verbatim; whitespace-only values count
    /// as empty.
    pub fn new(
        text: impl Into<String>,
        options: [String; NUM_OPTIONS],
        correct_option_index: u8,
    ) -> Result<Self, InvalidQuestion> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(InvalidQuestion::EmptyText);
        }

        if let Some(position) = options.iter().position(|option| option.trim().is_empty()) {
            return Err(InvalidQuestion::EmptyOption(position));
        }

        if !(1..=NUM_OPTIONS as u8).contains(&correct_option_index) {
            return Err(InvalidQuestion::AnswerOutOfRange(correct_option_index));
        }

        Ok(Self {
            text,
            options,
            correct_option_index,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String; NUM_OPTIONS] {
        &self.options
    }

    /// The 1-based index as the model reported it.
    pub fn correct_option_index(&self) -> u8 {
        self.correct_option_index
    }

    /// The 0-based position of the correct option, the form used for
    /// selections.
    pub fn correct_option_position(&self) -> usize {
        usize::from(self.correct_option_index) - 1
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_position()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; NUM_OPTIONS] {
        ["Mercury", "Venus", "Earth", "Mars"].map(String::from)
    }

    #[test]
    fn test_correct_option_position_is_zero_based() {
        let question = Question::new("Third planet?", options(), 3).unwrap();
        assert_eq!(question.correct_option_index(), 3);
        assert_eq!(question.correct_option_position(), 2);
        assert_eq!(question.correct_option(), "Earth");
    }

    #[test]
    fn test_rejects_out_of_range_answer() {
        assert_eq!(
            Question::new("q", options(), 0),
            Err(InvalidQuestion::AnswerOutOfRange(0))
        );
        assert_eq!(
            Question::new("q", options(), 5),
            Err(InvalidQuestion::AnswerOutOfRange(5))
        );
    }

    #[test]
    fn test_rejects_blank_text_and_options() {
        assert_eq!(
            Question::new("   ", options(), 1),
            Err(InvalidQuestion::EmptyText)
        );

        let mut blank = options();
        blank[1] = " ".to_string();
        let err = Question::new("q", blank, 1).unwrap_err();
        assert_eq!(err, InvalidQuestion::EmptyOption(1));
        assert_eq!(err.field(), "options");
    }

    #[test]
    fn test_keeps_surrounding_whitespace() {
        let mut padded = options();
        padded[0] = " a".to_string();
        padded[3] = "x^2 ".to_string();
        let question = Question::new("  Indented?\n", padded, 1).unwrap();

        assert_eq!(question.text(), "  Indented?\n");
        assert_eq!(question.options()[0], " a");
        assert_eq!(question.correct_option(), " a");
        assert_eq!(question.options()[3], "x^2 ");
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let question = Question::new("Third planet?", options(), 3).unwrap();
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["question"], "Third planet?");
        assert_eq!(json["answer"], 3);
        assert_eq!(json["options"][3], "Mars");
    }
}
