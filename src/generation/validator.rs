//! Schema enforcement for model output.
//!
//! Validation is all-or-nothing: the first bad element rejects the whole
//! document and no partial quiz is ever produced.

use serde_json::Value;

use super::error::ValidationError;
use crate::models::{NUM_OPTIONS, Question, Quiz};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseValidator {
    expected_questions: Option<usize>,
}

impl ResponseValidator {
    /// Validator that also requires exactly `expected_questions` entries.
    pub fn new(expected_questions: usize) -> Self {
        Self {
            expected_questions: Some(expected_questions),
        }
    }

    /// Validator that accepts any non-zero number of questions.
    pub fn any_count() -> Self {
        Self {
            expected_questions: None,
        }
    }

    pub fn validate(&self, raw: &str) -> Result<Quiz, ValidationError> {
        let document: Value =
            serde_json::from_str(raw.trim()).map_err(|e| ValidationError::Parse {
                reason: e.to_string(),
                raw: raw.to_string(),
            })?;
        self.validate_value(&document)
    }

    pub fn validate_value(&self, document: &Value) -> Result<Quiz, ValidationError> {
        let root = document.as_object().ok_or(ValidationError::RootNotObject)?;
        let entries = root
            .get("questions")
            .ok_or(ValidationError::MissingQuestions)?
            .as_array()
            .ok_or(ValidationError::QuestionsNotArray)?;

        if entries.is_empty() {
            return Err(ValidationError::NoQuestions);
        }
        if let Some(expected) = self.expected_questions {
            if entries.len() != expected {
                return Err(ValidationError::QuestionCount {
                    expected,
                    actual: entries.len(),
                });
            }
        }

        let questions = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_question(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Quiz::new(questions).map_err(|_| ValidationError::NoQuestions)
    }
}

fn parse_question(index: usize, entry: &Value) -> Result<Question, ValidationError> {
    let field_error = |field: &'static str, reason: String| ValidationError::Field {
        index,
        field,
        reason,
    };

    let entry = entry
        .as_object()
        .ok_or(ValidationError::NotAnObject { index })?;

    let text = match entry.get("question") {
        Some(Value::String(text)) => text.clone(),
        Some(_) => return Err(field_error("question", "must be a string".to_string())),
        None => return Err(field_error("question", "missing".to_string())),
    };

    let options = match entry.get("options") {
        Some(Value::Array(options)) => options,
        Some(_) => return Err(field_error("options", "must be an array".to_string())),
        None => return Err(field_error("options", "missing".to_string())),
    };
    if options.len() != NUM_OPTIONS {
        return Err(field_error(
            "options",
            format!("expected {NUM_OPTIONS} options, got {}", options.len()),
        ));
    }
    let options: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(position, option)| {
            option
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| field_error("options", format!("option {position} is not a string")))
        })
        .collect::<Result<_, _>>()?;
    let options: [String; NUM_OPTIONS] = options
        .try_into()
        .map_err(|_| field_error("options", format!("expected {NUM_OPTIONS} options")))?;

    let answer = match entry.get("answer") {
        Some(answer) => answer
            .as_i64()
            .ok_or_else(|| field_error("answer", format!("must be an integer, got {answer}")))?,
        None => return Err(field_error("answer", "missing".to_string())),
    };
    let answer = u8::try_from(answer)
        .map_err(|_| field_error("answer", format!("answer {answer} is outside 1..=4")))?;

    Question::new(text, options, answer).map_err(|e| field_error(e.field(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entry(answer: i64) -> Value {
        json!({
            "question": "Which gas do plants absorb?",
            "options": ["Oxygen", "Carbon dioxide", "Nitrogen", "Helium"],
            "answer": answer
        })
    }

    fn document(entries: Vec<Value>) -> String {
        json!({ "questions": entries }).to_string()
    }

    #[test]
    fn test_well_formed_payload_round_trips() {
        let raw = document(vec![entry(2), entry(4)]);
        let quiz = ResponseValidator::new(2).validate(&raw).unwrap();

        assert_eq!(quiz.len(), 2);
        let first = quiz.question(0).unwrap();
        assert_eq!(first.text(), "Which gas do plants absorb?");
        assert_eq!(first.options()[1], "Carbon dioxide");
        assert_eq!(first.correct_option_index(), 2);
        assert_eq!(quiz.question(1).unwrap().correct_option_index(), 4);

        // Writing the quiz back out and validating again loses nothing.
        let rewritten = serde_json::to_string(&quiz).unwrap();
        assert_eq!(ResponseValidator::new(2).validate(&rewritten).unwrap(), quiz);
    }

    #[test]
    fn test_preserves_whitespace_in_options() {
        let mut padded = entry(1);
        padded["options"] = json!([" a", "  b", "fn main() {}\n", "d "]);
        let quiz = ResponseValidator::new(1)
            .validate(&document(vec![padded]))
            .unwrap();

        let options = quiz.question(0).unwrap().options();
        assert_eq!(options[0], " a");
        assert_eq!(options[2], "fn main() {}\n");

        let rewritten = serde_json::to_value(&quiz).unwrap();
        assert_eq!(rewritten["questions"][0]["options"][0], " a");
        assert_eq!(rewritten["questions"][0]["options"][3], "d ");
    }

    #[test]
    fn test_rejects_answer_out_of_range() {
        let err = ResponseValidator::new(1)
            .validate(&document(vec![entry(5)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Field { index: 0, field: "answer", .. }
        ));

        let err = ResponseValidator::new(1)
            .validate(&document(vec![entry(-1)]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Field { field: "answer", .. }));
    }

    #[test]
    fn test_rejects_three_options() {
        let mut bad = entry(1);
        bad["options"] = json!(["a", "b", "c"]);
        let err = ResponseValidator::new(2)
            .validate(&document(vec![entry(1), bad]))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Field { index: 1, field: "options", .. }
        ));
    }

    #[test]
    fn test_rejects_non_array_questions() {
        let raw = json!({ "questions": { "question": "nope" } }).to_string();
        assert_eq!(
            ResponseValidator::new(1).validate(&raw),
            Err(ValidationError::QuestionsNotArray)
        );
    }

    #[test]
    fn test_rejects_unparseable_text() {
        let raw = "Sure! Here is your quiz: ```json {\"questions\": [";
        let err = ResponseValidator::new(10).validate(raw).unwrap_err();
        match err {
            ValidationError::Parse { raw: kept, .. } => assert_eq!(kept, raw),
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_empty_and_missing_questions() {
        assert_eq!(
            ResponseValidator::any_count().validate(r#"{"questions": []}"#),
            Err(ValidationError::NoQuestions)
        );
        assert_eq!(
            ResponseValidator::any_count().validate(r#"{"items": []}"#),
            Err(ValidationError::MissingQuestions)
        );
        assert_eq!(
            ResponseValidator::any_count().validate("[1, 2]"),
            Err(ValidationError::RootNotObject)
        );
    }

    #[test]
    fn test_enforces_expected_count() {
        let raw = document(vec![entry(1); 9]);
        assert_eq!(
            ResponseValidator::new(10).validate(&raw),
            Err(ValidationError::QuestionCount {
                expected: 10,
                actual: 9
            })
        );
        assert_eq!(ResponseValidator::any_count().validate(&raw).unwrap().len(), 9);
    }

    #[test]
    fn test_rejects_wrong_field_types() {
        let mut string_answer = entry(1);
        string_answer["answer"] = json!("2");
        let err = ResponseValidator::new(1)
            .validate(&document(vec![string_answer]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Field { field: "answer", .. }));

        let mut blank_text = entry(1);
        blank_text["question"] = json!("  ");
        let err = ResponseValidator::new(1)
            .validate(&document(vec![blank_text]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Field { field: "question", .. }));

        let mut numeric_option = entry(1);
        numeric_option["options"][2] = json!(42);
        let err = ResponseValidator::new(1)
            .validate(&document(vec![numeric_option]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Field { field: "options", .. }));

        let err = ResponseValidator::new(1)
            .validate(&document(vec![json!("just a string")]))
            .unwrap_err();
        assert_eq!(err, ValidationError::NotAnObject { index: 0 });
    }
}
