//! Error types for the generation pipeline.
//!
//! Each layer has its own enum; [`GenerationError`] is the closed set
//! callers of the service see.

use thiserror::Error;

/// Failures of the upstream text-completion call.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("cancelled")]
    Cancelled,

    #[error("no API key configured (set OPENAI_API_KEY or [model].api_key)")]
    MissingApiKey,

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limit or quota exceeded: {0}")]
    RateLimit(String),

    #[error("service returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to parse service response: {0}")]
    Parse(String),

    #[error("service returned no content")]
    EmptyContent,
}

/// Ways the model's text can fail the quiz schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("parse failure: {reason}; raw output: {}", raw_preview(.raw))]
    Parse { reason: String, raw: String },

    #[error("document root is not an object")]
    RootNotObject,

    #[error("missing field `questions`")]
    MissingQuestions,

    #[error("field `questions` is not an array")]
    QuestionsNotArray,

    #[error("field `questions` is empty")]
    NoQuestions,

    #[error("expected {expected} questions, got {actual}")]
    QuestionCount { expected: usize, actual: usize },

    #[error("questions[{index}] is not an object")]
    NotAnObject { index: usize },

    #[error("questions[{index}].{field}: {reason}")]
    Field {
        index: usize,
        field: &'static str,
        reason: String,
    },
}

/// Longest stretch of raw model output carried in error messages.
pub const RAW_PREVIEW_CHARS: usize = 500;

/// `raw` cut to [`RAW_PREVIEW_CHARS`], marked with `...` when cut.
pub fn raw_preview(raw: &str) -> String {
    let mut chars = raw.char_indices();
    match chars.nth(RAW_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}

/// Outcome taxonomy of [`QuizGenerationService::generate`](super::QuizGenerationService::generate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("input text is empty")]
    EmptyInput,

    #[error("model service failure: {0}")]
    ServiceFailure(String),

    #[error("malformed model output: {0}")]
    MalformedOutput(String),
}

impl GenerationError {
    /// Short stable tag, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::EmptyInput => "empty_input",
            GenerationError::ServiceFailure(_) => "service_failure",
            GenerationError::MalformedOutput(_) => "malformed_output",
        }
    }

    /// Whether resubmitting the same input could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GenerationError::EmptyInput)
    }
}

impl From<ModelError> for GenerationError {
    fn from(err: ModelError) -> Self {
        GenerationError::ServiceFailure(err.to_string())
    }
}

impl From<ValidationError> for GenerationError {
    fn from(err: ValidationError) -> Self {
        GenerationError::MalformedOutput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_maps_to_service_failure() {
        let err = GenerationError::from(ModelError::Cancelled);
        assert_eq!(err, GenerationError::ServiceFailure("cancelled".to_string()));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_detail_names_field_and_index() {
        let err = GenerationError::from(ValidationError::Field {
            index: 3,
            field: "answer",
            reason: "answer 5 is outside 1..=4".to_string(),
        });
        assert_eq!(err.kind(), "malformed_output");
        assert!(err.to_string().contains("questions[3].answer"));
    }

    #[test]
    fn test_parse_failure_keeps_raw_output() {
        let err = GenerationError::from(ValidationError::Parse {
            reason: "expected value at line 1 column 1".to_string(),
            raw: "Here you go: quiz-body-42".to_string(),
        });
        match err {
            GenerationError::MalformedOutput(detail) => {
                assert!(detail.starts_with("parse failure"));
                assert!(detail.contains("quiz-body-42"));
            }
            other => panic!("expected malformed output, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_preview_truncates_long_output() {
        assert_eq!(raw_preview("short"), "short");

        let long = "é".repeat(RAW_PREVIEW_CHARS + 10);
        let preview = raw_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), RAW_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_empty_input_is_not_retryable() {
        assert!(!GenerationError::EmptyInput.is_retryable());
    }
}
