use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::generation::{ResponseValidator, ValidationError};
use crate::models::Quiz;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to read stdin: {0}")]
    Stdin(io::Error),

    #[error("{} is not a valid quiz: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Reads source text from `path`, or from stdin when `path` is `None`.
pub fn load_source_text<P: AsRef<Path>>(path: Option<P>) -> Result<String, LoadError> {
    match path {
        Some(path) => {
            let path = path.as_ref();
            fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(LoadError::Stdin)?;
            Ok(text)
        }
    }
}

/// Loads a previously generated quiz.
pub fn load_quiz<P: AsRef<Path>>(path: P) -> Result<Quiz, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    quiz_from_json_str(&content).map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Accepts either a bare `{"questions": [...]}` document or a success
/// envelope carrying one under `data`. Any question count is allowed.
pub fn quiz_from_json_str(content: &str) -> Result<Quiz, ValidationError> {
    let document: Value = serde_json::from_str(content).map_err(|e| ValidationError::Parse {
        reason: e.to_string(),
        raw: content.to_string(),
    })?;

    let document = match document.get("data") {
        Some(data) if document.get("questions").is_none() => data,
        _ => &document,
    };
    ResponseValidator::any_count().validate_value(document)
}
