//! Request and response envelopes for the generate operation.
//!
//! These are transport-neutral: whatever serves them decides how the
//! envelope maps onto its own framing.

use serde::{Deserialize, Serialize};

use crate::generation::GenerationError;
use crate::models::Quiz;

/// Inbound request: the text to build a quiz from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub prompt: String,
}

/// Coarse failure class for the transport layer to map onto its own codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatus {
    /// The caller sent nothing usable.
    BadRequest,
    /// Upstream or output failure; the caller may resubmit.
    Internal,
}

/// Outbound envelope: either `success` with `data`, or `error` with a
/// generic `message`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Quiz>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ErrorStatus>,
}

pub const EMPTY_INPUT_MESSAGE: &str = "No prompt provided";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate a quiz, please try again";

impl QueryResponse {
    pub fn success(quiz: Quiz) -> Self {
        Self {
            success: true,
            data: Some(quiz),
            error: false,
            message: None,
            status: None,
        }
    }

    /// Error envelope. Diagnostic detail from the error is not included.
    pub fn failure(err: &GenerationError) -> Self {
        let (message, status) = match err {
            GenerationError::EmptyInput => (EMPTY_INPUT_MESSAGE, ErrorStatus::BadRequest),
            GenerationError::ServiceFailure(_) | GenerationError::MalformedOutput(_) => {
                (GENERATION_FAILED_MESSAGE, ErrorStatus::Internal)
            }
        };
        Self {
            success: false,
            data: None,
            error: true,
            message: Some(message.to_string()),
            status: Some(status),
        }
    }

    pub fn from_result(result: Result<Quiz, GenerationError>) -> Self {
        match result {
            Ok(quiz) => Self::success(quiz),
            Err(err) => Self::failure(&err),
        }
    }
}
