//! Quiz generation pipeline: prompt, model call, validation.

mod client;
mod error;
mod prompt;
mod service;
mod validator;

pub use client::{ModelClient, OpenAiClient};
pub use error::{GenerationError, ModelError, RAW_PREVIEW_CHARS, ValidationError, raw_preview};
pub use prompt::{ChatMessage, InstructionPayload, PromptBuilder, Role, SYSTEM_DIRECTIVE};
pub use service::QuizGenerationService;
pub use validator::ResponseValidator;
