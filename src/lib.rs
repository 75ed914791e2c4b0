//! # quizsmith
//!
//! Turns free-form text into a validated multiple-choice quiz using a
//! text-completion model, and tracks a user's attempt at that quiz.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use quizsmith::{Config, QuizGenerationService, QuizSession};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load(None)?;
//! let service = QuizGenerationService::from_config(&config)?;
//!
//! let quiz = service.generate("The Treaty of Westphalia was signed in 1648.").await?;
//!
//! let mut session = QuizSession::new(Arc::new(quiz));
//! session.select_answer(0, 2)?;
//! let score = session.reveal();
//! println!("score: {score}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod generation;
pub mod models;
pub mod protocol;
pub mod session;

pub use config::{Config, ConfigError};
pub use data::{LoadError, load_quiz, load_source_text};
pub use generation::{
    GenerationError, InstructionPayload, ModelClient, ModelError, OpenAiClient, PromptBuilder,
    QuizGenerationService, ResponseValidator, ValidationError,
};
pub use models::{NUM_OPTIONS, Question, Quiz};
pub use protocol::{QueryRequest, QueryResponse};
pub use session::{QuestionOutcome, QuizSession, Score, SessionError, SessionState};
