use std::future::{self, Future};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::client::{ModelClient, OpenAiClient};
use super::error::{GenerationError, ModelError, raw_preview};
use super::prompt::PromptBuilder;
use super::validator::ResponseValidator;
use crate::config::Config;
use crate::models::Quiz;

/// Orchestrates prompt building, the model call and validation.
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent `generate` calls.
pub struct QuizGenerationService {
    builder: PromptBuilder,
    client: Arc<dyn ModelClient>,
    validator: ResponseValidator,
    call_timeout: Duration,
}

impl QuizGenerationService {
    pub fn new(client: Arc<dyn ModelClient>, question_count: usize, call_timeout: Duration) -> Self {
        Self {
            builder: PromptBuilder::new(question_count),
            client,
            validator: ResponseValidator::new(question_count),
            call_timeout,
        }
    }

    /// Service backed by the OpenAI-compatible client described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ModelError> {
        let client = OpenAiClient::new(&config.model)?;
        Ok(Self::new(
            Arc::new(client),
            config.quiz.question_count,
            config.model.timeout(),
        ))
    }

    pub fn question_count(&self) -> usize {
        self.builder.question_count()
    }

    /// Generates a quiz from `source_text`.
    ///
    /// Blank input fails with [`GenerationError::EmptyInput`] before any
    /// network call. Failures are never retried here.
    pub async fn generate(&self, source_text: &str) -> Result<Quiz, GenerationError> {
        self.generate_with_cancel(source_text, future::pending()).await
    }

    /// Like [`generate`](Self::generate), but gives up as soon as `cancel`
    /// completes. The in-flight request is dropped and the call fails with
    /// `ServiceFailure("cancelled")`.
    pub async fn generate_with_cancel<C>(
        &self,
        source_text: &str,
        cancel: C,
    ) -> Result<Quiz, GenerationError>
    where
        C: Future<Output = ()>,
    {
        let source_text = source_text.trim();
        if source_text.is_empty() {
            debug!("rejecting empty input");
            return Err(GenerationError::EmptyInput);
        }

        info!(
            input_chars = source_text.chars().count(),
            questions = self.question_count(),
            "generating quiz"
        );
        let payload = self.builder.build(source_text);

        let raw = tokio::select! {
            result = tokio::time::timeout(self.call_timeout, self.client.complete(&payload)) => {
                match result {
                    Ok(Ok(raw)) => raw,
                    Ok(Err(err)) => return Err(service_failure(err)),
                    Err(_) => return Err(service_failure(ModelError::Timeout {
                        seconds: self.call_timeout.as_secs(),
                    })),
                }
            }
            _ = cancel => return Err(service_failure(ModelError::Cancelled)),
        };

        match self.validator.validate(&raw) {
            Ok(quiz) => {
                info!(questions = quiz.len(), "quiz generated");
                Ok(quiz)
            }
            Err(err) => {
                warn!(
                    kind = "malformed_output",
                    error = %err,
                    raw_chars = raw.chars().count(),
                    raw = %raw_preview(&raw),
                    "model output failed validation"
                );
                Err(err.into())
            }
        }
    }
}

fn service_failure(err: ModelError) -> GenerationError {
    warn!(kind = "service_failure", error = %err, "model call failed");
    err.into()
}
