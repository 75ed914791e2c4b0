//! The text-completion boundary.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::error::ModelError;
use super::prompt::InstructionPayload;
use crate::config::ModelConfig;

/// Anything that can turn an instruction into raw model text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, payload: &InstructionPayload) -> Result<String, ModelError>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiClient {
    http_client: HttpClient,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        Self::with_http_client(config, http_client)
    }

    fn with_http_client(config: &ModelConfig, http_client: HttpClient) -> Result<Self, ModelError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ModelError::MissingApiKey)?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
        })
    }

    fn request_body(&self, payload: &InstructionPayload) -> Value {
        json!({
            "model": self.model,
            "messages": payload.messages(),
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            // A hint only; the validator still checks everything.
            "response_format": { "type": "json_object" },
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> ModelError {
        if err.is_timeout() {
            ModelError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            ModelError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(&self, payload: &InstructionPayload) -> Result<String, ModelError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let started = Instant::now();
        debug!(model = %self.model, %url, "sending completion request");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(payload))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ModelError::Parse(e.to_string()))?;

        info!(
            model = %self.model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "completion received"
        );

        extract_content(&body)
    }
}

/// Maps a non-success status to the matching error variant.
fn classify_status(status: StatusCode, body: String) -> ModelError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ModelError::Authentication(body),
        StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimit(body),
        _ => ModelError::HttpStatus {
            status: status.as_u16(),
            message: body,
        },
    }
}

/// Pulls `choices[0].message.content` out of a chat completion body.
fn extract_content(body: &Value) -> Result<String, ModelError> {
    let choices = body["choices"]
        .as_array()
        .ok_or_else(|| ModelError::Parse("no choices in response".to_string()))?;

    let content = choices
        .first()
        .and_then(|choice| choice["message"]["content"].as_str())
        .map(str::trim)
        .unwrap_or_default();

    if content.is_empty() {
        return Err(ModelError::EmptyContent);
    }
    Ok(content.to_string())
}
