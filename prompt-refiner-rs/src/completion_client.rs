// prompt-refiner-rs/src/completion_client.rs
//
// HTTP client for the external text-completion service (OpenAI-compatible
// legacy completions API)
//
// This module provides:
// - Strongly-typed request and response schema for the completion endpoint
// - The `CompletionService` trait, so the refiner can run against fakes
// - `CompletionClient`, the reqwest implementation
// - Classification of HTTP and transport failures into `CompletionError`
//
// A single attempt is made per call. Callers decide what a failure means.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::{RefinerConfig, SamplingConfig};

/// Request body for `POST /v1/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, sampling: &SamplingConfig) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            top_p: sampling.top_p,
            frequency_penalty: sampling.frequency_penalty,
            presence_penalty: sampling.presence_penalty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionChoice {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Usage {
    pub total_tokens: u32,
}

// OpenAI error envelope: {"error": {"message": "...", "type": "...", "code": ...}}
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Failure of a single completion call
///
/// Variants that carry a provider message display it verbatim, so the text
/// the service sent back is what ends up in front of the user.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    // 401
    #[error("{0}")]
    Authentication(String),
    // 403
    #[error("{0}")]
    PermissionDenied(String),
    // 429
    #[error("{0}")]
    RateLimited(String),
    // 400, 404, 422
    #[error("{0}")]
    InvalidRequest(String),
    // 5xx
    #[error("{0}")]
    Server(String),
    #[error("unexpected status {status}: {message}")]
    Unexpected { status: u16, message: String },

    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("{0}")]
    Network(String),

    #[error("malformed completion response: {0}")]
    Parse(String),
}

impl CompletionError {
    /// Map a non-success status and its body to an error
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = provider_message(status, body);
        match status.as_u16() {
            401 => CompletionError::Authentication(message),
            403 => CompletionError::PermissionDenied(message),
            429 => CompletionError::RateLimited(message),
            400 | 404 | 422 => CompletionError::InvalidRequest(message),
            500..=599 => CompletionError::Server(message),
            other => CompletionError::Unexpected {
                status: other,
                message,
            },
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout(err.to_string())
        } else if err.is_connect() {
            CompletionError::Network(format!("connection failed: {}", err))
        } else {
            CompletionError::Network(err.to_string())
        }
    }
}

// Prefer the structured message, then the raw body, then the status reason
fn provider_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// An external text-completion service
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Model identifier to put on outgoing requests
    fn model(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, CompletionError>;
}

#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    /// Creates a client from resolved configuration
    ///
    /// Without a configured timeout the reqwest default (none) applies.
    pub fn new(config: &RefinerConfig) -> Result<Self, CompletionError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CompletionError::Network(format!("failed to build HTTP client: {}", e)))?;

        log::info!(
            "Completion client initialized (endpoint: {}, model: {})",
            config.api_url,
            config.model
        );

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionService for CompletionClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, CompletionError> {
        log::debug!(
            "Sending completion request to {} (model: {}, prompt length: {})",
            self.api_url,
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(CompletionError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(CompletionError::from_transport)?;

        if !status.is_success() {
            return Err(CompletionError::from_status(status, &body));
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| CompletionError::Parse(e.to_string()))?;

        if let Some(usage) = &parsed.usage {
            log::info!("Completion request finished. Used {} tokens", usage.total_tokens);
        }

        Ok(parsed)
    }
}
