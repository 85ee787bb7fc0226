// prompt-refiner-rs/src/routes.rs
//
// HTTP surface:
// - POST /refine-prompt  refine `user_prompt` (query parameter, JSON body as fallback)
// - GET  /health         liveness
// - GET  /               service descriptor

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        DefaultBodyLimit, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};

use crate::error::ApiError;
use crate::refine::{PromptRefiner, RefinementResult};

pub const SERVICE_NAME: &str = "prompt-refiner";

/// Maximum accepted request body (64 KiB)
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// What the refine route delegates to
#[async_trait]
pub trait RefineBackend: Send + Sync {
    async fn refine(&self, user_prompt: &str) -> Result<RefinementResult, ApiError>;
}

#[async_trait]
impl RefineBackend for PromptRefiner {
    async fn refine(&self, user_prompt: &str) -> Result<RefinementResult, ApiError> {
        Ok(PromptRefiner::refine(self, user_prompt).await)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    backend: Arc<dyn RefineBackend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn RefineBackend>) -> Self {
        Self { backend }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RefineParams {
    pub user_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: u64,
    pub status: String,
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Lazy::force(&START_TIME);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/refine-prompt", post(refine_prompt_handler))
        .layer(DefaultBodyLimit::max(MAX_PAYLOAD_SIZE))
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

// The query parameter wins; an empty body with no query is a missing prompt
fn bind_user_prompt(params: RefineParams, body: &[u8]) -> Result<String, ApiError> {
    if let Some(prompt) = params.user_prompt {
        return Ok(prompt);
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::MissingPrompt);
    }
    let from_body: RefineParams =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    from_body.user_prompt.ok_or(ApiError::MissingPrompt)
}

/// POST /refine-prompt
async fn refine_prompt_handler(
    State(state): State<AppState>,
    params: Result<Query<RefineParams>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let body = body?;
    let user_prompt = bind_user_prompt(params, &body)?;
    log::info!("Refine request: prompt length={}", user_prompt.len());

    let result = state.backend.refine(&user_prompt).await?;
    let body = serde_json::to_value(&result)?;

    Ok((StatusCode::OK, Json(body)).into_response())
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        service_name: SERVICE_NAME.to_string(),
        uptime_seconds: START_TIME.elapsed().as_secs(),
        status: "SERVING".to_string(),
    })
}

/// GET /
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "Prompt Refiner",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /health",
            "POST /refine-prompt"
        ]
    }))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Panic(message).into_response()
}
