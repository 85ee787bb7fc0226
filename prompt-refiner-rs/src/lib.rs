// prompt-refiner-rs/src/lib.rs
//
//! # Prompt Refiner
//!
//! A single-endpoint HTTP service that asks an LLM completion API to refine a
//! user's prompt.
//!
//! - `config`: runtime configuration resolved from the environment
//! - `completion_client`: typed client for the external completion service
//! - `refine`: the refine operation and its `RefinementResult`
//! - `routes`: axum router and handlers
//! - `error`: route-level errors and their HTTP mapping

pub mod completion_client;
pub mod config;
pub mod error;
pub mod refine;
pub mod routes;


use std::sync::Arc;

use axum::Router;

pub use completion_client::{CompletionClient, CompletionError, CompletionService};
pub use config::{RefinerConfig, SamplingConfig};
pub use error::{ApiError, ErrorResponse};
pub use refine::{PromptRefiner, RefinementResult};
pub use routes::{create_router, AppState, RefineBackend};

/// Wire the real completion client, the refiner and the router together
pub fn build_app(config: &RefinerConfig) -> Result<Router, CompletionError> {
    let client = CompletionClient::new(config)?;
    let refiner = PromptRefiner::new(Arc::new(client), config.sampling.clone());
    Ok(create_router(AppState::new(Arc::new(refiner))))
}
