// prompt-refiner-rs/src/error.rs
//
// Route-level errors. Failures of the completion service never get here; they
// are reported inside a normal 200 `RefinementResult`.

use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of every non-200 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing required parameter: user_prompt")]
    MissingPrompt,

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    // Extractor rejection; keeps axum's status (400 bad query, 413 body too large)
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("{0}")]
    Refinement(String),

    #[error("failed to serialize refinement result: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Panic(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingPrompt | Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected { status, .. } => *status,
            Self::Refinement(_) | Self::Serialization(_) | Self::Panic(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Refine route failed: {}", self);
        } else {
            log::info!("Rejected refine request: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
