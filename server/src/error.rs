use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use audioguard_detect::DetectError;

/// Errors surfaced to API callers as structured JSON.
///
/// Every per-request error is converted to `{status:"error", message}`
/// at the handler boundary; none crash the process.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request shape (missing field, bad extension, missing url).
    /// Expected traffic, not logged as exceptional.
    #[error("{0}")]
    Validation(String),

    /// Pipeline failure (decode error, model load, inference).
    #[error(transparent)]
    Detect(#[from] DetectError),

    /// Remote fetch failure or timeout. No retry.
    #[error("fetch failed: {0}")]
    Network(String),

    /// Everything else (temp file I/O, joined task panic).
    #[error("{0}")]
    Internal(String),
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Network(_) => StatusCode::BAD_GATEWAY,
            ApiError::Detect(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(_) => {}
            ApiError::Detect(e) => {
                tracing::error!(error = ?e, "detection failed");
            }
            other => {
                tracing::error!(error = %other, "request failed");
            }
        }
        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

/// Errors from server setup (bind, client construction).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid listen address: {0}")]
    Addr(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}
