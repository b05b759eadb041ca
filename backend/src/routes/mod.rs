pub mod cache;
pub mod dashboard;
pub mod health;
pub mod login;
pub mod users;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Generic error body returned when an upstream call fails.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub(crate) fn internal() -> Self {
        Self {
            error: "Internal Server Error".to_string(),
        }
    }
}

/// Simple message body used by the login and cache endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Collapse any upstream failure into a generic 500 after logging it.
pub(crate) fn internal_error<E: std::fmt::Display>(err: E) -> (StatusCode, Json<ErrorBody>) {
    tracing::error!("Upstream request failed: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal()))
}
