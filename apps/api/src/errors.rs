use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::moveware::MovewareError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing or invalid fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Upstream responded non-2xx with a status that has no direct mapping
    /// on this API (404 and 401 are converted to `NotFound`/`Unauthorized`
    /// before this variant is constructed).
    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// Transport-level upstream failure. Kept distinct from `NotFound` so
    /// callers can tell "does not exist" from "unreachable".
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Both force-sync steps failed; carries the per-step reasons.
    #[error("Sync failed: {}", .errors.join("; "))]
    Sync { errors: Vec<String> },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a validation failure over named request fields.
    pub fn invalid_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AppError::Validation(fields.into_iter().map(Into::into).collect())
    }
}

impl From<MovewareError> for AppError {
    fn from(err: MovewareError) -> Self {
        match err {
            MovewareError::Config { missing } => AppError::Configuration(format!(
                "Missing required Moveware API configuration: {}",
                missing.join(", ")
            )),
            MovewareError::Api {
                status: 404,
                message,
                ..
            } => AppError::NotFound(message),
            MovewareError::Api {
                status: 401,
                message,
                ..
            } => AppError::Unauthorized(message),
            MovewareError::Api {
                status, message, ..
            } => AppError::Upstream { status, message },
            MovewareError::Network(e) => AppError::UpstreamUnavailable(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Upstream { status, message } => {
                tracing::error!("Upstream error (status {status}): {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    message.clone(),
                )
            }
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!("Upstream unavailable: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNAVAILABLE",
                    "The upstream job service could not be reached".to_string(),
                )
            }
            AppError::Sync { errors } => {
                tracing::error!("Sync failed: {}", errors.join("; "));
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SYNC_FAILED",
                    "Failed to sync data from the upstream job service".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        match &self {
            AppError::Validation(fields) => {
                error["fields"] = json!(fields);
            }
            AppError::Sync { errors } => {
                error["details"] = json!(errors);
            }
            _ => {}
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
