use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// When set, 500 responses carry the underlying error text in an `error`
/// field. Controlled by `Config::dev_mode` at startup; production responses
/// only log internals server-side.
static EXPOSE_INTERNALS: AtomicBool = AtomicBool::new(false);

pub fn set_dev_mode(enabled: bool) {
    EXPOSE_INTERNALS.store(enabled, Ordering::Relaxed);
}

fn dev_mode() -> bool {
    EXPOSE_INTERNALS.load(Ordering::Relaxed)
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// The JSON body always follows the `{ success: false, message }` envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let mut body = json!({
            "success": false,
            "message": message,
        });
        if status == StatusCode::INTERNAL_SERVER_ERROR && dev_mode() {
            body["error"] = json!(self.to_string());
        }

        (status, Json(body)).into_response()
    }
}
