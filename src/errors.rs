use crate::services::{article_service::ArticleError, ingest::IngestError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Message returned for every 5xx; the detail only goes to the log.
const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// An error ready to be rendered as `{"error": ..., "status": ...}`.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Opaque 500. `detail` is logged, never returned.
    pub fn internal(detail: impl fmt::Display) -> Self {
        tracing::error!("request failed: {}", detail);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<ArticleError> for AppError {
    fn from(err: ArticleError) -> Self {
        match err {
            ArticleError::NotFound(_) => AppError::not_found("article not found"),
            ArticleError::FileNotFound(_) => AppError::not_found("file not found"),
            ArticleError::Validation(IngestError::Multipart(inner)) => {
                tracing::debug!("rejected multipart body: {}", inner);
                AppError::new(inner.status(), inner.body_text())
            }
            ArticleError::Validation(inner) if inner.is_client_error() => {
                tracing::debug!("rejected upload: {}", inner);
                AppError::bad_request(inner.to_string())
            }
            other => AppError::internal(other),
        }
    }
}
