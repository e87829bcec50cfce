use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::search::SearchError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Index did not answer within the configured deadline
    #[error("Search index timed out: {0}")]
    IndexTimeout(String),

    /// Index unreachable or refused the request
    #[error("Search index unavailable: {0}")]
    IndexUnavailable(String),

    /// Index answered with something we could not interpret
    #[error("Bad response from search index: {0}")]
    BadIndexResponse(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::IndexTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::IndexUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadIndexResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::IndexTimeout(_) => "INDEX_TIMEOUT",
            AppError::IndexUnavailable(_) => "INDEX_UNAVAILABLE",
            AppError::BadIndexResponse(_) => "BAD_INDEX_RESPONSE",
        }
    }

    /// Whether a client may reasonably retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::IndexTimeout(_) | AppError::IndexUnavailable(_))
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
                "retryable": self.is_retryable(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::IndexTimeout(ms) => {
                AppError::IndexTimeout(format!("no answer after {}ms", ms))
            }
            SearchError::IndexUnavailable(msg) => AppError::IndexUnavailable(msg),
            SearchError::IndexStatus { status, body } => {
                AppError::IndexUnavailable(format!("status {}: {}", status, body))
            }
            SearchError::BadResponse(msg) => AppError::BadIndexResponse(msg),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
