//! Error types for trustgate-verify
//!
//! Every handler failure is rendered as `{ "error": message, "code": kind }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{ChatError, CompletionError};
use crate::types::VerifyError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Verification pipeline failure, status depends on the kind
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// Chat model failure (503)
    #[error("Chat model unavailable: {0}")]
    ChatUnavailable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// trustgate-common error
    #[error("Common error: {0}")]
    Common(#[from] trustgate_common::Error),
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        ApiError::ChatUnavailable(err.to_string())
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Database(e) => ApiError::Common(e),
            ChatError::Completion(e) => e.into(),
            ChatError::EmptyStoredContent(id) => {
                ApiError::Internal(format!("Stored document has no content: {}", id))
            }
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Verify(VerifyError::Fetch { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Verify(VerifyError::EmptyContent(_) | VerifyError::TooShort { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Verify(
                VerifyError::JudgeUnavailable(_) | VerifyError::CorpusUnavailable(_),
            ) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::ChatUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) | ApiError::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Verify(e) => e.kind(),
            ApiError::ChatUnavailable(_) => "CHAT_UNAVAILABLE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Common(_) => "COMMON_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
