//! Error handling for the HTTP API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::import::ImportError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Store(e) => match e {
                StoreError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                StoreError::DuplicateCard(_) => (StatusCode::CONFLICT, "duplicate_card"),
                StoreError::Concurrency(_) => (StatusCode::CONFLICT, "concurrency_error"),
                StoreError::Configuration(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
                }
                StoreError::MalformedRecord { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "malformed_record")
                }
                StoreError::Sqlite(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            },
            ApiError::Import(_) => (StatusCode::BAD_REQUEST, "import_error"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
