//! Error types for the storage backends
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Storage Error Enum ==
/// Unified error type for both storage backends and the HTTP layer.
///
/// Absence of a key or an empty queue is not an error: storage operations
/// report it as `None` / `false`.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store has been closed
    #[error("storage is closed")]
    Closed,

    /// Construction parameters were rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid request data (HTTP layer)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Key or queue head not found (HTTP layer)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Value could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote call exceeded its per-call deadline
    #[error("Remote call timed out after {0:?}")]
    Timeout(Duration),

    /// Connectivity failure or unexpected response from the remote store
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Returns true if the caller may retry the operation as-is.
    pub fn is_retriable(&self) -> bool {
        matches!(self, StorageError::Timeout(_) | StorageError::Backend(_))
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        let status = match &self {
            StorageError::NotFound(_) => StatusCode::NOT_FOUND,
            StorageError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            StorageError::Closed => StatusCode::SERVICE_UNAVAILABLE,
            StorageError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            StorageError::Backend(_) => StatusCode::BAD_GATEWAY,
            StorageError::InvalidConfig(_) | StorageError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
