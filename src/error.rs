//! Error types for the cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache service.
///
/// Remote-tier variants (`Remote`, `Timeout`) are produced by [`crate::cache::RemoteStore`]
/// adapters and are absorbed by [`crate::cache::TieredCache`]; they only reach HTTP
/// callers through code that talks to a remote store directly.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key or field not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Page position arguments that cannot be merged
    #[error("Invalid page arguments: {0}")]
    InvalidPageArgs(String),

    /// Remote store rejected or failed the operation
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Remote store did not answer in time
    #[error("Remote store timed out: {0}")]
    Timeout(String),

    /// Value could not be encoded or decoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_)
            | CacheError::InvalidPageArgs(_)
            | CacheError::Serialization(_) => StatusCode::BAD_REQUEST,
            CacheError::Remote(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(feature = "redis")]
impl From<::redis::RedisError> for CacheError {
    fn from(err: ::redis::RedisError) -> Self {
        if err.is_timeout() {
            CacheError::Timeout(err.to_string())
        } else {
            CacheError::Remote(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache service.
pub type Result<T> = std::result::Result<T, CacheError>;
