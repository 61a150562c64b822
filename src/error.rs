//! Error types for the cache facade
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache facade and its HTTP surface.
///
/// A cache miss is never an error: lookups fall back to the caller's default.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty, null or not a string
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// TTL is not numeric
    #[error("Invalid expiration: {0}")]
    InvalidExpiration(String),

    /// The underlying store refused the write
    #[error("Store rejected write: {0}")]
    StoreRejected(String),

    /// Value could not be encoded, or decoded as the requested type
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            CacheError::InvalidExpiration(_) => StatusCode::BAD_REQUEST,
            CacheError::StoreRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache facade.
pub type Result<T> = std::result::Result<T, CacheError>;
