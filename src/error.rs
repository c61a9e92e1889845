//! Error types for the hybrid cache
//!
//! Provides unified error handling using thiserror. Absence of a key is never
//! an error inside the cache tiers; `NotFound` only exists for the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the hybrid cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in either tier (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Memory tier constructed with an unusable capacity
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(usize),

    /// TTL that cannot produce a live entry
    #[error("Invalid TTL: {0}s")]
    InvalidTtl(u64),

    /// Startup setting that would leave the cache unusable or unsafe
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Remote tier transport or protocol failure
    #[error("Remote transport error: {0}")]
    Transport(#[from] redis::RedisError),

    /// Remote tier call exceeded its time budget
    #[error("Remote call timed out after {0}ms")]
    Timeout(u64),

    /// Entry could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_)
            | CacheError::InvalidCapacity(_)
            | CacheError::InvalidTtl(_) => StatusCode::BAD_REQUEST,
            CacheError::Transport(_) | CacheError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::InvalidConfig(_)
            | CacheError::Serialization(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the hybrid cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (CacheError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (CacheError::InvalidTtl(0), StatusCode::BAD_REQUEST),
            (CacheError::Timeout(500), StatusCode::SERVICE_UNAVAILABLE),
            (CacheError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(CacheError::InvalidCapacity(0).to_string(), "Invalid capacity: 0");
        assert_eq!(CacheError::InvalidTtl(0).to_string(), "Invalid TTL: 0s");
        assert_eq!(
            CacheError::Timeout(250).to_string(),
            "Remote call timed out after 250ms"
        );
    }
}
