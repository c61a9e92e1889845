//! Request DTOs for the cache operations API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The logical cache key
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in seconds (uses the configured default if omitted)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.ttl == Some(0) {
            return Some("TTL must be greater than zero".to_string());
        }
        None
    }
}

/// Request body for search invalidation (POST /invalidate/search)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchInvalidationRequest {
    /// The raw search query whose cached results should be dropped
    pub query: String,
}
