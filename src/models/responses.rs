//! Response DTOs for the cache operations API
//!
//! Defines the structure of outgoing HTTP response bodies. Statistics are
//! served directly as [`crate::cache::StatsSnapshot`].

use serde::Serialize;
use serde_json::Value;

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /set
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub key: String,
    /// Whether at least one tier accepted the write
    pub stored: bool,
}

/// Response body for DELETE /del/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    /// Whether either tier held the key
    pub deleted: bool,
}

/// Response body for prefix deletes and invalidations
#[derive(Debug, Clone, Serialize)]
pub struct InvalidationResponse {
    /// Patterns that were applied
    pub patterns: Vec<String>,
    /// Deletions summed across both tiers
    pub deleted: usize,
}

/// Response body for POST /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether a remote tier is attached
    pub remote_tier: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(remote_tier: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            remote_tier,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
