//! API Handlers
//!
//! HTTP request handlers exposing the shared cache for operations use.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{
    category_patterns, policy_patterns, search_patterns, CacheInvalidator, SharedCache,
    StatsSnapshot,
};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, InvalidationResponse,
    SearchInvalidationRequest, SetRequest, SetResponse,
};

/// Application state shared across all handlers.
///
/// Holds the one cache instance created at startup.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<SharedCache>,
    pub invalidator: CacheInvalidator<Value>,
    /// TTL used when a set request omits one
    pub default_ttl: u64,
}

impl AppState {
    pub fn new(cache: Arc<SharedCache>, default_ttl: u64) -> Self {
        Self {
            invalidator: CacheInvalidator::new(Arc::clone(&cache)),
            cache,
            default_ttl,
        }
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or(state.default_ttl);
    let stored = state.cache.set(&req.key, req.value, ttl).await;

    Ok(Json(SetResponse {
        key: req.key,
        stored,
    }))
}

/// Handler for GET /get/*key
///
/// A miss in both tiers is a 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/*key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.delete(&key).await;
    Json(DeleteResponse { key, deleted })
}

/// Handler for DELETE /prefix/*pattern
pub async fn delete_prefix_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
) -> Result<Json<InvalidationResponse>> {
    if pattern.trim_end_matches('*').is_empty() {
        return Err(CacheError::InvalidRequest(
            "Pattern must contain a prefix; use /clear to drop everything".to_string(),
        ));
    }

    let deleted = state.cache.delete_pattern(&pattern).await;
    Ok(Json(InvalidationResponse {
        patterns: vec![pattern],
        deleted,
    }))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse {
        cleared: state.cache.clear().await,
    })
}

/// Handler for POST /invalidate/category/:category_id
pub async fn invalidate_category_handler(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Json<InvalidationResponse> {
    let deleted = state.invalidator.invalidate_category(&category_id).await;
    Json(InvalidationResponse {
        patterns: category_patterns(&category_id),
        deleted,
    })
}

/// Handler for POST /invalidate/search
pub async fn invalidate_search_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchInvalidationRequest>,
) -> Json<InvalidationResponse> {
    let deleted = state.invalidator.invalidate_search(&req.query).await;
    Json(InvalidationResponse {
        patterns: search_patterns(&req.query),
        deleted,
    })
}

/// Handler for POST /invalidate/policy/:policy_type/:marketplace_id
pub async fn invalidate_policy_handler(
    State(state): State<AppState>,
    Path((policy_type, marketplace_id)): Path<(String, String)>,
) -> Json<InvalidationResponse> {
    let deleted = state
        .invalidator
        .invalidate_policy(&policy_type, &marketplace_id)
        .await;
    Json(InvalidationResponse {
        patterns: policy_patterns(&policy_type, &marketplace_id),
        deleted,
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.cache.get_stats().await)
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.has_remote()))
}
