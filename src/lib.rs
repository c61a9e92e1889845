//! Hybrid Cache - a two-tier cache for rate-limited upstream APIs
//!
//! A bounded in-process tier in front of an optional Redis tier, with TTL
//! expiry, LRU demotion and graceful degradation when Redis is unavailable.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{init_cache_manager, shutdown_cache_manager, HybridCacheManager, SharedCache};
pub use config::Config;
pub use error::{CacheError, Result};
