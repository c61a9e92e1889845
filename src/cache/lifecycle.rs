//! Cache Lifecycle Module
//!
//! Builds the process-wide cache once at startup and tears it down once at
//! shutdown. The instance is handed out as an `Arc`, never stored globally.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::cache::{CacheSettings, HybridCacheManager, MemoryStore, RedisClient, RemoteStore};
use crate::config::Config;
use crate::error::Result;

/// The cache instance shared by all request handlers.
pub type SharedCache = HybridCacheManager<Value>;

/// Upper bound on establishing the initial Redis connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates the shared cache from configuration.
///
/// A configured but unreachable Redis is logged and skipped; the cache then
/// runs memory-only. Invalid settings or an unusable memory capacity are errors.
pub async fn init_cache_manager(config: &Config) -> Result<Arc<SharedCache>> {
    config.validate()?;
    let memory = MemoryStore::new(config.memory_max_size)?;

    let remote = match &config.redis_url {
        Some(url) => connect_remote(url, config).await,
        None => None,
    };

    Ok(Arc::new(HybridCacheManager::new(
        memory,
        remote,
        CacheSettings::from(config),
    )))
}

async fn connect_remote(url: &str, config: &Config) -> Option<RemoteStore<Value>> {
    let connect = async { RedisClient::new(url)?.connect().await };

    match tokio::time::timeout(CONNECT_TIMEOUT, connect).await {
        Ok(Ok(backend)) => {
            match RemoteStore::new(Arc::new(backend), config.key_prefix.clone(), config.remote_timeout()) {
                Ok(store) => Some(store),
                Err(error) => {
                    warn!(error = %error, "Redis namespace rejected");
                    None
                }
            }
        }
        Ok(Err(error)) => {
            warn!(error = %error, "Failed to initialize Redis cache");
            None
        }
        Err(_) => {
            warn!(timeout_secs = CONNECT_TIMEOUT.as_secs(), "Timed out connecting to Redis");
            None
        }
    }
}

/// Logs final statistics and closes the shared cache.
pub async fn shutdown_cache_manager(cache: Arc<SharedCache>) {
    let stats = cache.get_stats().await;
    info!(
        l1_hits = stats.l1_hits,
        l2_hits = stats.l2_hits,
        misses = stats.misses,
        errors = stats.errors,
        hit_rate = stats.hit_rate,
        "Shutting down cache"
    );
    cache.close().await;
}
