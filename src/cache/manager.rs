//! Hybrid Cache Manager Module
//!
//! Combines the memory tier (L1) and the optional remote tier (L2) behind one
//! read-through / write-through API. Nothing here returns an error: failures
//! in either tier are logged, counted, and treated as misses or no-ops.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::key::normalize_key;
use crate::cache::remote::RemoteOutcome;
use crate::cache::{CacheStats, MemoryStore, RemoteStore, StatsSnapshot};
use crate::config::Config;

// == Cache Settings ==
/// TTL policy the manager applies on top of the callers' TTLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Longest TTL (seconds) the memory tier holds an entry for
    pub memory_ttl_cap: u64,
    /// TTL (seconds) for values copied into memory after a remote hit
    pub backfill_ttl: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            memory_ttl_cap: 3600,
            backfill_ttl: 3600,
        }
    }
}

impl From<&Config> for CacheSettings {
    fn from(config: &Config) -> Self {
        Self {
            memory_ttl_cap: config.memory_ttl_cap,
            backfill_ttl: config.backfill_ttl,
        }
    }
}

// == Hybrid Cache Manager ==
/// Two-tier cache with per-operation statistics.
///
/// Writes go to both tiers independently, so a concurrent reader may briefly
/// see one tier updated and the other stale.
pub struct HybridCacheManager<V> {
    memory: MemoryStore<V>,
    remote: Option<RemoteStore<V>>,
    stats: CacheStats,
    settings: CacheSettings,
}

impl<V> HybridCacheManager<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    // == Constructor ==
    pub fn new(memory: MemoryStore<V>, remote: Option<RemoteStore<V>>, settings: CacheSettings) -> Self {
        match &remote {
            Some(remote) => info!(
                namespace = remote.namespace(),
                capacity = memory.capacity(),
                "Hybrid cache initialized (memory + remote)"
            ),
            None => info!(capacity = memory.capacity(), "Using memory-only cache"),
        }

        Self {
            memory,
            remote,
            stats: CacheStats::new(),
            settings,
        }
    }

    /// Builds a manager with no remote tier.
    pub fn memory_only(memory: MemoryStore<V>, settings: CacheSettings) -> Self {
        Self::new(memory, None, settings)
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    // == Get ==
    /// Looks up memory first, then the remote tier.
    ///
    /// A remote hit is copied into memory with the backfill TTL so the next
    /// read is served locally. `None` means "compute it yourself".
    pub async fn get(&self, key: &str) -> Option<V> {
        let cache_key = normalize_key(key);

        if let Some(value) = self.memory.get(&cache_key).await {
            self.stats.record_l1_hit();
            debug!(key = %cache_key, "cache hit (L1)");
            return Some(value);
        }

        if let Some(remote) = &self.remote {
            let found = self.absorb(remote.get(&cache_key).await);
            if let Some(value) = found {
                self.stats.record_l2_hit();
                debug!(key = %cache_key, "cache hit (L2), backfilling memory");

                if let Err(error) = self
                    .memory
                    .set(&cache_key, value.clone(), self.settings.backfill_ttl)
                    .await
                {
                    warn!(key = %cache_key, error = %error, "memory backfill failed");
                    self.stats.record_error();
                }
                return Some(value);
            }
        }

        self.stats.record_miss();
        debug!(key = %cache_key, "cache miss");
        None
    }

    // == Set ==
    /// Writes memory (TTL capped) and the remote tier (full TTL).
    ///
    /// Returns `true` if either write landed; one tier failing never blocks
    /// the other.
    pub async fn set(&self, key: &str, value: V, ttl_seconds: u64) -> bool {
        let cache_key = normalize_key(key);
        let mut stored = false;

        let memory_ttl = ttl_seconds.min(self.settings.memory_ttl_cap);
        match self.memory.set(&cache_key, value.clone(), memory_ttl).await {
            Ok(()) => stored = true,
            Err(error) => {
                warn!(key = %cache_key, error = %error, "memory cache set failed");
                self.stats.record_error();
            }
        }

        if let Some(remote) = &self.remote {
            stored |= self.absorb(remote.set(&cache_key, &value, ttl_seconds).await);
        }

        if stored {
            self.stats.record_set();
        }
        stored
    }

    // == Delete ==
    /// Deletes from both tiers; `true` if either held the key.
    pub async fn delete(&self, key: &str) -> bool {
        let cache_key = normalize_key(key);

        let mut deleted = self.memory.delete(&cache_key).await;
        if let Some(remote) = &self.remote {
            deleted |= self.absorb(remote.delete(&cache_key).await);
        }

        if deleted {
            self.stats.record_deletes(1);
        }
        deleted
    }

    // == Delete Pattern ==
    /// Deletes every key starting with `pattern` (trailing `*` optional) in
    /// both tiers and returns the summed count.
    ///
    /// A key present in both tiers counts twice.
    pub async fn delete_pattern(&self, pattern: &str) -> usize {
        let mut total = self.memory.delete_prefix(pattern).await;
        if let Some(remote) = &self.remote {
            total += self.absorb(remote.delete_prefix(pattern).await);
        }

        if total > 0 {
            self.stats.record_deletes(total as u64);
            debug!(pattern = %pattern, deleted = total, "pattern invalidated");
        }
        total
    }

    // == Clear ==
    /// Empties both tiers. The memory tier always clears, so this is `true`.
    pub async fn clear(&self) -> bool {
        self.memory.clear().await;

        if let Some(remote) = &self.remote {
            self.absorb(remote.clear().await);
        }
        info!("cache cleared");
        true
    }

    // == Stats ==
    pub async fn get_stats(&self) -> StatsSnapshot {
        self.stats
            .snapshot(self.memory.len().await, self.remote.is_some())
    }

    /// Releases the remote connection. Memory contents are left as they are.
    pub async fn close(&self) {
        if let Some(remote) = &self.remote {
            remote.close().await;
        }
        info!("cache manager closed");
    }

    /// Counts a degraded remote call as an error and unwraps its value.
    fn absorb<T>(&self, outcome: RemoteOutcome<T>) -> T {
        if outcome.is_degraded() {
            self.stats.record_error();
        }
        outcome.into_inner()
    }
}
