//! Memory Store Module
//!
//! The L1 tier: a capacity-bounded, TTL-aware map guarded by one async mutex.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::key::pattern_prefix;
use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Memory Store ==
/// In-process cache tier with lazy expiry and batch LRU demotion.
///
/// Every operation holds the store-wide lock for its whole duration, reads
/// included, since a read bumps the entry's access count.
#[derive(Debug)]
pub struct MemoryStore<V> {
    /// Key-value storage
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    /// Soft capacity: reaching it triggers eviction on the next insert
    max_entries: usize,
}

impl<V: Clone> MemoryStore<V> {
    // == Constructor ==
    /// Creates an empty store. A zero capacity is rejected.
    pub fn new(max_entries: usize) -> Result<Self> {
        if max_entries == 0 {
            return Err(CacheError::InvalidCapacity(max_entries));
        }

        Ok(Self {
            entries: Mutex::new(HashMap::with_capacity(max_entries)),
            max_entries,
        })
    }

    // == Get ==
    /// Returns a live value and bumps its access count.
    ///
    /// An expired entry found here is dropped on the spot.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;

        match entries.get_mut(key) {
            None => return None,
            Some(entry) if !entry.is_expired() => {
                entry.access_count += 1;
                return Some(entry.value.clone());
            }
            Some(_) => {}
        }

        entries.remove(key);
        debug!(key = %key, "memory entry expired on read");
        None
    }

    // == Set ==
    /// Stores `value` for `ttl_seconds`, replacing any previous entry.
    ///
    /// At capacity, expired entries are swept first and the least-accessed
    /// tenth is demoted if that was not enough. The insert happens regardless.
    pub async fn set(&self, key: &str, value: V, ttl_seconds: u64) -> Result<()> {
        if ttl_seconds == 0 {
            return Err(CacheError::InvalidTtl(ttl_seconds));
        }

        let mut entries = self.entries.lock().await;

        if entries.len() >= self.max_entries {
            let swept = evict_expired(&mut entries, Utc::now());
            let demoted = if entries.len() >= self.max_entries {
                evict_lru(&mut entries)
            } else {
                0
            };
            debug!(swept, demoted, size = entries.len(), "memory store eviction");
        }

        entries.insert(key.to_string(), CacheEntry::new(value, ttl_seconds));
        Ok(())
    }

    // == Delete ==
    /// Removes a key. Returns whether it was present.
    pub async fn delete(&self, key: &str) -> bool {
        self.entries.lock().await.remove(key).is_some()
    }

    // == Delete Prefix ==
    /// Removes every key starting with `pattern` minus its trailing `*`s.
    pub async fn delete_prefix(&self, pattern: &str) -> usize {
        let prefix = pattern_prefix(pattern);
        let mut entries = self.entries.lock().await;

        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    // == Clear ==
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}

// == Eviction ==
/// Drops every entry expired at `now`. Returns how many were removed.
fn evict_expired<V>(entries: &mut HashMap<String, CacheEntry<V>>, now: DateTime<Utc>) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired_at(now));
    before - entries.len()
}

/// Drops the `max(1, len / 10)` least-accessed entries, oldest first on ties.
fn evict_lru<V>(entries: &mut HashMap<String, CacheEntry<V>>) -> usize {
    if entries.is_empty() {
        return 0;
    }

    let mut ranked: Vec<(u64, DateTime<Utc>, String)> = entries
        .iter()
        .map(|(key, entry)| (entry.access_count, entry.created_at, key.clone()))
        .collect();
    ranked.sort_unstable();

    let batch = (ranked.len() / 10).max(1);
    for (_, _, key) in ranked.into_iter().take(batch) {
        entries.remove(&key);
    }
    batch
}
