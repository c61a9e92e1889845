//! Shared test doubles for the remote tier.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hybrid_cache::cache::{
    CacheEntry, CacheSettings, HybridCacheManager, MemoryStore, RemoteBackend, RemoteStore,
};
use hybrid_cache::{CacheError, Result};
use serde_json::Value;

pub const NAMESPACE: &str = "test:";

/// In-memory stand-in for Redis that can be switched into failure mode.
///
/// Only `escaped-prefix*` globs are understood, which is all the cache issues.
#[derive(Default)]
pub struct FakeRedis {
    data: Mutex<HashMap<String, (String, u64)>>,
    failing: AtomicBool,
    closed: AtomicBool,
    calls: AtomicU64,
}

impl FakeRedis {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.lock().unwrap().contains_key(key)
    }

    pub fn ttl_of(&self, key: &str) -> Option<u64> {
        self.data.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn entry(&self, key: &str) -> Option<CacheEntry<Value>> {
        let data = self.data.lock().unwrap();
        data.get(key)
            .map(|(text, _)| serde_json::from_str(text).unwrap())
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Stores an entry directly, bypassing the cache.
    pub fn seed(&self, key: &str, entry: &CacheEntry<Value>) {
        self.data.lock().unwrap().insert(
            key.to_string(),
            (serde_json::to_string(entry).unwrap(), 3600),
        );
    }

    fn begin(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.closed.load(Ordering::SeqCst) {
            return Err(CacheError::Internal("connection closed".to_string()));
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::Internal("connection refused".to_string()));
        }
        Ok(())
    }
}

fn glob_prefix(pattern: &str) -> String {
    let body = pattern.strip_suffix('*').unwrap_or(pattern);
    let mut prefix = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            prefix.extend(chars.next());
        } else {
            prefix.push(c);
        }
    }
    prefix
}

#[async_trait]
impl RemoteBackend for FakeRedis {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.begin()?;
        Ok(self.data.lock().unwrap().get(key).map(|(text, _)| text.clone()))
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        self.begin()?;
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, ttl_seconds));
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        self.begin()?;
        let mut data = self.data.lock().unwrap();
        Ok(keys.iter().filter(|key| data.remove(*key).is_some()).count() as u64)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.begin()?;
        let prefix = glob_prefix(pattern);
        Ok(self
            .data
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Manager over a fresh memory tier and the given fake Redis.
pub fn hybrid(backend: Arc<FakeRedis>, settings: CacheSettings) -> HybridCacheManager<Value> {
    let remote = RemoteStore::new(backend, NAMESPACE, Duration::from_millis(200)).unwrap();
    HybridCacheManager::new(MemoryStore::new(100).unwrap(), Some(remote), settings)
}
