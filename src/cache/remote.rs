//! Remote Store Module
//!
//! The L2 tier: a namespaced, TTL-native key-value service (Redis) holding
//! JSON-encoded [`CacheEntry`] values. No call on [`RemoteStore`] ever fails;
//! transport trouble comes back as [`RemoteOutcome::Degraded`].

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::key::pattern_prefix;
use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Remote Backend ==
/// Raw commands the remote tier needs from a key-value service.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// `GET key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// `SETEX key ttl value`
    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;

    /// `DEL key...`, returning how many keys existed
    async fn del(&self, keys: &[String]) -> Result<u64>;

    /// `KEYS pattern`
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Releases the underlying connection.
    async fn close(&self) {}
}

// == Redis ==
/// Unconnected Redis handle: the URL has been validated, nothing opened yet.
#[derive(Debug, Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            client: redis::Client::open(url)?,
        })
    }

    /// Opens the pooled, auto-reconnecting connection.
    pub async fn connect(self) -> Result<RedisBackend> {
        let conn = ConnectionManager::new(self.client).await?;
        info!("Redis connection established");
        Ok(RedisBackend {
            conn: RwLock::new(Some(conn)),
        })
    }
}

/// Connected Redis backend. The connection manager is cheap to clone and
/// multiplexes concurrent commands over one connection. Once closed, every
/// command fails.
pub struct RedisBackend {
    conn: RwLock<Option<ConnectionManager>>,
}

impl RedisBackend {
    async fn connection(&self) -> Result<ConnectionManager> {
        self.conn
            .read()
            .await
            .clone()
            .ok_or_else(|| CacheError::Internal("Redis connection closed".to_string()))
    }
}

#[async_trait]
impl RemoteBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        let mut conn = self.connection().await?;
        Ok(conn.del::<_, u64>(keys.to_vec()).await?)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.connection().await?;
        Ok(conn.keys::<_, Vec<String>>(pattern).await?)
    }

    async fn close(&self) {
        // Dropping the last manager handle shuts down its driver task
        if self.conn.write().await.take().is_some() {
            info!("Redis connection closed");
        }
    }
}

// == Remote Outcome ==
/// Result of a remote-tier call that always carries a usable value.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome<T> {
    /// The backend answered
    Done(T),
    /// The backend failed; the value is the no-op fallback
    Degraded(T),
}

impl<T> RemoteOutcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, RemoteOutcome::Degraded(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            RemoteOutcome::Done(value) | RemoteOutcome::Degraded(value) => value,
        }
    }
}

// == Remote Store ==
/// Typed, namespaced view over a [`RemoteBackend`].
pub struct RemoteStore<V> {
    backend: Arc<dyn RemoteBackend>,
    namespace: String,
    timeout: Duration,
    _value: PhantomData<fn() -> V>,
}

impl<V> RemoteStore<V>
where
    V: Serialize + DeserializeOwned + Send + Sync,
{
    /// Wraps `backend`; every key is stored as `namespace + key`.
    ///
    /// An empty namespace is rejected: `clear` would otherwise match every
    /// key in the instance.
    pub fn new(
        backend: Arc<dyn RemoteBackend>,
        namespace: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(CacheError::InvalidConfig(
                "remote namespace must not be empty".to_string(),
            ));
        }

        Ok(Self {
            backend,
            namespace,
            timeout,
            _value: PhantomData,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // == Get ==
    /// Fetches and decodes an entry, treating a logically expired one as a
    /// miss and deleting it remotely.
    pub async fn get(&self, key: &str) -> RemoteOutcome<Option<V>> {
        let result = self.try_get(key).await;
        self.settle("get", key, result, None)
    }

    // == Set ==
    /// Stores the full entry with a remote TTL of exactly `ttl_seconds`.
    pub async fn set(&self, key: &str, value: &V, ttl_seconds: u64) -> RemoteOutcome<bool> {
        let result = self.try_set(key, value, ttl_seconds).await;
        self.settle("set", key, result.map(|_| true), false)
    }

    // == Delete ==
    pub async fn delete(&self, key: &str) -> RemoteOutcome<bool> {
        let keys = [self.namespaced(key)];
        let result = self.call(self.backend.del(&keys)).await;
        self.settle("delete", key, result.map(|removed| removed > 0), false)
    }

    // == Delete Prefix ==
    /// Deletes every namespaced key starting with `pattern` minus its
    /// trailing `*`s, in one batch.
    pub async fn delete_prefix(&self, pattern: &str) -> RemoteOutcome<usize> {
        let glob = format!(
            "{}{}*",
            escape_glob(&self.namespace),
            escape_glob(pattern_prefix(pattern))
        );
        let result = self.delete_matching(&glob).await;
        self.settle("delete_prefix", pattern, result, 0)
    }

    // == Clear ==
    /// Removes every key under this store's namespace, and nothing else.
    pub async fn clear(&self) -> RemoteOutcome<bool> {
        let glob = format!("{}*", escape_glob(&self.namespace));
        let result = self.delete_matching(&glob).await;
        self.settle("clear", &self.namespace, result.map(|_| true), false)
    }

    pub async fn close(&self) {
        self.backend.close().await;
    }

    async fn try_get(&self, key: &str) -> Result<Option<V>> {
        let physical = self.namespaced(key);
        let Some(text) = self.call(self.backend.get(&physical)).await? else {
            return Ok(None);
        };

        let entry: CacheEntry<V> = serde_json::from_str(&text)?;
        if entry.is_expired() {
            debug!(key = %key, "remote entry logically expired, deleting");
            self.call(self.backend.del(&[physical])).await?;
            return Ok(None);
        }

        Ok(Some(entry.value))
    }

    async fn try_set(&self, key: &str, value: &V, ttl_seconds: u64) -> Result<()> {
        if ttl_seconds == 0 {
            return Err(CacheError::InvalidTtl(ttl_seconds));
        }

        let physical = self.namespaced(key);
        let text = serde_json::to_string(&CacheEntry::new(value, ttl_seconds))?;
        self.call(self.backend.set_ex(&physical, text, ttl_seconds)).await
    }

    async fn delete_matching(&self, glob: &str) -> Result<usize> {
        let keys = self.call(self.backend.keys(glob)).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let removed = self.call(self.backend.del(&keys)).await?;
        Ok(removed as usize)
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    /// Bounds a backend call by the configured timeout.
    async fn call<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// The one place a remote failure is turned into a no-op.
    fn settle<T>(&self, operation: &'static str, key: &str, result: Result<T>, fallback: T) -> RemoteOutcome<T> {
        match result {
            Ok(value) => RemoteOutcome::Done(value),
            Err(error) => {
                warn!(operation, key = %key, error = %error, "remote cache call failed");
                RemoteOutcome::Degraded(fallback)
            }
        }
    }
}

/// Escapes Redis glob metacharacters so `input` matches literally.
pub fn escape_glob(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
