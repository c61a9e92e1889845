//! Cache Entry Module
//!
//! Defines the structure for individual cache entries shared by both tiers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached value together with its expiry and access metadata.
///
/// `expires_at` is fixed at construction. Refreshing a key replaces the whole
/// entry; only `access_count` changes over an entry's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiration instant
    pub expires_at: DateTime<Utc>,
    /// Creation instant, LRU tie-breaker
    pub created_at: DateTime<Utc>,
    /// Successful memory-tier reads, primary LRU signal
    pub access_count: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from now.
    pub fn new(value: V, ttl_seconds: u64) -> Self {
        let now = Utc::now();
        Self {
            value,
            expires_at: expiry_from(now, ttl_seconds),
            created_at: now,
            access_count: 0,
        }
    }

    /// Creates an entry with an explicit expiration instant.
    pub fn with_expiry(value: V, expires_at: DateTime<Utc>) -> Self {
        Self {
            value,
            expires_at,
            created_at: Utc::now(),
            access_count: 0,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks expiry against a caller-supplied clock reading.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Computes `now + ttl_seconds`, saturating at the latest representable instant.
pub fn expiry_from(now: DateTime<Utc>, ttl_seconds: u64) -> DateTime<Utc> {
    i64::try_from(ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
