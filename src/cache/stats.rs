//! Cache Statistics Module
//!
//! Tracks hybrid cache metrics: per-tier hits, misses, writes and errors.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Monotonic counters owned by the hybrid manager.
///
/// Counters are atomics so a shared manager can record through `&self`.
#[derive(Debug, Default)]
pub struct CacheStats {
    l1_hits: AtomicU64,
    l2_hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    errors: AtomicU64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_l1_hit(&self) {
        self.l1_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_l2_hit(&self) {
        self.l2_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds `count` deletions; prefix deletes add their whole batch.
    pub fn record_deletes(&self, count: u64) {
        self.deletes.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the counters into a snapshot with derived rates.
    pub fn snapshot(&self, l1_size: usize, l2_configured: bool) -> StatsSnapshot {
        StatsSnapshot::new(
            self.l1_hits.load(Ordering::Relaxed),
            self.l2_hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.sets.load(Ordering::Relaxed),
            self.deletes.load(Ordering::Relaxed),
            self.errors.load(Ordering::Relaxed),
            l1_size,
            l2_configured,
        )
    }
}

// == Stats Snapshot ==
/// Point-in-time copy of the manager's statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub l1_hits: u64,
    pub l2_hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub errors: u64,
    /// (l1_hits + l2_hits) / total lookups, 0.0 with no lookups
    pub hit_rate: f64,
    /// l2_hits / total lookups, 0.0 with no lookups
    pub l2_hit_rate: f64,
    /// Entries currently held by the memory tier
    pub l1_size: usize,
    /// Whether a remote tier is attached at all
    pub l2_configured: bool,
}

impl StatsSnapshot {
    #[allow(clippy::too_many_arguments)]
    fn new(
        l1_hits: u64,
        l2_hits: u64,
        misses: u64,
        sets: u64,
        deletes: u64,
        errors: u64,
        l1_size: usize,
        l2_configured: bool,
    ) -> Self {
        let mut snapshot = Self {
            l1_hits,
            l2_hits,
            misses,
            sets,
            deletes,
            errors,
            hit_rate: 0.0,
            l2_hit_rate: 0.0,
            l1_size,
            l2_configured,
        };
        let total = snapshot.total_lookups();
        snapshot.hit_rate = ratio(l1_hits + l2_hits, total);
        snapshot.l2_hit_rate = ratio(l2_hits, total);
        snapshot
    }

    /// Total lookups observed: every get ends as exactly one of these.
    pub fn total_lookups(&self) -> u64 {
        self.l1_hits + self.l2_hits + self.misses
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
