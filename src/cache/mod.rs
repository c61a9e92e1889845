//! Cache Module
//!
//! Two-tier caching: a bounded in-process memory tier (L1) in front of an
//! optional Redis tier (L2), with TTL expiry, LRU demotion and degraded-mode
//! fallback when Redis is unreachable.

mod entry;
mod invalidation;
pub mod key;
pub mod lifecycle;
mod manager;
mod memory;
pub mod remote;
mod stats;
mod ttl;


// Re-export public types
pub use entry::CacheEntry;
pub use invalidation::{category_patterns, policy_patterns, search_patterns, CacheInvalidator};
pub use key::{hash_fragment, normalize_key, MAX_KEY_LENGTH};
pub use lifecycle::{init_cache_manager, shutdown_cache_manager, SharedCache};
pub use manager::{CacheSettings, HybridCacheManager};
pub use memory::MemoryStore;
pub use remote::{RedisBackend, RedisClient, RemoteBackend, RemoteOutcome, RemoteStore};
pub use stats::{CacheStats, StatsSnapshot};
pub use ttl::CacheTtl;
