//! Cache Invalidation Module
//!
//! Maps domain events onto prefix deletes against the hybrid manager.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::cache::key::hash_fragment;
use crate::cache::HybridCacheManager;

/// Patterns dropped when a category changes. The root listing may embed it.
pub fn category_patterns(category_id: &str) -> Vec<String> {
    vec![
        format!("taxonomy:categories:{}*", category_id),
        "taxonomy:categories:root*".to_string(),
        format!("search:category:{}*", category_id),
        format!("browse:category:{}*", category_id),
    ]
}

/// Patterns dropped when a search query's results change.
///
/// The raw query is hashed the same way callers hash it into their keys.
pub fn search_patterns(query: &str) -> Vec<String> {
    let query_hash = hash_fragment(query);
    vec![
        format!("search:query:{}*", query_hash),
        format!("browse:search:{}*", query_hash),
    ]
}

/// Patterns dropped when a business policy changes in a marketplace.
pub fn policy_patterns(policy_type: &str, marketplace_id: &str) -> Vec<String> {
    vec![
        format!("account:policies:{}:{}*", policy_type, marketplace_id),
        format!("account:rate_tables:{}*", marketplace_id),
    ]
}

// == Cache Invalidator ==
/// Stateless translator from domain events to `delete_pattern` calls.
pub struct CacheInvalidator<V> {
    cache: Arc<HybridCacheManager<V>>,
}

impl<V> Clone for CacheInvalidator<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<V> CacheInvalidator<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(cache: Arc<HybridCacheManager<V>>) -> Self {
        Self { cache }
    }

    pub async fn invalidate_category(&self, category_id: &str) -> usize {
        let deleted = self.delete_all(&category_patterns(category_id)).await;
        info!(category_id, deleted, "category cache invalidated");
        deleted
    }

    pub async fn invalidate_search(&self, query: &str) -> usize {
        let deleted = self.delete_all(&search_patterns(query)).await;
        info!(deleted, "search cache invalidated");
        deleted
    }

    pub async fn invalidate_policy(&self, policy_type: &str, marketplace_id: &str) -> usize {
        let deleted = self
            .delete_all(&policy_patterns(policy_type, marketplace_id))
            .await;
        info!(policy_type, marketplace_id, deleted, "policy cache invalidated");
        deleted
    }

    async fn delete_all(&self, patterns: &[String]) -> usize {
        let mut deleted = 0;
        for pattern in patterns {
            deleted += self.cache.delete_pattern(pattern).await;
        }
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheSettings, MemoryStore};
    use serde_json::{json, Value};

    async fn seeded(keys: &[&str]) -> Arc<HybridCacheManager<Value>> {
        let cache = Arc::new(HybridCacheManager::memory_only(
            MemoryStore::new(100).unwrap(),
            CacheSettings::default(),
        ));
        for key in keys {
            cache.set(key, json!(key), 300).await;
        }
        cache
    }

    #[test]
    fn test_category_patterns() {
        assert_eq!(
            category_patterns("9355"),
            vec![
                "taxonomy:categories:9355*",
                "taxonomy:categories:root*",
                "search:category:9355*",
                "browse:category:9355*",
            ]
        );
    }

    #[test]
    fn test_search_patterns_use_query_hash() {
        let patterns = search_patterns("hello");
        assert_eq!(patterns[0], "search:query:5d41402abc4b2a76b9719d911017c592*");
        assert_eq!(patterns[1], "browse:search:5d41402abc4b2a76b9719d911017c592*");
    }

    #[tokio::test]
    async fn test_invalidate_category() {
        let cache = seeded(&[
            "taxonomy:categories:42:children",
            "taxonomy:categories:root",
            "search:category:42:page1",
            "browse:category:42",
            "browse:category:7",
        ])
        .await;
        let invalidator = CacheInvalidator::new(cache.clone());

        assert_eq!(invalidator.invalidate_category("42").await, 4);
        assert!(cache.get("browse:category:7").await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_search() {
        let query_hash = hash_fragment("vintage camera");
        let stored = format!("search:query:{}:page1", query_hash);
        let cache = seeded(&[&stored, "search:query:unrelated"]).await;
        let invalidator = CacheInvalidator::new(cache.clone());

        assert_eq!(invalidator.invalidate_search("vintage camera").await, 1);
        assert!(cache.get(&stored).await.is_none());
        assert!(cache.get("search:query:unrelated").await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_policy() {
        let cache = seeded(&[
            "account:policies:payment:EBAY_US:list",
            "account:policies:payment:EBAY_GB:list",
            "account:rate_tables:EBAY_US",
        ])
        .await;
        let invalidator = CacheInvalidator::new(cache.clone());

        assert_eq!(invalidator.invalidate_policy("payment", "EBAY_US").await, 2);
        assert!(cache.get("account:policies:payment:EBAY_GB:list").await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_nothing_matching() {
        let cache = seeded(&[]).await;
        let invalidator = CacheInvalidator::new(cache);
        assert_eq!(invalidator.invalidate_category("1").await, 0);
    }
}
