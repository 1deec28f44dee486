//! Caching module for StackSearch-RS
//!
//! A small TTL cache for catalog search responses, so repeated searches and
//! pagination hops do not hammer the catalog API.

use std::time::Duration;

use moka::future::Cache;
use sha2::{Digest, Sha256};

use crate::catalog::SearchResponse;
use crate::config::CacheSettings;
use crate::query::{to_location_query, ApiSearchQuery};

/// Cache for catalog search responses
pub struct ResponseCache {
    cache: Cache<String, SearchResponse>,
}

impl ResponseCache {
    /// Create a new response cache with specified TTL and capacity
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    /// Create a response cache from settings
    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.ttl_seconds, settings.max_capacity)
    }

    /// Get a cached response
    pub async fn get(&self, key: &str) -> Option<SearchResponse> {
        self.cache.get(key).await
    }

    /// Store a response in cache
    pub async fn set(&self, key: String, value: SearchResponse) {
        self.cache.insert(key, value).await;
    }

    /// Clear the entire cache
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Get cache size
    pub fn size(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(300, 1000) // 5 minutes TTL, 1k max entries
    }
}

/// Cache key for a search: digest of the canonical flattened query.
///
/// Two queries that flatten to the same parameter map are the same search,
/// however their structured forms were built.
pub fn search_cache_key(query: &ApiSearchQuery) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in to_location_query(query) {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b"&");
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_cache() {
        tokio_test::block_on(async {
            let cache = ResponseCache::new(60, 100);
            let response = SearchResponse {
                total: 7,
                ..Default::default()
            };

            cache.set("test".to_string(), response).await;

            let cached = cache.get("test").await;
            assert!(cached.is_some());
            assert_eq!(cached.unwrap().total, 7);
        });
    }

    #[test]
    fn test_cache_key_tracks_query_content() {
        let base = ApiSearchQuery::new("author:cat");
        let mut paged = base.clone();
        paged.page = Some(2);

        assert_eq!(search_cache_key(&base), search_cache_key(&base.clone()));
        assert_ne!(search_cache_key(&base), search_cache_key(&paged));
    }
}
