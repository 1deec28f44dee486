//! Search orchestration module
//!
//! One layer above the catalog client: the service owns the response cache
//! and is what page handlers call. A search is one catalog call, cached by
//! canonical query digest; there is no fan-out and no retry logic.

use tracing::debug;

use crate::cache::{search_cache_key, ResponseCache};
use crate::catalog::{CatalogClient, CatalogError, SearchResponse};
use crate::config::CacheSettings;
use crate::query::ApiSearchQuery;

/// Executes catalog searches through the response cache.
pub struct SearchService {
    client: CatalogClient,
    cache: Option<ResponseCache>,
}

impl SearchService {
    /// Create a service. Caching is controlled by settings; a disabled
    /// cache means every search goes to the catalog.
    pub fn new(client: CatalogClient, settings: &CacheSettings) -> Self {
        let cache = settings
            .enabled
            .then(|| ResponseCache::from_settings(settings));
        Self { client, cache }
    }

    /// Run a search, consulting the cache first. Only successful responses
    /// are stored, so a failed search retries on the next request.
    pub async fn search(&self, query: &ApiSearchQuery) -> Result<SearchResponse, CatalogError> {
        let cache = match &self.cache {
            Some(cache) => cache,
            None => return self.client.search(query).await,
        };

        let key = search_cache_key(query);
        if let Some(cached) = cache.get(&key).await {
            debug!("Search cache hit for '{}'", query.query);
            return Ok(cached);
        }

        let response = self.client.search(query).await?;
        cache.set(key, response.clone()).await;
        Ok(response)
    }
}
