//! HTTP client for the catalog API

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::CatalogSettings;
use crate::query::{to_location_query, ApiCollectionQuery, ApiSearchQuery};

use super::types::{
    Collection, CollectionList, Edition, FacetCount, ItemLink, LanguageList, SearchResponse, Work,
};

/// Errors from catalog API calls.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure: connect, timeout, TLS.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog returned status {0}")]
    Status(StatusCode),

    /// The body did not match the expected shape.
    #[error("catalog response did not decode: {0}")]
    Decode(#[source] reqwest::Error),

    /// The requested record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    /// Whether the error should render as a 404 rather than a 502.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

/// Client for the catalog's JSON API.
///
/// A thin reqwest wrapper: one method per endpoint, no retries, no caching.
/// The search service layers caching on top.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Build a client from settings. Timeout and TLS verification come from
    /// configuration; compression is always negotiated.
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a search. The flat query is flattened to URL parameters exactly
    /// as a browser would carry them.
    pub async fn search(&self, query: &ApiSearchQuery) -> Result<SearchResponse, CatalogError> {
        self.get_json(&self.url("/search"), &to_location_query(query))
            .await
    }

    /// Fetch one work with its full edition list.
    pub async fn work(&self, uuid: &str) -> Result<Work, CatalogError> {
        self.get_record(&self.url(&format!("/work/{}", uuid)), uuid)
            .await
    }

    /// Fetch one edition with its items.
    pub async fn edition(&self, id: i64) -> Result<Edition, CatalogError> {
        self.get_record(&self.url(&format!("/edition/{}", id)), &id.to_string())
            .await
    }

    /// Fetch one collection page.
    pub async fn collection(
        &self,
        id: &str,
        query: &ApiCollectionQuery,
    ) -> Result<Collection, CatalogError> {
        let url = self.url(&format!("/collection/{}", id));
        match self.get_json(&url, &to_location_query(query)).await {
            Err(CatalogError::Status(StatusCode::NOT_FOUND)) => {
                Err(CatalogError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    /// List curated collections.
    pub async fn collections(&self, page: u32) -> Result<CollectionList, CatalogError> {
        let mut params = BTreeMap::new();
        params.insert("page".to_string(), page.to_string());
        self.get_json(&self.url("/collections"), &params).await
    }

    /// List every language the catalog can facet on, with totals.
    pub async fn languages(&self) -> Result<Vec<FacetCount>, CatalogError> {
        let list: LanguageList = self.get_json(&self.url("/languages"), &BTreeMap::new()).await?;
        Ok(list.languages)
    }

    /// Resolve a read-online link by id.
    pub async fn link(&self, id: i64) -> Result<ItemLink, CatalogError> {
        self.get_record(&self.url(&format!("/link/{}", id)), &id.to_string())
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a single record, mapping 404 to [`CatalogError::NotFound`].
    async fn get_record<T: DeserializeOwned>(
        &self,
        url: &str,
        id: &str,
    ) -> Result<T, CatalogError> {
        match self.get_json(url, &BTreeMap::new()).await {
            Err(CatalogError::Status(StatusCode::NOT_FOUND)) => {
                Err(CatalogError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<T, CatalogError> {
        debug!("catalog GET {}", url);

        let mut request = self.client.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        response.json::<T>().await.map_err(CatalogError::Decode)
    }
}
