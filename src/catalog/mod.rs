//! Catalog API integration
//!
//! The catalog is the external service of record: a JSON HTTP API holding
//! works, editions, items, and collections. This module owns the client and
//! the response DTOs; converting those DTOs into page view models happens in
//! `views`.

mod client;
mod types;

pub use client::{CatalogClient, CatalogError};
pub use types::{
    Agent, Collection, CollectionList, Edition, FacetCount, Facets, Item, ItemLink, Language,
    LanguageList, LinkFlags, Paging, SearchResponse, Subject, Work,
};
