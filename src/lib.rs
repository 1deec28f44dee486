//! StackSearch: a search front end for open digital collections
//!
//! A server-rendered replacement for a single-page research library UI.
//! Search state lives entirely in the URL: the `query` module round-trips
//! it between the flat form browsers carry and the structured form the
//! rest of the crate works with.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod query;
pub mod search;
pub mod views;
pub mod web;

pub use catalog::CatalogClient;
pub use config::Settings;
pub use query::{ApiSearchQuery, SearchQuery};
pub use search::SearchService;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
