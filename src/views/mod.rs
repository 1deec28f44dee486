//! View models for page rendering
//!
//! Pure converters from catalog DTOs and search state into render-ready
//! structs. Everything here is `Serialize` so the same model feeds a tera
//! context or a JSON response. Converters are total: a missing optional
//! API field degrades to an absent entry, never to an error.
//!
//! Every link these models carry is produced by serializing a query through
//! the URL codec, so widget state and URLs cannot disagree.

mod search;
mod work;

pub use search::{
    field_options, DownloadLink, FacetGroup, FacetOption, FieldOption, FilterChip, HiddenParam,
    PageLink, Pagination, PerPageOption, SearchView, SortOption, WorkCard,
};
pub use work::{
    CollectionCard, CollectionView, EditionRow, EditionView, InstanceRow, LinkButton, WorkView,
};

use crate::catalog::Agent;
use crate::query::{to_api_query, to_query_string, ApiCollectionQuery, SearchQuery};

/// Canonical URL of a search state.
///
/// Serialization only fails on a clause-less state, which no rendered page
/// produces; the bare path is the safe degradation.
pub fn search_url(query: &SearchQuery) -> String {
    match to_api_query(query) {
        Ok(flat) => format!("/search{}", to_query_string(&flat)),
        Err(_) => "/search".to_string(),
    }
}

/// Canonical URL of a collection page.
pub fn collection_url(id: &str, query: &ApiCollectionQuery) -> String {
    format!("/collection/{}{}", id, to_query_string(query))
}

/// One display line for a list of agents, primary ones first.
pub fn agent_line(agents: &[Agent]) -> String {
    let mut names: Vec<&str> = agents
        .iter()
        .filter(|a| a.primary)
        .map(|a| a.name.as_str())
        .collect();
    names.extend(
        agents
            .iter()
            .filter(|a| !a.primary)
            .map(|a| a.name.as_str()),
    );
    names.retain(|name| !name.is_empty());
    names.join("; ")
}

/// Publication year span for a work card ("1854" or "1854-1901").
pub fn year_span(first: Option<i32>, last: Option<i32>) -> Option<String> {
    match (first, last) {
        (Some(first), Some(last)) if first != last => Some(format!("{}-{}", first, last)),
        (Some(year), _) | (None, Some(year)) => Some(year.to_string()),
        (None, None) => None,
    }
}

/// Short human label for a media type or format facet value.
pub fn format_label(value: &str) -> String {
    match value {
        "application/epub+zip" | "application/epub+xml" | "epub" => "EPUB".to_string(),
        "application/pdf" | "pdf" => "PDF".to_string(),
        "text/html" | "html" => "Read online".to_string(),
        "readable" => "Read online".to_string(),
        "downloadable" => "Download".to_string(),
        other => other.to_string(),
    }
}
