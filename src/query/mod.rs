//! Search-state model and URL codec
//!
//! The only shareable state in the application is the URL. Everything a
//! search page shows (clauses, facet filters, ordering, pagination) is
//! rebuilt from query parameters on each request and serialized back into
//! links, so the codec here is the single source of truth for that wire
//! format.

mod models;
mod serializer;

pub use models::{
    filter_fields, ApiCollectionQuery, ApiSearchQuery, Filter, FilterValue, Query, SearchField,
    SearchQuery, Sort, DEFAULT_PAGE, DEFAULT_PER_PAGE,
};
pub use serializer::{
    to_api_query, to_location_query, to_query_string, to_search_query, QueryError,
};
