//! Search-state data model
//!
//! Search state exists in two shapes at once: the flat, URL-friendly form
//! ([`ApiSearchQuery`]) that rides in query strings and travels to the
//! catalog API, and the structured form ([`SearchQuery`]) that page handlers
//! and widgets work with. The `serializer` module converts between them.
//!
//! All of these are value types built fresh on every request; they are never
//! cached or mutated in place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Page number the catalog assumes when none is asked for.
pub const DEFAULT_PAGE: u32 = 1;

/// Results per page the catalog assumes when none is asked for.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Fields a search clause can target.
///
/// The set is closed on purpose: clause boundaries in the compound query
/// grammar are recognized by these tokens, so adding a variant changes the
/// wire grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Keyword,
    Title,
    Author,
    Viaf,
    Subject,
}

impl SearchField {
    /// Every field, in the order the search form lists them.
    pub const ALL: [SearchField; 5] = [
        SearchField::Keyword,
        SearchField::Title,
        SearchField::Author,
        SearchField::Viaf,
        SearchField::Subject,
    ];

    /// The lowercase wire token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Title => "title",
            Self::Author => "author",
            Self::Viaf => "viaf",
            Self::Subject => "subject",
        }
    }

    /// Human label for the search-form dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Keyword => "Keyword",
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Viaf => "Author (VIAF ID)",
            Self::Subject => "Subject",
        }
    }

    /// Parse a wire token. Returns `None` for anything outside the set.
    pub fn parse(token: &str) -> Option<SearchField> {
        SearchField::ALL.iter().copied().find(|f| f.as_str() == token)
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facet filter fields the UI knows about.
///
/// Filter fields are an open set (unknown fields pass through the codec
/// untouched), but the widgets and the year coercion work in terms of these.
pub mod filter_fields {
    pub const LANGUAGE: &str = "language";
    pub const FORMAT: &str = "format";
    pub const START_YEAR: &str = "startYear";
    pub const END_YEAR: &str = "endYear";
    pub const GOV_DOC: &str = "govDoc";
}

/// One search clause: a field and the text queried against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub field: SearchField,
    pub query: String,
}

impl Query {
    pub fn new(field: SearchField, query: impl Into<String>) -> Self {
        Self {
            field,
            query: query.into(),
        }
    }
}

/// A facet value. The year facets carry numbers, everything else strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Year(i64),
    Str(String),
}

impl FilterValue {
    /// Type a raw pair value for `field`.
    ///
    /// Total: only the year fields coerce, and a year value that is not a
    /// plain integer stays a string.
    pub fn coerce(field: &str, raw: &str) -> FilterValue {
        if field == filter_fields::START_YEAR || field == filter_fields::END_YEAR {
            if let Ok(year) = raw.parse::<i64>() {
                return FilterValue::Year(year);
            }
        }
        FilterValue::Str(raw.to_string())
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{}", year),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Str(s.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(year: i64) -> Self {
        FilterValue::Year(year)
    }
}

/// One facet constraint.
///
/// Repeating a field is legal and widens the facet: two `format` filters
/// match items in either format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub value: FilterValue,
}

impl Filter {
    pub fn new(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result ordering.
///
/// `dir` is conventionally `asc`/`desc`; its case follows the caller and is
/// not validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub dir: String,
}

impl Sort {
    pub fn new(field: impl Into<String>, dir: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: dir.into(),
        }
    }

    /// The ordering the catalog applies when none is asked for.
    pub fn relevance() -> Sort {
        Sort::new("relevance", "DESC")
    }
}

/// Structured search state as page handlers and widgets see it.
///
/// `queries` is the only required field; a search with zero clauses is not
/// representable. Optional fields are `Some` only when the URL carried them;
/// defaulting belongs to the caller via the `effective_*` accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub queries: Vec<Query>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Query>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_all: Option<bool>,
}

impl SearchQuery {
    /// Search state with every optional field pinned to its default.
    pub fn defaults() -> SearchQuery {
        SearchQuery {
            queries: Vec::new(),
            filters: Some(Vec::new()),
            page: Some(DEFAULT_PAGE),
            per_page: Some(DEFAULT_PER_PAGE),
            display: None,
            sort: Some(Sort::relevance()),
            show_all: Some(false),
        }
    }

    /// Single-clause search, the shape the plain search bar produces.
    pub fn simple(field: SearchField, query: impl Into<String>) -> SearchQuery {
        SearchQuery {
            queries: vec![Query::new(field, query)],
            ..Default::default()
        }
    }

    /// Effective page after default substitution.
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    /// Effective page size after default substitution.
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Effective ordering after default substitution.
    pub fn effective_sort(&self) -> Sort {
        self.sort.clone().unwrap_or_else(Sort::relevance)
    }

    /// Effective show-all flag after default substitution.
    pub fn effective_show_all(&self) -> bool {
        self.show_all.unwrap_or(false)
    }

    /// Applied filters, empty when none were carried.
    pub fn effective_filters(&self) -> &[Filter] {
        self.filters.as_deref().unwrap_or(&[])
    }

    /// Set page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set page size, resetting to the first page.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self.page = Some(DEFAULT_PAGE);
        self
    }

    /// Set ordering, resetting to the first page.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self.page = Some(DEFAULT_PAGE);
        self
    }

    /// Set the show-all flag, resetting to the first page.
    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all = Some(show_all);
        self.page = Some(DEFAULT_PAGE);
        self
    }

    /// Add one facet constraint, resetting to the first page.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(filter);
        self.page = Some(DEFAULT_PAGE);
        self
    }

    /// Remove every constraint equal to `filter`, resetting to the first
    /// page.
    pub fn without_filter(mut self, filter: &Filter) -> Self {
        if let Some(filters) = self.filters.as_mut() {
            filters.retain(|f| f != filter);
        }
        self.page = Some(DEFAULT_PAGE);
        self
    }

    /// Whether an equal constraint is currently applied.
    pub fn has_filter(&self, filter: &Filter) -> bool {
        self.effective_filters().iter().any(|f| f == filter)
    }
}

/// Flat, URL-friendly search form.
///
/// Compound state rides in delimited strings (`query`, `filter`, `sort`) so
/// the whole thing survives a trip through a query string; see the
/// `serializer` module for the exact grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_all: Option<String>,
}

impl ApiSearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// Flat pagination form for collection pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCollectionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}
