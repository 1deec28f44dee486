//! Conversions between the flat URL form and the structured form
//!
//! The compound `query` string packs one or more `field:value` clauses
//! joined by commas, and values may themselves contain commas and colons
//! (`keyword:"Civil War" OR Lincoln,author:last, first` is two clauses).
//! Naive splitting is therefore wrong; clause boundaries are found by
//! scanning for recognized field tokens instead. A boundary exists only
//! where a field token followed by a colon sits at the string start or
//! right after a comma.
//!
//! Filters use a narrower grammar: one `field:value` pair per comma-joined
//! segment, values free of `,` and `:`. Neither grammar has an escape
//! mechanism, so a filter value that breaks the rule will not survive the
//! round trip.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::models::{
    ApiSearchQuery, Filter, FilterValue, Query, SearchField, SearchQuery, Sort, DEFAULT_PAGE,
    DEFAULT_PER_PAGE,
};

/// Errors from the search-state conversions.
///
/// Nothing else fails at this layer: unknown filter fields, odd sort
/// directions, and out-of-range numbers pass through and yield structurally
/// valid, semantically meaningless state rather than an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The flat form carried no `query` string at all.
    #[error("search query string is missing or empty")]
    MissingQuery,
    /// The structured form has no clauses to serialize.
    #[error("search state has no query clauses")]
    EmptyQueries,
}

/// Matches a clause start: a recognized field token plus colon, at the
/// string start or right after the comma that separates it from the
/// previous clause.
static CLAUSE_START: Lazy<Regex> = Lazy::new(|| {
    let tokens = SearchField::ALL.map(|f| f.as_str()).join("|");
    Regex::new(&format!(r"(?:^|,)(?:{}):", tokens)).expect("clause pattern is valid")
});

/// Parse the flat form into structured search state.
///
/// The only failure is an absent `query` string; every optional field maps
/// independently and stays `None` when the flat form omitted it.
pub fn to_search_query(api: &ApiSearchQuery) -> Result<SearchQuery, QueryError> {
    if api.query.is_empty() {
        return Err(QueryError::MissingQuery);
    }

    Ok(SearchQuery {
        queries: split_clauses(&api.query),
        filters: api.filter.as_deref().map(split_filters),
        page: api.page,
        per_page: api.size,
        display: api.display.as_deref().and_then(parse_display),
        sort: api.sort.as_deref().map(parse_sort),
        show_all: api.show_all.as_deref().map(parse_show_all),
    })
}

/// Serialize structured search state back into the flat form.
///
/// Fields equal to their defaults are omitted so generated URLs stay
/// minimal: `?query=author:cat` and nothing else is the canonical form of a
/// default-everything author search. Joining performs no escaping.
pub fn to_api_query(search: &SearchQuery) -> Result<ApiSearchQuery, QueryError> {
    if search.queries.is_empty() {
        return Err(QueryError::EmptyQueries);
    }

    let filter = match search.filters.as_deref() {
        Some(filters) if !filters.is_empty() => Some(join_filters(filters)),
        _ => None,
    };
    let sort = match &search.sort {
        Some(sort) if *sort != Sort::relevance() => Some(format!("{}:{}", sort.field, sort.dir)),
        _ => None,
    };
    let show_all = match search.show_all {
        Some(true) => Some("true".to_string()),
        _ => None,
    };

    Ok(ApiSearchQuery {
        query: join_clauses(&search.queries),
        display: search
            .display
            .as_ref()
            .map(|d| format!("{}:{}", d.field, d.query)),
        filter,
        sort,
        size: search.per_page.filter(|&size| size != DEFAULT_PER_PAGE),
        page: search.page.filter(|&page| page != DEFAULT_PAGE),
        show_all,
    })
}

/// Flatten a flat query form into the string map a navigation URL wants.
///
/// Works for any flat form: serialization drops absent fields, numbers and
/// booleans render canonically, strings pass through untouched. The map is
/// ordered so generated URLs are deterministic.
pub fn to_location_query<T: Serialize>(query: &T) -> BTreeMap<String, String> {
    let mut location = BTreeMap::new();
    if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(query) {
        for (key, value) in fields {
            let rendered = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => continue,
                other => other.to_string(),
            };
            location.insert(key, rendered);
        }
    }
    location
}

/// Percent-encode a flat query form into a URL suffix, `?` included.
///
/// Returns an empty string when there is nothing to carry, so the result
/// can always be appended to a path.
pub fn to_query_string<T: Serialize>(query: &T) -> String {
    let location = to_location_query(query);
    if location.is_empty() {
        return String::new();
    }

    let mut encoded = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in &location {
        encoded.append_pair(key, value);
    }
    format!("?{}", encoded.finish())
}

/// Split a compound query string into clauses.
///
/// A clause runs from one boundary to the next, minus the separating comma;
/// text before the first boundary contributes nothing. Values keep their
/// embedded commas and colons (`author:last, first` stays one clause).
fn split_clauses(raw: &str) -> Vec<Query> {
    let mut clauses = Vec::new();
    let mut pending: Option<(SearchField, usize)> = None;

    for mark in CLAUSE_START.find_iter(raw) {
        let token = mark
            .as_str()
            .trim_start_matches(',')
            .trim_end_matches(':');
        let field = match SearchField::parse(token) {
            Some(field) => field,
            None => continue,
        };

        if let Some((prev, value_start)) = pending.take() {
            // the previous clause ends right before the separator comma
            clauses.push(Query::new(prev, &raw[value_start..mark.start()]));
        }
        pending = Some((field, mark.end()));
    }

    if let Some((field, value_start)) = pending {
        clauses.push(Query::new(field, &raw[value_start..]));
    }

    clauses
}

/// Split a filter string into facet constraints.
///
/// The narrow grammar makes a plain comma split correct. A pair without a
/// colon becomes a field with an empty value.
fn split_filters(raw: &str) -> Vec<Filter> {
    raw.split(',')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (field, value) = pair.split_once(':').unwrap_or((pair, ""));
            Filter {
                field: field.to_string(),
                value: FilterValue::coerce(field, value),
            }
        })
        .collect()
}

/// A display clause is a single `field:value` pair. An unrecognized field
/// cannot be represented and drops the display.
fn parse_display(raw: &str) -> Option<Query> {
    let (field, value) = raw.split_once(':')?;
    SearchField::parse(field).map(|field| Query::new(field, value))
}

/// `field:dir` → [`Sort`]. A pair without a colon degrades to an empty
/// direction.
fn parse_sort(raw: &str) -> Sort {
    let (field, dir) = raw.split_once(':').unwrap_or((raw, ""));
    Sort::new(field, dir)
}

/// Total string → bool coercion for the show-all flag: the literal `true`
/// and nothing else turns it on.
fn parse_show_all(raw: &str) -> bool {
    raw == "true"
}

fn join_clauses(queries: &[Query]) -> String {
    queries
        .iter()
        .map(|q| format!("{}:{}", q.field, q.query))
        .collect::<Vec<_>>()
        .join(",")
}

fn join_filters(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(|f| format!("{}:{}", f.field, f.value))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(query: &str) -> ApiSearchQuery {
        ApiSearchQuery::new(query)
    }

    #[test]
    fn test_minimal_query_parses_to_one_clause() {
        let search = to_search_query(&api("author:cat")).unwrap();

        assert_eq!(search.queries, vec![Query::new(SearchField::Author, "cat")]);
        assert_eq!(search.filters, None);
        assert_eq!(search.page, None);
        assert_eq!(search.per_page, None);
        assert_eq!(search.display, None);
        assert_eq!(search.sort, None);
        assert_eq!(search.show_all, None);
    }

    #[test]
    fn test_values_keep_embedded_commas_and_colons() {
        let search =
            to_search_query(&api(r#"keyword:"Civil War" OR Lincoln,author:last, first"#)).unwrap();

        assert_eq!(
            search.queries,
            vec![
                Query::new(SearchField::Keyword, r#""Civil War" OR Lincoln"#),
                Query::new(SearchField::Author, "last, first"),
            ]
        );
    }

    #[test]
    fn test_field_token_mid_value_is_not_a_boundary() {
        let search = to_search_query(&api("keyword:the subject: of law")).unwrap();

        assert_eq!(
            search.queries,
            vec![Query::new(SearchField::Keyword, "the subject: of law")]
        );
    }

    #[test]
    fn test_unrecognized_prefix_is_dropped() {
        let search = to_search_query(&api("coauthor:x,title:Dune")).unwrap();

        assert_eq!(search.queries, vec![Query::new(SearchField::Title, "Dune")]);
    }

    #[test]
    fn test_no_recognized_clause_yields_empty_queries() {
        let search = to_search_query(&api("just some words")).unwrap();

        assert!(search.queries.is_empty());
    }

    #[test]
    fn test_empty_query_string_is_an_error() {
        assert_eq!(
            to_search_query(&ApiSearchQuery::default()),
            Err(QueryError::MissingQuery)
        );
    }

    #[test]
    fn test_repeated_filter_fields_all_survive() {
        let mut flat = api("keyword:cat");
        flat.filter = Some("language:english,format:epub,format:pdf".to_string());

        let search = to_search_query(&flat).unwrap();
        assert_eq!(
            search.filters,
            Some(vec![
                Filter::new("language", "english"),
                Filter::new("format", "epub"),
                Filter::new("format", "pdf"),
            ])
        );
    }

    #[test]
    fn test_year_filters_coerce_to_numbers() {
        let mut flat = api("keyword:cat");
        flat.filter = Some("startYear:1800,endYear:2000,language:1984".to_string());

        let search = to_search_query(&flat).unwrap();
        assert_eq!(
            search.filters,
            Some(vec![
                Filter::new("startYear", 1800),
                Filter::new("endYear", 2000),
                Filter::new("language", "1984"),
            ])
        );
    }

    #[test]
    fn test_optional_fields_map_through() {
        let flat = ApiSearchQuery {
            query: "keyword:cat".to_string(),
            display: Some("title:Cats".to_string()),
            filter: None,
            sort: Some("date:ASC".to_string()),
            size: Some(20),
            page: Some(3),
            show_all: Some("true".to_string()),
        };

        let search = to_search_query(&flat).unwrap();
        assert_eq!(search.display, Some(Query::new(SearchField::Title, "Cats")));
        assert_eq!(search.sort, Some(Sort::new("date", "ASC")));
        assert_eq!(search.per_page, Some(20));
        assert_eq!(search.page, Some(3));
        assert_eq!(search.show_all, Some(true));
    }

    #[test]
    fn test_show_all_accepts_only_the_literal_true() {
        for (raw, expected) in [("true", true), ("True", false), ("1", false), ("", false)] {
            let mut flat = api("keyword:cat");
            flat.show_all = Some(raw.to_string());
            assert_eq!(
                to_search_query(&flat).unwrap().show_all,
                Some(expected),
                "showAll={:?}",
                raw
            );
        }
    }

    #[test]
    fn test_display_with_unknown_field_is_dropped() {
        let mut flat = api("keyword:cat");
        flat.display = Some("shelf:Nonfiction".to_string());

        assert_eq!(to_search_query(&flat).unwrap().display, None);
    }

    #[test]
    fn test_serialize_omits_defaults() {
        let search = SearchQuery {
            queries: vec![Query::new(SearchField::Author, "cat")],
            filters: Some(Vec::new()),
            page: Some(DEFAULT_PAGE),
            per_page: Some(DEFAULT_PER_PAGE),
            display: None,
            sort: Some(Sort::relevance()),
            show_all: Some(false),
        };

        let flat = to_api_query(&search).unwrap();
        assert_eq!(flat, ApiSearchQuery::new("author:cat"));
    }

    #[test]
    fn test_serialize_keeps_non_defaults() {
        let search = SearchQuery {
            queries: vec![
                Query::new(SearchField::Keyword, r#""Civil War" OR Lincoln"#),
                Query::new(SearchField::Author, "last, first"),
            ],
            filters: Some(vec![
                Filter::new("language", "Spanish"),
                Filter::new("startYear", 1800),
            ]),
            page: Some(3),
            per_page: Some(20),
            display: Some(Query::new(SearchField::Keyword, "Civil War")),
            sort: Some(Sort::new("title", "asc")),
            show_all: Some(true),
        };

        let flat = to_api_query(&search).unwrap();
        assert_eq!(
            flat.query,
            r#"keyword:"Civil War" OR Lincoln,author:last, first"#
        );
        assert_eq!(flat.display.as_deref(), Some("keyword:Civil War"));
        assert_eq!(flat.filter.as_deref(), Some("language:Spanish,startYear:1800"));
        assert_eq!(flat.sort.as_deref(), Some("title:asc"));
        assert_eq!(flat.size, Some(20));
        assert_eq!(flat.page, Some(3));
        assert_eq!(flat.show_all.as_deref(), Some("true"));
    }

    #[test]
    fn test_serialize_without_clauses_is_an_error() {
        assert_eq!(
            to_api_query(&SearchQuery::default()),
            Err(QueryError::EmptyQueries)
        );
    }

    #[test]
    fn test_non_default_state_round_trips() {
        let search = SearchQuery {
            queries: vec![
                Query::new(SearchField::Keyword, r#""Civil War" OR Lincoln"#),
                Query::new(SearchField::Author, "last, first"),
            ],
            filters: Some(vec![
                Filter::new("language", "Spanish"),
                Filter::new("startYear", 1800),
                Filter::new("endYear", 2000),
            ]),
            page: Some(3),
            per_page: Some(20),
            display: Some(Query::new(SearchField::Keyword, "Civil War")),
            sort: Some(Sort::new("title", "asc")),
            show_all: Some(true),
        };

        let flat = to_api_query(&search).unwrap();
        assert_eq!(to_search_query(&flat).unwrap(), search);
    }

    #[test]
    fn test_location_query_renders_scalars_as_strings() {
        let flat = ApiSearchQuery {
            query: "author:cat".to_string(),
            display: None,
            filter: Some("language:Spanish".to_string()),
            sort: None,
            size: Some(20),
            page: Some(3),
            show_all: Some("true".to_string()),
        };

        let location = to_location_query(&flat);
        assert_eq!(location.get("query").map(String::as_str), Some("author:cat"));
        assert_eq!(
            location.get("filter").map(String::as_str),
            Some("language:Spanish")
        );
        assert_eq!(location.get("size").map(String::as_str), Some("20"));
        assert_eq!(location.get("page").map(String::as_str), Some("3"));
        assert_eq!(location.get("showAll").map(String::as_str), Some("true"));
        assert!(!location.contains_key("display"));
        assert!(!location.contains_key("sort"));
    }

    #[test]
    fn test_query_string_is_percent_encoded() {
        let flat = ApiSearchQuery {
            query: r#"keyword:"Civil War" OR Lincoln,author:last, first"#.to_string(),
            page: Some(3),
            ..Default::default()
        };

        let qs = to_query_string(&flat);
        assert_eq!(
            qs,
            "?page=3&query=keyword%3A%22Civil+War%22+OR+Lincoln%2Cauthor%3Alast%2C+first"
        );
    }

    #[test]
    fn test_empty_collection_query_yields_empty_suffix() {
        use crate::query::ApiCollectionQuery;

        assert_eq!(to_query_string(&ApiCollectionQuery::default()), "");
        assert_eq!(
            to_query_string(&ApiCollectionQuery {
                page: Some(2),
                per_page: Some(30),
                sort: None,
            }),
            "?page=2&perPage=30"
        );
    }
}
