//! HTTP request handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tera::Context;
use tracing::{error, info, warn};

use super::state::AppState;
use crate::catalog::{CatalogError, Facets};
use crate::query::{
    self, filter_fields, ApiCollectionQuery, ApiSearchQuery, Filter, FilterValue, SearchField,
    SearchQuery,
};
use crate::views::{
    field_options, CollectionCard, CollectionView, EditionView, SearchView, WorkView,
};

/// Raw query parameters of the search page.
///
/// Everything arrives as an optional string. Coercion into the flat query
/// form is total, so a malformed URL degrades the search instead of turning
/// into an extraction error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchParams {
    pub query: Option<String>,
    /// Field picked in the search bar; wraps `query` into a clause.
    pub field: Option<String>,
    pub display: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub size: Option<String>,
    pub page: Option<String>,
    pub show_all: Option<String>,
    /// Year-range form inputs; folded into the filters after parsing.
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub format: Option<String>,
}

impl RawSearchParams {
    /// Coerce the raw strings into the flat query form.
    ///
    /// When the search bar supplies a separate `field`, the typed text
    /// becomes that field's clause value, colons and commas included.
    /// Unparseable numbers drop to their defaults.
    pub fn api_query(&self) -> ApiSearchQuery {
        let text = self.query.clone().unwrap_or_default();
        let query = match self.field.as_deref().and_then(SearchField::parse) {
            Some(field) if !text.is_empty() => format!("{}:{}", field, text),
            _ => text,
        };

        ApiSearchQuery {
            query,
            display: self.display.clone(),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            size: self.size.as_deref().and_then(|s| s.parse().ok()),
            page: self.page.as_deref().and_then(|s| s.parse().ok()),
            show_all: self.show_all.clone(),
        }
    }

    /// Fold the year-range form inputs into the parsed filters, replacing
    /// whatever year bounds the filter string carried.
    fn apply_year_bounds(&self, search: &mut SearchQuery) {
        for (field, value) in [
            (filter_fields::START_YEAR, &self.start_year),
            (filter_fields::END_YEAR, &self.end_year),
        ] {
            if let Some(raw) = value {
                let raw = raw.trim();
                let filters = search.filters.get_or_insert_with(Vec::new);
                filters.retain(|f| f.field != field);
                if !raw.is_empty() {
                    filters.push(Filter {
                        field: field.to_string(),
                        value: FilterValue::coerce(field, raw),
                    });
                }
            }
        }
    }
}

/// Raw query parameters of a collection page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCollectionParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort: Option<String>,
}

impl RawCollectionParams {
    pub fn api_query(&self) -> ApiCollectionQuery {
        ApiCollectionQuery {
            page: self.page.as_deref().and_then(|s| s.parse().ok()),
            per_page: self.per_page.as_deref().and_then(|s| s.parse().ok()),
            sort: self.sort.clone(),
        }
    }
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> Response {
    let featured = state.settings.search.featured_collections as usize;
    let collections: Vec<CollectionCard> = match state.catalog.collections(1).await {
        Ok(list) => list
            .collections
            .iter()
            .take(featured)
            .map(CollectionCard::from_collection)
            .collect(),
        Err(err) => {
            warn!("Failed to fetch featured collections: {}", err);
            Vec::new()
        }
    };

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("fields", &field_options(SearchField::Keyword));
    ctx.insert("collections", &collections);
    render_page(&state, "index.html", ctx)
}

/// Search results handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<RawSearchParams>,
) -> Response {
    let api_query = params.api_query();

    let mut search_query = match query::to_search_query(&api_query) {
        Ok(parsed) => parsed,
        Err(err) => return render_error(&state, StatusCode::BAD_REQUEST, &err.to_string()),
    };
    params.apply_year_bounds(&mut search_query);

    // the canonical form is what page links carry and what the catalog sees
    let canonical = match query::to_api_query(&search_query) {
        Ok(flat) => flat,
        Err(err) => return render_error(&state, StatusCode::BAD_REQUEST, &err.to_string()),
    };

    let mut response = match state.search.search(&canonical).await {
        Ok(response) => response,
        Err(err) => return render_catalog_error(&state, &err),
    };

    // the language widget still renders when the response has no facet block
    if response.facets.is_none() {
        match state.catalog.languages().await {
            Ok(languages) if !languages.is_empty() => {
                response.facets = Some(Facets {
                    formats: Vec::new(),
                    languages,
                });
            }
            Ok(_) => {}
            Err(err) => warn!("Failed to fetch language facets: {}", err),
        }
    }

    let view = SearchView::build(&search_query, &response, &state.settings.search);

    if params.format.as_deref() == Some("json") {
        return Json(view).into_response();
    }

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("view", &view);
    render_page(&state, "search.html", ctx)
}

/// Work detail handler
pub async fn work(State(state): State<AppState>, Path(uuid): Path<String>) -> Response {
    if uuid::Uuid::parse_str(&uuid).is_err() {
        return render_error(&state, StatusCode::NOT_FOUND, "No such work");
    }

    match state.catalog.work(&uuid).await {
        Ok(found) => {
            let view = WorkView::from_work(&found);
            let mut ctx = Context::new();
            ctx.insert("instance_name", state.instance_name());
            ctx.insert("view", &view);
            render_page(&state, "work.html", ctx)
        }
        Err(err) => render_catalog_error(&state, &err),
    }
}

/// Edition detail handler
pub async fn edition(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id: i64 = match id.parse() {
        Ok(id) => id,
        Err(_) => return render_error(&state, StatusCode::NOT_FOUND, "No such edition"),
    };

    match state.catalog.edition(id).await {
        Ok(found) => {
            let view = EditionView::from_edition(&found);
            let mut ctx = Context::new();
            ctx.insert("instance_name", state.instance_name());
            ctx.insert("view", &view);
            render_page(&state, "edition.html", ctx)
        }
        Err(err) => render_catalog_error(&state, &err),
    }
}

/// Collection page handler
pub async fn collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RawCollectionParams>,
) -> Response {
    let api_query = params.api_query();

    match state.catalog.collection(&id, &api_query).await {
        Ok(found) => {
            let view = CollectionView::build(&found, &api_query, state.settings.search.page_window);
            let mut ctx = Context::new();
            ctx.insert("instance_name", state.instance_name());
            ctx.insert("view", &view);
            render_page(&state, "collection.html", ctx)
        }
        Err(err) => render_catalog_error(&state, &err),
    }
}

/// Read-online handler: resolves a link id and embeds its target.
pub async fn read(State(state): State<AppState>, Path(link_id): Path<String>) -> Response {
    let link_id: i64 = match link_id.parse() {
        Ok(id) => id,
        Err(_) => return render_error(&state, StatusCode::NOT_FOUND, "No such link"),
    };

    match state.catalog.link(link_id).await {
        Ok(link) => {
            let mut ctx = Context::new();
            ctx.insert("instance_name", state.instance_name());
            ctx.insert("link_url", &link.url);
            ctx.insert("media_type", &link.media_type);
            render_page(&state, "read.html", ctx)
        }
        Err(err) => render_catalog_error(&state, &err),
    }
}

/// A feedback form submission.
#[derive(Debug, Deserialize)]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub category: Option<String>,
    pub comment: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Feedback handler: assigns an id, logs the submission, and acknowledges.
pub async fn feedback(Json(submission): Json<FeedbackSubmission>) -> Response {
    let comment = submission.comment.trim();
    if comment.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "status": "error",
                "message": "comment must not be empty"
            })),
        )
            .into_response();
    }

    let id = uuid::Uuid::new_v4();
    info!(
        "Feedback {} received at {} (category: {}, url: {}): {}",
        id,
        chrono::Utc::now().to_rfc3339(),
        submission.category.as_deref().unwrap_or("general"),
        submission.url.as_deref().unwrap_or("-"),
        comment
    );

    Json(serde_json::json!({ "status": "ok", "id": id })).into_response()
}

/// About page handler
pub async fn about(State(state): State<AppState>) -> Response {
    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("version", crate::VERSION);
    ctx.insert("catalog_url", state.catalog.base_url());
    ctx.insert("contact_url", &state.settings.general.contact_url);
    render_page(&state, "about.html", ctx)
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Robots.txt handler
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    let content = if state.is_public() {
        "User-agent: *\nAllow: /\nDisallow: /search\n"
    } else {
        "User-agent: *\nDisallow: /\n"
    };
    ([(axum::http::header::CONTENT_TYPE, "text/plain")], content)
}

/// Favicon handler
pub async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

fn render_page(state: &AppState, template: &str, ctx: Context) -> Response {
    match state.templates.render_with_context(template, &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!("Template error: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

fn render_error(state: &AppState, status: StatusCode, message: &str) -> Response {
    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("status", &status.as_u16());
    ctx.insert("message", message);

    match state.templates.render_with_context("error.html", &ctx) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!("Template error: {}", err);
            (status, message.to_string()).into_response()
        }
    }
}

fn render_catalog_error(state: &AppState, err: &CatalogError) -> Response {
    if err.is_not_found() {
        return render_error(state, StatusCode::NOT_FOUND, "Record not found");
    }
    error!("Catalog request failed: {}", err);
    render_error(
        state,
        StatusCode::BAD_GATEWAY,
        "The catalog is not responding. Try again in a moment.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_bar_field_wraps_the_typed_text() {
        let params = RawSearchParams {
            query: Some("last, first".to_string()),
            field: Some("author".to_string()),
            ..Default::default()
        };

        assert_eq!(params.api_query().query, "author:last, first");
    }

    #[test]
    fn test_unknown_field_leaves_query_untouched() {
        let params = RawSearchParams {
            query: Some("keyword:cats".to_string()),
            field: Some("shelf".to_string()),
            ..Default::default()
        };

        assert_eq!(params.api_query().query, "keyword:cats");
    }

    #[test]
    fn test_unparseable_numbers_drop_to_defaults() {
        let params = RawSearchParams {
            query: Some("keyword:cats".to_string()),
            page: Some("two".to_string()),
            size: Some("-5".to_string()),
            ..Default::default()
        };

        let api = params.api_query();
        assert_eq!(api.page, None);
        assert_eq!(api.size, None);
    }

    #[test]
    fn test_year_bounds_replace_existing_filters() {
        let params = RawSearchParams {
            start_year: Some("1900".to_string()),
            end_year: Some("".to_string()),
            ..Default::default()
        };
        let mut search = SearchQuery::simple(SearchField::Keyword, "cats")
            .with_filter(Filter::new("startYear", 1800))
            .with_filter(Filter::new("endYear", 1950));

        params.apply_year_bounds(&mut search);

        let filters = search.effective_filters();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0], Filter::new("startYear", 1900));
    }
}
