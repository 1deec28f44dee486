//! Search results page view model

use serde::Serialize;

use crate::catalog::{Facets, SearchResponse, Work};
use crate::config::SearchSettings;
use crate::query::{
    self, filter_fields, to_location_query, Filter, SearchField, SearchQuery, Sort,
};

use super::{agent_line, format_label, search_url, year_span};

/// Sort orderings offered by the widget, label first.
const SORT_CHOICES: [(&str, &str, &str); 5] = [
    ("Relevance", "relevance", "DESC"),
    ("Title A-Z", "title", "ASC"),
    ("Title Z-A", "title", "DESC"),
    ("Year (oldest first)", "date", "ASC"),
    ("Year (newest first)", "date", "DESC"),
];

/// Everything the search results page needs to render.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    /// Text of the first clause, shown in the search bar.
    pub query_text: String,
    /// Field dropdown for the search bar.
    pub fields: Vec<FieldOption>,
    pub total: u64,
    pub works: Vec<WorkCard>,
    pub facets: Vec<FacetGroup>,
    pub chips: Vec<FilterChip>,
    /// Current year-range bounds, feeding the filter form inputs.
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    /// Hidden inputs for the year form, carrying the rest of the state.
    /// Pagination is dropped so a new bound starts from page one.
    pub hidden_params: Vec<HiddenParam>,
    pub pagination: Pagination,
    pub sort_options: Vec<SortOption>,
    pub per_page_options: Vec<PerPageOption>,
    pub show_all: bool,
    pub show_all_url: String,
}

impl SearchView {
    /// Assemble the page model from the parsed search state and the
    /// catalog's response.
    pub fn build(
        query: &SearchQuery,
        response: &SearchResponse,
        settings: &SearchSettings,
    ) -> SearchView {
        let first_clause = query.queries.first();
        let current_field = first_clause.map(|c| c.field).unwrap_or(SearchField::Keyword);

        let per_page = query.effective_per_page().max(1);
        let total_pages = response
            .paging
            .as_ref()
            .and_then(|p| p.total_pages)
            .unwrap_or_else(|| (response.total.div_ceil(per_page as u64)).max(1) as u32);

        let pagination = build_pagination(
            query.effective_page(),
            total_pages,
            settings.page_window,
            |page| search_url(&query.clone().with_page(page)),
        );

        SearchView {
            query_text: first_clause.map(|c| c.query.clone()).unwrap_or_default(),
            fields: field_options(current_field),
            total: response.total,
            works: response.works.iter().map(WorkCard::from_work).collect(),
            facets: build_facets(query, response.facets.as_ref()),
            chips: build_chips(query),
            start_year: year_bound(query, filter_fields::START_YEAR),
            end_year: year_bound(query, filter_fields::END_YEAR),
            hidden_params: hidden_params(query),
            pagination,
            sort_options: build_sort_options(query),
            per_page_options: build_per_page_options(query, settings),
            show_all: query.effective_show_all(),
            show_all_url: search_url(
                &query.clone().with_show_all(!query.effective_show_all()),
            ),
        }
    }
}

/// One entry of the search-bar field dropdown.
#[derive(Debug, Clone, Serialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Field dropdown entries with the given selection marked.
pub fn field_options(current: SearchField) -> Vec<FieldOption> {
    SearchField::ALL
        .iter()
        .map(|field| FieldOption {
            value: field.as_str(),
            label: field.label(),
            selected: *field == current,
        })
        .collect()
}

/// A hidden form input carrying search state the form does not edit.
#[derive(Debug, Clone, Serialize)]
pub struct HiddenParam {
    pub name: String,
    pub value: String,
}

fn hidden_params(search: &SearchQuery) -> Vec<HiddenParam> {
    let flat = match query::to_api_query(search) {
        Ok(flat) => flat,
        Err(_) => return Vec::new(),
    };

    let mut params = to_location_query(&flat);
    params.remove("page");
    params
        .into_iter()
        .map(|(name, value)| HiddenParam { name, value })
        .collect()
}

/// One result card.
#[derive(Debug, Clone, Serialize)]
pub struct WorkCard {
    pub uuid: String,
    pub title: String,
    pub sub_title: Option<String>,
    /// Work detail page.
    pub url: String,
    pub author_line: String,
    pub year_span: Option<String>,
    pub edition_count: u32,
    /// Read-online page for the best available link.
    pub read_url: Option<String>,
    /// Direct download, when any edition carries one.
    pub download: Option<DownloadLink>,
}

/// A download target with its display label.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadLink {
    pub url: String,
    pub label: String,
}

impl WorkCard {
    pub fn from_work(work: &Work) -> WorkCard {
        let read_url = work
            .reading_edition()
            .and_then(|edition| edition.read_link())
            .map(|link| format!("/read/{}", link.link_id));

        let download = work
            .editions
            .iter()
            .find_map(|edition| edition.download_link())
            .map(|link| DownloadLink {
                url: link.url.clone(),
                label: link
                    .media_type
                    .as_deref()
                    .map(format_label)
                    .unwrap_or_else(|| "Download".to_string()),
            });

        WorkCard {
            uuid: work.uuid.clone(),
            title: work.title.clone(),
            sub_title: work.sub_title.clone(),
            url: format!("/work/{}", work.uuid),
            author_line: agent_line(&work.authors),
            year_span: year_span(work.date_first, work.date_last),
            edition_count: work
                .edition_count
                .unwrap_or(work.editions.len() as u32),
            read_url,
            download,
        }
    }
}

/// One facet widget (language, format).
#[derive(Debug, Clone, Serialize)]
pub struct FacetGroup {
    pub field: String,
    pub title: String,
    pub options: Vec<FacetOption>,
}

/// One checkbox row of a facet widget. The URL toggles the constraint.
#[derive(Debug, Clone, Serialize)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
    pub count: u64,
    pub checked: bool,
    pub url: String,
}

fn build_facets(query: &SearchQuery, facets: Option<&Facets>) -> Vec<FacetGroup> {
    let facets = match facets {
        Some(facets) => facets,
        None => return Vec::new(),
    };

    let groups = [
        (filter_fields::LANGUAGE, "Language", &facets.languages),
        (filter_fields::FORMAT, "Format", &facets.formats),
    ];

    groups
        .into_iter()
        .filter(|(_, _, counts)| !counts.is_empty())
        .map(|(field, title, counts)| FacetGroup {
            field: field.to_string(),
            title: title.to_string(),
            options: counts
                .iter()
                .map(|bucket| {
                    let filter = Filter::new(field, bucket.value.as_str());
                    let checked = query.has_filter(&filter);
                    let toggled = if checked {
                        query.clone().without_filter(&filter)
                    } else {
                        query.clone().with_filter(filter)
                    };
                    FacetOption {
                        value: bucket.value.clone(),
                        label: if field == filter_fields::FORMAT {
                            format_label(&bucket.value)
                        } else {
                            bucket.value.clone()
                        },
                        count: bucket.count,
                        checked,
                        url: search_url(&toggled),
                    }
                })
                .collect(),
        })
        .collect()
}

/// An applied filter shown above the results, with its removal link.
#[derive(Debug, Clone, Serialize)]
pub struct FilterChip {
    pub label: String,
    pub remove_url: String,
}

fn build_chips(query: &SearchQuery) -> Vec<FilterChip> {
    query
        .effective_filters()
        .iter()
        .map(|filter| FilterChip {
            label: chip_label(filter),
            remove_url: search_url(&query.clone().without_filter(filter)),
        })
        .collect()
}

fn chip_label(filter: &Filter) -> String {
    let value = filter.value.to_string();
    match filter.field.as_str() {
        filter_fields::LANGUAGE => value,
        filter_fields::FORMAT => format_label(&value),
        filter_fields::START_YEAR => format!("From {}", value),
        filter_fields::END_YEAR => format!("To {}", value),
        filter_fields::GOV_DOC => "Government documents".to_string(),
        field => format!("{}: {}", field, value),
    }
}

fn year_bound(query: &SearchQuery, field: &str) -> Option<String> {
    query
        .effective_filters()
        .iter()
        .find(|f| f.field == field)
        .map(|f| f.value.to_string())
}

/// Pagination widget model.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub pages: Vec<PageLink>,
}

/// One numbered page link.
#[derive(Debug, Clone, Serialize)]
pub struct PageLink {
    pub number: u32,
    pub url: String,
    pub current: bool,
}

/// Build a pagination widget: a window of numbered links centered on the
/// current page, clamped to the valid range.
pub fn build_pagination(
    current: u32,
    total_pages: u32,
    window: u32,
    link: impl Fn(u32) -> String,
) -> Pagination {
    let total_pages = total_pages.max(1);
    let current = current.clamp(1, total_pages);
    let window = window.max(1).min(total_pages);

    let mut start = current.saturating_sub(window / 2).max(1);
    let end = (start + window - 1).min(total_pages);
    start = end.saturating_sub(window - 1).max(1);

    Pagination {
        current,
        total_pages,
        prev: (current > 1).then(|| link(current - 1)),
        next: (current < total_pages).then(|| link(current + 1)),
        pages: (start..=end)
            .map(|number| PageLink {
                number,
                url: link(number),
                current: number == current,
            })
            .collect(),
    }
}

/// One entry of the sort widget.
#[derive(Debug, Clone, Serialize)]
pub struct SortOption {
    pub label: &'static str,
    pub url: String,
    pub selected: bool,
}

fn build_sort_options(query: &SearchQuery) -> Vec<SortOption> {
    let current = query.effective_sort();
    SORT_CHOICES
        .iter()
        .map(|&(label, field, dir)| {
            let sort = Sort::new(field, dir);
            SortOption {
                label,
                url: search_url(&query.clone().with_sort(sort.clone())),
                selected: sort == current,
            }
        })
        .collect()
}

/// One entry of the per-page widget.
#[derive(Debug, Clone, Serialize)]
pub struct PerPageOption {
    pub size: u32,
    pub url: String,
    pub selected: bool,
}

fn build_per_page_options(query: &SearchQuery, settings: &SearchSettings) -> Vec<PerPageOption> {
    let current = query.effective_per_page();
    settings
        .per_page_options
        .iter()
        .map(|&size| PerPageOption {
            size,
            url: search_url(&query.clone().with_per_page(size)),
            selected: size == current,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_response() -> SearchResponse {
        serde_json::from_value(serde_json::json!({
            "total": 95,
            "paging": { "currentPage": 5, "totalPages": 10 },
            "facets": {
                "languages": [
                    { "value": "English", "count": 80 },
                    { "value": "Spanish", "count": 15 }
                ],
                "formats": [
                    { "value": "application/pdf", "count": 40 }
                ]
            },
            "works": [{
                "uuid": "w-1",
                "title": "A History of Cats",
                "authors": [{ "name": "Author, Main", "primary": true }],
                "dateFirst": 1854,
                "dateLast": 1901,
                "editionCount": 3,
                "editions": [{
                    "id": 11,
                    "items": [{
                        "links": [
                            { "linkId": 21, "url": "https://x/21", "flags": { "reader": true } },
                            { "linkId": 22, "url": "https://x/22.pdf",
                              "mediaType": "application/pdf", "flags": { "download": true } }
                        ]
                    }]
                }]
            }]
        }))
        .unwrap()
    }

    fn fixture_query() -> SearchQuery {
        SearchQuery {
            queries: vec![crate::query::Query::new(SearchField::Keyword, "cats")],
            page: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_work_card_picks_flagged_links() {
        let view = SearchView::build(
            &fixture_query(),
            &fixture_response(),
            &SearchSettings::default(),
        );

        let card = &view.works[0];
        assert_eq!(card.url, "/work/w-1");
        assert_eq!(card.author_line, "Author, Main");
        assert_eq!(card.year_span.as_deref(), Some("1854-1901"));
        assert_eq!(card.edition_count, 3);
        assert_eq!(card.read_url.as_deref(), Some("/read/21"));
        let download = card.download.as_ref().unwrap();
        assert_eq!(download.url, "https://x/22.pdf");
        assert_eq!(download.label, "PDF");
    }

    #[test]
    fn test_facet_urls_toggle_the_constraint() {
        let query = fixture_query().with_filter(Filter::new("language", "English"));
        let view = SearchView::build(&query, &fixture_response(), &SearchSettings::default());

        let languages = &view.facets[0];
        assert_eq!(languages.field, "language");

        let english = &languages.options[0];
        assert!(english.checked);
        // removing the only filter leaves just the query
        assert_eq!(english.url, "/search?query=keyword%3Acats");

        let spanish = &languages.options[1];
        assert!(!spanish.checked);
        assert!(spanish.url.contains("language%3ASpanish"));
    }

    #[test]
    fn test_chip_removal_preserves_other_filters() {
        let query = fixture_query()
            .with_filter(Filter::new("language", "English"))
            .with_filter(Filter::new("startYear", 1800));
        let view = SearchView::build(&query, &fixture_response(), &SearchSettings::default());

        assert_eq!(view.chips.len(), 2);
        assert_eq!(view.chips[1].label, "From 1800");
        assert!(view.chips[1].remove_url.contains("language%3AEnglish"));
        assert!(!view.chips[1].remove_url.contains("startYear"));
        assert_eq!(view.start_year.as_deref(), Some("1800"));
    }

    #[test]
    fn test_pagination_window_centers_on_current() {
        let pagination = build_pagination(5, 10, 5, |n| format!("p{}", n));

        let numbers: Vec<u32> = pagination.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![3, 4, 5, 6, 7]);
        assert_eq!(pagination.prev.as_deref(), Some("p4"));
        assert_eq!(pagination.next.as_deref(), Some("p6"));
        assert!(pagination.pages[2].current);
    }

    #[test]
    fn test_pagination_window_clamps_at_edges() {
        let first = build_pagination(1, 10, 5, |n| n.to_string());
        assert_eq!(
            first.pages.iter().map(|p| p.number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert!(first.prev.is_none());

        let last = build_pagination(10, 10, 5, |n| n.to_string());
        assert_eq!(
            last.pages.iter().map(|p| p.number).collect::<Vec<_>>(),
            vec![6, 7, 8, 9, 10]
        );
        assert!(last.next.is_none());

        let short = build_pagination(1, 2, 5, |n| n.to_string());
        assert_eq!(
            short.pages.iter().map(|p| p.number).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_default_sort_is_selected_without_url_param() {
        let view = SearchView::build(
            &fixture_query(),
            &fixture_response(),
            &SearchSettings::default(),
        );

        let relevance = &view.sort_options[0];
        assert_eq!(relevance.label, "Relevance");
        assert!(relevance.selected);
        // choosing a sort resets pagination
        let by_title = &view.sort_options[1];
        assert!(!by_title.selected);
        assert!(by_title.url.contains("sort=title%3AASC"));
        assert!(!by_title.url.contains("page="));
    }

    #[test]
    fn test_total_pages_computed_when_paging_absent() {
        let mut response = fixture_response();
        response.paging = None;
        response.total = 21;

        let view = SearchView::build(
            &fixture_query().with_page(1),
            &response,
            &SearchSettings::default(),
        );

        // 21 results at 10 per page
        assert_eq!(view.pagination.total_pages, 3);
    }

    #[test]
    fn test_hidden_params_drop_the_page() {
        let view = SearchView::build(
            &fixture_query(),
            &fixture_response(),
            &SearchSettings::default(),
        );

        let names: Vec<&str> = view.hidden_params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["query"]);
    }

    #[test]
    fn test_facets_absent_renders_no_groups() {
        let response = SearchResponse {
            total: 0,
            ..Default::default()
        };
        let view = SearchView::build(
            &fixture_query(),
            &response,
            &SearchSettings::default(),
        );

        assert!(view.facets.is_empty());
    }
}
