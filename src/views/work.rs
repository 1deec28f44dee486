//! Work, edition, and collection page view models

use serde::Serialize;

use crate::catalog::{Collection, Edition, Item, ItemLink, Work};
use crate::query::{ApiCollectionQuery, DEFAULT_PAGE, DEFAULT_PER_PAGE};

use super::search::{build_pagination, DownloadLink, Pagination, WorkCard};
use super::{agent_line, collection_url, format_label};

/// Work detail page model.
#[derive(Debug, Clone, Serialize)]
pub struct WorkView {
    pub uuid: String,
    pub title: String,
    pub sub_title: Option<String>,
    pub author_line: String,
    pub subjects: Vec<String>,
    pub languages: Vec<String>,
    pub editions: Vec<EditionRow>,
}

impl WorkView {
    pub fn from_work(work: &Work) -> WorkView {
        WorkView {
            uuid: work.uuid.clone(),
            title: work.title.clone(),
            sub_title: work.sub_title.clone(),
            author_line: agent_line(&work.authors),
            subjects: work
                .subjects
                .iter()
                .map(|s| s.heading.clone())
                .filter(|heading| !heading.is_empty())
                .collect(),
            languages: language_names(&work.languages),
            editions: work.editions.iter().map(EditionRow::from_edition).collect(),
        }
    }
}

/// One edition line on the work page.
#[derive(Debug, Clone, Serialize)]
pub struct EditionRow {
    pub id: i64,
    /// Edition detail page.
    pub url: String,
    pub year: Option<i32>,
    pub place: Option<String>,
    pub publisher_line: String,
    pub languages: Vec<String>,
    pub read_url: Option<String>,
    pub download: Option<DownloadLink>,
}

impl EditionRow {
    pub fn from_edition(edition: &Edition) -> EditionRow {
        EditionRow {
            id: edition.id,
            url: format!("/edition/{}", edition.id),
            year: edition.publication_year,
            place: edition.publication_place.clone(),
            publisher_line: agent_line(&edition.publishers),
            languages: language_names(&edition.languages),
            read_url: edition
                .read_link()
                .map(|link| format!("/read/{}", link.link_id)),
            download: edition.download_link().map(|link| DownloadLink {
                url: link.url.clone(),
                label: link
                    .media_type
                    .as_deref()
                    .map(format_label)
                    .unwrap_or_else(|| "Download".to_string()),
            }),
        }
    }
}

/// Edition detail page model: the full instance list with every link.
#[derive(Debug, Clone, Serialize)]
pub struct EditionView {
    pub id: i64,
    pub year: Option<i32>,
    pub place: Option<String>,
    pub publisher_line: String,
    pub languages: Vec<String>,
    pub instances: Vec<InstanceRow>,
}

impl EditionView {
    pub fn from_edition(edition: &Edition) -> EditionView {
        EditionView {
            id: edition.id,
            year: edition.publication_year,
            place: edition.publication_place.clone(),
            publisher_line: agent_line(&edition.publishers),
            languages: language_names(&edition.languages),
            instances: edition.items.iter().map(InstanceRow::from_item).collect(),
        }
    }
}

/// One instance row with its action buttons.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceRow {
    pub source: Option<String>,
    pub links: Vec<LinkButton>,
}

impl InstanceRow {
    pub fn from_item(item: &Item) -> InstanceRow {
        InstanceRow {
            source: item.source.clone(),
            links: item.links.iter().filter_map(link_button).collect(),
        }
    }
}

/// One action button. Internal targets stay in the app shell, external
/// ones leave for the hosting source.
#[derive(Debug, Clone, Serialize)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
    pub external: bool,
}

fn link_button(link: &ItemLink) -> Option<LinkButton> {
    if link.is_readable() {
        return Some(LinkButton {
            label: "Read online".to_string(),
            url: format!("/read/{}", link.link_id),
            external: false,
        });
    }
    if link.flags.download {
        return Some(LinkButton {
            label: link
                .media_type
                .as_deref()
                .map(format_label)
                .unwrap_or_else(|| "Download".to_string()),
            url: link.url.clone(),
            external: true,
        });
    }
    if link.flags.catalog {
        return Some(LinkButton {
            label: "Catalog record".to_string(),
            url: link.url.clone(),
            external: true,
        });
    }
    // a link with no usable flag gets no button
    None
}

/// Collection page model.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub total: u64,
    pub works: Vec<WorkCard>,
    pub pagination: Pagination,
}

impl CollectionView {
    pub fn build(
        collection: &Collection,
        query: &ApiCollectionQuery,
        page_window: u32,
    ) -> CollectionView {
        let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
        let current = query.page.unwrap_or(DEFAULT_PAGE);

        let total = if collection.total > 0 {
            collection.total
        } else {
            collection.items.len() as u64
        };
        let total_pages = collection
            .paging
            .as_ref()
            .and_then(|p| p.total_pages)
            .unwrap_or_else(|| (total.div_ceil(per_page as u64)).max(1) as u32);

        let pagination = build_pagination(current, total_pages, page_window, |page| {
            let mut next = query.clone();
            next.page = Some(page);
            collection_url(&collection.id, &next)
        });

        CollectionView {
            id: collection.id.clone(),
            title: collection.title.clone(),
            description: collection.description.clone(),
            total,
            works: collection.items.iter().map(WorkCard::from_work).collect(),
            pagination,
        }
    }
}

/// Featured collection card on the home page.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionCard {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub total: u64,
}

impl CollectionCard {
    pub fn from_collection(collection: &Collection) -> CollectionCard {
        CollectionCard {
            id: collection.id.clone(),
            title: collection.title.clone(),
            description: collection.description.clone(),
            url: format!("/collection/{}", collection.id),
            total: if collection.total > 0 {
                collection.total
            } else {
                collection.items.len() as u64
            },
        }
    }
}

fn language_names(languages: &[crate::catalog::Language]) -> Vec<String> {
    languages
        .iter()
        .map(|l| l.language.clone())
        .filter(|name| !name.is_empty())
        .collect()
}
