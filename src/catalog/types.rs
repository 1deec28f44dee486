//! Catalog API response shapes
//!
//! Serde DTOs for the JSON the catalog returns. The catalog is a black box;
//! these are data shapes only, and every field beyond the identifiers is
//! optional or defaulted so a sparse record deserializes instead of failing
//! the whole page. Wire names are camelCase.

use serde::{Deserialize, Serialize};

/// Envelope of a `/search` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub works: Vec<Work>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,
}

/// A bibliographic work: the top of the record hierarchy, grouping the
/// editions that realize it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub uuid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    #[serde(default)]
    pub authors: Vec<Agent>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub editions: Vec<Edition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_first: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_last: Option<i32>,
}

impl Work {
    /// First edition carrying a read-online link, searched in API order.
    pub fn reading_edition(&self) -> Option<&Edition> {
        self.editions.iter().find(|e| e.read_link().is_some())
    }
}

/// A person or body attached to a record (author, publisher).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viaf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcnaf: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

/// A subject heading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(default)]
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
}

/// A language attached to a work or edition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    #[serde(default)]
    pub language: String,
}

/// One edition of a work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_place: Option<String>,
    #[serde(default)]
    pub publishers: Vec<Agent>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub links: Vec<ItemLink>,
}

impl Edition {
    /// First read-online link across this edition's items, in API order.
    pub fn read_link(&self) -> Option<&ItemLink> {
        self.items
            .iter()
            .flat_map(|item| item.links.iter())
            .find(|link| link.is_readable())
    }

    /// First downloadable link across this edition's items, in API order.
    pub fn download_link(&self) -> Option<&ItemLink> {
        self.items
            .iter()
            .flat_map(|item| item.links.iter())
            .find(|link| link.flags.download)
    }
}

/// One holdable instance of an edition, carrying the actual links.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub links: Vec<ItemLink>,
}

/// A link on an item, with the flags that say what it is good for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLink {
    pub link_id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub flags: LinkFlags,
}

impl ItemLink {
    /// Whether the link target can be read in the browser.
    pub fn is_readable(&self) -> bool {
        self.flags.reader || self.flags.embed
    }
}

/// What an item link points at. Everything defaults to off, so a link with
/// no flags is inert rather than misclassified.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFlags {
    #[serde(default)]
    pub reader: bool,
    #[serde(default)]
    pub embed: bool,
    #[serde(default)]
    pub download: bool,
    #[serde(default)]
    pub catalog: bool,
}

/// Facet buckets the catalog computed for a result set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    #[serde(default)]
    pub formats: Vec<FacetCount>,
    #[serde(default)]
    pub languages: Vec<FacetCount>,
}

/// One facet bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCount {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub count: u64,
}

/// Paging block the catalog attaches to list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_per_page: Option<u32>,
}

/// A curated collection of works.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<Work>,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

/// Envelope of the `/collections` listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionList {
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

/// Envelope of the `/languages` listing backing the language widget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageList {
    #[serde(default)]
    pub languages: Vec<FacetCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_work_deserializes() {
        let work: Work = serde_json::from_value(serde_json::json!({
            "uuid": "0a1b2c",
            "title": "A History of Cats"
        }))
        .unwrap();

        assert_eq!(work.uuid, "0a1b2c");
        assert_eq!(work.title, "A History of Cats");
        assert!(work.authors.is_empty());
        assert!(work.editions.is_empty());
        assert_eq!(work.edition_count, None);
    }

    #[test]
    fn test_search_response_wire_names_are_camel_case() {
        let response: SearchResponse = serde_json::from_value(serde_json::json!({
            "total": 42,
            "paging": { "currentPage": 2, "totalPages": 5, "recordsPerPage": 10 },
            "facets": { "formats": [{ "value": "epub", "count": 12 }] },
            "works": []
        }))
        .unwrap();

        assert_eq!(response.total, 42);
        let paging = response.paging.unwrap();
        assert_eq!(paging.current_page, Some(2));
        assert_eq!(paging.records_per_page, Some(10));
        let facets = response.facets.unwrap();
        assert_eq!(facets.formats[0].value, "epub");
        assert_eq!(facets.formats[0].count, 12);
    }

    #[test]
    fn test_link_selection_walks_items_in_order() {
        let edition: Edition = serde_json::from_value(serde_json::json!({
            "id": 9,
            "items": [
                {
                    "source": "gutenberg",
                    "links": [
                        { "linkId": 1, "url": "https://x/1.pdf", "flags": { "download": true } }
                    ]
                },
                {
                    "source": "hathitrust",
                    "links": [
                        { "linkId": 2, "url": "https://x/2", "flags": { "reader": true } },
                        { "linkId": 3, "url": "https://x/3", "flags": { "download": true } }
                    ]
                }
            ]
        }))
        .unwrap();

        assert_eq!(edition.read_link().map(|l| l.link_id), Some(2));
        assert_eq!(edition.download_link().map(|l| l.link_id), Some(1));
    }

    #[test]
    fn test_unflagged_link_is_inert() {
        let link: ItemLink = serde_json::from_value(serde_json::json!({
            "linkId": 7,
            "url": "https://x/7"
        }))
        .unwrap();

        assert!(!link.is_readable());
        assert!(!link.flags.download);
    }
}
