//! Wire format of the MediaWiki query API.
//!
//! The consumed envelope is `{ query: { pages: { <id>: Page } } }` for
//! generator and by-id queries, or `{ query: { search: [ {pageid, ..} ] } }`
//! for the search index phase. Field mapping into candidates is permissive:
//! an absent field becomes an empty/absent value, never an error. A missing
//! envelope shape is a [`MalformedResponse`](crate::app::MeanderError)
//! failure.

use std::collections::HashMap;

use serde::Deserialize;

use crate::app::{MeanderError, Result};
use crate::domain::{ArticleRecord, Thumbnail};

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Option<HashMap<String, RawPage>>,
    #[serde(default)]
    search: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pageid: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    thumbnail: Option<RawThumbnail>,
    /// Generator order of this page within the response. The `pages` member
    /// is a JSON object, so this is the only ordering the API provides.
    #[serde(default)]
    index: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    #[serde(default)]
    source: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

/// One hit from the search index phase.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub pageid: i64,
    #[serde(default)]
    pub title: String,
}

impl RawPage {
    fn into_candidate(self) -> ArticleRecord {
        ArticleRecord {
            page_id: self.pageid,
            title: self.title,
            extract: self.extract,
            thumbnail: self.thumbnail.map(|t| Thumbnail {
                source: t.source,
                width: t.width,
                height: t.height,
            }),
        }
    }
}

impl ApiEnvelope {
    /// Unpack a generator response into candidates, in generator order.
    pub fn into_candidates(self) -> Result<Vec<ArticleRecord>> {
        let pages = self
            .query
            .and_then(|q| q.pages)
            .ok_or_else(|| MeanderError::MalformedResponse("missing query.pages".into()))?;

        let mut raw: Vec<RawPage> = pages.into_values().collect();
        raw.sort_by_key(|p| (p.index.unwrap_or(i64::MAX), p.pageid));

        Ok(raw.into_iter().map(RawPage::into_candidate).collect())
    }

    /// Unpack a search index response, preserving ranking order.
    pub fn into_search_hits(self) -> Result<Vec<SearchHit>> {
        self.query
            .and_then(|q| q.search)
            .ok_or_else(|| MeanderError::MalformedResponse("missing query.search".into()))
    }

    /// Unpack a by-id hydration response for the given page.
    pub fn into_page(self, page_id: i64) -> Result<ArticleRecord> {
        let mut pages = self
            .query
            .and_then(|q| q.pages)
            .ok_or_else(|| MeanderError::MalformedResponse("missing query.pages".into()))?;

        let raw = pages.remove(&page_id.to_string()).ok_or_else(|| {
            MeanderError::MalformedResponse(format!("page {} missing from response", page_id))
        })?;

        Ok(raw.into_candidate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ApiEnvelope {
        serde_json::from_str(json).expect("sample payload should parse")
    }

    const GENERATOR_SAMPLE: &str = r#"{
        "batchcomplete": "",
        "query": {
            "pages": {
                "300": {
                    "pageid": 300,
                    "ns": 0,
                    "title": "Basalt",
                    "index": 2,
                    "extract": "Basalt is a volcanic rock.",
                    "thumbnail": {
                        "source": "https://upload.wikimedia.org/basalt.jpg",
                        "width": 400,
                        "height": 267
                    }
                },
                "100": {
                    "pageid": 100,
                    "ns": 0,
                    "title": "Granite",
                    "index": 1,
                    "extract": "Granite is an igneous rock."
                },
                "200": {
                    "pageid": 200,
                    "ns": 0,
                    "title": "Obsidian",
                    "index": 3
                }
            }
        }
    }"#;

    #[test]
    fn test_candidates_follow_generator_order() {
        let candidates = parse(GENERATOR_SAMPLE).into_candidates().unwrap();
        let titles: Vec<_> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Granite", "Basalt", "Obsidian"]);
    }

    #[test]
    fn test_mapping_is_permissive() {
        let candidates = parse(GENERATOR_SAMPLE).into_candidates().unwrap();

        // Granite has no thumbnail, Obsidian no extract; neither is an error.
        assert!(candidates[0].thumbnail.is_none());
        assert_eq!(candidates[2].extract, "");
        assert!(candidates[1].has_thumbnail());
        assert_eq!(candidates[1].thumbnail.as_ref().unwrap().width, 400);
    }

    #[test]
    fn test_missing_pages_is_malformed() {
        let result = parse(r#"{"batchcomplete": ""}"#).into_candidates();
        assert!(matches!(result, Err(MeanderError::MalformedResponse(_))));
    }

    #[test]
    fn test_search_hits_preserve_ranking() {
        let envelope = parse(
            r#"{
            "query": {
                "search": [
                    {"pageid": 9, "title": "Plate tectonics", "wordcount": 9000},
                    {"pageid": 4, "title": "Subduction"},
                    {"pageid": 7, "title": "Pangaea"}
                ]
            }
        }"#,
        );
        let hits = envelope.into_search_hits().unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.pageid).collect();
        assert_eq!(ids, vec![9, 4, 7]);
    }

    #[test]
    fn test_search_shape_missing_is_malformed() {
        let result = parse(r#"{"query": {}}"#).into_search_hits();
        assert!(matches!(result, Err(MeanderError::MalformedResponse(_))));
    }

    #[test]
    fn test_into_page_by_id() {
        let envelope = parse(
            r#"{
            "query": {
                "pages": {
                    "55": {
                        "pageid": 55,
                        "title": "Rift valley",
                        "extract": "A rift valley is a lowland.",
                        "thumbnail": {"source": "https://upload.wikimedia.org/rift.jpg", "width": 400, "height": 300}
                    }
                }
            }
        }"#,
        );
        let record = envelope.into_page(55).unwrap();
        assert_eq!(record.page_id, 55);
        assert_eq!(record.title, "Rift valley");
        assert!(record.has_thumbnail());
    }

    #[test]
    fn test_into_page_missing_id_is_malformed() {
        let envelope = parse(r#"{"query": {"pages": {"55": {"pageid": 55, "title": "Rift valley"}}}}"#);
        assert!(matches!(
            envelope.into_page(56),
            Err(MeanderError::MalformedResponse(_))
        ));
    }
}
