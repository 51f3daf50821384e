use serde::{Deserialize, Serialize};

/// A bounded thumbnail rendition of a page's lead image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// One card in a feed stream: a page with its intro extract and thumbnail.
///
/// Freshly mapped API pages are *candidates*; only candidates that carry a
/// thumbnail survive filtering and get committed to a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub page_id: i64,
    pub title: String,
    pub extract: String,
    pub thumbnail: Option<Thumbnail>,
}

impl ArticleRecord {
    pub fn new(page_id: i64, title: impl Into<String>) -> Self {
        Self {
            page_id,
            title: title.into(),
            extract: String::new(),
            thumbnail: None,
        }
    }

    /// Whether this record is eligible for commit: thumbnail present with a
    /// non-empty URL.
    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail
            .as_ref()
            .map(|t| !t.source.is_empty())
            .unwrap_or(false)
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}
