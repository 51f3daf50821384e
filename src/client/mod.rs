pub mod http;
pub mod response;

use async_trait::async_trait;
use futures::future;

use crate::app::Result;
use crate::domain::ArticleRecord;

pub use http::WikiClient;

/// The three query shapes of the encyclopedia API, plus the by-id hydration
/// they are built from. Implementations return unfiltered candidates: pages
/// lacking a thumbnail or extract are kept and filtered downstream.
#[async_trait]
pub trait ArticleSource {
    /// One batch from the random-page generator, intro extract and
    /// thumbnail included in a single round trip.
    async fn random_batch(&self, count: u32) -> Result<Vec<ArticleRecord>>;

    /// Full-text search: index lookup, then per-hit hydration. The result
    /// preserves index ranking order; hits whose hydration fails are
    /// excluded, not retried.
    async fn search_batch(&self, term: &str) -> Result<Vec<ArticleRecord>>;

    /// Hydrate a single page by id.
    async fn full_article(&self, page_id: i64) -> Result<ArticleRecord>;

    /// Pages linked from the given page (depth 1), capped at `limit`.
    async fn related_batch(&self, page_id: i64, limit: u32) -> Result<Vec<ArticleRecord>>;
}

/// Hydrate `ids` concurrently while preserving their order.
///
/// A failed hydration drops that id from the result and logs it; it never
/// fails the batch.
pub async fn hydrate_ordered<S>(source: &S, ids: &[i64]) -> Vec<ArticleRecord>
where
    S: ArticleSource + ?Sized + Sync,
{
    let results = future::join_all(ids.iter().map(|id| source.full_article(*id))).await;

    results
        .into_iter()
        .zip(ids)
        .filter_map(|(result, id)| match result {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Hydration of page {} failed: {}", id, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::MeanderError;

    struct StubSource {
        failing_id: Option<i64>,
    }

    #[async_trait]
    impl ArticleSource for StubSource {
        async fn random_batch(&self, _count: u32) -> Result<Vec<ArticleRecord>> {
            Ok(Vec::new())
        }

        async fn search_batch(&self, _term: &str) -> Result<Vec<ArticleRecord>> {
            Ok(Vec::new())
        }

        async fn full_article(&self, page_id: i64) -> Result<ArticleRecord> {
            if self.failing_id == Some(page_id) {
                return Err(MeanderError::MalformedResponse(format!(
                    "page {} missing from response",
                    page_id
                )));
            }
            Ok(ArticleRecord::new(page_id, format!("Page {}", page_id)))
        }

        async fn related_batch(&self, _page_id: i64, _limit: u32) -> Result<Vec<ArticleRecord>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_hydrate_preserves_order() {
        let source = StubSource { failing_id: None };
        let records = hydrate_ordered(&source, &[3, 1, 2]).await;
        let ids: Vec<_> = records.iter().map(|r| r.page_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_hydrate_excludes_failures() {
        let source = StubSource { failing_id: Some(1) };
        let records = hydrate_ordered(&source, &[3, 1, 2]).await;
        let ids: Vec<_> = records.iter().map(|r| r.page_id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_hydrate_empty_ids() {
        let source = StubSource { failing_id: None };
        let records = hydrate_ordered(&source, &[]).await;
        assert!(records.is_empty());
    }
}
