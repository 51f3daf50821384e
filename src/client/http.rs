use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Semaphore;
use url::Url;

use crate::app::Result;
use crate::client::response::ApiEnvelope;
use crate::client::{hydrate_ordered, ArticleSource};
use crate::config::ApiConfig;
use crate::domain::ArticleRecord;

/// reqwest-based [`ArticleSource`] against a MediaWiki `api.php` endpoint.
///
/// In-flight requests are bounded by a semaphore, so fan-out callers
/// (search hydration) never exceed the configured worker count.
pub struct WikiClient {
    client: Client,
    endpoint: Url,
    extract_chars: u32,
    thumb_size: u32,
    search_limit: u32,
    semaphore: Arc<Semaphore>,
}

impl WikiClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self> {
        let endpoint = Url::parse(&cfg.endpoint)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(cfg.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            endpoint,
            extract_chars: cfg.extract_chars,
            thumb_size: cfg.thumb_size,
            search_limit: cfg.search_limit,
            semaphore: Arc::new(Semaphore::new(cfg.workers.max(1))),
        })
    }

    async fn query(&self, params: &[(&str, String)]) -> Result<ApiEnvelope> {
        let _permit = self.semaphore.acquire().await.expect("Semaphore closed");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("action", "query"), ("format", "json"), ("origin", "*")])
            .query(params)
            .send()
            .await?;

        response.error_for_status_ref()?;

        Ok(response.json().await?)
    }

    /// Extract and thumbnail properties shared by all three query shapes:
    /// intro-only plain text under a character budget, bounded thumbnail.
    fn card_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("prop", "extracts|pageimages".into()),
            ("exintro", "1".into()),
            ("exchars", self.extract_chars.to_string()),
            ("explaintext", "1".into()),
            ("piprop", "thumbnail".into()),
            ("pithumbsize", self.thumb_size.to_string()),
        ]
    }
}

#[async_trait]
impl ArticleSource for WikiClient {
    async fn random_batch(&self, count: u32) -> Result<Vec<ArticleRecord>> {
        let mut params = self.card_params();
        params.push(("generator", "random".into()));
        params.push(("grnnamespace", "0".into()));
        params.push(("grnlimit", count.to_string()));
        params.push(("exlimit", "max".into()));

        self.query(&params).await?.into_candidates()
    }

    async fn search_batch(&self, term: &str) -> Result<Vec<ArticleRecord>> {
        let params = vec![
            ("list", "search".to_string()),
            ("srsearch", term.to_string()),
            ("srlimit", self.search_limit.to_string()),
        ];

        let hits = self.query(&params).await?.into_search_hits()?;
        let ids: Vec<i64> = hits.iter().map(|h| h.pageid).collect();
        tracing::debug!("Search '{}' matched {} pages", term, ids.len());

        Ok(hydrate_ordered(self, &ids).await)
    }

    async fn full_article(&self, page_id: i64) -> Result<ArticleRecord> {
        let mut params = self.card_params();
        params.push(("pageids", page_id.to_string()));

        self.query(&params).await?.into_page(page_id)
    }

    async fn related_batch(&self, page_id: i64, limit: u32) -> Result<Vec<ArticleRecord>> {
        let mut params = self.card_params();
        params.push(("generator", "links".into()));
        params.push(("gpllimit", limit.to_string()));
        params.push(("pageids", page_id.to_string()));
        params.push(("exlimit", "max".into()));

        self.query(&params).await?.into_candidates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_endpoint() {
        let cfg = ApiConfig {
            endpoint: "not a url".into(),
            ..ApiConfig::default()
        };
        assert!(WikiClient::new(&cfg).is_err());
    }

    #[test]
    fn test_builds_with_defaults() {
        assert!(WikiClient::new(&ApiConfig::default()).is_ok());
    }
}
