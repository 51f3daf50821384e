//! Thumbnail readiness gating.
//!
//! A batch is only handed to the store once every thumbnail probe has
//! settled, so no committed card ever renders with its image still in
//! flight. Settle-all: a failed probe is logged and its record stays in the
//! batch.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future;
use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::app::{MeanderError, Result};
use crate::config::Config;
use crate::domain::ArticleRecord;

/// Outcome of one settle-all pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreloadReport {
    pub probed: usize,
    pub failed: usize,
}

#[async_trait]
pub trait ImagePreloader: Send + Sync {
    /// Probe every record's thumbnail and return once all probes settled.
    async fn preload(&self, records: &[ArticleRecord]) -> PreloadReport;
}

/// Probes thumbnails over HTTP and verifies the bytes decode as an image.
pub struct HttpImagePreloader {
    client: Client,
    semaphore: Arc<Semaphore>,
}

impl HttpImagePreloader {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.preload.timeout_secs))
            .user_agent(config.api.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            semaphore: Arc::new(Semaphore::new(config.preload.workers.max(1))),
        })
    }

    async fn probe(&self, url: &str) -> Result<()> {
        let _permit = self.semaphore.acquire().await.expect("Semaphore closed");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MeanderError::ImageLoad {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let bytes = response.bytes().await.map_err(|e| MeanderError::ImageLoad {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        decode_check(url, &bytes)
    }
}

/// Verify that probe bytes decode as an image.
fn decode_check(url: &str, bytes: &[u8]) -> Result<()> {
    image::load_from_memory(bytes).map_err(|e| MeanderError::ImageLoad {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

#[async_trait]
impl ImagePreloader for HttpImagePreloader {
    async fn preload(&self, records: &[ArticleRecord]) -> PreloadReport {
        let probes = records
            .iter()
            .filter_map(|r| r.thumbnail.as_ref())
            .filter(|t| !t.source.is_empty())
            .map(|t| async move {
                match self.probe(&t.source).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Thumbnail preload failed: {}", e);
                        false
                    }
                }
            });

        let settled = future::join_all(probes).await;

        PreloadReport {
            probed: settled.len(),
            failed: settled.iter().filter(|ok| !**ok).count(),
        }
    }
}
