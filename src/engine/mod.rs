//! Pipeline orchestration: trigger → guard → fetch → filter → preload →
//! commit.
//!
//! Every pipeline degrades softly: a fetch failure logs, clears the guard,
//! and mutates nothing. Nothing here retries and nothing surfaces an error
//! to the trigger source.

pub mod controller;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::client::ArticleSource;
use crate::config::Config;
use crate::domain::ArticleRecord;
use crate::feed::{FeedStore, StreamKind};
use crate::preload::ImagePreloader;

pub use controller::{spawn_controller, ContinuationController, ControllerHandle, FeedEvent};

pub struct FeedEngine {
    store: Arc<FeedStore>,
    source: Arc<dyn ArticleSource + Send + Sync>,
    preloader: Arc<dyn ImagePreloader>,
    batch_size: u32,
    related_limit: u32,
}

impl FeedEngine {
    pub fn new(
        store: Arc<FeedStore>,
        source: Arc<dyn ArticleSource + Send + Sync>,
        preloader: Arc<dyn ImagePreloader>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            source,
            preloader,
            batch_size: config.api.random_batch_size,
            related_limit: config.api.related_limit,
        }
    }

    pub fn store(&self) -> &Arc<FeedStore> {
        &self.store
    }

    /// One continuation of the main feed: append another random batch.
    /// Returns whether a batch was committed.
    pub async fn load_more(&self) -> bool {
        let Some(ticket) = self.store.begin_load(StreamKind::Main) else {
            debug!("Main feed already loading, continuation ignored");
            return false;
        };

        match self.source.random_batch(self.batch_size).await {
            Ok(candidates) => {
                let records = self.make_ready(candidates).await;
                let count = records.len();
                let committed = self.store.commit_append(ticket, records);
                if committed {
                    info!("Appended {} cards to the main feed", count);
                }
                committed
            }
            Err(e) => {
                warn!("Random batch fetch failed: {}", e);
                self.store.abort(ticket);
                false
            }
        }
    }

    /// Replace the search stream with results for `term`. A term that trims
    /// to nothing performs no request at all.
    pub async fn search(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return false;
        }

        let Some(ticket) = self.store.begin_load(StreamKind::Search) else {
            debug!("Search already loading, submit ignored");
            return false;
        };

        match self.source.search_batch(term).await {
            Ok(candidates) => {
                let records = self.make_ready(candidates).await;
                let count = records.len();
                let committed = self.store.commit_replace(ticket, records);
                if committed {
                    info!("Search '{}' produced {} cards", term, count);
                }
                committed
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", term, e);
                self.store.abort(ticket);
                false
            }
        }
    }

    /// Replace the related overlay with pages linked from `page_id`.
    pub async fn load_related(&self, page_id: i64) -> bool {
        let Some(ticket) = self.store.begin_load(StreamKind::Related) else {
            debug!("Related lookup already loading, selection ignored");
            return false;
        };

        match self.source.related_batch(page_id, self.related_limit).await {
            Ok(candidates) => {
                let records = self.make_ready(candidates).await;
                let count = records.len();
                let committed = self.store.commit_replace(ticket, records);
                if committed {
                    info!("Related lookup for page {} produced {} cards", page_id, count);
                }
                committed
            }
            Err(e) => {
                warn!("Related lookup for page {} failed: {}", page_id, e);
                self.store.abort(ticket);
                false
            }
        }
    }

    /// The overlay was dismissed: drop its records and invalidate any
    /// in-flight related fetch.
    pub fn dismiss_related(&self) {
        self.store.clear(StreamKind::Related);
    }

    /// Filter candidates to those with a thumbnail, then hold the batch
    /// until every thumbnail probe settled.
    async fn make_ready(&self, candidates: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
        let total = candidates.len();
        let kept: Vec<ArticleRecord> = candidates
            .into_iter()
            .filter(ArticleRecord::has_thumbnail)
            .collect();
        if kept.len() < total {
            debug!("Dropped {} candidates without thumbnails", total - kept.len());
        }

        let report = self.preloader.preload(&kept).await;
        if report.failed > 0 {
            debug!(
                "{} of {} thumbnail probes failed; keeping their cards",
                report.failed, report.probed
            );
        }

        kept
    }
}
