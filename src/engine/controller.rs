use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::FeedEngine;
use crate::feed::StreamKind;

/// Boundary triggers crossing into the core. The host environment decides
/// when to emit them; the controller decides whether they start a fetch.
#[derive(Debug)]
pub enum FeedEvent {
    /// Initial activation: load the first random batch.
    Activated,
    /// The viewport approached the end of the main feed.
    ProximityReached,
    /// A search term was submitted.
    SearchSubmitted(String),
    /// A card was selected for the related overlay.
    RelatedSelected(i64),
    /// The related overlay was dismissed.
    RelatedDismissed,
    /// Stop the controller loop.
    Shutdown,
}

/// Handle to send boundary events to the controller.
#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::Sender<FeedEvent>,
}

impl ControllerHandle {
    pub async fn send(&self, event: FeedEvent) {
        if let Err(e) = self.tx.send(event).await {
            warn!("Feed controller is gone, dropping event: {}", e);
        }
    }

    pub async fn activated(&self) {
        self.send(FeedEvent::Activated).await;
    }

    pub async fn proximity_reached(&self) {
        self.send(FeedEvent::ProximityReached).await;
    }

    pub async fn search_submitted(&self, term: impl Into<String>) {
        self.send(FeedEvent::SearchSubmitted(term.into())).await;
    }

    pub async fn related_selected(&self, page_id: i64) {
        self.send(FeedEvent::RelatedSelected(page_id)).await;
    }

    pub async fn related_dismissed(&self) {
        self.send(FeedEvent::RelatedDismissed).await;
    }

    pub async fn shutdown(&self) {
        self.send(FeedEvent::Shutdown).await;
    }
}

/// Consumes boundary events and dispatches fetch pipelines. Continuation
/// rule: a proximity signal fires a continuation iff the main stream is not
/// currently loading; while it is, the signal is dropped on the floor.
pub struct ContinuationController {
    engine: Arc<FeedEngine>,
    rx: mpsc::Receiver<FeedEvent>,
}

impl ContinuationController {
    pub fn new(engine: Arc<FeedEngine>) -> (Self, ControllerHandle) {
        let (tx, rx) = mpsc::channel(32);
        (Self { engine, rx }, ControllerHandle { tx })
    }

    /// Run the controller loop until shutdown or all handles are dropped.
    ///
    /// Fetches are spawned so the loop keeps consuming events while one is
    /// in flight; the per-stream guards make overlapping dispatches for the
    /// same stream harmless.
    pub async fn run(mut self) {
        info!("Feed controller started");

        while let Some(event) = self.rx.recv().await {
            match event {
                FeedEvent::Activated | FeedEvent::ProximityReached => {
                    if self.engine.store().is_loading(StreamKind::Main) {
                        debug!("Proximity signal while main feed loading, ignored");
                        continue;
                    }
                    let engine = self.engine.clone();
                    tokio::spawn(async move {
                        engine.load_more().await;
                    });
                }
                FeedEvent::SearchSubmitted(term) => {
                    let engine = self.engine.clone();
                    tokio::spawn(async move {
                        engine.search(&term).await;
                    });
                }
                FeedEvent::RelatedSelected(page_id) => {
                    let engine = self.engine.clone();
                    tokio::spawn(async move {
                        engine.load_related(page_id).await;
                    });
                }
                FeedEvent::RelatedDismissed => {
                    self.engine.dismiss_related();
                }
                FeedEvent::Shutdown => {
                    info!("Feed controller shutting down");
                    break;
                }
            }
        }
    }
}

/// Spawn the controller as a tokio task and hand back its event handle.
pub fn spawn_controller(engine: Arc<FeedEngine>) -> ControllerHandle {
    let (controller, handle) = ContinuationController::new(engine);

    tokio::spawn(async move {
        controller.run().await;
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::app::Result;
    use crate::client::ArticleSource;
    use crate::config::Config;
    use crate::domain::{ArticleRecord, Thumbnail};
    use crate::feed::FeedStore;
    use crate::preload::{ImagePreloader, PreloadReport};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ArticleSource for CountingSource {
        async fn random_batch(&self, _count: u32) -> Result<Vec<ArticleRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ArticleRecord {
                page_id: 1,
                title: "Page 1".into(),
                extract: String::new(),
                thumbnail: Some(Thumbnail {
                    source: "https://upload.wikimedia.org/1.jpg".into(),
                    width: 400,
                    height: 300,
                }),
            }])
        }

        async fn search_batch(&self, _term: &str) -> Result<Vec<ArticleRecord>> {
            Ok(Vec::new())
        }

        async fn full_article(&self, page_id: i64) -> Result<ArticleRecord> {
            Ok(ArticleRecord::new(page_id, "stub"))
        }

        async fn related_batch(&self, _page_id: i64, _limit: u32) -> Result<Vec<ArticleRecord>> {
            Ok(Vec::new())
        }
    }

    struct NullPreloader;

    #[async_trait]
    impl ImagePreloader for NullPreloader {
        async fn preload(&self, records: &[ArticleRecord]) -> PreloadReport {
            PreloadReport {
                probed: records.len(),
                failed: 0,
            }
        }
    }

    #[tokio::test]
    async fn test_proximity_ignored_while_main_loading() {
        let store = Arc::new(FeedStore::new());
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let engine = Arc::new(FeedEngine::new(
            store.clone(),
            source.clone(),
            Arc::new(NullPreloader),
            &Config::default(),
        ));

        // Hold the main guard open, as an in-flight fetch would.
        let ticket = store.begin_load(StreamKind::Main).unwrap();

        let handle = spawn_controller(engine);
        handle.proximity_reached().await;
        handle.proximity_reached().await;
        handle.shutdown().await;
        tokio::task::yield_now().await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        store.abort(ticket);
    }

    #[tokio::test]
    async fn test_activation_loads_first_batch() {
        let store = Arc::new(FeedStore::new());
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let engine = Arc::new(FeedEngine::new(
            store.clone(),
            source.clone(),
            Arc::new(NullPreloader),
            &Config::default(),
        ));

        let mut revisions = store.subscribe();
        let handle = spawn_controller(engine);
        handle.activated().await;

        // Wait for the commit to land.
        while store.is_empty(StreamKind::Main) {
            revisions.changed().await.unwrap();
        }

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(StreamKind::Main), 1);
        handle.shutdown().await;
    }
}
