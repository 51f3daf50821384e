use std::sync::Arc;

use crate::app::Result;
use crate::client::{ArticleSource, WikiClient};
use crate::config::Config;
use crate::engine::FeedEngine;
use crate::feed::FeedStore;
use crate::preload::{HttpImagePreloader, ImagePreloader};

/// Wires the component graph: config → client → preloader → store → engine.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<FeedStore>,
    pub engine: Arc<FeedEngine>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(FeedStore::new());
        let source: Arc<dyn ArticleSource + Send + Sync> =
            Arc::new(WikiClient::new(&config.api)?);
        let preloader: Arc<dyn ImagePreloader> = Arc::new(HttpImagePreloader::new(&config)?);
        let engine = Arc::new(FeedEngine::new(
            store.clone(),
            source,
            preloader,
            &config,
        ));

        Ok(Self {
            config,
            store,
            engine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builds_with_default_config() {
        assert!(AppContext::new(Config::default()).is_ok());
    }
}
