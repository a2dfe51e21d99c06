use crate::config::Config;
use crate::error::Result;
use crate::persistence::{DocumentStore, FileStore};
use crate::search::SearchEngine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Application state shared across all request handlers.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub engine: SearchEngine,
    /// Set once the store has been listed successfully at start-up
    pub ready: AtomicBool,
}

impl AppState {
    /// Open the file store under `config.data_dir` and build the engine on it.
    pub async fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = Arc::new(FileStore::open(&config.data_dir)?);
        Ok(Self::with_store(store, config).await)
    }

    /// Build state over an existing store.
    pub async fn with_store(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        tracing::info!(
            max_matches = config.max_matches_per_service,
            fetch_concurrency = config.fetch_concurrency,
            fetch_timeout_ms = config.fetch_timeout_ms,
            "Building search engine"
        );

        let engine = SearchEngine::new(Arc::clone(&store), config.search_options());

        let state = Self {
            store,
            engine,
            ready: AtomicBool::new(false),
        };

        state.warmup().await;
        state
    }

    /// List the store once so an unreadable data directory shows up in /ready.
    async fn warmup(&self) {
        match self.store.list_service_ids().await {
            Ok(ids) => {
                tracing::info!(services = ids.len(), "Document store reachable");
                self.ready.store(true, Ordering::SeqCst);
            }
            Err(e) => {
                tracing::error!(error = %e, "Document store unreachable");
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}
