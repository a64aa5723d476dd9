//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use post_core::PostService;
use post_core::ports::PostStore;
use post_infra::InMemoryPostStore;

#[cfg(feature = "mongodb")]
use post_infra::MongoPostStore;

use crate::config::AppConfig;
use crate::scope::RequestScope;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub request_timeout: Duration,
}

impl AppState {
    /// Build the application state with the configured store.
    pub async fn new(config: &AppConfig) -> Self {
        let store = Self::store(config).await;
        tracing::info!("Application state initialized");
        Self::with_store(store, config.request_timeout)
    }

    pub fn with_store(store: Arc<dyn PostStore>, request_timeout: Duration) -> Self {
        Self {
            posts: PostService::new(store),
            request_timeout,
        }
    }

    /// Cancellation scope for one request, bounded by the request timeout.
    pub fn request_scope(&self) -> RequestScope {
        RequestScope::start(self.request_timeout)
    }

    #[cfg(feature = "mongodb")]
    async fn store(config: &AppConfig) -> Arc<dyn PostStore> {
        let Some(mongo) = &config.store else {
            tracing::warn!("POST_MONGO_URL not set. Running without document store (in-memory mode).");
            return Arc::new(InMemoryPostStore::new());
        };

        match MongoPostStore::connect(mongo).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to document store: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryPostStore::new())
            }
        }
    }

    #[cfg(not(feature = "mongodb"))]
    async fn store(_config: &AppConfig) -> Arc<dyn PostStore> {
        tracing::info!("Running without mongodb feature - using in-memory store");
        Arc::new(InMemoryPostStore::new())
    }
}
