//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::{PostRepository, RepoError};
use quill_infra::InMemoryPostRepository;

#[cfg(feature = "mongo")]
use quill_infra::MongoPostRepository;
#[cfg(feature = "postgres")]
use quill_infra::PostgresPostRepository;

use crate::config::StorageConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub storage: &'static str,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostRepository>, storage: &'static str) -> Self {
        Self { posts, storage }
    }

    /// Construct the configured backend. A backend that fails to connect is
    /// an error; there is no fallback to another backend.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, RepoError> {
        let posts: Arc<dyn PostRepository> = match config {
            StorageConfig::Memory => {
                tracing::warn!("Using in-memory storage - posts are lost on restart");
                Arc::new(InMemoryPostRepository::new())
            }
            #[cfg(feature = "postgres")]
            StorageConfig::Postgres(db) => Arc::new(PostgresPostRepository::connect(db).await?),
            #[cfg(feature = "mongo")]
            StorageConfig::Mongo(mongo) => Arc::new(MongoPostRepository::connect(mongo).await?),
        };

        tracing::info!(storage = config.name(), "Application state initialized");
        Ok(Self::new(posts, config.name()))
    }
}
