//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. The storage backend is chosen via feature flags; see
//! `crate::storage` for the mutual-exclusion checks.

use std::{sync::Arc, time::Duration};

use movierank_core::storage::MovieRepository;

use crate::{config::Config, service::MovieService};

/// Shared application state.
///
/// Cloned for each request handler. The repository behind the service is
/// built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Movie ranking operations.
    pub movies: Arc<MovieService>,
    /// Upper bound on request handling time.
    pub request_timeout: Duration,
}

impl AppState {
    /// Builds state around an already constructed repository.
    pub fn build(repository: Arc<dyn MovieRepository>, config: &Config) -> Self {
        Self {
            movies: Arc::new(MovieService::new(repository)),
            request_timeout: config.request_timeout(),
        }
    }
}

// ============================================================================
// Factory functions for the storage backends
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        /// Useful for development and tests without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::info!("Using in-memory storage");
            Ok(Self::build(Arc::new(InMemoryRepository::new()), config))
        }
    }

    impl Default for AppState {
        fn default() -> Self {
            Self::build(Arc::new(InMemoryRepository::new()), &Config::default())
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb {
    use super::*;
    use crate::storage::DynamoDbRepository;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repository = DynamoDbRepository::from_config(config).await;
            tracing::info!(
                table = repository.table_name(),
                endpoint = config.aws_endpoint_url.as_deref().unwrap_or("default"),
                region = %config.aws_region,
                "Using DynamoDB storage"
            );
            Ok(Self::build(Arc::new(repository), config))
        }
    }
}
