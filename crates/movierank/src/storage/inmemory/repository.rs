//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use movierank_core::movie::{MovieRankRecord, MovieRankRequest, MovieUpdateRequest};
use movierank_core::storage::{MovieRepository, RepositoryError, Result};

type Key = (i64, String);

/// In-memory storage backend for development and tests.
///
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    rankings: Arc<RwLock<BTreeMap<Key, MovieRankRecord>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieRepository for InMemoryRepository {
    async fn list_all(&self) -> Result<Vec<MovieRankRecord>> {
        let rankings = self.rankings.read().await;
        Ok(rankings.values().cloned().collect())
    }

    async fn get_one(&self, user_id: i64, movie_name: &str) -> Result<Option<MovieRankRecord>> {
        let rankings = self.rankings.read().await;
        Ok(rankings.get(&(user_id, movie_name.to_string())).cloned())
    }

    async fn query_by_user_and_prefix(
        &self,
        user_id: i64,
        movie_prefix: &str,
    ) -> Result<Vec<MovieRankRecord>> {
        let rankings = self.rankings.read().await;
        Ok(rankings
            .range((user_id, movie_prefix.to_string())..)
            .map(|(_, record)| record)
            .take_while(|record| record.matches_user_prefix(user_id, movie_prefix))
            .cloned()
            .collect())
    }

    async fn query_by_title(&self, movie_name: &str) -> Result<Vec<MovieRankRecord>> {
        let rankings = self.rankings.read().await;
        Ok(rankings
            .values()
            .filter(|record| record.movie_name == movie_name)
            .cloned()
            .collect())
    }

    async fn insert(&self, user_id: i64, request: &MovieRankRequest) -> Result<()> {
        let record = MovieRankRecord::from_request(user_id, request, Utc::now());
        let mut rankings = self.rankings.write().await;
        rankings.insert((user_id, request.movie_name.clone()), record);
        Ok(())
    }

    async fn update(&self, user_id: i64, request: &MovieUpdateRequest) -> Result<()> {
        let mut rankings = self.rankings.write().await;
        match rankings.get_mut(&(user_id, request.movie_name.clone())) {
            Some(record) => {
                record.apply_update(request, Utc::now());
                Ok(())
            }
            None => Err(RepositoryError::movie_not_found(
                user_id,
                &request.movie_name,
            )),
        }
    }
}
