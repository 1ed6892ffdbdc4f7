use async_trait::async_trait;

use crate::movie::{MovieRankRecord, MovieRankRequest, MovieUpdateRequest};

use super::Result;

/// Repository for movie ranking records.
///
/// Implementations translate each call into a single logical store request.
/// Errors are never retried at this layer.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Returns every stored ranking.
    async fn list_all(&self) -> Result<Vec<MovieRankRecord>>;

    /// Point lookup by composite key. Absence is `Ok(None)`.
    async fn get_one(&self, user_id: i64, movie_name: &str) -> Result<Option<MovieRankRecord>>;

    /// Rankings of one user whose movie name starts with `movie_prefix`,
    /// ordered by movie name ascending.
    async fn query_by_user_and_prefix(
        &self,
        user_id: i64,
        movie_prefix: &str,
    ) -> Result<Vec<MovieRankRecord>>;

    /// Rankings of a movie across all users, via the movie name index.
    async fn query_by_title(&self, movie_name: &str) -> Result<Vec<MovieRankRecord>>;

    /// Writes a full record, overwriting any existing one with the same key.
    ///
    /// The ranked timestamp is assigned by the repository.
    async fn insert(&self, user_id: i64, request: &MovieRankRequest) -> Result<()>;

    /// Overwrites the ranking (and ranked timestamp) of an existing record.
    ///
    /// Returns `RepositoryError::NotFound` if the key does not exist.
    async fn update(&self, user_id: i64, request: &MovieUpdateRequest) -> Result<()>;

    /// Checks that the backing store can serve requests.
    async fn ready(&self) -> Result<()> {
        Ok(())
    }
}
