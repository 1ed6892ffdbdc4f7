//! Movie ranking operations exposed to the HTTP layer.
//!
//! Each method issues one repository call and maps the typed records into
//! response payloads. Errors propagate unchanged.

use std::sync::Arc;

use movierank_core::movie::{
    mapper, MovieRankRequest, MovieRankResponse, MovieResponse, MovieUpdateRequest,
};
use movierank_core::storage::{MovieRepository, RepositoryError, Result};

#[derive(Clone)]
pub struct MovieService {
    repository: Arc<dyn MovieRepository>,
}

impl MovieService {
    pub fn new(repository: Arc<dyn MovieRepository>) -> Self {
        Self { repository }
    }

    /// Every stored ranking.
    pub async fn list_movies(&self) -> Result<Vec<MovieResponse>> {
        let records = self.repository.list_all().await?;
        Ok(mapper::to_movie_responses(&records))
    }

    /// One user's ranking of a movie.
    ///
    /// Absence is reported as `RepositoryError::NotFound`.
    pub async fn get_movie(&self, user_id: i64, movie_name: &str) -> Result<MovieResponse> {
        self.repository
            .get_one(user_id, movie_name)
            .await?
            .map(|record| mapper::to_movie_response(&record))
            .ok_or_else(|| RepositoryError::movie_not_found(user_id, movie_name))
    }

    /// A user's rankings whose movie name starts with `movie_prefix`.
    pub async fn ranked_movies_by_title(
        &self,
        user_id: i64,
        movie_prefix: &str,
    ) -> Result<Vec<MovieResponse>> {
        let records = self
            .repository
            .query_by_user_and_prefix(user_id, movie_prefix)
            .await?;
        Ok(mapper::to_movie_responses(&records))
    }

    pub async fn add_movie(&self, user_id: i64, request: &MovieRankRequest) -> Result<()> {
        self.repository.insert(user_id, request).await?;
        tracing::info!(user_id, movie_name = %request.movie_name, ranking = request.ranking, "Added ranking");
        Ok(())
    }

    pub async fn update_movie(&self, user_id: i64, request: &MovieUpdateRequest) -> Result<()> {
        self.repository.update(user_id, request).await?;
        tracing::info!(user_id, movie_name = %request.movie_name, ranking = request.ranking, "Updated ranking");
        Ok(())
    }

    /// Cross-user ranking summary for a movie title.
    pub async fn movie_rank(&self, movie_name: &str) -> Result<MovieRankResponse> {
        let records = self.repository.query_by_title(movie_name).await?;
        Ok(mapper::to_movie_rank_response(movie_name, &records))
    }

    /// Readiness of the backing store.
    pub async fn ready(&self) -> Result<()> {
        self.repository.ready().await
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use std::collections::BTreeSet;

    use async_trait::async_trait;
    use movierank_core::movie::MovieRankRecord;

    use super::*;
    use crate::storage::InMemoryRepository;

    fn service() -> MovieService {
        MovieService::new(Arc::new(InMemoryRepository::new()))
    }

    fn request(movie_name: &str, ranking: i32) -> MovieRankRequest {
        MovieRankRequest {
            movie_name: movie_name.to_string(),
            description: "A film".to_string(),
            actors: BTreeSet::new(),
            ranking,
        }
    }

    /// Repository whose every call fails with the same error.
    struct FailingRepository(RepositoryError);

    #[async_trait]
    impl MovieRepository for FailingRepository {
        async fn list_all(&self) -> Result<Vec<MovieRankRecord>> {
            Err(self.0.clone())
        }

        async fn get_one(&self, _: i64, _: &str) -> Result<Option<MovieRankRecord>> {
            Err(self.0.clone())
        }

        async fn query_by_user_and_prefix(&self, _: i64, _: &str) -> Result<Vec<MovieRankRecord>> {
            Err(self.0.clone())
        }

        async fn query_by_title(&self, _: &str) -> Result<Vec<MovieRankRecord>> {
            Err(self.0.clone())
        }

        async fn insert(&self, _: i64, _: &MovieRankRequest) -> Result<()> {
            Err(self.0.clone())
        }

        async fn update(&self, _: i64, _: &MovieUpdateRequest) -> Result<()> {
            Err(self.0.clone())
        }

        async fn ready(&self) -> Result<()> {
            Err(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_get_movie_missing_is_not_found() {
        let result = service().get_movie(7, "Inception").await;

        assert_eq!(
            result,
            Err(RepositoryError::movie_not_found(7, "Inception"))
        );
    }

    #[tokio::test]
    async fn test_add_then_get_movie() {
        let service = service();
        service.add_movie(7, &request("Inception", 9)).await.unwrap();

        let movie = service.get_movie(7, "Inception").await.unwrap();
        assert_eq!(movie.user_id, 7);
        assert_eq!(movie.ranking, 9);
    }

    #[tokio::test]
    async fn test_movie_rank_aggregates_across_users() {
        let service = service();
        service.add_movie(1, &request("Heat", 4)).await.unwrap();
        service.add_movie(2, &request("Heat", 8)).await.unwrap();

        let rank = service.movie_rank("Heat").await.unwrap();
        assert_eq!(rank.movie_name, "Heat");
        assert_eq!(rank.overall_ranking, Some(6.0));
        assert_eq!(rank.rankings.len(), 2);
    }

    #[tokio::test]
    async fn test_movie_rank_without_rankings() {
        let rank = service().movie_rank("Heat").await.unwrap();

        assert_eq!(rank.overall_ranking, None);
        assert!(rank.rankings.is_empty());
    }

    #[tokio::test]
    async fn test_ranked_movies_by_title_uses_prefix() {
        let service = service();
        service.add_movie(7, &request("Star Wars", 8)).await.unwrap();
        service.add_movie(7, &request("Alien", 8)).await.unwrap();

        let movies = service.ranked_movies_by_title(7, "Sta").await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].movie_name, "Star Wars");
    }

    #[tokio::test]
    async fn test_errors_propagate_unchanged() {
        let error = RepositoryError::StoreUnavailable("down".to_string());
        let service = MovieService::new(Arc::new(FailingRepository(error.clone())));

        assert_eq!(service.list_movies().await, Err(error.clone()));
        assert_eq!(service.get_movie(1, "Heat").await, Err(error.clone()));
        assert_eq!(service.movie_rank("Heat").await, Err(error.clone()));
        assert_eq!(service.add_movie(1, &request("Heat", 1)).await, Err(error.clone()));
        assert_eq!(service.ready().await, Err(error));
    }
}
