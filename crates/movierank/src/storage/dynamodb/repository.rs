//! DynamoDB repository implementation.
//!
//! Implements `MovieRepository` from `movierank_core::storage` using DynamoDB.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::Utc;

use movierank_core::movie::{MovieRankRecord, MovieRankRequest, MovieUpdateRequest};
use movierank_core::storage::schema::MOVIE_NAME_INDEX;
use movierank_core::storage::{MovieRepository, Result};

use super::conversions::{
    item_to_record, items_to_records, key, movie_name_value, record_to_item, timestamp_value,
    user_id_value,
};
use super::error::{
    map_describe_table_error, map_get_item_error, map_put_item_error, map_query_error,
    map_scan_error, map_update_item_error,
};
use crate::config::Config;

/// DynamoDB-based repository implementation.
///
/// The client is cheap to clone and safe to share across request tasks.
pub struct DynamoDbRepository {
    client: Client,
    table_name: String,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a new repository from application configuration.
    ///
    /// Uses the AWS SDK default credential chain. `AWS_ENDPOINT_URL` points the
    /// client at DynamoDB Local when set.
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.aws_region.clone()));
        if let Some(endpoint) = &config.aws_endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self::new(Client::new(&sdk_config), config.table_name.clone())
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Runs a query to completion, following `LastEvaluatedKey`.
    async fn query_all(
        &self,
        index_name: Option<&str>,
        key_condition: &str,
        values: HashMap<String, AttributeValue>,
    ) -> Result<Vec<MovieRankRecord>> {
        let mut records = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .set_index_name(index_name.map(str::to_string))
                .key_condition_expression(key_condition)
                .set_expression_attribute_values(Some(values.clone()))
                .scan_index_forward(true)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(map_query_error)?;

            records.extend(items_to_records(output.items())?);

            match output.last_evaluated_key {
                Some(next) if !next.is_empty() => start_key = Some(next),
                _ => break,
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl MovieRepository for DynamoDbRepository {
    async fn list_all(&self) -> Result<Vec<MovieRankRecord>> {
        let mut records = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(map_scan_error)?;

            records.extend(items_to_records(output.items())?);

            match output.last_evaluated_key {
                Some(next) if !next.is_empty() => start_key = Some(next),
                _ => break,
            }
        }

        tracing::debug!(count = records.len(), table = %self.table_name, "scanned rankings");
        Ok(records)
    }

    async fn get_one(&self, user_id: i64, movie_name: &str) -> Result<Option<MovieRankRecord>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key(user_id, movie_name)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_record(&item)?)),
            None => Ok(None),
        }
    }

    async fn query_by_user_and_prefix(
        &self,
        user_id: i64,
        movie_prefix: &str,
    ) -> Result<Vec<MovieRankRecord>> {
        // begins_with on an empty string is rejected by DynamoDB.
        if movie_prefix.is_empty() {
            let values = HashMap::from([(":user".to_string(), user_id_value(user_id))]);
            return self.query_all(None, "UserId = :user", values).await;
        }

        let values = HashMap::from([
            (":user".to_string(), user_id_value(user_id)),
            (":prefix".to_string(), movie_name_value(movie_prefix)),
        ]);
        self.query_all(
            None,
            "UserId = :user AND begins_with(MovieName, :prefix)",
            values,
        )
        .await
    }

    async fn query_by_title(&self, movie_name: &str) -> Result<Vec<MovieRankRecord>> {
        let values = HashMap::from([(":name".to_string(), movie_name_value(movie_name))]);
        let records = self
            .query_all(Some(MOVIE_NAME_INDEX), "MovieName = :name", values)
            .await?;

        tracing::debug!(movie_name, count = records.len(), "queried rankings by title");
        Ok(records)
    }

    async fn insert(&self, user_id: i64, request: &MovieRankRequest) -> Result<()> {
        let record = MovieRankRecord::from_request(user_id, request, Utc::now());

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(&record)))
            .send()
            .await
            .map_err(map_put_item_error)?;

        tracing::debug!(user_id, movie_name = %record.movie_name, "stored ranking");
        Ok(())
    }

    async fn update(&self, user_id: i64, request: &MovieUpdateRequest) -> Result<()> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(key(user_id, &request.movie_name)))
            .update_expression("SET Ranking = :ranking, RankedDateTime = :ranked")
            .condition_expression("attribute_exists(UserId)")
            .expression_attribute_values(":ranking", AttributeValue::N(request.ranking.to_string()))
            .expression_attribute_values(":ranked", timestamp_value(Utc::now()))
            .send()
            .await
            .map_err(|e| map_update_item_error(e, user_id, &request.movie_name))?;

        tracing::debug!(user_id, movie_name = %request.movie_name, "updated ranking");
        Ok(())
    }

    async fn ready(&self) -> Result<()> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(map_describe_table_error)?;

        Ok(())
    }
}

/// Tests against DynamoDB Local. Run through `cargo xtask integration`, which
/// starts the container, deploys the table and sets the AWS environment.
#[cfg(test)]
mod tests {
    use super::*;
    use movierank_core::storage::RepositoryError;
    use std::collections::BTreeSet;

    async fn repository() -> DynamoDbRepository {
        DynamoDbRepository::from_config(&Config::from_env()).await
    }

    /// Each test gets its own user id so runs don't interfere.
    fn unique_user_id() -> i64 {
        Utc::now().timestamp_nanos_opt().unwrap_or_default() % 1_000_000_000_000
    }

    fn request(movie_name: &str, ranking: i32) -> MovieRankRequest {
        MovieRankRequest {
            movie_name: movie_name.to_string(),
            description: format!("About {movie_name}"),
            actors: BTreeSet::from(["Actor One".to_string()]),
            ranking,
        }
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_insert_then_get_one() {
        let repo = repository().await;
        let user_id = unique_user_id();
        let started = Utc::now();

        repo.insert(user_id, &request("Inception", 9)).await.unwrap();
        let record = repo.get_one(user_id, "Inception").await.unwrap().unwrap();

        assert_eq!(record.user_id, user_id);
        assert_eq!(record.description, "About Inception");
        assert_eq!(record.ranking, 9);
        assert!(record.ranked_date_time >= started - chrono::Duration::seconds(1));
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_insert_without_actors() {
        let repo = repository().await;
        let user_id = unique_user_id();
        let mut req = request("Heat", 7);
        req.actors.clear();

        repo.insert(user_id, &req).await.unwrap();
        let record = repo.get_one(user_id, "Heat").await.unwrap().unwrap();

        assert!(record.actors.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_get_one_missing_returns_none() {
        let repo = repository().await;

        let result = repo.get_one(unique_user_id(), "Never Ranked").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_update_changes_only_ranking() {
        let repo = repository().await;
        let user_id = unique_user_id();
        repo.insert(user_id, &request("Alien", 6)).await.unwrap();
        let before = repo.get_one(user_id, "Alien").await.unwrap().unwrap();

        let update = MovieUpdateRequest {
            movie_name: "Alien".to_string(),
            ranking: 10,
        };
        repo.update(user_id, &update).await.unwrap();
        let after = repo.get_one(user_id, "Alien").await.unwrap().unwrap();

        assert_eq!(after.ranking, 10);
        assert_eq!(after.description, before.description);
        assert_eq!(after.actors, before.actors);
        assert!(after.ranked_date_time >= before.ranked_date_time);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_update_missing_key_is_not_found() {
        let repo = repository().await;
        let user_id = unique_user_id();
        let update = MovieUpdateRequest {
            movie_name: "Ghost".to_string(),
            ranking: 3,
        };

        let result = repo.update(user_id, &update).await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert!(repo.get_one(user_id, "Ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_prefix_query_is_ordered() {
        let repo = repository().await;
        let user_id = unique_user_id();
        for name in ["Star Wars", "Alien", "Star Trek"] {
            repo.insert(user_id, &request(name, 5)).await.unwrap();
        }

        let names: Vec<String> = repo
            .query_by_user_and_prefix(user_id, "Star")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.movie_name)
            .collect();
        assert_eq!(names, vec!["Star Trek", "Star Wars"]);

        let all = repo.query_by_user_and_prefix(user_id, "").await.unwrap();
        assert_eq!(all.len(), 3);

        let none = repo.query_by_user_and_prefix(user_id, "Zz").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_query_by_title_spans_users() {
        let repo = repository().await;
        let title = format!("Title {}", unique_user_id());
        let first = unique_user_id();
        let second = first + 1;

        repo.insert(first, &request(&title, 4)).await.unwrap();
        repo.insert(second, &request(&title, 8)).await.unwrap();

        let records = repo.query_by_title(&title).await.unwrap();
        let mut users: Vec<i64> = records.iter().map(|r| r.user_id).collect();
        users.sort();
        assert_eq!(users, vec![first, second]);

        let list = repo.list_all().await.unwrap();
        assert!(list.iter().any(|r| r.movie_name == title));
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_ready_succeeds_when_table_exists() {
        assert!(repository().await.ready().await.is_ok());
    }
}
