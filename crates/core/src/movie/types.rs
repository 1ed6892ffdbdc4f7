use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::{MovieRankRequest, MovieUpdateRequest};

/// A persisted ranking of one movie by one user.
///
/// `(user_id, movie_name)` is the composite key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRankRecord {
    pub user_id: i64,
    pub movie_name: String,
    pub description: String,
    pub actors: BTreeSet<String>,
    pub ranking: i32,
    /// Assigned by the repository on every write.
    pub ranked_date_time: DateTime<Utc>,
}

impl MovieRankRecord {
    /// Builds the record written by an insert.
    pub fn from_request(
        user_id: i64,
        request: &MovieRankRequest,
        ranked_date_time: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            movie_name: request.movie_name.clone(),
            description: request.description.clone(),
            actors: request.actors.clone(),
            ranking: request.ranking,
            ranked_date_time,
        }
    }

    /// Applies a partial update: only the ranking and its timestamp change.
    pub fn apply_update(&mut self, request: &MovieUpdateRequest, ranked_date_time: DateTime<Utc>) {
        self.ranking = request.ranking;
        self.ranked_date_time = ranked_date_time;
    }

    /// Returns true if this record belongs to `user_id` and its name starts with `prefix`.
    pub fn matches_user_prefix(&self, user_id: i64, prefix: &str) -> bool {
        self.user_id == user_id && self.movie_name.starts_with(prefix)
    }
}
