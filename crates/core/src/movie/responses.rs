use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API projection of a stored ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieResponse {
    pub user_id: i64,
    pub movie_name: String,
    pub description: String,
    pub actors: BTreeSet<String>,
    pub ranking: i32,
    pub ranked_date_time: DateTime<Utc>,
}

/// One user's ranking of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserRanking {
    pub user_id: i64,
    pub ranking: i32,
}

/// Rankings of a single movie across all users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieRankResponse {
    pub movie_name: String,
    /// Mean of all rankings; `None` when nobody has ranked the movie.
    pub overall_ranking: Option<f64>,
    pub rankings: Vec<UserRanking>,
}
