use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Request body for ranking a movie (POST /movies/{userId}).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieRankRequest {
    pub movie_name: String,
    pub description: String,
    #[serde(default)]
    pub actors: BTreeSet<String>,
    pub ranking: i32,
}

/// Request body for re-ranking a movie (PATCH /movies/{userId}).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieUpdateRequest {
    pub movie_name: String,
    pub ranking: i32,
}
