//! Movie ranking handlers.
//!
//! Path parameters are decoded by axum; a non-integer user id or a malformed
//! JSON body is rejected before the service is called.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use movierank_core::movie::{MovieRankRequest, MovieRankResponse, MovieResponse, MovieUpdateRequest};

use crate::{handlers::AppError, state::AppState};

/// List every ranking (GET /movies).
pub async fn list_movies(
    State(state): State<AppState>,
) -> Result<Json<Vec<MovieResponse>>, AppError> {
    let movies = state.movies.list_movies().await?;
    Ok(Json(movies))
}

/// One user's ranking of a movie (GET /movies/{user_id}/{movie_name}).
pub async fn get_movie(
    State(state): State<AppState>,
    Path((user_id, movie_name)): Path<(i64, String)>,
) -> Result<Json<MovieResponse>, AppError> {
    let movie = state.movies.get_movie(user_id, &movie_name).await?;
    Ok(Json(movie))
}

/// A user's rankings by movie name prefix
/// (GET /movies/{user_id}/rankedMovies/{movie_name}).
pub async fn ranked_movies(
    State(state): State<AppState>,
    Path((user_id, movie_prefix)): Path<(i64, String)>,
) -> Result<Json<Vec<MovieResponse>>, AppError> {
    let movies = state
        .movies
        .ranked_movies_by_title(user_id, &movie_prefix)
        .await?;
    Ok(Json(movies))
}

/// Store a ranking (POST /movies/{user_id}).
pub async fn add_movie(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<MovieRankRequest>,
) -> Result<StatusCode, AppError> {
    state.movies.add_movie(user_id, &request).await?;
    Ok(StatusCode::OK)
}

/// Change the ranking of an existing entry (PATCH /movies/{user_id}).
pub async fn update_movie(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<MovieUpdateRequest>,
) -> Result<StatusCode, AppError> {
    state.movies.update_movie(user_id, &request).await?;
    Ok(StatusCode::OK)
}

/// Cross-user ranking summary (GET /movies/{movie_name}/ranking).
pub async fn movie_rank(
    State(state): State<AppState>,
    Path(movie_name): Path<String>,
) -> Result<Json<MovieRankResponse>, AppError> {
    let rank = state.movies.movie_rank(&movie_name).await?;
    Ok(Json(rank))
}
