use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::{livez, readyz},
        movies::{add_movie, get_movie, list_movies, movie_rank, ranked_movies, update_movie},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// Every `/movies/{id}/...` route shares the same first capture. It holds a
/// user id everywhere except `/movies/{id}/ranking`, where it is the movie name.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE]);

    let movie_routes = Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/{id}", post(add_movie).patch(update_movie))
        .route("/movies/{id}/ranking", get(movie_rank))
        .route("/movies/{id}/{movie_name}", get(get_movie))
        .route("/movies/{id}/rankedMovies/{movie_name}", get(ranked_movies))
        .layer(cors);

    let timeout = state.request_timeout;

    Router::new()
        .route("/livez", get(livez))
        .route("/readyz", get(readyz))
        .merge(movie_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use std::{sync::Arc, time::Duration};
    use tower::ServiceExt;

    use async_trait::async_trait;
    use movierank_core::{
        movie::{MovieRankRecord, MovieRankRequest, MovieUpdateRequest},
        storage::{MovieRepository, Result as RepoResult},
    };

    use crate::service::MovieService;

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn inception(ranking: i32) -> serde_json::Value {
        serde_json::json!({
            "MovieName": "Inception",
            "Description": "Dreams within dreams",
            "Actors": ["Leonardo DiCaprio", "Elliot Page"],
            "Ranking": ranking
        })
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/livez")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readyz_with_inmemory_store() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/readyz")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["healthy"], true);
    }

    #[tokio::test]
    async fn test_list_movies_empty() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/movies")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_get_update_get() {
        let app = create_app(AppState::default());

        // Add a ranking
        let response = app
            .clone()
            .oneshot(json_request("POST", "/movies/7", inception(9)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Read it back
        let response = app
            .clone()
            .oneshot(get_request("/movies/7/Inception"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let movie = body_json(response).await;
        assert_eq!(movie["UserId"], 7);
        assert_eq!(movie["MovieName"], "Inception");
        assert_eq!(movie["Ranking"], 9);
        assert_eq!(
            movie["Actors"],
            serde_json::json!(["Elliot Page", "Leonardo DiCaprio"])
        );
        assert!(movie["RankedDateTime"].is_string());

        // Change the ranking
        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                "/movies/7",
                serde_json::json!({ "MovieName": "Inception", "Ranking": 10 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Only the ranking changed
        let response = app
            .oneshot(get_request("/movies/7/Inception"))
            .await
            .unwrap();
        let updated = body_json(response).await;
        assert_eq!(updated["Ranking"], 10);
        assert_eq!(updated["Description"], "Dreams within dreams");
        assert_eq!(updated["Actors"], movie["Actors"]);
    }

    #[tokio::test]
    async fn test_get_movie_not_found() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(get_request("/movies/7/Inception"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_missing_movie_is_not_found() {
        let app = create_app(AppState::default());

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                "/movies/7",
                serde_json::json!({ "MovieName": "Inception", "Ranking": 10 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Nothing was created
        let response = app.oneshot(get_request("/movies")).await.unwrap();
        assert!(body_json(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ranked_movies_by_prefix() {
        let app = create_app(AppState::default());

        for name in ["Star Wars", "Alien", "Star Trek"] {
            let body = serde_json::json!({
                "MovieName": name,
                "Description": "Space",
                "Ranking": 8
            });
            let response = app
                .clone()
                .oneshot(json_request("POST", "/movies/7", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(get_request("/movies/7/rankedMovies/Star%20"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["MovieName"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Star Trek", "Star Wars"]);
    }

    #[tokio::test]
    async fn test_movie_ranking_across_users() {
        let app = create_app(AppState::default());

        for (user, ranking) in [(1, 6), (2, 8), (3, 10)] {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    &format!("/movies/{user}"),
                    inception(ranking),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(get_request("/movies/Inception/ranking"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let rank = body_json(response).await;
        assert_eq!(rank["MovieName"], "Inception");
        assert_eq!(rank["OverallRanking"], 8.0);
        assert_eq!(rank["Rankings"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_movie_ranking_unranked_title() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(get_request("/movies/Heat/ranking"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let rank = body_json(response).await;
        assert!(rank["OverallRanking"].is_null());
        assert!(rank["Rankings"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_integer_user_id_is_rejected() {
        let app = create_app(AppState::default());

        let response = app
            .clone()
            .oneshot(json_request("POST", "/movies/abc", inception(9)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(get_request("/movies/abc/Inception"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(json_request(
                "POST",
                "/movies/7",
                serde_json::json!({ "MovieName": "Inception" }),
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    /// Repository that stalls on scans.
    struct StalledRepository;

    #[async_trait]
    impl MovieRepository for StalledRepository {
        async fn list_all(&self) -> RepoResult<Vec<MovieRankRecord>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }

        async fn get_one(&self, _: i64, _: &str) -> RepoResult<Option<MovieRankRecord>> {
            Ok(None)
        }

        async fn query_by_user_and_prefix(
            &self,
            _: i64,
            _: &str,
        ) -> RepoResult<Vec<MovieRankRecord>> {
            Ok(Vec::new())
        }

        async fn query_by_title(&self, _: &str) -> RepoResult<Vec<MovieRankRecord>> {
            Ok(Vec::new())
        }

        async fn insert(&self, _: i64, _: &MovieRankRequest) -> RepoResult<()> {
            Ok(())
        }

        async fn update(&self, _: i64, _: &MovieUpdateRequest) -> RepoResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_408() {
        let state = AppState {
            movies: Arc::new(MovieService::new(Arc::new(StalledRepository))),
            request_timeout: Duration::from_millis(50),
        };
        let app = create_app(state);

        let response = app.clone().oneshot(get_request("/movies")).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        // Requests that skip the stalled scan still succeed
        let response = app
            .oneshot(get_request("/movies/7/rankedMovies/Star"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
