//! HTTP-based seeding of a running movierank server.
//!
//! Demo rankings come from `movierank_core::movie::generate_seed_rankings`,
//! so the payloads are the same types the server deserializes. After posting,
//! every seeded title is read back through `GET /movies/{name}/ranking`; if
//! seeding succeeds, the write and aggregate endpoints both work.

mod error;

pub use error::{Result, SeedError};

use std::time::Duration;

use reqwest::Url;

use movierank_core::movie::{
    generate_seed_rankings, seed_movie_names, MovieRankRequest, MovieRankResponse,
};

use crate::prelude::*;

/// Seed command arguments.
#[derive(Debug, clap::Args)]
#[command(long_about = "Seed a running movierank server with demo rankings.

Every user in 1..=USERS ranks the same small catalog of movies. Rankings are
deterministic, so reseeding overwrites the same keys with the same values.")]
pub struct SeedCommand {
    /// Number of users to generate rankings for.
    #[arg(long, default_value = "5")]
    pub users: u32,

    /// Base URL of the server.
    #[arg(long, default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Seconds to wait for the server to answer /livez.
    #[arg(long, default_value = "30")]
    pub wait_timeout: u64,
}

// ============================================================================
// Pure Functions (Functional Core)
// ============================================================================

/// Builds `{base_url}/movies/{segments...}` with each segment percent-encoded.
pub fn movies_url(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|_| SeedError::InvalidUrl(base_url.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| SeedError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .push("movies")
        .extend(segments);
    Ok(url)
}

/// Checks that a ranking summary covers every seeded user.
pub fn verify_rank(response: &MovieRankResponse, expected_users: usize) -> Result<()> {
    if response.rankings.len() == expected_users {
        Ok(())
    } else {
        Err(SeedError::VerificationFailed {
            movie_name: response.movie_name.clone(),
            expected: expected_users,
            actual: response.rankings.len(),
        })
    }
}

// ============================================================================
// I/O Functions (Imperative Shell)
// ============================================================================

/// Polls the server's liveness endpoint until it responds or times out.
pub async fn wait_for_server(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> Result<()> {
    let url = format!("{}/livez", base_url.trim_end_matches('/'));
    let poll_interval = Duration::from_millis(500);
    let start = std::time::Instant::now();

    loop {
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            _ => {
                if start.elapsed() >= timeout {
                    return Err(SeedError::ServerNotHealthy {
                        base_url: base_url.to_string(),
                        timeout_secs: timeout.as_secs(),
                    });
                }
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}

/// Posts one ranking (POST /movies/{user_id}).
async fn add_ranking(
    client: &reqwest::Client,
    base_url: &str,
    user_id: i64,
    request: &MovieRankRequest,
) -> Result<()> {
    let url = movies_url(base_url, &[&user_id.to_string()])?;

    let response = client
        .post(url)
        .json(request)
        .send()
        .await
        .map_err(|e| SeedError::SeedingFailed(format!("Failed to add ranking: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SeedError::SeedingFailed(format!(
            "Failed to add '{}' for user {user_id}: {status} - {body}",
            request.movie_name
        )));
    }

    Ok(())
}

/// Reads the ranking summary of a title (GET /movies/{movie_name}/ranking).
async fn fetch_rank(
    client: &reqwest::Client,
    base_url: &str,
    movie_name: &str,
) -> Result<MovieRankResponse> {
    let url = movies_url(base_url, &[movie_name, "ranking"])?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SeedError::SeedingFailed(format!("Failed to fetch ranking: {e}")))?;

    if !response.status().is_success() {
        return Err(SeedError::SeedingFailed(format!(
            "Failed to fetch ranking for '{movie_name}': {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| SeedError::SeedingFailed(format!("Failed to parse ranking response: {e}")))
}

/// Main entry point for seed command.
pub async fn run(command: SeedCommand, global: crate::Global) -> Result<()> {
    let client = reqwest::Client::new();
    let base_url = command.base_url.as_str();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), base_url);
        aprintln!("{} {}", p_b("Users:"), command.users);
        aprintln!();
    }

    wait_for_server(&client, base_url, Duration::from_secs(command.wait_timeout)).await?;

    let rankings = generate_seed_rankings(command.users);
    for (user_id, request) in &rankings {
        add_ranking(&client, base_url, *user_id, request).await?;
        if global.is_verbose() {
            aprintln!(
                "  {} user {} ranked {} {}",
                p_g("+"),
                user_id,
                request.movie_name,
                request.ranking
            );
        }
    }

    if !global.is_silent() {
        aprintln!("{} {} rankings added", p_g("Seeded:"), rankings.len());
        aprintln!();
        aprintln!("{}", p_c("Overall rankings:"));
    }

    for movie_name in seed_movie_names() {
        let rank = fetch_rank(&client, base_url, movie_name).await?;
        verify_rank(&rank, command.users as usize)?;

        if !global.is_silent() {
            let overall = rank
                .overall_ranking
                .map(|r| format!("{r:.2}"))
                .unwrap_or_else(|| "-".to_string());
            aprintln!("  {:<12} {}", movie_name, p_y(&overall));
        }
    }

    Ok(())
}
