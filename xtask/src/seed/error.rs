//! Error types for HTTP seeding.

use thiserror::Error;

/// Result type alias for seed module.
pub type Result<T> = std::result::Result<T, SeedError>;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Server at {base_url} not healthy after {timeout_secs}s")]
    ServerNotHealthy { base_url: String, timeout_secs: u64 },

    #[error("Invalid base URL '{0}'")]
    InvalidUrl(String),

    #[error("Seeding failed: {0}")]
    SeedingFailed(String),

    #[error("Verification failed for '{movie_name}': expected {expected} rankings, got {actual}")]
    VerificationFailed {
        movie_name: String,
        expected: usize,
        actual: usize,
    },
}
