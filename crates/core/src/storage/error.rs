use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    /// Transient infrastructure failure (network, throttling, store outage).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    /// The store refused the request as malformed.
    #[error("Store rejected request: {0}")]
    StoreRejected(String),
    /// A stored record did not have the expected shape.
    #[error("Mapping error: {0}")]
    Mapping(String),
}

impl RepositoryError {
    /// Builds a `NotFound` error for a movie ranking identified by its composite key.
    pub fn movie_not_found(user_id: i64, movie_name: &str) -> Self {
        Self::NotFound {
            entity_type: "MovieRank",
            id: format!("{user_id}/{movie_name}"),
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "MovieRank",
            id: "7/Inception".to_string(),
        };
        assert_eq!(error.to_string(), "MovieRank not found: 7/Inception");
    }

    #[test]
    fn test_movie_not_found_builds_composite_id() {
        assert_eq!(
            RepositoryError::movie_not_found(7, "Inception"),
            RepositoryError::NotFound {
                entity_type: "MovieRank",
                id: "7/Inception".to_string(),
            }
        );
    }

    #[test]
    fn test_repository_error_store_unavailable_display() {
        let error = RepositoryError::StoreUnavailable("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Store unavailable: timeout after 30s");
    }

    #[test]
    fn test_repository_error_store_rejected_display() {
        let error = RepositoryError::StoreRejected("invalid key type".to_string());
        assert_eq!(
            error.to_string(),
            "Store rejected request: invalid key type"
        );
    }

    #[test]
    fn test_repository_error_mapping_display() {
        let error = RepositoryError::Mapping("Missing or invalid field: Ranking".to_string());
        assert_eq!(
            error.to_string(),
            "Mapping error: Missing or invalid field: Ranking"
        );
    }
}
