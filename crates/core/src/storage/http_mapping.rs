//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `StoreUnavailable` -> 503 (Service Unavailable)
/// - `StoreRejected` -> 500 (Internal Server Error)
/// - `Mapping` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use movierank_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::movie_not_found(7, "Inception");
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::StoreUnavailable(_) => 503,
        RepositoryError::StoreRejected(_) => 500,
        RepositoryError::Mapping(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::movie_not_found(1, "Heat");
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_store_unavailable_maps_to_503() {
        let error = RepositoryError::StoreUnavailable("connection refused".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_store_rejected_maps_to_500() {
        let error = RepositoryError::StoreRejected("ValidationException".to_string());
        assert_eq!(repository_error_to_status_code(&error), 500);
    }

    #[test]
    fn test_mapping_maps_to_500() {
        let error = RepositoryError::Mapping("Missing or invalid field: UserId".to_string());
        assert_eq!(repository_error_to_status_code(&error), 500);
    }
}
