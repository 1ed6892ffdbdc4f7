use std::{env, time::Duration};

use movierank_core::storage::schema::TABLE_NAME;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB table name (default: "MovieRank")
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub table_name: String,
    /// Endpoint override, e.g. DynamoDB Local (default: none)
    #[allow(dead_code)]
    pub aws_endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    #[allow(dead_code)]
    pub aws_region: String,
    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MOVIERANK_TABLE_NAME` - DynamoDB table name (default: "MovieRank")
    /// - `AWS_ENDPOINT_URL` - Endpoint override (default: none)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: lookup("MOVIERANK_TABLE_NAME").unwrap_or_else(|| TABLE_NAME.to_string()),
            aws_endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|v| !v.is_empty()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            request_timeout_seconds: lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config {
            table_name: "MovieRank".to_string(),
            aws_endpoint_url: None,
            aws_region: "us-east-1".to_string(),
            request_timeout_seconds: 30,
        };

        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(|_| None);

        assert_eq!(config.table_name, "MovieRank");
        assert_eq!(config.aws_endpoint_url, None);
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.request_timeout_seconds, 10);
    }

    #[test]
    fn test_values_from_environment() {
        let vars = HashMap::from([
            ("MOVIERANK_TABLE_NAME", "MovieRankTest"),
            ("AWS_ENDPOINT_URL", "http://localhost:8000"),
            ("AWS_REGION", "eu-west-1"),
            ("REQUEST_TIMEOUT_SECONDS", "3"),
        ]);

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.table_name, "MovieRankTest");
        assert_eq!(
            config.aws_endpoint_url.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_empty_endpoint_and_bad_timeout_fall_back() {
        let vars = HashMap::from([
            ("AWS_ENDPOINT_URL", ""),
            ("REQUEST_TIMEOUT_SECONDS", "soon"),
        ]);

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.aws_endpoint_url, None);
        assert_eq!(config.request_timeout_seconds, 10);
    }
}
