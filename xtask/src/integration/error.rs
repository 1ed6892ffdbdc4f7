//! Errors raised while running the DynamoDB Local integration suite.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntegrationError>;

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("No container runtime found: install docker or podman, or pass --no-docker")]
    NoContainerRuntime,

    #[error("Container operation failed: {0}")]
    ContainerFailed(String),

    /// DynamoDB Local never answered its health check.
    #[error("Container '{name}' did not become healthy within {timeout_secs}s")]
    ContainerNotHealthy { name: String, timeout_secs: u64 },

    #[error("Table '{table_name}' could not be deployed (exit code {})", exit_code_display(.exit_code))]
    TableSetupFailed {
        table_name: String,
        exit_code: Option<i32>,
    },

    #[error("The movierank DynamoDB test suite failed")]
    TestsFailed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_display(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}
