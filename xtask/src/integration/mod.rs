//! Integration test infrastructure.
//!
//! Runs the DynamoDB repository tests of the `movierank` crate against a
//! DynamoDB Local container.
//!
//! # Usage
//!
//! ```bash
//! # Start DynamoDB Local, deploy the table, run the tests, stop the container
//! cargo xtask integration
//!
//! # Skip container management (assumes DynamoDB Local is already running)
//! cargo xtask integration --no-docker
//! ```

mod containers;
pub mod error;

pub use error::{IntegrationError, Result};

use std::time::Duration;

use containers::{
    detect_runtime, is_running, start_container, stop_container, wait_for_health,
    ContainerRuntime, DYNAMODB_SPEC,
};

use crate::prelude::*;

/// Table used by the integration run, kept apart from the default one.
const TEST_TABLE_NAME: &str = "MovieRankIntegration";

/// Integration test command.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Run integration tests against DynamoDB Local.

This command starts a DynamoDB Local container, deploys the MovieRank table
with `cargo xtask dynamodb deploy`, then runs the movierank test suite with
the `dynamodb` storage feature, including the tests that need a live store.
The container is stopped afterward.")]
pub struct IntegrationCommand {
    /// Skip Docker container management (assume services are already running).
    #[arg(long)]
    pub no_docker: bool,

    /// Keep containers running after tests complete.
    #[arg(long)]
    pub keep_containers: bool,

    /// Timeout in seconds for container health checks.
    #[arg(long, default_value = "30")]
    pub health_timeout: u64,
}

/// Environment shared by the table setup and the test run.
fn local_env() -> Vec<(&'static str, String)> {
    vec![
        (
            "AWS_ENDPOINT_URL",
            format!("http://localhost:{}", DYNAMODB_SPEC.port),
        ),
        ("AWS_REGION", "us-east-1".to_string()),
        ("AWS_ACCESS_KEY_ID", "test".to_string()),
        ("AWS_SECRET_ACCESS_KEY", "test".to_string()),
        ("MOVIERANK_TABLE_NAME", TEST_TABLE_NAME.to_string()),
    ]
}

/// Arguments for the `cargo test` invocation.
fn cargo_test_args() -> Vec<&'static str> {
    vec![
        "test",
        "-p",
        "movierank",
        "--no-default-features",
        "--features",
        "dynamodb",
        "--",
        "--include-ignored",
    ]
}

/// Main entry point for integration command.
pub async fn run(command: IntegrationCommand, global: crate::Global) -> Result<()> {
    if !global.is_silent() {
        aprintln!("{}", p_b("Integration Tests"));
        aprintln!();
    }

    let runtime = if command.no_docker {
        if !global.is_silent() {
            aprintln!(
                "{} {}",
                p_y("⚠️"),
                "Skipping DynamoDB container management (--no-docker)"
            );
        }
        None
    } else {
        Some(detect_runtime().await?)
    };

    let mut dynamodb_started = false;
    if let Some(rt) = runtime {
        dynamodb_started = start_dynamodb_container(command.health_timeout, &global, rt).await?;
    }

    let outcome = setup_and_test(&global).await;

    // Cleanup containers
    if !command.keep_containers {
        if let (Some(rt), true) = (runtime, dynamodb_started) {
            stop_dynamodb_container(&global, rt).await?;
        }
    } else if dynamodb_started && !global.is_silent() {
        aprintln!(
            "{} {}",
            p_y("⚠️"),
            "Containers left running (--keep-containers)"
        );
    }

    let passed = outcome?;

    aprintln!();
    if passed {
        aprintln!("{} {}", p_g("✅"), p_g("All integration tests passed!"));
        Ok(())
    } else {
        aprintln!("{} {}", p_r("❌"), p_r("Some integration tests failed"));
        Err(IntegrationError::TestsFailed)
    }
}

async fn setup_and_test(global: &crate::Global) -> Result<bool> {
    if !global.is_silent() {
        aprintln!("{} {}", p_b("📦"), "Setting up test table...");
    }
    setup_test_table(global).await?;

    if !global.is_silent() {
        aprintln!(
            "{} {}",
            p_b("🔧"),
            p_b("Running DynamoDB integration tests...")
        );
    }
    run_tests(global).await
}

/// Run the movierank tests with the DynamoDB backend.
async fn run_tests(global: &crate::Global) -> Result<bool> {
    let mut cmd = tokio::process::Command::new("cargo");
    cmd.args(cargo_test_args());
    for (key, value) in local_env() {
        cmd.env(key, value);
    }

    let status = cmd.status().await?;

    if status.success() {
        if !global.is_silent() {
            aprintln!("{} dynamodb tests passed", p_g("✅"));
        }
        Ok(true)
    } else {
        aprintln!("{} dynamodb tests failed", p_r("❌"));
        Ok(false)
    }
}

/// Start the DynamoDB Local container.
///
/// Returns false when a container was already running and was left alone.
async fn start_dynamodb_container(
    timeout_secs: u64,
    global: &crate::Global,
    runtime: ContainerRuntime,
) -> Result<bool> {
    if is_running(runtime, DYNAMODB_SPEC.name).await? {
        if !global.is_silent() {
            aprintln!(
                "{} {}",
                p_y("⚠️"),
                "DynamoDB Local container already running"
            );
        }
        return Ok(false);
    }

    if !global.is_silent() {
        aprintln!("{} {}", p_b("🐳"), "Starting DynamoDB Local container...");
    }

    start_container(runtime, &DYNAMODB_SPEC).await?;

    if !global.is_silent() {
        aprintln!(
            "{} {}",
            p_b("⏳"),
            format!("Waiting for container health (max {}s)...", timeout_secs)
        );
    }

    wait_for_health(&DYNAMODB_SPEC, Duration::from_secs(timeout_secs)).await?;

    if !global.is_silent() {
        aprintln!("{} {}", p_g("✅"), "DynamoDB Local is ready");
    }

    Ok(true)
}

/// Stop the DynamoDB Local container.
async fn stop_dynamodb_container(global: &crate::Global, runtime: ContainerRuntime) -> Result<()> {
    if !global.is_silent() {
        aprintln!("{} {}", p_b("🐳"), "Stopping DynamoDB Local container...");
    }

    stop_container(runtime, DYNAMODB_SPEC.name).await?;

    if !global.is_silent() {
        aprintln!("{} {}", p_g("✅"), "DynamoDB container stopped");
    }

    Ok(())
}

/// Deploy the test table through the dynamodb subcommand.
async fn setup_test_table(global: &crate::Global) -> Result<()> {
    let mut cmd = tokio::process::Command::new("cargo");
    cmd.args([
        "xtask",
        "--silent",
        "dynamodb",
        "deploy",
        "--force",
        "--on-demand",
        "--table-name",
        TEST_TABLE_NAME,
    ]);
    for (key, value) in local_env() {
        cmd.env(key, value);
    }

    let status = cmd.status().await?;

    if !status.success() {
        return Err(IntegrationError::TableSetupFailed {
            table_name: TEST_TABLE_NAME.to_string(),
            exit_code: status.code(),
        });
    }

    if !global.is_silent() {
        aprintln!("{} {}", p_g("✅"), "Test table ready");
    }

    Ok(())
}
