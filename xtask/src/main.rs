//! See <https://github.com/matklad/cargo-xtask/>
//!
//! This binary defines the auxiliary commands of the movierank workspace
//! that are not expressible with just `cargo`: table provisioning, the
//! DynamoDB Local integration run and demo data seeding.
//!
//! The binary is integrated into the `cargo` command line by using an
//! alias in `.cargo/config.toml`.

use clap::Parser;

mod dynamodb;
mod integration;
mod prelude;
mod seed;

/// Development tasks for the movierank repository
#[derive(Debug, Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for movierank", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: Global,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Silence the command output
    #[clap(long, global = true)]
    pub silent: bool,

    /// Enable verbose output
    #[clap(long, global = true)]
    pub verbose: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Manage DynamoDB infrastructure
    Dynamodb(dynamodb::DynamodbCommand),

    /// Run integration tests against DynamoDB Local
    Integration(integration::IntegrationCommand),

    /// Seed a running server with demo rankings
    Seed(seed::SeedCommand),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dynamodb(dynamodb_cmd) => {
            dynamodb::run(dynamodb_cmd, cli.global).await?;
        }
        Commands::Integration(integration_cmd) => {
            integration::run(integration_cmd, cli.global).await?;
        }
        Commands::Seed(seed_cmd) => {
            seed::run(seed_cmd, cli.global).await?;
        }
    }

    Ok(())
}
