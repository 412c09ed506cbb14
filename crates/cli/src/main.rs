//! Shopfront CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create or update the storefront schema and the session table
//! sf-cli migrate
//!
//! # Insert the default product categories (safe to repeat)
//! sf-cli seed categories
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Log filter used when `RUST_LOG` is unset. Command output is logged at
/// INFO and WARN, so the default must admit both.
const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed reference data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create the default product categories
    Categories,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Categories => commands::seed::categories().await?,
        },
    }
    Ok(())
}
