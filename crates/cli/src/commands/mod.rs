//! CLI subcommands.

pub mod migrate;
pub mod seed;

use shopfront_storefront::config::{ConfigError, StorefrontConfig};
use shopfront_storefront::db::{self, RepositoryError};
use sqlx::PgPool;
use thiserror::Error;

/// Errors surfaced by any subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Connect to the storefront database using the storefront's own settings.
async fn connect() -> Result<PgPool, CommandError> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&config.database_url).await?;
    Ok(pool)
}
