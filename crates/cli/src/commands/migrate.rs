//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! sf-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Storefront migrations: `crates/storefront/migrations/`. The session table
//! is owned by `tower-sessions-sqlx-store` and created by its own migration.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Run storefront and session store migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Running session store migrations...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
