//! Seed reference data.

use tracing::{info, warn};

use shopfront_storefront::db::categories::CategoryRepository;
use shopfront_storefront::seed::{DEFAULT_CATEGORIES, SeedOutcome, seed_categories};

use super::{CommandError, connect};

/// Create every default category that does not exist yet.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn categories() -> Result<(), CommandError> {
    let pool = connect().await?;

    let report = seed_categories(&CategoryRepository::new(&pool), DEFAULT_CATEGORIES).await?;

    for (name, outcome) in &report.entries {
        match outcome {
            SeedOutcome::Created => info!("Created category: {name}"),
            SeedOutcome::AlreadyExists => warn!("Category already exists: {name}"),
        }
    }

    info!(
        created = report.created(),
        existing = report.existing(),
        "Category seeding completed"
    );
    Ok(())
}
