//! Category queries.

use sqlx::PgPool;

use shopfront_core::CategoryId;

use super::RepositoryError;
use crate::models::Category;
use crate::seed::{CategoryStore, SeedOutcome};

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct UpsertRow {
    id: CategoryId,
    name: String,
    created: bool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM shop.category ORDER BY name")
                .fetch_all(self.pool)
                .await?;
        Ok(categories)
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM shop.category WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(category)
    }

    /// Get a category by its unique name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM shop.category WHERE name = $1")
                .bind(name)
                .fetch_optional(self.pool)
                .await?;
        Ok(category)
    }

    /// Insert a category unless one with the same name exists.
    ///
    /// Returns the category and whether this call created it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, name: &str) -> Result<(Category, bool), RepositoryError> {
        // The outer SELECT cannot see the row inserted by the CTE, so exactly
        // one branch yields a row.
        let row = sqlx::query_as::<_, UpsertRow>(
            r"
            WITH inserted AS (
                INSERT INTO shop.category (name)
                VALUES ($1)
                ON CONFLICT (name) DO NOTHING
                RETURNING id, name
            )
            SELECT id, name, TRUE AS created FROM inserted
            UNION ALL
            SELECT id, name, FALSE AS created FROM shop.category WHERE name = $1
            LIMIT 1
            ",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        if let Some(row) = row {
            return Ok((
                Category {
                    id: row.id,
                    name: row.name,
                },
                row.created,
            ));
        }

        // A concurrent insert committed after our snapshot was taken.
        let existing = self.get_by_name(name).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("category {name:?} vanished during upsert"))
        })?;
        Ok((existing, false))
    }
}

impl CategoryStore for CategoryRepository<'_> {
    type Error = RepositoryError;

    async fn ensure_category(&self, name: &str) -> Result<SeedOutcome, Self::Error> {
        let (_, created) = self.get_or_create(name).await?;
        Ok(if created {
            SeedOutcome::Created
        } else {
            SeedOutcome::AlreadyExists
        })
    }
}
