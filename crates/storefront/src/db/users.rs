//! User repository for database operations.
//!
//! Accounts and password hashes live in separate tables so that the hash is
//! only read on the login path.

use sqlx::PgPool;

use shopfront_core::Email;

use super::RepositoryError;
use crate::models::User;

/// Row shape for the login lookup.
#[derive(sqlx::FromRow)]
struct UserWithHash {
    #[sqlx(flatten)]
    user: User,
    password_hash: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with email and password hash in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO shop."user" (email)
            VALUES ($1)
            RETURNING id, email, created_at, updated_at
            "#,
        )
        .bind(email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "email"))?;

        sqlx::query(
            r"
            INSERT INTO shop.user_password (user_id, password_hash)
            VALUES ($1, $2)
            ",
        )
        .bind(user.id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Get a user together with their password hash.
    ///
    /// Returns `None` if the user doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHash>(
            r#"
            SELECT u.id, u.email, u.created_at, u.updated_at, p.password_hash
            FROM shop."user" u
            LEFT JOIN shop.user_password p ON u.id = p.user_id
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.and_then(|r| r.password_hash.map(|hash| (r.user, hash))))
    }
}
