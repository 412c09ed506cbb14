//! User domain types.

use chrono::{DateTime, Utc};

use shopfront_core::{Email, UserId};

/// A registered storefront user.
///
/// The password hash lives in a separate table and is only loaded by the
/// login path (see `UserRepository::get_password_hash`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
