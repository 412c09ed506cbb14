//! Domain models for storefront.
//!
//! Row types are decoded with `sqlx::FromRow` and handed straight to
//! route handlers; the catalog is read-only from the storefront's side.

pub mod session;
pub mod user;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfront_core::{CategoryId, Price, ProductId};

pub use session::{CurrentUser, keys as session_keys};
pub use user::User;

/// A product in the catalog.
///
/// Products are created and edited out of band; the storefront only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Whether the product can currently be ordered.
    pub available: bool,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
}

/// A product category. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
