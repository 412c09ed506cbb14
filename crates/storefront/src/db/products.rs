//! Product queries.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use shopfront_core::ProductId;

use super::RepositoryError;
use crate::cart::ProductLookup;
use crate::catalog::CatalogFilter;
use crate::models::Product;

const SELECT_PRODUCTS: &str = "SELECT id, name, description, price, available, category_id, \
     created_at FROM shop.product";

/// Repository for read-only product access.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching a filter, in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_PRODUCTS);
        filter.push_where(&mut qb);
        qb.push(" ORDER BY id");

        let products = qb.build_query_as::<Product>().fetch_all(self.pool).await?;
        Ok(products)
    }

    /// List products that can currently be ordered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_available(&self) -> Result<Vec<Product>, RepositoryError> {
        self.list(&CatalogFilter::available_only()).await
    }

    /// Name-or-description substring search. A blank term matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, term: &str) -> Result<Vec<Product>, RepositoryError> {
        match crate::catalog::search_term(term) {
            Some(term) => self.list(&CatalogFilter::text(term)).await,
            None => Ok(Vec::new()),
        }
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCTS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(product)
    }

    /// Fetch the products that still exist among `ids`, keyed by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let products =
            sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCTS} WHERE id = ANY($1)"))
                .bind(raw)
                .fetch_all(self.pool)
                .await?;

        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }
}

impl ProductLookup for ProductRepository<'_> {
    type Error = RepositoryError;

    async fn find_products(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Product>, Self::Error> {
        self.get_many(ids).await
    }
}
