//! Integration tests for the catalog queries.
//!
//! These tests require a `PostgreSQL` database reachable through
//! `TEST_DATABASE_URL` (falls back to `DATABASE_URL`).
//!
//! Run with: cargo test -p shopfront-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use shopfront_core::{CategoryId, Price, ProductId};
use shopfront_storefront::catalog::{CatalogFilter, ProductListQuery};
use shopfront_storefront::db::{CategoryRepository, ProductRepository};
use sqlx::PgPool;
use uuid::Uuid;

async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("TEST_DATABASE_URL or DATABASE_URL must be set");
    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("../storefront/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// A category private to one test run.
async fn fresh_category(pool: &PgPool) -> CategoryId {
    let name = format!("Test {}", Uuid::new_v4());
    let (category, created) = CategoryRepository::new(pool)
        .get_or_create(&name)
        .await
        .unwrap();
    assert!(created);
    category.id
}

async fn insert_product(
    pool: &PgPool,
    category: CategoryId,
    name: &str,
    description: &str,
    price: &str,
    available: bool,
) -> ProductId {
    sqlx::query_scalar::<_, ProductId>(
        "INSERT INTO shop.product (name, description, price, available, category_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(name)
    .bind(description)
    .bind(Price::parse(price).unwrap())
    .bind(available)
    .bind(category)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Desk lamp 25.00 (available), paperback 12.00 (available),
/// running shoes 89.00 (unavailable).
async fn seed_catalog(pool: &PgPool, token: &str) -> (CategoryId, [ProductId; 3]) {
    let category = fresh_category(pool).await;
    let lamp = insert_product(
        pool,
        category,
        &format!("Desk Lamp {token}"),
        "Warm LED light",
        "25.00",
        true,
    )
    .await;
    let novel = insert_product(
        pool,
        category,
        &format!("Paperback Novel {token}"),
        "A long story",
        "12.00",
        true,
    )
    .await;
    let shoes = insert_product(
        pool,
        category,
        &format!("Running Shoes {token}"),
        "Light and fast",
        "89.00",
        false,
    )
    .await;
    (category, [lamp, novel, shoes])
}

fn category_query(category: CategoryId) -> ProductListQuery {
    ProductListQuery {
        category: Some(category.to_string()),
        ..ProductListQuery::default()
    }
}

async fn list_ids(pool: &PgPool, query: &ProductListQuery) -> Vec<ProductId> {
    ProductRepository::new(pool)
        .list(&CatalogFilter::from_query(query))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect()
}

// =============================================================================
// Product Listing Tests
// =============================================================================

#[tokio::test]
#[ignore = "Requires database"]
async fn test_list_by_category_in_id_order() {
    let pool = test_pool().await;
    let token = Uuid::new_v4().to_string();
    let (category, [lamp, novel, shoes]) = seed_catalog(&pool, &token).await;

    let ids = list_ids(&pool, &category_query(category)).await;
    assert_eq!(ids, vec![lamp, novel, shoes]);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_list_text_matches_name_or_description_case_insensitive() {
    let pool = test_pool().await;
    let token = Uuid::new_v4().to_string();
    let (category, [lamp, _, shoes]) = seed_catalog(&pool, &token).await;

    let by_name = ProductListQuery {
        q: Some(format!("desk lamp {}", token.to_uppercase())),
        ..category_query(category)
    };
    assert_eq!(list_ids(&pool, &by_name).await, vec![lamp]);

    let by_description = ProductListQuery {
        q: Some("LIGHT".to_string()),
        ..category_query(category)
    };
    assert_eq!(list_ids(&pool, &by_description).await, vec![lamp, shoes]);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_list_price_bounds_are_inclusive() {
    let pool = test_pool().await;
    let token = Uuid::new_v4().to_string();
    let (category, [lamp, novel, _]) = seed_catalog(&pool, &token).await;

    let query = ProductListQuery {
        min_price: Some("12".to_string()),
        max_price: Some("25.00".to_string()),
        ..category_query(category)
    };
    assert_eq!(list_ids(&pool, &query).await, vec![lamp, novel]);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_list_ignores_malformed_price() {
    let pool = test_pool().await;
    let token = Uuid::new_v4().to_string();
    let (category, [lamp, novel, shoes]) = seed_catalog(&pool, &token).await;

    let query = ProductListQuery {
        min_price: Some("cheap".to_string()),
        ..category_query(category)
    };
    assert_eq!(list_ids(&pool, &query).await, vec![lamp, novel, shoes]);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_list_availability() {
    let pool = test_pool().await;
    let token = Uuid::new_v4().to_string();
    let (category, [lamp, novel, shoes]) = seed_catalog(&pool, &token).await;

    let available = ProductListQuery {
        availability: Some("available".to_string()),
        ..category_query(category)
    };
    assert_eq!(list_ids(&pool, &available).await, vec![lamp, novel]);

    let unavailable = ProductListQuery {
        availability: Some("unavailable".to_string()),
        ..category_query(category)
    };
    assert_eq!(list_ids(&pool, &unavailable).await, vec![shoes]);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_list_treats_like_wildcards_literally() {
    let pool = test_pool().await;
    let category = fresh_category(&pool).await;
    let token = Uuid::new_v4().simple().to_string();
    let literal = insert_product(
        &pool,
        category,
        &format!("100% Cotton {token}"),
        "",
        "20.00",
        true,
    )
    .await;
    insert_product(
        &pool,
        category,
        &format!("1000 Cotton {token}"),
        "",
        "20.00",
        true,
    )
    .await;

    let query = ProductListQuery {
        q: Some("100%".to_string()),
        ..category_query(category)
    };
    assert_eq!(list_ids(&pool, &query).await, vec![literal]);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_search_blank_term_returns_nothing() {
    let pool = test_pool().await;
    let token = Uuid::new_v4().to_string();
    seed_catalog(&pool, &token).await;

    let repo = ProductRepository::new(&pool);
    assert!(repo.search("   ").await.unwrap().is_empty());
    assert_eq!(repo.search(&token).await.unwrap().len(), 3);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_get_many_skips_missing_ids() {
    let pool = test_pool().await;
    let token = Uuid::new_v4().to_string();
    let (_, [lamp, _, _]) = seed_catalog(&pool, &token).await;

    let found = ProductRepository::new(&pool)
        .get_many(&[lamp, ProductId::new(i32::MAX)])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[&lamp].price, Price::from_cents(2_500));
}

// =============================================================================
// Category Tests
// =============================================================================

#[tokio::test]
#[ignore = "Requires database"]
async fn test_category_get_or_create_is_idempotent() {
    let pool = test_pool().await;
    let repo = CategoryRepository::new(&pool);
    let name = format!("Seeded {}", Uuid::new_v4());

    let (first, created) = repo.get_or_create(&name).await.unwrap();
    assert!(created);
    assert_eq!(first.name, name);

    let (second, created) = repo.get_or_create(&name).await.unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);

    assert_eq!(repo.get(first.id).await.unwrap(), Some(first));
}
