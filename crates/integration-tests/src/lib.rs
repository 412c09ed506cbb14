//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a scratch database; migrations run automatically
//! export TEST_DATABASE_URL=postgres://localhost/shopfront_test
//!
//! cargo test -p shopfront-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - product filtering and category upserts against `PostgreSQL`
//!
//! Every test tags its rows with a fresh UUID so runs can share a database.
