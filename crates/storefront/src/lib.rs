//! Shopfront storefront library.
//!
//! Catalog browsing, a session cart, password accounts and a checkout stub,
//! served with axum. The binary in `main.rs` wires this library to a real
//! database and session store; tests drive the same router in memory.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
