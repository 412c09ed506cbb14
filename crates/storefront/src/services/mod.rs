//! Business logic services.
//!
//! Services sit between route handlers and repositories when an operation
//! needs more than a single query (hashing, validation, multi-step writes).

pub mod auth;

pub use auth::{AuthError, AuthService};
