//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Path normalization (trailing slash trimmed before routing)
//! 2. Sentry layers (capture errors, transactions)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. `TraceLayer` (request span with `request_id` field)
//! 5. Request ID (reuse or mint `x-request-id`)
//! 6. Security headers

pub mod auth;
pub mod page_context;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, clear_current_user, set_current_user};
pub use page_context::PageContext;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
