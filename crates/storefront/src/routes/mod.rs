//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET       /                    - Home page (available products)
//! GET       /health              - Liveness check
//! GET       /health/ready        - Readiness check (database)
//!
//! # Catalog
//! GET       /products            - Filtered product listing
//! GET       /product/{id}        - Product detail
//! GET       /search?q=           - Name/description search
//!
//! # Cart
//! GET       /cart                - Cart page
//! GET, POST /cart/add/{id}       - Add one unit, redirect to /cart
//! GET, POST /cart/remove/{id}    - Remove line, redirect to /cart
//!
//! # Checkout
//! GET, POST /checkout            - Checkout form / submit
//! GET       /payment/success     - Success page
//!
//! # Auth
//! GET, POST /register            - Registration
//! GET, POST /login               - Login
//! GET, POST /logout              - Logout
//!
//! # Pages
//! GET       /about
//! GET       /contact
//! ```
//!
//! Paths are registered without a trailing slash; [`into_service`] trims
//! one from incoming requests so `/cart/` and `/cart` are the same route.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod pages;
pub mod products;
pub mod search;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
};
use tower::Layer;
use tower_http::{
    normalize_path::{NormalizePath, NormalizePathLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{id}", get(cart::add).post(cart::add))
        .route("/remove/{id}", get(cart::remove).post(cart::remove))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        // Catalog
        .route("/products", get(products::index))
        .route("/product/{id}", get(products::show))
        .route("/search", get(search::search))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::form).post(checkout::submit))
        .route("/payment/success", get(pages::payment_success))
        // Static pages
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .merge(auth_routes())
}

/// Build the full application router: pages, health checks, static assets,
/// and the middleware stack, using `sessions` for session storage.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", static_dir)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(sessions)
        .with_state(state)
}

/// Wrap a router so a trailing slash is trimmed before routing.
///
/// This has to sit outside the `Router`; a layer added with
/// `Router::layer` runs after the route has already been matched.
pub fn into_service(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
