//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Product;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub products: Vec<Product>,
}

/// Display the home page with every product that can be ordered.
///
/// # Errors
///
/// Returns an error if the product query fails.
#[instrument(skip(state, ctx))]
pub async fn home(State(state): State<AppState>, ctx: PageContext) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool()).list_available().await?;

    Ok(HomeTemplate { ctx, products })
}
