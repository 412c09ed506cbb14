//! Search route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::search_term;
use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Product;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search results page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub ctx: PageContext,
    pub query: String,
    pub products: Vec<Product>,
    /// False when the query was blank and no search ran.
    pub searched: bool,
}

/// Search products by name or description.
///
/// A blank query shows no results rather than the whole catalog.
///
/// # Errors
///
/// Returns an error if the product query fails.
#[instrument(skip(state, ctx))]
pub async fn search(
    State(state): State<AppState>,
    ctx: PageContext,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let (products, searched) = match search_term(&query.q) {
        Some(term) => (ProductRepository::new(state.pool()).search(term).await?, true),
        None => (Vec::new(), false),
    };

    Ok(SearchTemplate {
        ctx,
        query: query.q.trim().to_string(),
        products,
        searched,
    })
}
