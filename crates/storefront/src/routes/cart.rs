//! Cart route handlers.
//!
//! Add and remove are plain links (GET) or form posts (POST) that redirect
//! back to the cart page. The cart page re-prices every line from the
//! database and writes the cleaned cart back to the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{Price, ProductId};

use crate::cart::{self, CartLine, ProductLookup};
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub ctx: PageContext,
    pub lines: Vec<CartLine>,
    pub total: Price,
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Display the cart.
///
/// # Errors
///
/// Returns an error if the product lookup or the session write fails.
#[instrument(skip(state, session, ctx))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
) -> Result<impl IntoResponse> {
    render(&session, ctx, &ProductRepository::new(state.pool())).await
}

/// Price the session cart against `lookup` and store the cleaned cart.
///
/// The cart is written back even when nothing was pruned.
///
/// # Errors
///
/// Returns an error if the product lookup or the session write fails.
pub async fn render<L>(
    session: &Session,
    mut ctx: PageContext,
    lookup: &L,
) -> Result<CartTemplate>
where
    L: ProductLookup,
    AppError: From<L::Error>,
{
    let current = cart::load(session).await;
    let products = lookup.find_products(&current.product_ids()).await?;

    let summary = current.resolve(&products);
    if !summary.pruned.is_empty() {
        tracing::info!(pruned = ?summary.pruned, "Dropped stale cart entries");
    }
    cart::store(session, &summary.cart).await?;

    ctx.cart_count = summary.cart.item_count();

    Ok(CartTemplate {
        ctx,
        lines: summary.lines,
        total: summary.total,
    })
}

/// Add one unit of a product to the cart.
///
/// The product is not looked up here; unknown ids are pruned on the next
/// cart view.
///
/// # Errors
///
/// Returns 404 for a non-numeric id, or an error if the session write fails.
#[instrument(skip(session))]
pub async fn add(session: Session, Path(id): Path<String>) -> Result<Redirect> {
    let product_id = parse_product_id(&id)?;

    let mut current = cart::load(&session).await;
    current.add(product_id);
    cart::store(&session, &current).await?;

    tracing::debug!(%product_id, quantity = current.quantity(product_id), "Added to cart");
    Ok(Redirect::to("/cart"))
}

/// Remove a product from the cart entirely.
///
/// # Errors
///
/// Returns 404 for a non-numeric id, or an error if the session write fails.
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(id): Path<String>) -> Result<Redirect> {
    let product_id = parse_product_id(&id)?;

    let mut current = cart::load(&session).await;
    if current.remove(product_id) {
        cart::store(&session, &current).await?;
        tracing::debug!(%product_id, "Removed from cart");
    }

    Ok(Redirect::to("/cart"))
}
