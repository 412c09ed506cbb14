//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use shopfront_core::ProductId;

use crate::catalog::{Availability, CatalogFilter, ProductListQuery};
use crate::db::{categories::CategoryRepository, products::ProductRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::{Category, Product};
use crate::state::AppState;

/// One entry of the category `<select>`.
#[derive(Clone)]
pub struct CategoryOption {
    pub id: i32,
    pub name: String,
    pub selected: bool,
}

/// One entry of the availability `<select>`.
#[derive(Clone)]
pub struct AvailabilityOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Filter values echoed back into the form.
#[derive(Clone, Default)]
pub struct FilterForm {
    pub q: String,
    pub min_price: String,
    pub max_price: String,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub ctx: PageContext,
    pub products: Vec<Product>,
    pub categories: Vec<CategoryOption>,
    pub availability: Vec<AvailabilityOption>,
    pub form: FilterForm,
    pub filtered: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub ctx: PageContext,
    pub product: Product,
    pub category: Option<String>,
}

fn category_options(categories: Vec<Category>, filter: &CatalogFilter) -> Vec<CategoryOption> {
    categories
        .into_iter()
        .map(|c| CategoryOption {
            selected: filter.category == Some(c.id),
            id: c.id.as_i32(),
            name: c.name,
        })
        .collect()
}

fn availability_options(selected: Availability) -> Vec<AvailabilityOption> {
    [
        (Availability::Any, "Any"),
        (Availability::Available, "Available"),
        (Availability::Unavailable, "Unavailable"),
    ]
    .into_iter()
    .map(|(value, label)| AvailabilityOption {
        value: value.as_str(),
        label,
        selected: value == selected,
    })
    .collect()
}

/// Display the filtered product listing.
///
/// # Errors
///
/// Returns an error if a catalog query fails.
#[instrument(skip(state, ctx))]
pub async fn index(
    State(state): State<AppState>,
    ctx: PageContext,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse> {
    let filter = CatalogFilter::from_query(&query);

    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    let categories = CategoryRepository::new(state.pool()).list().await?;

    tracing::debug!(count = products.len(), ?filter, "Listed products");

    Ok(ProductsIndexTemplate {
        ctx,
        products,
        categories: category_options(categories, &filter),
        availability: availability_options(filter.availability),
        form: FilterForm {
            q: query.q.unwrap_or_default(),
            min_price: query.min_price.unwrap_or_default(),
            max_price: query.max_price.unwrap_or_default(),
        },
        filtered: !filter.is_empty(),
    })
}

/// Display a single product.
///
/// # Errors
///
/// Returns 404 if the id is not numeric or no such product exists.
#[instrument(skip(state, ctx))]
pub async fn show(
    State(state): State<AppState>,
    ctx: PageContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("product {id}")))?;

    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let category = match product.category_id {
        Some(category_id) => CategoryRepository::new(state.pool())
            .get(category_id)
            .await?
            .map(|c| c.name),
        None => None,
    };

    Ok(ProductShowTemplate {
        ctx,
        product,
        category,
    })
}
