//! Checkout stub.
//!
//! There is no payment provider: submitting the form always succeeds and
//! the cart is left as it was.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect};
use tracing::instrument;

use crate::filters;
use crate::middleware::PageContext;

/// Checkout form template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutTemplate {
    pub ctx: PageContext,
}

/// Display the checkout form.
pub async fn form(ctx: PageContext) -> impl IntoResponse {
    CheckoutTemplate { ctx }
}

/// Accept the checkout form and go to the success page.
#[instrument]
pub async fn submit() -> Redirect {
    tracing::info!("Checkout submitted");
    Redirect::to("/payment/success")
}
