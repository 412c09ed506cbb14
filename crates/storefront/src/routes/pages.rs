//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::PageContext;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub ctx: PageContext,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub ctx: PageContext,
}

/// Payment success page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct PaymentSuccessTemplate {
    pub ctx: PageContext,
}

/// Display the about page.
pub async fn about(ctx: PageContext) -> impl IntoResponse {
    AboutTemplate { ctx }
}

/// Display the contact page.
pub async fn contact(ctx: PageContext) -> impl IntoResponse {
    ContactTemplate { ctx }
}

/// Display the payment success page.
pub async fn payment_success(ctx: PageContext) -> impl IntoResponse {
    PaymentSuccessTemplate { ctx }
}
