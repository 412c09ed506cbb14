//! Per-request data shared by every page layout.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::auth::OptionalAuth;
use crate::cart;

/// Header data for the base layout: who is logged in and how full the cart is.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user_email: Option<String>,
    pub cart_count: u32,
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalAuth(user) = OptionalAuth::from_request_parts(parts, state).await?;

        let cart_count = match parts.extensions.get::<Session>() {
            Some(session) => cart::load(session).await.item_count(),
            None => 0,
        };

        Ok(Self {
            user_email: user.map(|u| u.email.into_inner()),
            cart_count,
        })
    }
}
