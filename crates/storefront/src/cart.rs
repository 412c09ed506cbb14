//! Session-backed shopping cart.
//!
//! The cart is a map of product id (as a string) to quantity, stored in the
//! session under [`session_keys::CART`]. It holds no prices: totals are
//! recomputed from live product rows on every view, and keys whose product
//! no longer exists are dropped at that point.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use shopfront_core::{Price, ProductId};

use crate::models::{Product, session_keys};

/// Per-session cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<String, u32>,
}

/// One resolved cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
}

/// The result of joining a cart against live product data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Lines in ascending product id order.
    pub lines: Vec<CartLine>,
    /// Sum of `price × quantity` over `lines`.
    pub total: Price,
    /// The cart with stale keys removed.
    pub cart: Cart,
    /// Keys that were dropped because they reference no product.
    pub pruned: Vec<String>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the quantity for a product, starting from zero.
    pub fn add(&mut self, product_id: ProductId) {
        let quantity = self.lines.entry(product_id.to_string()).or_insert(0);
        *quantity = quantity.saturating_add(1);
    }

    /// Remove a product entirely, whatever its quantity.
    ///
    /// Returns `false` if the product was not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        self.lines.remove(&product_id.to_string()).is_some()
    }

    /// Quantity held for a product (zero when absent).
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.lines
            .get(&product_id.to_string())
            .copied()
            .unwrap_or(0)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .values()
            .fold(0, |acc, qty| acc.saturating_add(*qty))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Product ids referenced by the cart. Keys that are not ids are skipped.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.lines
            .keys()
            .filter_map(|key| key.parse().ok())
            .collect()
    }

    /// Join the cart against the products that currently exist.
    ///
    /// Lines whose key does not parse, whose product is missing from
    /// `products`, or whose quantity is zero are pruned.
    #[must_use]
    pub fn resolve(&self, products: &HashMap<ProductId, Product>) -> CartSummary {
        let mut lines = Vec::with_capacity(self.lines.len());
        let mut kept = BTreeMap::new();
        let mut pruned = Vec::new();

        for (key, &quantity) in &self.lines {
            let product = key
                .parse::<ProductId>()
                .ok()
                .and_then(|id| products.get(&id))
                .filter(|_| quantity > 0);

            match product {
                Some(product) => {
                    kept.insert(key.clone(), quantity);
                    lines.push(CartLine {
                        product: product.clone(),
                        quantity,
                        line_total: product.price.times(quantity),
                    });
                }
                None => pruned.push(key.clone()),
            }
        }

        lines.sort_by_key(|line| line.product.id);
        let total = lines.iter().map(|line| line.line_total).sum();

        CartSummary {
            lines,
            total,
            cart: Self { lines: kept },
            pruned,
        }
    }
}

impl FromIterator<(String, u32)> for Cart {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// Load the cart from the session. A missing or unreadable cart is empty.
pub async fn load(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable cart from session");
            Cart::default()
        }
    }
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Source of live product rows for pricing a cart.
pub trait ProductLookup {
    type Error;

    /// Fetch the products that still exist among `ids`, keyed by id.
    fn find_products(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<HashMap<ProductId, Product>, Self::Error>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use shopfront_core::CategoryId;

    use super::*;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(cents),
            available: true,
            category_id: Some(CategoryId::new(1)),
            created_at: Utc::now(),
        }
    }

    fn stock(products: &[Product]) -> HashMap<ProductId, Product> {
        products.iter().map(|p| (p.id, p.clone())).collect()
    }

    #[test]
    fn test_add_starts_at_one_and_increments() {
        let mut cart = Cart::new();
        let id = ProductId::new(5);

        cart.add(id);
        assert_eq!(cart.quantity(id), 1);
        cart.add(id);
        assert_eq!(cart.quantity(id), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_remove_deletes_whole_line() {
        let mut cart = Cart::new();
        let id = ProductId::new(5);
        cart.add(id);
        cart.add(id);
        cart.add(id);

        assert!(cart.remove(id));
        assert_eq!(cart.quantity(id), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1));
        let before = cart.clone();

        assert!(!cart.remove(ProductId::new(99)));
        assert!(!cart.remove(ProductId::new(99)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_session_shape_is_string_keyed_map() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(5));
        cart.add(ProductId::new(5));

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json, serde_json::json!({ "5": 2 }));

        let parsed: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, cart);
    }

    #[test]
    fn test_resolve_example_total_then_prune() {
        let cart: Cart = [("5".to_string(), 2)].into_iter().collect();

        let summary = cart.resolve(&stock(&[product(5, 1000)]));
        assert_eq!(summary.total, Price::from_cents(2000));
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].quantity, 2);
        assert_eq!(summary.lines[0].line_total, Price::from_cents(2000));
        assert_eq!(summary.cart, cart);
        assert!(summary.pruned.is_empty());

        // Product 5 deleted before the next view
        let summary = summary.cart.resolve(&HashMap::new());
        assert_eq!(summary.total, Price::ZERO);
        assert!(summary.lines.is_empty());
        assert!(summary.cart.is_empty());
        assert_eq!(summary.pruned, vec!["5".to_string()]);
    }

    #[test]
    fn test_resolve_prunes_garbage_and_zero_quantities() {
        let cart: Cart = [
            ("abc".to_string(), 1),
            ("1".to_string(), 0),
            ("2".to_string(), 3),
        ]
        .into_iter()
        .collect();

        let summary = cart.resolve(&stock(&[product(1, 500), product(2, 250)]));
        assert_eq!(summary.total, Price::from_cents(750));
        assert_eq!(summary.cart.product_ids(), vec![ProductId::new(2)]);
        assert_eq!(summary.pruned, vec!["1".to_string(), "abc".to_string()]);
    }

    #[test]
    fn test_resolve_orders_lines_by_product_id() {
        let cart: Cart = [("10".to_string(), 1), ("9".to_string(), 1)]
            .into_iter()
            .collect();

        let summary = cart.resolve(&stock(&[product(9, 100), product(10, 100)]));
        let order: Vec<i32> = summary.lines.iter().map(|l| l.product.id.as_i32()).collect();
        assert_eq!(order, vec![9, 10]);
    }

    #[test]
    fn test_total_matches_surviving_lines_for_mixed_sequence() {
        let products = [product(1, 199), product(2, 1050), product(3, 5)];
        let mut cart = Cart::new();

        for id in [1, 2, 2, 3, 4, 4, 1, 2] {
            cart.add(ProductId::new(id));
        }
        cart.remove(ProductId::new(3));
        cart.remove(ProductId::new(7));

        // Product 4 never existed
        let summary = cart.resolve(&stock(&products));
        let expected: Price = summary
            .lines
            .iter()
            .map(|l| l.product.price.times(l.quantity))
            .sum();

        assert_eq!(summary.total, expected);
        assert_eq!(summary.total, Price::from_cents(2 * 199 + 3 * 1050));
        assert_eq!(summary.pruned, vec!["4".to_string()]);
    }
}
