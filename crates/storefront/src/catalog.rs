//! Catalog query layer.
//!
//! Turns the product listing's query string into a [`CatalogFilter`], which
//! is rendered into a SQL `WHERE` clause (`push_where`):
//!
//! - `q` matches name OR description, case-insensitive substring
//! - `category` restricts to one category id
//! - `availability` is `available`, `unavailable`, or anything else (no filter)
//! - `min_price` / `max_price` are inclusive bounds
//!
//! Malformed values never produce an error: a `min_price` of `"cheap"` or a
//! `category` of `"abc"` simply drops that clause.

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use shopfront_core::{CategoryId, Price};

/// Raw query parameters accepted by `/products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub availability: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// Availability filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Availability {
    /// No availability filter.
    #[default]
    Any,
    /// Only products that can be ordered.
    Available,
    /// Only products that cannot be ordered.
    Unavailable,
}

impl Availability {
    /// Parse the `availability` query value; unknown values mean [`Availability::Any`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "available" => Self::Available,
            "unavailable" => Self::Unavailable,
            _ => Self::Any,
        }
    }

    /// The query-string value for this filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }

    const fn required(self) -> Option<bool> {
        match self {
            Self::Any => None,
            Self::Available => Some(true),
            Self::Unavailable => Some(false),
        }
    }
}

/// A validated set of product filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub text: Option<String>,
    pub category: Option<CategoryId>,
    pub availability: Availability,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl CatalogFilter {
    /// Build a filter from raw query parameters, ignoring anything malformed.
    #[must_use]
    pub fn from_query(query: &ProductListQuery) -> Self {
        Self {
            text: query.q.as_deref().and_then(search_term).map(str::to_owned),
            category: non_empty(query.category.as_deref()).and_then(|c| c.parse().ok()),
            availability: query
                .availability
                .as_deref()
                .map(Availability::parse)
                .unwrap_or_default(),
            min_price: parse_price_bound(query.min_price.as_deref()),
            max_price: parse_price_bound(query.max_price.as_deref()),
        }
    }

    /// Filter matching name or description only.
    #[must_use]
    pub fn text(term: &str) -> Self {
        Self {
            text: Some(term.to_owned()),
            ..Self::default()
        }
    }

    /// Filter matching only orderable products.
    #[must_use]
    pub fn available_only() -> Self {
        Self {
            availability: Availability::Available,
            ..Self::default()
        }
    }

    /// Whether any clause is active.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.category.is_none()
            && matches!(self.availability, Availability::Any)
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// The `ILIKE` pattern bound for the text clause.
    fn text_pattern(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(|text| format!("%{}%", escape_like(text)))
    }

    /// Append a `WHERE` clause for this filter to a product query.
    ///
    /// Pushes nothing when the filter is empty.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut first = true;

        if let Some(pattern) = self.text_pattern() {
            push_conjunction(qb, &mut first);
            qb.push("(name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR description ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(category) = self.category {
            push_conjunction(qb, &mut first);
            qb.push("category_id = ");
            qb.push_bind(category);
        }

        if let Some(required) = self.availability.required() {
            push_conjunction(qb, &mut first);
            qb.push("available = ");
            qb.push_bind(required);
        }

        if let Some(min) = self.min_price {
            push_conjunction(qb, &mut first);
            qb.push("price >= ");
            qb.push_bind(min);
        }

        if let Some(max) = self.max_price {
            push_conjunction(qb, &mut first);
            qb.push("price <= ");
            qb.push_bind(max);
        }
    }
}

/// Normalize a free-text search term. Blank input yields `None`.
#[must_use]
pub fn search_term(raw: &str) -> Option<&str> {
    non_empty(Some(raw))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price_bound(value: Option<&str>) -> Option<Price> {
    let raw = non_empty(value)?;
    match Price::parse(raw) {
        Ok(price) => Some(price),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "Ignoring invalid price filter");
            None
        }
    }
}

fn push_conjunction(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool) {
    if *first {
        qb.push(" WHERE ");
        *first = false;
    } else {
        qb.push(" AND ");
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ProductListQuery {
        let mut q = ProductListQuery::default();
        for (key, value) in pairs {
            let value = Some((*value).to_string());
            match *key {
                "q" => q.q = value,
                "category" => q.category = value,
                "availability" => q.availability = value,
                "min_price" => q.min_price = value,
                "max_price" => q.max_price = value,
                other => panic!("unknown key {other}"),
            }
        }
        q
    }

    fn where_sql(filter: &CatalogFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM product");
        filter.push_where(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_empty_query_is_empty_filter() {
        let filter = CatalogFilter::from_query(&ProductListQuery::default());
        assert!(filter.is_empty());
        assert_eq!(filter, CatalogFilter::default());
    }

    #[test]
    fn test_blank_values_are_absent() {
        let filter = CatalogFilter::from_query(&query(&[
            ("q", "   "),
            ("category", ""),
            ("min_price", ""),
            ("max_price", " "),
        ]));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_text_is_trimmed_and_escaped_into_pattern() {
        let filter = CatalogFilter::from_query(&query(&[("q", "  100%_Cotton ")]));
        assert_eq!(filter.text.as_deref(), Some("100%_Cotton"));
        assert_eq!(filter.text_pattern().as_deref(), Some("%100\\%\\_Cotton%"));
        assert_eq!(CatalogFilter::default().text_pattern(), None);
    }

    #[test]
    fn test_availability_values() {
        let parse = |v| CatalogFilter::from_query(&query(&[("availability", v)])).availability;
        assert_eq!(parse("available"), Availability::Available);
        assert_eq!(parse("unavailable"), Availability::Unavailable);
        assert_eq!(parse("maybe"), Availability::Any);
        assert_eq!(parse("AVAILABLE"), Availability::Any);
    }

    #[test]
    fn test_price_bounds_parse() {
        let filter =
            CatalogFilter::from_query(&query(&[("min_price", "12"), ("max_price", "25.00")]));
        assert_eq!(filter.min_price, Some(Price::from_cents(1_200)));
        assert_eq!(filter.max_price, Some(Price::from_cents(2_500)));
    }

    #[test]
    fn test_invalid_price_is_ignored() {
        let filter = CatalogFilter::from_query(&query(&[
            ("min_price", "cheap"),
            ("max_price", "lots"),
        ]));
        assert!(filter.min_price.is_none());
        assert!(filter.max_price.is_none());
        assert_eq!(where_sql(&filter), "SELECT id FROM product");

        // A valid bound still applies when the other one is garbage
        let filter = CatalogFilter::from_query(&query(&[
            ("min_price", "cheap"),
            ("max_price", "20"),
        ]));
        assert_eq!(filter.max_price, Some(Price::from_cents(2_000)));
        assert_eq!(where_sql(&filter), "SELECT id FROM product WHERE price <= $1");
    }

    #[test]
    fn test_invalid_category_is_ignored() {
        let filter = CatalogFilter::from_query(&query(&[("category", "books")]));
        assert!(filter.category.is_none());

        let filter = CatalogFilter::from_query(&query(&[("category", "-2")]));
        assert!(filter.category.is_none());

        let filter = CatalogFilter::from_query(&query(&[("category", " 2 ")]));
        assert_eq!(filter.category, Some(CategoryId::new(2)));
    }

    #[test]
    fn test_push_where_empty_filter_adds_nothing() {
        assert_eq!(where_sql(&CatalogFilter::default()), "SELECT id FROM product");
    }

    #[test]
    fn test_push_where_all_clauses() {
        let filter = CatalogFilter::from_query(&query(&[
            ("q", "lamp"),
            ("category", "4"),
            ("availability", "available"),
            ("min_price", "1"),
            ("max_price", "99.99"),
        ]));

        assert_eq!(
            where_sql(&filter),
            "SELECT id FROM product WHERE (name ILIKE $1 OR description ILIKE $2) \
             AND category_id = $3 AND available = $4 AND price >= $5 AND price <= $6"
        );
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_search_term() {
        assert_eq!(search_term(""), None);
        assert_eq!(search_term("  "), None);
        assert_eq!(search_term(" lamp "), Some("lamp"));
    }
}
