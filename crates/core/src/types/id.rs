//! Newtype IDs for type-safe entity references.
//!
//! Every table in the storefront schema uses a `SERIAL` primary key, so IDs
//! wrap an `i32`. The `define_id!` macro keeps product, category, and user
//! IDs from being mixed up at compile time.

use thiserror::Error;

/// Error parsing an ID from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    /// Input is empty or contains something other than ASCII digits.
    #[error("id must be a non-negative integer, got {0:?}")]
    NotDigits(String),
    /// Digits only, but too large for an `i32`.
    #[error("id out of range: {0}")]
    OutOfRange(String),
}

/// Parse an unsigned decimal id. Signs, whitespace and separators are rejected.
///
/// # Errors
///
/// Returns [`IdParseError`] for non-digit or out-of-range input.
pub fn parse_id(s: &str) -> Result<i32, IdParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdParseError::NotDigits(s.to_owned()));
    }
    s.parse::<i32>()
        .map_err(|_| IdParseError::OutOfRange(s.to_owned()))
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `Display` and `FromStr`, so IDs round-trip through URL segments and
///   session map keys
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use shopfront_core::define_id;
/// define_id!(ProductId);
/// define_id!(CategoryId);
///
/// let product_id: ProductId = "5".parse().unwrap();
/// assert_eq!(product_id.as_i32(), 5);
///
/// // These are different types, so this won't compile:
/// // let _: CategoryId = product_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdParseError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                $crate::types::id::parse_id(s).map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_path_segment() {
        let id: ProductId = "42".parse().unwrap();
        assert_eq!(id, ProductId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<ProductId>().is_err());
        assert!("".parse::<CategoryId>().is_err());
        assert!("1.5".parse::<UserId>().is_err());
    }

    #[test]
    fn test_parse_accepts_only_plain_digits() {
        assert_eq!("007".parse::<CategoryId>().unwrap(), CategoryId::new(7));
        assert!(matches!(
            "-1".parse::<ProductId>(),
            Err(IdParseError::NotDigits(_))
        ));
        assert!("+5".parse::<ProductId>().is_err());
        assert!(" 7 ".parse::<CategoryId>().is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert_eq!(
            "2147483648".parse::<ProductId>(),
            Err(IdParseError::OutOfRange("2147483648".to_string()))
        );
        assert_eq!("2147483647".parse::<ProductId>().unwrap().as_i32(), i32::MAX);
    }

    #[test]
    fn test_ordering_follows_inner_value() {
        let mut ids = vec![ProductId::new(3), ProductId::new(1), ProductId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2), ProductId::new(3)]);
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&UserId::new(9)).unwrap();
        assert_eq!(json, "9");
        let parsed: UserId = serde_json::from_str("9").unwrap();
        assert_eq!(parsed.as_i32(), 9);
    }
}
