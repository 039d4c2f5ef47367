//! Validated domain records built from database rows.
//!
//! The entity layer mirrors the schema as-is; these types are what the
//! analytics and catalog code consume. Conversion rejects numeric values that
//! violate a non-negative invariant so they never reach a sum.

pub mod inventory_log;
pub mod product;
pub mod sale;

pub use inventory_log::InventoryLog;
pub use product::{Product, ProductSnapshot};
pub use sale::Sale;

use rust_decimal::Decimal;

/// Errors raised while constructing a domain record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("invalid numeric value for `{field}`: {value}")]
    InvalidNumeric { field: &'static str, value: String },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

pub(crate) fn non_negative_decimal(field: &'static str, value: Decimal) -> Result<Decimal, ModelError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ModelError::InvalidNumeric {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

pub(crate) fn non_negative_count(field: &'static str, value: i32) -> Result<u32, ModelError> {
    u32::try_from(value).map_err(|_| ModelError::InvalidNumeric {
        field,
        value: value.to_string(),
    })
}

pub(crate) fn positive_count(field: &'static str, value: i32) -> Result<u32, ModelError> {
    match non_negative_count(field, value)? {
        0 => Err(ModelError::InvalidNumeric {
            field,
            value: value.to_string(),
        }),
        n => Ok(n),
    }
}

pub(crate) fn required_text(field: &'static str, value: String) -> Result<String, ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::MissingField(field));
    }
    Ok(value)
}

/// Treats blank strings coming out of the database as absent.
pub(crate) fn present(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_decimal_is_rejected() {
        let err = non_negative_decimal("price", dec!(-0.01)).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidNumeric {
                field: "price",
                value: "-0.01".into()
            }
        );
    }

    #[test]
    fn zero_is_accepted_for_non_negative_fields() {
        assert_eq!(non_negative_decimal("price", dec!(0)).unwrap(), dec!(0));
        assert_eq!(non_negative_count("stock_quantity", 0).unwrap(), 0);
    }

    #[test]
    fn positive_count_rejects_zero() {
        assert!(positive_count("quantity", 0).is_err());
        assert_eq!(positive_count("quantity", 3).unwrap(), 3);
    }

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(present("  "), None);
        assert_eq!(present(" Gold "), Some("Gold".to_string()));
    }
}
