use crate::errors::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

/// Response for a write handed off to the command sink
pub fn accepted_response<T: Serialize>(data: T) -> Response {
    (StatusCode::ACCEPTED, Json(data)).into_response()
}

/// Query text with blanks treated as absent
pub fn text_param(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parses an optional numeric query parameter; blank counts as absent.
pub fn decimal_param(name: &str, value: &Option<String>) -> Result<Option<Decimal>, ServiceError> {
    text_param(value)
        .map(|raw| {
            Decimal::from_str(&raw).map_err(|_| {
                ServiceError::InvalidInput(format!("{} must be a number, got '{}'", name, raw))
            })
        })
        .transpose()
}

/// Parses an optional boolean query parameter; blank counts as absent.
pub fn bool_param(name: &str, value: &Option<String>) -> Result<Option<bool>, ServiceError> {
    text_param(value)
        .map(|raw| match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ServiceError::InvalidInput(format!(
                "{} must be true or false, got '{}'",
                name, raw
            ))),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    #[test]
    fn blank_params_are_absent() {
        assert_eq!(text_param(&Some("  ".into())), None);
        assert_eq!(text_param(&None), None);
        assert_eq!(decimal_param("minPrice", &Some("".into())).unwrap(), None);
    }

    #[test]
    fn numeric_params_parse() {
        assert_eq!(
            decimal_param("maxPrice", &Some(" 1500.50 ".into())).unwrap(),
            Some(dec!(1500.50))
        );
    }

    #[test]
    fn malformed_numeric_params_are_rejected() {
        assert_matches!(
            decimal_param("minWeight", &Some("heavy".into())),
            Err(ServiceError::InvalidInput(msg)) if msg.contains("minWeight")
        );
    }

    #[test]
    fn bool_params_parse() {
        assert_eq!(bool_param("x", &Some("TRUE".into())).unwrap(), Some(true));
        assert!(bool_param("x", &Some("maybe".into())).is_err());
    }
}
