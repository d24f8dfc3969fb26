//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! parsing of stored columns and text normalization so every operation
//! enforces the same invariants.

use std::str::FromStr;

use rust_decimal::Decimal;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Parse a decimal column stored as text.
pub(crate) fn parse_decimal(value: &str, label: &str) -> ResultEngine<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| EngineError::InvalidAmount(format!("invalid stored {label}: {value}")))
}

/// Canonical text form used to persist a decimal.
pub(crate) fn store_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Collapse inner whitespace and trim. Returns `None` for blank input.
pub(crate) fn normalize_display(input: &str) -> Option<String> {
    let mut out = String::new();
    for token in input.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    if out.is_empty() { None } else { Some(out) }
}

/// Case folding used for substring matching (NFKC, then lowercase).
pub(crate) fn fold_case(input: &str) -> String {
    input.nfkc().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive substring test.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_display_collapses_whitespace() {
        assert_eq!(
            normalize_display("  heat   lamps\tbulk "),
            Some("heat lamps bulk".to_string())
        );
        assert_eq!(normalize_display("   "), None);
    }

    #[test]
    fn contains_folded_ignores_case() {
        assert!(contains_folded("Layer Mash", "mash"));
        assert!(contains_folded("ÉLEVAGE", "élev"));
        assert!(!contains_folded("Grower pellets", "starter"));
    }

    #[test]
    fn decimals_round_trip_through_text() {
        let value = Decimal::from_str("2.50").unwrap();
        let stored = store_decimal(value);
        assert_eq!(stored, "2.5");
        assert_eq!(parse_decimal(&stored, "quantity").unwrap(), value);
        assert!(parse_decimal("two", "quantity").is_err());
    }
}
