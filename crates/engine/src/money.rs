//! Money helpers.
//!
//! Every monetary value in the engine (unit amounts, totals, sums) is a
//! [`Decimal`] so no floating-point drift creeps into bookkeeping.
//!
//! # Examples
//!
//! ```rust
//! use std::str::FromStr;
//!
//! use engine::money::{format_amount, line_total};
//! use rust_decimal::Decimal;
//!
//! let total = line_total(Decimal::from(10), Decimal::from_str("2.5").unwrap()).unwrap();
//! assert_eq!(format_amount(total), "25.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{EngineError, ResultEngine};

/// Largest accepted line total, 10^15. Sums over stored entries stay far
/// below the `Decimal` range.
pub const MAX_LINE_TOTAL: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

fn too_large(what: &str) -> EngineError {
    EngineError::InvalidAmount(format!("{what} too large"))
}

/// `quantity × unit_amount`, the stored total of an expense or earning.
pub fn line_total(quantity: Decimal, unit_amount: Decimal) -> ResultEngine<Decimal> {
    let total = quantity
        .checked_mul(unit_amount)
        .ok_or_else(|| too_large("total"))?;
    if total > MAX_LINE_TOTAL {
        return Err(too_large("total"));
    }
    Ok(total)
}

/// Sum of `values`, failing instead of overflowing.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> ResultEngine<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value).ok_or_else(|| too_large("sum"))
    })
}

/// Rounds to cents, midpoint away from zero.
#[must_use]
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with exactly two decimals (`29` → `"29.00"`).
#[must_use]
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_cents(value))
}

/// Formats a ROI percentage, `"N/A"` when it is not defined.
#[must_use]
pub fn format_percent(value: Option<Decimal>) -> String {
    match value {
        Some(value) => format!("{}%", format_amount(value)),
        None => "N/A".to_string(),
    }
}
