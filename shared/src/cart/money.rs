//! Money calculation utilities using rust_decimal for precision
//!
//! Prices travel as `f64` (that is what the API sends and expects), but every
//! sum and product is done in `Decimal` and rounded once on the way out.

use super::CartLine;
use crate::error::{AppError, AppResult, ErrorCode};
use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Upper bound for a single unit price or add-on price
pub const MAX_PRICE: f64 = 100_000_000.0;

/// Upper bound for the quantity of one cart line
pub const MAX_QUANTITY: u32 = 9999;

/// Reject prices that are not finite or above [`MAX_PRICE`]
pub fn require_price_in_range(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() || value > MAX_PRICE {
        return Err(AppError::new(ErrorCode::ValueOutOfRange)
            .with_detail("field", field_name)
            .with_detail("max", MAX_PRICE));
    }
    Ok(())
}

/// Reject quantities above [`MAX_QUANTITY`]
pub fn require_quantity_in_range(value: u64) -> AppResult<u32> {
    match u32::try_from(value) {
        Ok(quantity) if quantity <= MAX_QUANTITY => Ok(quantity),
        _ => Err(AppError::new(ErrorCode::ValueOutOfRange)
            .with_detail("quantity", value)
            .with_detail("max", MAX_QUANTITY)),
    }
}

/// Convert f64 to Decimal for calculation
///
/// NaN becomes zero; values beyond the `Decimal` range saturate.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    match Decimal::from_f64(value) {
        Some(d) => d,
        None if value.is_nan() => Decimal::ZERO,
        None if value > 0.0 => Decimal::MAX,
        None => Decimal::MIN,
    }
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `price × quantity` for one line, saturating at the `Decimal` bounds
pub fn line_total(line: &CartLine) -> Decimal {
    let price = to_decimal(line.price);
    price
        .checked_mul(Decimal::from(line.quantity))
        .unwrap_or(if price.is_sign_negative() { Decimal::MIN } else { Decimal::MAX })
}

/// Sum of all line totals, never negative
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(line_total)
        .fold(Decimal::ZERO, saturating_add)
        .max(Decimal::ZERO)
}

/// Checked addition that pins to the `Decimal` bounds instead of panicking
pub fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b)
        .unwrap_or(if b.is_sign_negative() { Decimal::MIN } else { Decimal::MAX })
}

/// Apply a percentage discount; the percentage is clamped to 0–100
pub fn apply_discount(total: Decimal, percent: Decimal) -> Decimal {
    let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let discount = (total * percent / Decimal::ONE_HUNDRED).round_dp(DECIMAL_PLACES);
    (total - discount).max(Decimal::ZERO)
}
