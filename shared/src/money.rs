//! Money helpers built on rust_decimal
//!
//! Prices arrive as JSON numbers or as locale formatted strings such as
//! `"1 000,50"`. Every comparison and every sum goes through
//! [`normalize_price`] so the catalog filter and the cart totals agree.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Normalize a locale formatted price string.
///
/// - all whitespace is dropped (including non-breaking spaces used as thousands separators)
/// - when both `,` and `.` occur, the last one is the decimal point and the other is dropped
/// - several `,` without a `.` are thousands separators
/// - otherwise a single `,` is the decimal separator
///
/// Returns `None` when the remainder is not a number.
pub fn normalize_price(raw: &str) -> Option<Decimal> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let normalized = match (compact.rfind(','), compact.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => compact.replace(',', ""),
        (Some(_), None) if compact.matches(',').count() > 1 => compact.replace(',', ""),
        (Some(_), None) => compact.replace(',', "."),
        (None, _) => compact,
    };

    Decimal::from_str(&normalized).ok()
}

/// Convert a JSON number into a Decimal; NaN and infinities have no value
pub fn from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Parse a user typed quantity.
///
/// Empty or unparsable input has no value. Fractional input is truncated
/// toward zero, so `"2.7"` is `2` and `"-0.5"` is `0`.
pub fn parse_quantity(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    Decimal::from_str(&trimmed.replace(',', "."))
        .ok()
        .and_then(|d| d.trunc().to_i64())
}

/// `price * qty`; a missing price counts as zero.
///
/// Saturates at `Decimal::MAX` (or `MIN` for a negative price) instead of overflowing.
pub fn line_total(price: Option<Decimal>, qty: u32) -> Decimal {
    let price = price.unwrap_or_default();
    price
        .checked_mul(Decimal::from(qty))
        .unwrap_or_else(|| saturated(price))
}

/// Sum of amounts, saturating like [`line_total`]
pub fn sum_money(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value).unwrap_or_else(|| saturated(value))
    })
}

fn saturated(direction: Decimal) -> Decimal {
    if direction.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Round to cents (midpoint away from zero)
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount with exactly two decimals, e.g. `2001.00`
pub fn format_money(value: Decimal) -> String {
    let mut rounded = round_money(value);
    rounded.rescale(DECIMAL_PLACES);
    rounded.to_string()
}
