//! Common utility functions for tax calculations.
//!
//! Rounding lives here and is only applied when presenting values; the
//! calculators themselves keep full decimal precision.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::CalculationError;

/// Largest amount any calculator accepts. Keeps every intermediate product
/// well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1552.779264)), dec!(1552.78));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// `amount * rate_percent / 100`, unrounded.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(2064.17), dec!(17.92)), Ok(dec!(369.899264)));
/// ```
///
/// # Errors
///
/// [`CalculationError::Overflow`] when the product leaves `Decimal`'s range.
pub fn percent_of(
    amount: Decimal,
    rate_percent: Decimal,
) -> Result<Decimal, CalculationError> {
    amount
        .checked_mul(rate_percent)
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(CalculationError::Overflow("tax"))
}

/// Maps the `None` of a `checked_*` operation to [`CalculationError::Overflow`].
pub(crate) fn in_range(
    value: Option<Decimal>,
    what: &'static str,
) -> Result<Decimal, CalculationError> {
    value.ok_or(CalculationError::Overflow(what))
}

/// Formats an amount rounded to cents, always with two decimals.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

/// Formats a percentage without trailing zeros (`16`, `26.5`, `17.92`).
pub fn format_percent(rate_percent: Decimal) -> String {
    format!("{}%", rate_percent.normalize())
}

/// Rejects negative amounts and amounts above [`MAX_AMOUNT`].
pub(crate) fn ensure_amount(
    field: &str,
    value: Decimal,
) -> Result<Decimal, CalculationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CalculationError::InvalidArgument(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(CalculationError::InvalidArgument(format!(
            "{field} exceeds the supported maximum of {MAX_AMOUNT}, got {value}"
        )));
    }
    Ok(value)
}
