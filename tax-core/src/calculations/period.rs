//! Conversion between a reporting period and its monthly equivalent.
//!
//! | Period      | Factor to monthly |
//! |-------------|-------------------|
//! | `mensual`   | 1                 |
//! | `quincenal` | 2                 |
//! | `semanal`   | 4.33              |
//! | `anual`     | 1/12              |
//!
//! The weekly factor is the fixed 4.33 used by payroll tables, not 52/12.
//! Annual amounts are divided by 12 (and multiplied by 12 on the way back)
//! rather than multiplied by a truncated 1/12.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::CalculationError;
use super::common::{ensure_amount, format_amount, in_range};
use crate::models::Period;

const BIWEEKS_PER_MONTH: Decimal = dec!(2);
const WEEKS_PER_MONTH: Decimal = dec!(4.33);
const MONTHS_PER_YEAR: Decimal = dec!(12);

impl Period {
    /// Multiplier that takes an amount in this period to its monthly equivalent.
    pub fn factor(&self) -> Decimal {
        match self {
            Self::Monthly => Decimal::ONE,
            Self::Biweekly => BIWEEKS_PER_MONTH,
            Self::Weekly => WEEKS_PER_MONTH,
            Self::Annual => Decimal::ONE / MONTHS_PER_YEAR,
        }
    }

    /// Monthly equivalent of `amount`.
    pub fn to_monthly(
        &self,
        amount: Decimal,
    ) -> Decimal {
        match self {
            Self::Monthly => amount,
            Self::Biweekly => amount * BIWEEKS_PER_MONTH,
            Self::Weekly => amount * WEEKS_PER_MONTH,
            Self::Annual => amount / MONTHS_PER_YEAR,
        }
    }

    /// Inverse of [`to_monthly`](Self::to_monthly).
    pub fn from_monthly(
        &self,
        monthly: Decimal,
    ) -> Decimal {
        match self {
            Self::Monthly => monthly,
            Self::Biweekly => monthly / BIWEEKS_PER_MONTH,
            Self::Weekly => monthly / WEEKS_PER_MONTH,
            Self::Annual => monthly * MONTHS_PER_YEAR,
        }
    }

    /// [`to_monthly`](Self::to_monthly), or `None` when the result leaves
    /// `Decimal`'s range.
    pub fn checked_to_monthly(
        &self,
        amount: Decimal,
    ) -> Option<Decimal> {
        match self {
            Self::Monthly => Some(amount),
            Self::Biweekly => amount.checked_mul(BIWEEKS_PER_MONTH),
            Self::Weekly => amount.checked_mul(WEEKS_PER_MONTH),
            Self::Annual => amount.checked_div(MONTHS_PER_YEAR),
        }
    }

    /// [`from_monthly`](Self::from_monthly), or `None` when the result leaves
    /// `Decimal`'s range.
    pub fn checked_from_monthly(
        &self,
        monthly: Decimal,
    ) -> Option<Decimal> {
        match self {
            Self::Monthly => Some(monthly),
            Self::Biweekly => monthly.checked_div(BIWEEKS_PER_MONTH),
            Self::Weekly => monthly.checked_div(WEEKS_PER_MONTH),
            Self::Annual => monthly.checked_mul(MONTHS_PER_YEAR),
        }
    }

    /// Readable form of `to_monthly`, e.g. `100000.00 ÷ 12 = 8333.33`.
    pub(crate) fn to_monthly_formula(
        &self,
        amount: Decimal,
        monthly: Decimal,
    ) -> String {
        match self {
            Self::Monthly => format_amount(monthly),
            Self::Biweekly => format!("{} × 2 = {}", format_amount(amount), format_amount(monthly)),
            Self::Weekly => {
                format!("{} × 4.33 = {}", format_amount(amount), format_amount(monthly))
            }
            Self::Annual => format!("{} ÷ 12 = {}", format_amount(amount), format_amount(monthly)),
        }
    }

    /// Readable form of `from_monthly`, e.g. `1552.78 × 12 = 18633.35`.
    pub(crate) fn from_monthly_formula(
        &self,
        monthly: Decimal,
        value: Decimal,
    ) -> String {
        match self {
            Self::Monthly => format_amount(value),
            Self::Biweekly => format!("{} ÷ 2 = {}", format_amount(monthly), format_amount(value)),
            Self::Weekly => format!("{} ÷ 4.33 = {}", format_amount(monthly), format_amount(value)),
            Self::Annual => format!("{} × 12 = {}", format_amount(monthly), format_amount(value)),
        }
    }
}

/// Converts `amount`, reported for `period`, to its monthly equivalent.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{Period, calculations::convert_period};
///
/// assert_eq!(convert_period(dec!(5000), Period::Biweekly), dec!(10000));
/// assert_eq!(convert_period(dec!(1000), Period::Weekly), dec!(4330));
/// ```
pub fn convert_period(
    amount: Decimal,
    period: Period,
) -> Decimal {
    period.to_monthly(amount)
}

/// [`convert_period`] for untrusted input: rejects negative amounts and
/// amounts above the supported maximum.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{Period, calculations::try_convert_period};
///
/// assert_eq!(try_convert_period(dec!(2000), Period::Weekly), Ok(dec!(8660)));
/// assert!(try_convert_period(dec!(-1), Period::Weekly).is_err());
/// ```
pub fn try_convert_period(
    amount: Decimal,
    period: Period,
) -> Result<Decimal, CalculationError> {
    let amount = ensure_amount("amount", amount)?;
    in_range(period.checked_to_monthly(amount), "monthly amount")
}

/// Converts a monthly value back to `period` units.
pub fn convert_from_monthly(
    monthly: Decimal,
    period: Period,
) -> Decimal {
    period.from_monthly(monthly)
}
