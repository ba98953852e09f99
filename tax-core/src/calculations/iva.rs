//! IVA (value-added tax) at a flat rate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::calculate_iva;
//!
//! let result = calculate_iva(dec!(1000), dec!(16)).unwrap();
//!
//! assert_eq!(result.tax, dec!(160));
//! assert_eq!(result.total, dec!(1160));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::CalculationError;
use super::common::{ensure_amount, format_percent, in_range, percent_of};
use crate::models::{BreakdownLine, IvaResult};

/// General rate.
pub const IVA_GENERAL_RATE: Decimal = dec!(16);
/// Northern and southern border region rate.
pub const IVA_BORDER_RATE: Decimal = dec!(8);
/// Zero-rated goods and services.
pub const IVA_ZERO_RATE: Decimal = dec!(0);

/// IVA calculator for one rate.
///
/// Any non-negative rate is applied as given; the published rates are
/// available as [`IVA_GENERAL_RATE`], [`IVA_BORDER_RATE`] and [`IVA_ZERO_RATE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IvaCalculator {
    rate_percent: Decimal,
}

impl Default for IvaCalculator {
    fn default() -> Self {
        Self {
            rate_percent: IVA_GENERAL_RATE,
        }
    }
}

impl IvaCalculator {
    /// # Errors
    ///
    /// [`CalculationError::InvalidArgument`] for a negative rate.
    pub fn new(rate_percent: Decimal) -> Result<Self, CalculationError> {
        Ok(Self {
            rate_percent: ensure_amount("IVA rate", rate_percent)?,
        })
    }

    pub fn rate_percent(&self) -> Decimal {
        self.rate_percent
    }

    /// # Errors
    ///
    /// [`CalculationError::InvalidArgument`] for a negative base,
    /// [`CalculationError::Overflow`] when base × rate leaves `Decimal`'s range.
    pub fn calculate(
        &self,
        base: Decimal,
    ) -> Result<IvaResult, CalculationError> {
        let base = ensure_amount("base", base)?;
        let tax = percent_of(base, self.rate_percent)?;
        let total = in_range(base.checked_add(tax), "total")?;

        Ok(IvaResult {
            base,
            rate_percent: self.rate_percent,
            tax,
            total,
            breakdown: vec![
                BreakdownLine::new("Subtotal", base),
                BreakdownLine::new(format!("IVA ({})", format_percent(self.rate_percent)), tax),
                BreakdownLine::new("Total", total),
            ],
        })
    }
}

/// Applies IVA at `rate_percent` to `base`.
pub fn calculate_iva(
    base: Decimal,
    rate_percent: Decimal,
) -> Result<IvaResult, CalculationError> {
    IvaCalculator::new(rate_percent)?.calculate(base)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn general_rate_on_1000() {
        let result = calculate_iva(dec!(1000), IVA_GENERAL_RATE).unwrap();

        assert_eq!(result.base, dec!(1000));
        assert_eq!(result.tax, dec!(160));
        assert_eq!(result.total, dec!(1160));
    }

    #[test]
    fn default_calculator_uses_general_rate() {
        let result = IvaCalculator::default().calculate(dec!(250)).unwrap();

        assert_eq!(result.rate_percent, dec!(16));
        assert_eq!(result.tax, dec!(40));
    }

    #[test]
    fn zero_rate_total_equals_base() {
        for base in [dec!(0), dec!(0.01), dec!(1234.56), dec!(999999.99)] {
            let result = calculate_iva(base, IVA_ZERO_RATE).unwrap();

            assert_eq!(result.tax, dec!(0));
            assert_eq!(result.total, base);
        }
    }

    #[test]
    fn tax_is_exactly_base_times_rate() {
        for rate in [IVA_ZERO_RATE, IVA_BORDER_RATE, IVA_GENERAL_RATE, dec!(10.5)] {
            let result = calculate_iva(dec!(333.33), rate).unwrap();

            assert_eq!(result.tax, dec!(333.33) * rate / dec!(100));
            assert_eq!(result.total, dec!(333.33) + result.tax);
        }
    }

    #[test]
    fn unlisted_rate_is_applied_literally() {
        let result = calculate_iva(dec!(200), dec!(11)).unwrap();

        assert_eq!(result.tax, dec!(22));
    }

    #[test]
    fn breakdown_has_subtotal_tax_and_total() {
        let result = calculate_iva(dec!(1000), IVA_BORDER_RATE).unwrap();

        assert_eq!(
            result.breakdown,
            vec![
                BreakdownLine::new("Subtotal", dec!(1000)),
                BreakdownLine::new("IVA (8%)", dec!(80)),
                BreakdownLine::new("Total", dec!(1080)),
            ]
        );
    }

    #[test]
    fn rejects_negative_base() {
        let result = calculate_iva(dec!(-10), IVA_GENERAL_RATE);

        assert!(matches!(result, Err(CalculationError::InvalidArgument(_))));
    }

    #[test]
    fn overflow_at_the_cap_is_an_error() {
        use crate::calculations::common::MAX_AMOUNT;

        let result = calculate_iva(MAX_AMOUNT, MAX_AMOUNT);

        assert_eq!(result, Err(CalculationError::Overflow("tax")));
    }

    #[test]
    fn largest_base_at_general_rate() {
        use crate::calculations::common::MAX_AMOUNT;

        let result = calculate_iva(MAX_AMOUNT, IVA_GENERAL_RATE).unwrap();

        assert_eq!(result.total, MAX_AMOUNT * dec!(1.16));
    }

    #[test]
    fn rejects_negative_rate() {
        let result = IvaCalculator::new(dec!(-16));

        assert!(matches!(result, Err(CalculationError::InvalidArgument(_))));
    }
}
