use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CalculationStep, IepsProductRate, Period, TaxBracket};

/// Labelled amount shown in a result breakdown (subtotal, tax, total).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub label: String,
    pub amount: Decimal,
}

impl BreakdownLine {
    pub fn new(
        label: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Result of an ISR calculation.
///
/// Every amount keeps full decimal precision; round with
/// [`round_half_up`](crate::calculations::common::round_half_up) when presenting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsrResult {
    /// Taxable amount as supplied, in `period` units.
    pub amount: Decimal,
    pub period: Period,
    pub monthly_income: Decimal,
    pub bracket: TaxBracket,
    /// Excess of the monthly income over the bracket's lower bound.
    pub excess: Decimal,
    pub marginal_tax: Decimal,
    pub pre_subsidy_tax: Decimal,
    pub subsidy: Decimal,
    pub subsidy_applies: bool,
    pub monthly_tax: Decimal,
    /// Final tax expressed in `period` units.
    pub period_tax: Decimal,
    /// `period_tax / amount` in percent, zero for a zero amount.
    pub effective_rate: Decimal,
    pub steps: Vec<CalculationStep>,
}

/// Result of an IVA calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IvaResult {
    pub base: Decimal,
    pub rate_percent: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub breakdown: Vec<BreakdownLine>,
}

/// Result of an IEPS calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IepsResult {
    pub base: Decimal,
    /// Key as supplied by the caller.
    pub requested_key: String,
    /// Catalog entry the tax was computed with.
    pub product: IepsProductRate,
    /// True when `requested_key` was not in the catalog and the fallback entry was used.
    pub used_fallback: bool,
    pub tax: Decimal,
    pub total: Decimal,
    pub breakdown: Vec<BreakdownLine>,
}
