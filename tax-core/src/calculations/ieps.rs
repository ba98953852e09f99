//! IEPS (excise tax) by product category.
//!
//! Lookups are lenient by default: a key missing from the catalog resolves
//! to the catalog's first entry and the result is flagged with
//! `used_fallback`. [`IepsCalculator::calculate_strict`] reports the miss as
//! [`CalculationError::UnknownProduct`] instead.

use rust_decimal::Decimal;
use tracing::warn;

use super::CalculationError;
use super::common::{ensure_amount, format_percent, in_range, percent_of};
use crate::models::{BreakdownLine, IepsProductRate, IepsResult};
use crate::tables::{IepsCatalog, default_ieps_catalog};

#[derive(Debug, Clone, Copy)]
pub struct IepsCalculator<'a> {
    catalog: &'a IepsCatalog,
}

impl<'a> IepsCalculator<'a> {
    pub fn new(catalog: &'a IepsCatalog) -> Self {
        Self { catalog }
    }

    /// Applies the rate for `product_key`, falling back to the catalog's
    /// first entry when the key is unknown.
    ///
    /// # Errors
    ///
    /// [`CalculationError::InvalidArgument`] for a negative base.
    pub fn calculate(
        &self,
        base: Decimal,
        product_key: &str,
    ) -> Result<IepsResult, CalculationError> {
        let base = ensure_amount("base", base)?;

        let (product, used_fallback) = match self.catalog.find(product_key) {
            Some(product) => (product, false),
            None => {
                let fallback = self.catalog.fallback();
                warn!(
                    product_key,
                    fallback = %fallback.product_key,
                    "unknown IEPS product, using fallback rate"
                );
                (fallback, true)
            }
        };

        self.apply(base, product_key, product, used_fallback)
    }

    /// Like [`calculate`](Self::calculate) but rejects unknown keys.
    ///
    /// # Errors
    ///
    /// [`CalculationError::InvalidArgument`] for a negative base and
    /// [`CalculationError::UnknownProduct`] for a key not in the catalog.
    pub fn calculate_strict(
        &self,
        base: Decimal,
        product_key: &str,
    ) -> Result<IepsResult, CalculationError> {
        let base = ensure_amount("base", base)?;
        let product = self
            .catalog
            .find(product_key)
            .ok_or_else(|| CalculationError::UnknownProduct(product_key.to_string()))?;

        self.apply(base, product_key, product, false)
    }

    fn apply(
        &self,
        base: Decimal,
        requested_key: &str,
        product: &IepsProductRate,
        used_fallback: bool,
    ) -> Result<IepsResult, CalculationError> {
        let tax = percent_of(base, product.rate_percent)?;
        let total = in_range(base.checked_add(tax), "total")?;

        Ok(IepsResult {
            base,
            requested_key: requested_key.to_string(),
            product: product.clone(),
            used_fallback,
            tax,
            total,
            breakdown: vec![
                BreakdownLine::new("Subtotal", base),
                BreakdownLine::new(
                    format!(
                        "IEPS {} ({})",
                        product.display_name,
                        format_percent(product.rate_percent)
                    ),
                    tax,
                ),
                BreakdownLine::new("Total", total),
            ],
        })
    }
}

/// Applies IEPS for `product_key` using the embedded default catalog.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::calculate_ieps;
///
/// let result = calculate_ieps(dec!(1000), "bebidas_azucaradas").unwrap();
///
/// assert_eq!(result.tax, dec!(80));
/// assert_eq!(result.total, dec!(1080));
/// ```
pub fn calculate_ieps(
    base: Decimal,
    product_key: &str,
) -> Result<IepsResult, CalculationError> {
    IepsCalculator::new(default_ieps_catalog()).calculate(base, product_key)
}
