//! ISR (income tax) withholding with employment subsidy.
//!
//! The calculation follows the monthly rate schedule and records every
//! intermediate value in a step ledger:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Monthly equivalent of the taxable amount |
//! | 2    | Bracket selection (`lower ≤ income ≤ upper`) |
//! | 3    | Excess over the bracket's lower bound |
//! | 4    | Marginal tax: excess × rate |
//! | 5    | Tax before subsidy: fixed fee + marginal tax |
//! | 6    | Employment subsidy for the same income |
//! | 7    | Monthly tax: max(0, step 5 − step 6) |
//! | 8    | Tax in the original period (only when not monthly) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{IsrCalculator, common::round_half_up};
//! use tax_core::{Period, TaxTables};
//!
//! let calculator = IsrCalculator::new(TaxTables::mexico_2024());
//! let result = calculator.calculate(dec!(15000), Period::Monthly).unwrap();
//!
//! assert_eq!(result.bracket.lower_bound, dec!(12935.83));
//! assert_eq!(round_half_up(result.period_tax), dec!(1552.78));
//! assert_eq!(round_half_up(result.effective_rate), dec!(10.35));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use super::CalculationError;
use super::common::{ensure_amount, format_amount, format_percent, in_range, max, percent_of};
use crate::models::{IsrResult, Period, StepLedger, SubsidyBand, TaxBracket};
use crate::tables::TaxTables;

/// Calculator for ISR withholding over one year's tables.
#[derive(Debug, Clone, Copy)]
pub struct IsrCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> IsrCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    pub fn tax_year(&self) -> i32 {
        self.tables.tax_year
    }

    /// Calculates ISR for `amount` reported for `period`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] if:
    /// - `amount` is negative or above the supported maximum
    /// - the tables do not cover the monthly income (misconfigured table)
    pub fn calculate(
        &self,
        amount: Decimal,
        period: Period,
    ) -> Result<IsrResult, CalculationError> {
        let amount = ensure_amount("amount", amount)?;
        let mut ledger = StepLedger::default();

        let monthly_income = period.to_monthly(amount);
        ledger.record(
            format!("Ingreso gravable mensual ({period})"),
            period.to_monthly_formula(amount, monthly_income),
            monthly_income,
        );

        let bracket = self.select_bracket(monthly_income)?;
        ledger.record(
            "Rango de la tarifa de ISR",
            format!(
                "{} ≤ {} ≤ {}",
                format_amount(bracket.lower_bound),
                format_amount(monthly_income),
                format_upper_bound(bracket.upper_bound),
            ),
            bracket.lower_bound,
        );

        let excess = self.excess(monthly_income, bracket);
        ledger.record(
            "Excedente sobre el límite inferior",
            format!(
                "{} − {} = {}",
                format_amount(monthly_income),
                format_amount(bracket.lower_bound),
                format_amount(excess),
            ),
            excess,
        );

        let marginal_tax = self.marginal_tax(excess, bracket)?;
        ledger.record(
            "Impuesto marginal",
            format!(
                "{} × {} = {}",
                format_amount(excess),
                format_percent(bracket.marginal_rate_percent),
                format_amount(marginal_tax),
            ),
            marginal_tax,
        );

        let pre_subsidy_tax = self.pre_subsidy_tax(marginal_tax, bracket)?;
        ledger.record(
            "ISR antes de subsidio",
            format!(
                "{} + {} = {}",
                format_amount(bracket.fixed_fee),
                format_amount(marginal_tax),
                format_amount(pre_subsidy_tax),
            ),
            pre_subsidy_tax,
        );

        let subsidy_band = self.select_subsidy_band(monthly_income);
        let subsidy = subsidy_band.map_or(Decimal::ZERO, |band| band.subsidy_amount);
        let subsidy_applies = subsidy > Decimal::ZERO;
        ledger.record(
            "Subsidio para el empleo",
            match subsidy_band {
                Some(band) if subsidy_applies => format!(
                    "Aplica: ingreso entre {} y {}",
                    format_amount(band.lower_bound),
                    format_upper_bound(band.upper_bound),
                ),
                _ => "No aplica".to_string(),
            },
            subsidy,
        );

        let monthly_tax = self.monthly_tax(pre_subsidy_tax, subsidy)?;
        ledger.record(
            "ISR mensual a retener",
            format!(
                "max(0, {} − {}) = {}",
                format_amount(pre_subsidy_tax),
                format_amount(subsidy),
                format_amount(monthly_tax),
            ),
            monthly_tax,
        );

        let period_tax = in_range(period.checked_from_monthly(monthly_tax), "period tax")?;
        if !period.is_monthly() {
            ledger.record(
                format!("ISR del periodo ({period})"),
                period.from_monthly_formula(monthly_tax, period_tax),
                period_tax,
            );
        }

        let effective_rate = self.effective_rate(period_tax, amount)?;

        debug!(
            tax_year = self.tables.tax_year,
            %amount,
            %period,
            %monthly_income,
            bracket_lower = %bracket.lower_bound,
            %subsidy,
            %period_tax,
            "calculated ISR"
        );

        Ok(IsrResult {
            amount,
            period,
            monthly_income,
            bracket: *bracket,
            excess,
            marginal_tax,
            pre_subsidy_tax,
            subsidy,
            subsidy_applies,
            monthly_tax,
            period_tax,
            effective_rate,
            steps: ledger.into_steps(),
        })
    }

    /// Selects the bracket for a monthly income.
    fn select_bracket(
        &self,
        monthly_income: Decimal,
    ) -> Result<&'a TaxBracket, CalculationError> {
        self.tables
            .brackets
            .find(monthly_income)
            .ok_or(CalculationError::UnmatchedBracket(monthly_income))
    }

    /// Selects the subsidy band for a monthly income, if any.
    fn select_subsidy_band(
        &self,
        monthly_income: Decimal,
    ) -> Option<&'a SubsidyBand> {
        self.tables.subsidies.find(monthly_income)
    }

    /// Excess of the income over the bracket's lower bound, never negative.
    fn excess(
        &self,
        monthly_income: Decimal,
        bracket: &TaxBracket,
    ) -> Decimal {
        max(monthly_income - bracket.lower_bound, Decimal::ZERO)
    }

    fn marginal_tax(
        &self,
        excess: Decimal,
        bracket: &TaxBracket,
    ) -> Result<Decimal, CalculationError> {
        percent_of(excess, bracket.marginal_rate_percent)
    }

    fn pre_subsidy_tax(
        &self,
        marginal_tax: Decimal,
        bracket: &TaxBracket,
    ) -> Result<Decimal, CalculationError> {
        in_range(bracket.fixed_fee.checked_add(marginal_tax), "tax before subsidy")
    }

    fn monthly_tax(
        &self,
        pre_subsidy_tax: Decimal,
        subsidy: Decimal,
    ) -> Result<Decimal, CalculationError> {
        let net = in_range(pre_subsidy_tax.checked_sub(subsidy), "monthly tax")?;
        Ok(max(net, Decimal::ZERO))
    }

    fn effective_rate(
        &self,
        period_tax: Decimal,
        amount: Decimal,
    ) -> Result<Decimal, CalculationError> {
        if amount > Decimal::ZERO {
            let rate = period_tax
                .checked_div(amount)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
            in_range(rate, "effective rate")
        } else {
            Ok(Decimal::ZERO)
        }
    }
}

fn format_upper_bound(upper: Option<Decimal>) -> String {
    upper.map_or_else(|| "∞".to_string(), format_amount)
}

/// Calculates ISR with the embedded 2024 tables.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{Period, calculations::{calculate_isr, common::round_half_up}};
///
/// let result = calculate_isr(dec!(100000), Period::Annual).unwrap();
///
/// assert_eq!(round_half_up(result.monthly_income), dec!(8333.33));
/// assert_eq!(round_half_up(result.period_tax), dec!(7074.82));
/// ```
pub fn calculate_isr(
    amount: Decimal,
    period: Period,
) -> Result<IsrResult, CalculationError> {
    IsrCalculator::new(TaxTables::mexico_2024()).calculate(amount, period)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;
    use crate::models::Band;
    use crate::tables::BracketTable;

    fn calculator() -> IsrCalculator<'static> {
        IsrCalculator::new(TaxTables::mexico_2024())
    }

    // =========================================================================
    // select_bracket tests
    // =========================================================================

    #[test]
    fn select_bracket_matches_closed_range() {
        let calc = calculator();

        let bracket = calc.select_bracket(dec!(15000)).unwrap();

        assert_eq!(bracket.lower_bound, dec!(12935.83));
        assert_eq!(bracket.upper_bound, Some(dec!(15487.71)));
        assert_eq!(bracket.fixed_fee, dec!(1182.88));
        assert_eq!(bracket.marginal_rate_percent, dec!(17.92));
    }

    #[test]
    fn select_bracket_at_exact_bounds() {
        let calc = calculator();

        assert_eq!(calc.select_bracket(dec!(746.04)).unwrap().fixed_fee, dec!(0.00));
        assert_eq!(calc.select_bracket(dec!(746.05)).unwrap().fixed_fee, dec!(14.32));
    }

    #[test]
    fn select_bracket_zero_income_uses_first_bracket() {
        let calc = calculator();

        let bracket = calc.select_bracket(dec!(0)).unwrap();

        assert_eq!(bracket.marginal_rate_percent, dec!(1.92));
    }

    #[test]
    fn select_bracket_above_last_finite_bound_uses_last_bracket() {
        let calc = calculator();

        let bracket = calc.select_bracket(dec!(10000000)).unwrap();

        assert_eq!(bracket.upper_bound, None);
        assert_eq!(bracket.marginal_rate_percent, dec!(35.00));
    }

    #[test]
    fn select_bracket_sub_cent_value_between_rows_uses_lower_row() {
        let calc = calculator();

        let bracket = calc.select_bracket(dec!(746.045)).unwrap();

        assert_eq!(bracket.lower_bound, dec!(0.00));
    }

    #[test]
    fn select_bracket_fails_for_table_not_covering_income() {
        let mut tables = TaxTables::mexico_2024().clone();
        tables.brackets = BracketTable::from_trusted(tables.brackets.rows()[1..].to_vec());
        let calc = IsrCalculator::new(&tables);

        let result = calc.calculate(dec!(500), Period::Monthly);

        assert_eq!(result, Err(CalculationError::UnmatchedBracket(dec!(500))));
    }

    // =========================================================================
    // step helper tests
    // =========================================================================

    #[test]
    fn excess_marginal_and_pre_subsidy_tax() {
        let calc = calculator();
        let bracket = calc.select_bracket(dec!(15000)).unwrap();

        let excess = calc.excess(dec!(15000), bracket);
        let marginal = calc.marginal_tax(excess, bracket).unwrap();
        let pre = calc.pre_subsidy_tax(marginal, bracket).unwrap();

        assert_eq!(excess, dec!(2064.17));
        assert_eq!(marginal, dec!(369.899264));
        assert_eq!(pre, dec!(1552.779264));
    }

    #[test]
    fn monthly_tax_is_never_negative() {
        let calc = calculator();

        assert_eq!(calc.monthly_tax(dec!(100), dec!(407.02)), Ok(dec!(0)));
        assert_eq!(calc.monthly_tax(dec!(500), dec!(217.61)), Ok(dec!(282.39)));
    }

    #[test]
    fn effective_rate_is_zero_for_zero_amount() {
        let calc = calculator();

        assert_eq!(calc.effective_rate(dec!(0), dec!(0)), Ok(dec!(0)));
        assert_eq!(calc.effective_rate(dec!(160), dec!(1000)), Ok(dec!(16)));
    }

    #[test]
    fn out_of_range_table_values_are_errors() {
        let tables = TaxTables::new(
            2024,
            vec![TaxBracket {
                lower_bound: dec!(0),
                upper_bound: None,
                fixed_fee: Decimal::MAX,
                marginal_rate_percent: dec!(35),
            }],
            TaxTables::mexico_2024().subsidies.rows().to_vec(),
        )
        .unwrap();

        let result = IsrCalculator::new(&tables).calculate(dec!(10000), Period::Monthly);

        assert_eq!(result, Err(CalculationError::Overflow("tax before subsidy")));
    }

    #[test]
    fn largest_amount_is_calculated() {
        use crate::calculations::common::MAX_AMOUNT;

        for period in Period::ALL {
            assert!(calculator().calculate(MAX_AMOUNT, period).is_ok(), "{period}");
        }
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_monthly_15000() {
        let result = calculator().calculate(dec!(15000), Period::Monthly).unwrap();

        assert_eq!(result.monthly_income, dec!(15000));
        assert_eq!(result.bracket.lower_bound, dec!(12935.83));
        assert_eq!(result.excess, dec!(2064.17));
        assert_eq!(round_half_up(result.marginal_tax), dec!(369.90));
        assert_eq!(round_half_up(result.pre_subsidy_tax), dec!(1552.78));
        assert_eq!(result.subsidy, dec!(0));
        assert!(!result.subsidy_applies);
        assert_eq!(round_half_up(result.monthly_tax), dec!(1552.78));
        assert_eq!(result.period_tax, result.monthly_tax);
        assert_eq!(round_half_up(result.effective_rate), dec!(10.35));
    }

    #[test]
    fn calculate_monthly_records_seven_steps() {
        let result = calculator().calculate(dec!(15000), Period::Monthly).unwrap();

        let numbers: Vec<u32> = result.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(result.steps[0].formula, "15000.00");
        assert_eq!(result.steps[1].formula, "12935.83 ≤ 15000.00 ≤ 15487.71");
        assert_eq!(result.steps[2].formula, "15000.00 − 12935.83 = 2064.17");
        assert_eq!(result.steps[3].formula, "2064.17 × 17.92% = 369.90");
        assert_eq!(result.steps[4].formula, "1182.88 + 369.90 = 1552.78");
        assert_eq!(result.steps[5].formula, "No aplica");
        assert_eq!(result.steps[6].formula, "max(0, 1552.78 − 0.00) = 1552.78");
        assert_eq!(result.steps[6].result_value, result.monthly_tax);
    }

    #[test]
    fn calculate_annual_100000() {
        let result = calculator().calculate(dec!(100000), Period::Annual).unwrap();

        assert_eq!(round_half_up(result.monthly_income), dec!(8333.33));
        assert_eq!(result.bracket.lower_bound, dec!(6332.06));
        assert_eq!(result.bracket.marginal_rate_percent, dec!(10.88));
        assert_eq!(result.subsidy, dec!(0));
        assert_eq!(round_half_up(result.monthly_tax), dec!(589.57));
        assert_eq!(round_half_up(result.period_tax), dec!(7074.82));
        assert_eq!(round_half_up(result.effective_rate), dec!(7.07));
    }

    #[test]
    fn calculate_annual_records_back_conversion_by_twelve() {
        let result = calculator().calculate(dec!(100000), Period::Annual).unwrap();

        assert_eq!(result.steps.len(), 8);
        assert_eq!(result.steps[0].formula, "100000.00 ÷ 12 = 8333.33");
        let last = &result.steps[7];
        assert_eq!(last.step_number, 8);
        assert_eq!(last.formula, "589.57 × 12 = 7074.82");
        assert_eq!(last.result_value, result.monthly_tax * dec!(12));
    }

    #[test]
    fn calculate_biweekly_halves_monthly_tax() {
        let result = calculator().calculate(dec!(7500), Period::Biweekly).unwrap();

        assert_eq!(result.monthly_income, dec!(15000));
        assert_eq!(result.period_tax, dec!(776.389632));
        assert_eq!(round_half_up(result.effective_rate), dec!(10.35));
    }

    #[test]
    fn calculate_weekly_uses_fixed_factor() {
        let result = calculator().calculate(dec!(2000), Period::Weekly).unwrap();

        assert_eq!(result.monthly_income, dec!(8660));
        assert_eq!(result.pre_subsidy_tax, dec!(625.109872));
        assert_eq!(round_half_up(result.period_tax), dec!(144.37));
    }

    #[test]
    fn calculate_subsidy_reduces_tax() {
        let result = calculator().calculate(dec!(7000), Period::Monthly).unwrap();

        assert_eq!(result.pre_subsidy_tax, dec!(444.501872));
        assert_eq!(result.subsidy, dec!(253.54));
        assert!(result.subsidy_applies);
        assert_eq!(result.monthly_tax, dec!(190.961872));
        assert_eq!(result.steps[5].formula, "Aplica: ingreso entre 6224.68 y 7113.90");
    }

    #[test]
    fn calculate_subsidy_larger_than_tax_yields_zero() {
        let result = calculator().calculate(dec!(5000), Period::Monthly).unwrap();

        assert_eq!(result.pre_subsidy_tax, dec!(286.5728));
        assert_eq!(result.subsidy, dec!(324.87));
        assert_eq!(result.monthly_tax, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn calculate_zero_amount() {
        let result = calculator().calculate(dec!(0), Period::Monthly).unwrap();

        assert_eq!(result.excess, dec!(0));
        assert_eq!(result.monthly_tax, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn calculate_top_bracket() {
        let result = calculator().calculate(dec!(500000), Period::Monthly).unwrap();

        assert_eq!(result.bracket.upper_bound, None);
        assert_eq!(result.excess, dec!(124024.38));
        assert_eq!(result.monthly_tax, dec!(161320.853));
        assert_eq!(result.steps[1].formula, "375975.62 ≤ 500000.00 ≤ ∞");
    }

    #[test]
    fn calculate_rejects_negative_amount() {
        let result = calculator().calculate(dec!(-1), Period::Monthly);

        assert!(matches!(result, Err(CalculationError::InvalidArgument(_))));
    }

    #[test]
    fn calculate_isr_uses_embedded_tables() {
        let result = calculate_isr(dec!(15000), Period::Monthly).unwrap();

        assert_eq!(round_half_up(result.period_tax), dec!(1552.78));
    }

    // =========================================================================
    // properties
    // =========================================================================

    /// Cent-granular incomes around every bracket boundary.
    fn boundary_incomes() -> Vec<Decimal> {
        let tables = TaxTables::mexico_2024();
        let mut incomes = vec![dec!(0), dec!(0.01)];
        for bracket in tables.brackets.iter() {
            incomes.push(bracket.lower_bound);
            if bracket.lower_bound > Decimal::ZERO {
                incomes.push(bracket.lower_bound - dec!(0.01));
            }
            if let Some(upper) = bracket.upper_bound {
                incomes.push(upper);
                incomes.push(upper + dec!(0.01));
            }
        }
        incomes
    }

    #[test]
    fn exactly_one_bracket_contains_each_cent_income() {
        let tables = TaxTables::mexico_2024();

        for income in boundary_incomes() {
            let matching = tables.brackets.iter().filter(|b| b.contains(income)).count();
            assert_eq!(matching, 1, "income {income}");

            let found = tables.brackets.find(income).unwrap();
            assert!(found.contains(income), "income {income}");
        }
    }

    #[test]
    fn final_tax_is_never_negative() {
        let calc = calculator();

        for period in Period::ALL {
            for income in boundary_incomes() {
                let result = calc.calculate(income, period).unwrap();
                assert!(result.monthly_tax >= Decimal::ZERO);
                assert!(result.period_tax >= Decimal::ZERO);
                assert!(result.excess >= Decimal::ZERO);
            }
        }
    }

    #[test]
    fn tax_is_monotonic_within_a_cent() {
        let calc = calculator();

        for period in Period::ALL {
            let mut amount = Decimal::ZERO;
            let mut previous = Decimal::ZERO;
            while amount <= dec!(450000) {
                let tax = calc.calculate(amount, period).unwrap().period_tax;
                assert!(
                    tax >= previous - dec!(0.01),
                    "{period}: tax fell from {previous} to {tax} at {amount}"
                );
                previous = tax;
                amount += dec!(37.37);
            }
        }
    }

    #[test]
    fn tax_is_monotonic_across_bracket_edges() {
        let calc = calculator();
        let mut incomes = boundary_incomes();
        incomes.sort();

        let taxes: Vec<Decimal> = incomes
            .iter()
            .map(|income| calc.calculate(*income, Period::Monthly).unwrap().monthly_tax)
            .collect();

        for pair in taxes.windows(2) {
            assert!(pair[1] >= pair[0] - dec!(0.01), "{} then {}", pair[0], pair[1]);
        }
    }
}
