use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of the audit trail produced by a calculation.
///
/// `formula` is a human-readable rendering with amounts rounded to cents;
/// `result_value` keeps full precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationStep {
    pub step_number: u32,
    pub description: String,
    pub formula: String,
    pub result_value: Decimal,
}

/// Append-only list of steps, numbered from 1 in insertion order.
#[derive(Debug, Default)]
pub(crate) struct StepLedger {
    steps: Vec<CalculationStep>,
}

impl StepLedger {
    pub(crate) fn record(
        &mut self,
        description: impl Into<String>,
        formula: impl Into<String>,
        result_value: Decimal,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(CalculationStep {
            step_number,
            description: description.into(),
            formula: formula.into(),
            result_value,
        });
    }

    pub(crate) fn into_steps(self) -> Vec<CalculationStep> {
        self.steps
    }
}
