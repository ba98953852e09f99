use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A row of an income partition: a closed `[lower, upper]` range where an
/// `upper_bound` of `None` stands for +∞.
pub trait Band {
    fn lower_bound(&self) -> Decimal;
    fn upper_bound(&self) -> Option<Decimal>;

    fn contains(&self, value: Decimal) -> bool {
        value >= self.lower_bound() && self.upper_bound().is_none_or(|upper| value <= upper)
    }
}

/// One row of the ISR rate schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub fixed_fee: Decimal,
    /// Rate applied to the excess over `lower_bound`, in percent (17.92 means 17.92%).
    pub marginal_rate_percent: Decimal,
}

impl Band for TaxBracket {
    fn lower_bound(&self) -> Decimal {
        self.lower_bound
    }

    fn upper_bound(&self) -> Option<Decimal> {
        self.upper_bound
    }
}

/// One row of the employment subsidy (subsidio al empleo) schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsidyBand {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub subsidy_amount: Decimal,
}

impl Band for SubsidyBand {
    fn lower_bound(&self) -> Decimal {
        self.lower_bound
    }

    fn upper_bound(&self) -> Option<Decimal> {
        self.upper_bound
    }
}
