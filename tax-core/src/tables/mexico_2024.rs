//! Monthly ISR rate schedule and employment subsidy schedule for 2024.
//!
//! Both schedules are published with a first lower bound of 0.01; here the
//! first row starts at zero so that every non-negative income resolves to a
//! row.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{SubsidyBand, TaxBracket};

pub(crate) const TAX_YEAR: i32 = 2024;

const fn bracket(
    lower_bound: Decimal,
    upper_bound: Option<Decimal>,
    fixed_fee: Decimal,
    marginal_rate_percent: Decimal,
) -> TaxBracket {
    TaxBracket {
        lower_bound,
        upper_bound,
        fixed_fee,
        marginal_rate_percent,
    }
}

const fn band(
    lower_bound: Decimal,
    upper_bound: Option<Decimal>,
    subsidy_amount: Decimal,
) -> SubsidyBand {
    SubsidyBand {
        lower_bound,
        upper_bound,
        subsidy_amount,
    }
}

pub(crate) const BRACKETS: [TaxBracket; 11] = [
    bracket(dec!(0.00), Some(dec!(746.04)), dec!(0.00), dec!(1.92)),
    bracket(dec!(746.05), Some(dec!(6332.05)), dec!(14.32), dec!(6.40)),
    bracket(dec!(6332.06), Some(dec!(11128.01)), dec!(371.83), dec!(10.88)),
    bracket(dec!(11128.02), Some(dec!(12935.82)), dec!(893.63), dec!(16.00)),
    bracket(dec!(12935.83), Some(dec!(15487.71)), dec!(1182.88), dec!(17.92)),
    bracket(dec!(15487.72), Some(dec!(31236.49)), dec!(1640.18), dec!(21.36)),
    bracket(dec!(31236.50), Some(dec!(49233.00)), dec!(5004.12), dec!(23.52)),
    bracket(dec!(49233.01), Some(dec!(93993.90)), dec!(9236.89), dec!(30.00)),
    bracket(dec!(93993.91), Some(dec!(125325.20)), dec!(22665.17), dec!(32.00)),
    bracket(dec!(125325.21), Some(dec!(375975.61)), dec!(32691.18), dec!(34.00)),
    bracket(dec!(375975.62), None, dec!(117912.32), dec!(35.00)),
];

pub(crate) const SUBSIDIES: [SubsidyBand; 11] = [
    band(dec!(0.00), Some(dec!(1768.96)), dec!(407.02)),
    band(dec!(1768.97), Some(dec!(2653.38)), dec!(406.83)),
    band(dec!(2653.39), Some(dec!(3472.84)), dec!(406.62)),
    band(dec!(3472.85), Some(dec!(3537.87)), dec!(392.77)),
    band(dec!(3537.88), Some(dec!(4446.15)), dec!(382.46)),
    band(dec!(4446.16), Some(dec!(4717.18)), dec!(354.23)),
    band(dec!(4717.19), Some(dec!(5335.42)), dec!(324.87)),
    band(dec!(5335.43), Some(dec!(6224.67)), dec!(294.63)),
    band(dec!(6224.68), Some(dec!(7113.90)), dec!(253.54)),
    band(dec!(7113.91), Some(dec!(7382.33)), dec!(217.61)),
    band(dec!(7382.34), None, dec!(0.00)),
];
