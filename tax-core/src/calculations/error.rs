use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by the calculators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// Negative or out-of-range amount, or an unrecognised period name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No row of a rate table matches the monthly income. Only reachable with
    /// a table that does not cover `[0, +∞)`, which is a configuration error.
    #[error("no tax bracket found for monthly income {0}")]
    UnmatchedBracket(Decimal),

    /// An intermediate value left `Decimal`'s range, e.g. a base multiplied
    /// by an unreasonably large rate.
    #[error("{0} is out of range")]
    Overflow(&'static str),

    /// Strict IEPS lookup did not find the product key.
    #[error("unknown IEPS product '{0}'")]
    UnknownProduct(String),
}
