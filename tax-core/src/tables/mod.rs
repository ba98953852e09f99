//! Static rate tables consumed by the calculators.
//!
//! Tables are immutable once built. The embedded 2024 schedules and the
//! default IEPS catalog are initialised on first use and shared for the life
//! of the process; other years are loaded by the caller (see the
//! `mx-tax-data` crate) and injected through a [`TableRegistry`].

mod bracket_table;
mod ieps_catalog;
mod mexico_2024;
mod registry;

use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bracket_table::BracketTable;
pub use ieps_catalog::IepsCatalog;
pub use registry::TableRegistry;

use crate::models::{SubsidyBand, TaxBracket};

/// Structural problems in a rate table. These are configuration errors: a
/// table that fails validation must not be used for calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table has no rows")]
    Empty,

    #[error("table must start at 0, first lower bound is {0}")]
    DoesNotStartAtZero(Decimal),

    #[error("row {row}: upper bound {upper} is below lower bound {lower}")]
    InvertedRow {
        row: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("row {row}: lower bound {lower} overlaps previous upper bound {previous_upper}")]
    Overlap {
        row: usize,
        lower: Decimal,
        previous_upper: Decimal,
    },

    #[error("row {row}: gap between previous upper bound {previous_upper} and lower bound {lower}")]
    Gap {
        row: usize,
        lower: Decimal,
        previous_upper: Decimal,
    },

    #[error("row {row} is unbounded but is not the last row")]
    UnboundedRow { row: usize },

    #[error("last row must be unbounded")]
    BoundedLastRow,

    #[error("duplicate IEPS product key '{0}'")]
    DuplicateProduct(String),

    #[error("IEPS product '{product_key}' has negative rate {rate}")]
    NegativeRate { product_key: String, rate: Decimal },

    #[error("no tables registered for tax year {year}; available: {available:?}")]
    UnknownYear { year: i32, available: Vec<i32> },
}

/// ISR rate schedule and employment subsidy schedule for one tax year,
/// expressed in monthly amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTables {
    pub tax_year: i32,
    pub brackets: BracketTable<TaxBracket>,
    pub subsidies: BracketTable<SubsidyBand>,
}

static MEXICO_2024: LazyLock<TaxTables> = LazyLock::new(|| TaxTables {
    tax_year: mexico_2024::TAX_YEAR,
    brackets: BracketTable::from_trusted(mexico_2024::BRACKETS.to_vec()),
    subsidies: BracketTable::from_trusted(mexico_2024::SUBSIDIES.to_vec()),
});

static DEFAULT_IEPS_CATALOG: LazyLock<IepsCatalog> = LazyLock::new(IepsCatalog::mexico_default);

impl TaxTables {
    /// Validates both schedules and bundles them.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] found in either schedule.
    pub fn new(
        tax_year: i32,
        brackets: Vec<TaxBracket>,
        subsidies: Vec<SubsidyBand>,
    ) -> Result<Self, TableError> {
        Ok(Self {
            tax_year,
            brackets: BracketTable::new(brackets)?,
            subsidies: BracketTable::new(subsidies)?,
        })
    }

    /// The embedded 2024 monthly schedules.
    pub fn mexico_2024() -> &'static TaxTables {
        &MEXICO_2024
    }
}

/// The embedded default IEPS catalog.
pub fn default_ieps_catalog() -> &'static IepsCatalog {
    &DEFAULT_IEPS_CATALOG
}
