//! CSV loading for ISR, subsidy and IEPS rate tables.
//!
//! Tables for years other than the embedded 2024 schedules are kept as CSV
//! files and turned into validated [`tax_core::TaxTables`] here.

mod loader;

pub use loader::{
    BRACKETS_FILE, BracketRecord, PRODUCTS_FILE, ProductRecord, SUBSIDIES_FILE, SubsidyRecord,
    TableLoader, TableLoaderError, open,
};
