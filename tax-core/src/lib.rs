//! Mexican tax calculators: ISR with employment subsidy, IVA and IEPS.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{IsrCalculator, calculate_iva};
//! use tax_core::{Period, TableRegistry};
//!
//! let registry = TableRegistry::with_defaults();
//! let isr = IsrCalculator::new(registry.get(2024).unwrap())
//!     .calculate(dec!(7500), Period::Biweekly)
//!     .unwrap();
//! assert_eq!(isr.monthly_income, dec!(15000));
//!
//! let iva = calculate_iva(dec!(1000), dec!(16)).unwrap();
//! assert_eq!(iva.total, dec!(1160));
//! ```

pub mod calculations;
pub mod models;
pub mod tables;

pub use calculations::CalculationError;
pub use models::*;
pub use tables::{BracketTable, IepsCatalog, TableError, TableRegistry, TaxTables};
