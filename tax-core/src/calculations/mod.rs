//! Tax calculations: period conversion, ISR with employment subsidy, IVA,
//! IEPS and the peso/UDI helpers.
//!
//! Every calculator is a pure function over immutable tables. Amounts keep
//! full decimal precision; use [`common::round_half_up`] when presenting.

pub mod common;
mod error;
pub mod ieps;
pub mod isr;
pub mod iva;
pub mod period;
pub mod udi;

pub use error::CalculationError;
pub use ieps::{IepsCalculator, calculate_ieps};
pub use isr::{IsrCalculator, calculate_isr};
pub use iva::{IVA_BORDER_RATE, IVA_GENERAL_RATE, IVA_ZERO_RATE, IvaCalculator, calculate_iva};
pub use period::{convert_from_monthly, convert_period, try_convert_period};
pub use udi::{pesos_to_udis, udis_to_pesos};
