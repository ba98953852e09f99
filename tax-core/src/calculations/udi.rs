//! Conversion between pesos and UDIs (Unidades de Inversión).
//!
//! The UDI value for a given day is published by Banxico and supplied by the
//! caller.

use rust_decimal::Decimal;

use super::CalculationError;
use super::common::{ensure_amount, in_range};

fn ensure_udi_value(udi_value: Decimal) -> Result<Decimal, CalculationError> {
    if udi_value <= Decimal::ZERO {
        return Err(CalculationError::InvalidArgument(format!(
            "UDI value must be positive, got {udi_value}"
        )));
    }
    ensure_amount("UDI value", udi_value)
}

/// Number of UDIs worth `pesos` at `udi_value` pesos per UDI.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::pesos_to_udis;
///
/// assert_eq!(pesos_to_udis(dec!(81.0), dec!(8.1)).unwrap(), dec!(10));
/// ```
pub fn pesos_to_udis(
    pesos: Decimal,
    udi_value: Decimal,
) -> Result<Decimal, CalculationError> {
    let pesos = ensure_amount("pesos", pesos)?;
    in_range(pesos.checked_div(ensure_udi_value(udi_value)?), "UDI amount")
}

/// Peso value of `udis` at `udi_value` pesos per UDI.
pub fn udis_to_pesos(
    udis: Decimal,
    udi_value: Decimal,
) -> Result<Decimal, CalculationError> {
    let udis = ensure_amount("udis", udis)?;
    in_range(udis.checked_mul(ensure_udi_value(udi_value)?), "peso amount")
}
