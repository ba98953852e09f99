//! Plain text rendering of calculation results. Amounts are rounded to cents
//! here and nowhere else.

use std::fmt::Write;

use tax_core::calculations::common::{format_amount, format_percent, round_half_up};
use tax_core::{BreakdownLine, IepsCatalog, IepsResult, IsrResult, IvaResult};

use crate::app::{Conversion, UdiConversion, UdiDirection};

const LABEL_WIDTH: usize = 28;

fn breakdown(
    out: &mut String,
    lines: &[BreakdownLine],
) {
    let width = lines
        .iter()
        .map(|l| format_amount(l.amount).len())
        .max()
        .unwrap_or(0);
    for line in lines {
        let _ = writeln!(
            out,
            "  {:<LABEL_WIDTH$} {:>width$}",
            line.label,
            format_amount(line.amount)
        );
    }
}

pub fn isr(
    result: &IsrResult,
    tax_year: i32,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "ISR {tax_year}: {} {}",
        format_amount(result.amount),
        result.period
    );
    for step in &result.steps {
        let _ = writeln!(out, "  {:>2}. {}", step.step_number, step.description);
        let _ = writeln!(out, "      {}", step.formula);
    }
    let _ = writeln!(
        out,
        "  {:<LABEL_WIDTH$} {}",
        format!("ISR {}", result.period),
        format_amount(result.period_tax)
    );
    let _ = writeln!(
        out,
        "  {:<LABEL_WIDTH$} {}",
        "Tasa efectiva",
        format_percent(round_half_up(result.effective_rate))
    );
    out
}

pub fn iva(result: &IvaResult) -> String {
    let mut out = String::new();
    breakdown(&mut out, &result.breakdown);
    out
}

pub fn ieps(result: &IepsResult) -> String {
    let mut out = String::new();
    if result.used_fallback {
        let _ = writeln!(
            out,
            "  Producto '{}' no encontrado, se usa '{}'",
            result.requested_key, result.product.product_key
        );
    }
    breakdown(&mut out, &result.breakdown);
    out
}

pub fn conversion(conversion: &Conversion) -> String {
    format!(
        "  {} {} = {} mensual\n",
        format_amount(conversion.amount),
        conversion.period,
        format_amount(conversion.monthly)
    )
}

pub fn udi(conversion: &UdiConversion) -> String {
    let (from, to) = match conversion.direction {
        UdiDirection::PesosToUdis => ("pesos", "UDIs"),
        UdiDirection::UdisToPesos => ("UDIs", "pesos"),
    };
    format!(
        "  {} {from} = {} {to} (1 UDI = {} pesos)\n",
        format_amount(conversion.amount),
        format_amount(conversion.result),
        conversion.udi_value.normalize()
    )
}

pub fn products(catalog: &IepsCatalog) -> String {
    let key_width = catalog
        .products()
        .iter()
        .map(|p| p.product_key.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for product in catalog.products() {
        let _ = writeln!(
            out,
            "  {:<key_width$}  {:>7}  {}",
            product.product_key,
            format_percent(product.rate_percent),
            product.display_name
        );
    }
    out
}
