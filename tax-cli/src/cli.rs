use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tax_core::Period;

use crate::config::Overrides;
use crate::utils::parse_decimal;

/// Mexican tax calculator: ISR with employment subsidy, IVA and IEPS.
///
/// Amounts accept thousands separators (`15,000.00`). Periods are
/// `mensual`, `quincenal`, `semanal` or `anual` (English names work too).
#[derive(Debug, Parser)]
#[command(name = "mx-tax", version, about)]
pub struct Cli {
    /// Configuration file. Defaults to `mx-tax.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory with CSV rate tables, overriding the embedded 2024 tables.
    #[arg(long, global = true)]
    pub tables: Option<PathBuf>,

    /// Tax year for ISR.
    #[arg(long, global = true)]
    pub year: Option<i32>,

    /// Reject unknown IEPS product keys.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Income tax withheld on salary, after the employment subsidy.
    Isr {
        #[arg(value_parser = parse_decimal)]
        amount: Decimal,

        /// Period the amount covers.
        #[arg(short, long)]
        period: Option<Period>,
    },

    /// Value added tax.
    Iva {
        #[arg(value_parser = parse_decimal)]
        base: Decimal,

        /// Rate in percent: 16 general, 8 border region, 0 exempt.
        #[arg(short, long, value_parser = parse_decimal)]
        rate: Option<Decimal>,
    },

    /// Special tax on production and services.
    Ieps {
        #[arg(value_parser = parse_decimal)]
        base: Decimal,

        /// Product key, see `products`.
        product: String,
    },

    /// Convert an amount for a period to its monthly equivalent.
    Convert {
        #[arg(value_parser = parse_decimal)]
        amount: Decimal,

        period: Period,
    },

    /// Convert pesos to UDIs, or UDIs to pesos with `--to-pesos`.
    Udi {
        #[arg(value_parser = parse_decimal)]
        amount: Decimal,

        /// Peso value of one UDI.
        #[arg(long, value_parser = parse_decimal)]
        value: Decimal,

        #[arg(long)]
        to_pesos: bool,
    },

    /// List the IEPS product catalog.
    Products,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            tax_year: self.year,
            tables_dir: self.tables.clone(),
            strict_ieps: self.strict,
        }
    }
}
