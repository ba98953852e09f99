use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::calculations::{
    IVA_GENERAL_RATE, IepsCalculator, IsrCalculator, calculate_iva, pesos_to_udis,
    try_convert_period, udis_to_pesos,
};
use tax_core::{IepsCatalog, IepsResult, IsrResult, IvaResult, Period, TableRegistry, tables};
use tax_data::TableLoader;
use tracing::debug;

use crate::cli::Command;
use crate::config::Config;
use crate::render;

/// Tables and settings shared by every command of one invocation.
#[derive(Debug)]
pub struct Session {
    registry: TableRegistry,
    catalog: Option<IepsCatalog>,
    tax_year: i32,
    strict_ieps: bool,
    default_period: Period,
}

/// Monthly equivalent of an amount for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub amount: Decimal,
    pub period: Period,
    pub monthly: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UdiDirection {
    PesosToUdis,
    UdisToPesos,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UdiConversion {
    pub amount: Decimal,
    pub udi_value: Decimal,
    pub direction: UdiDirection,
    pub result: Decimal,
}

impl Session {
    /// Builds the session: the embedded tables, replaced or extended by the
    /// CSV tables in `config.tables_dir`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = TableRegistry::with_defaults();
        let mut catalog = None;

        if let Some(dir) = &config.tables_dir {
            let (loaded, loaded_catalog) = TableLoader::load_dir(dir)
                .with_context(|| format!("Failed to load tables from: {}", dir.display()))?;
            for year in loaded.available_years() {
                registry.register(loaded.get(year)?.clone());
            }
            catalog = loaded_catalog;
        }

        let tax_year = match config.tax_year {
            Some(year) => year,
            None => registry
                .latest_year()
                .context("No tax tables are available")?,
        };
        // Fail early on a year without tables.
        registry.get(tax_year)?;

        debug!(
            tax_year,
            strict_ieps = config.strict_ieps,
            custom_catalog = catalog.is_some(),
            "session ready"
        );

        Ok(Self {
            registry,
            catalog,
            tax_year,
            strict_ieps: config.strict_ieps,
            default_period: config.default_period,
        })
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub fn catalog(&self) -> &IepsCatalog {
        self.catalog
            .as_ref()
            .unwrap_or_else(|| tables::default_ieps_catalog())
    }

    pub fn isr(
        &self,
        amount: Decimal,
        period: Option<Period>,
    ) -> Result<IsrResult> {
        let tables = self.registry.get(self.tax_year)?;
        let period = period.unwrap_or(self.default_period);
        Ok(IsrCalculator::new(tables).calculate(amount, period)?)
    }

    pub fn iva(
        &self,
        base: Decimal,
        rate_percent: Option<Decimal>,
    ) -> Result<IvaResult> {
        let rate_percent = rate_percent.unwrap_or(IVA_GENERAL_RATE);
        Ok(calculate_iva(base, rate_percent)?)
    }

    pub fn ieps(
        &self,
        base: Decimal,
        product_key: &str,
    ) -> Result<IepsResult> {
        let calculator = IepsCalculator::new(self.catalog());
        let result = if self.strict_ieps {
            calculator.calculate_strict(base, product_key)
        } else {
            calculator.calculate(base, product_key)
        };
        Ok(result?)
    }

    pub fn convert(
        &self,
        amount: Decimal,
        period: Period,
    ) -> Result<Conversion> {
        Ok(Conversion {
            amount,
            period,
            monthly: try_convert_period(amount, period)?,
        })
    }

    pub fn udi(
        &self,
        amount: Decimal,
        udi_value: Decimal,
        to_pesos: bool,
    ) -> Result<UdiConversion> {
        let (direction, result) = if to_pesos {
            (UdiDirection::UdisToPesos, udis_to_pesos(amount, udi_value)?)
        } else {
            (UdiDirection::PesosToUdis, pesos_to_udis(amount, udi_value)?)
        };
        Ok(UdiConversion {
            amount,
            udi_value,
            direction,
            result,
        })
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize result")
}

/// Runs one command and returns what should be printed.
pub fn execute(
    session: &Session,
    command: &Command,
    json: bool,
) -> Result<String> {
    debug!(?command, json, "executing");

    match command {
        Command::Isr { amount, period } => {
            let result = session.isr(*amount, *period)?;
            if json {
                to_json(&result)
            } else {
                Ok(render::isr(&result, session.tax_year()))
            }
        }
        Command::Iva { base, rate } => {
            let result = session.iva(*base, *rate)?;
            if json { to_json(&result) } else { Ok(render::iva(&result)) }
        }
        Command::Ieps { base, product } => {
            let result = session.ieps(*base, product)?;
            if json { to_json(&result) } else { Ok(render::ieps(&result)) }
        }
        Command::Convert { amount, period } => {
            let conversion = session.convert(*amount, *period)?;
            if json {
                to_json(&conversion)
            } else {
                Ok(render::conversion(&conversion))
            }
        }
        Command::Udi {
            amount,
            value,
            to_pesos,
        } => {
            let conversion = session.udi(*amount, *value, *to_pesos)?;
            if json { to_json(&conversion) } else { Ok(render::udi(&conversion)) }
        }
        Command::Products => {
            let catalog = session.catalog();
            if json {
                to_json(&catalog.products())
            } else {
                Ok(render::products(catalog))
            }
        }
    }
}
