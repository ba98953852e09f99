use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tax_core::{
    IepsCatalog, IepsProductRate, SubsidyBand, TableError, TableRegistry, TaxBracket, TaxTables,
};
use thiserror::Error;
use tracing::{debug, info};

/// File names looked up by [`TableLoader::load_dir`].
pub const BRACKETS_FILE: &str = "isr_brackets.csv";
pub const SUBSIDIES_FILE: &str = "subsidies.csv";
pub const PRODUCTS_FILE: &str = "ieps_products.csv";

/// Errors that can occur when loading rate tables.
#[derive(Debug, Error)]
pub enum TableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no {kind} rows for tax year {year}")]
    MissingYear { kind: &'static str, year: i32 },

    #[error("invalid {kind} table for tax year {year}: {source}")]
    InvalidTable {
        kind: &'static str,
        year: i32,
        #[source]
        source: TableError,
    },

    #[error("invalid IEPS catalog: {0}")]
    InvalidCatalog(#[source] TableError),
}

impl From<csv::Error> for TableLoaderError {
    fn from(err: csv::Error) -> Self {
        TableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the ISR brackets CSV file.
///
/// - `tax_year`: The tax year (e.g., 2024)
/// - `lower_bound`: Lower limit of the monthly income range
/// - `upper_bound`: Upper limit (empty for unlimited)
/// - `fixed_fee`: Cuota fija for this bracket
/// - `rate_percent`: Rate over the excess, in percent (e.g., 17.92)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub fixed_fee: Decimal,
    pub rate_percent: Decimal,
}

/// A single row of the employment subsidy CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubsidyRecord {
    pub tax_year: i32,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub subsidy_amount: Decimal,
}

/// A single row of the IEPS products CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub product_key: String,
    pub display_name: String,
    pub rate_percent: Decimal,
    #[serde(default)]
    pub description: String,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for ISR, subsidy and IEPS tables from CSV files.
///
/// Parsing and building are separate steps: `parse_*` only checks the CSV
/// shape, `build*` groups rows by year and validates the resulting tables.
pub struct TableLoader;

impl TableLoader {
    fn parse<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, TableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: T = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse ISR bracket records from a CSV reader.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TableLoaderError> {
        Self::parse(reader)
    }

    /// Parse subsidy records from a CSV reader.
    pub fn parse_subsidies<R: Read>(reader: R) -> Result<Vec<SubsidyRecord>, TableLoaderError> {
        Self::parse(reader)
    }

    /// Parse IEPS product records from a CSV reader.
    pub fn parse_products<R: Read>(reader: R) -> Result<Vec<ProductRecord>, TableLoaderError> {
        Self::parse(reader)
    }

    /// Build validated tables for `year` from parsed records.
    ///
    /// Rows of other years are ignored. Rows are ordered by lower bound, so
    /// the CSV files do not have to be sorted.
    pub fn build(
        year: i32,
        brackets: &[BracketRecord],
        subsidies: &[SubsidyRecord],
    ) -> Result<TaxTables, TableLoaderError> {
        let mut bracket_rows: Vec<TaxBracket> = brackets
            .iter()
            .filter(|r| r.tax_year == year)
            .map(|r| TaxBracket {
                lower_bound: r.lower_bound,
                upper_bound: r.upper_bound,
                fixed_fee: r.fixed_fee,
                marginal_rate_percent: r.rate_percent,
            })
            .collect();
        if bracket_rows.is_empty() {
            return Err(TableLoaderError::MissingYear {
                kind: "ISR bracket",
                year,
            });
        }
        bracket_rows.sort_by_key(|b| b.lower_bound);

        let mut subsidy_rows: Vec<SubsidyBand> = subsidies
            .iter()
            .filter(|r| r.tax_year == year)
            .map(|r| SubsidyBand {
                lower_bound: r.lower_bound,
                upper_bound: r.upper_bound,
                subsidy_amount: r.subsidy_amount,
            })
            .collect();
        if subsidy_rows.is_empty() {
            return Err(TableLoaderError::MissingYear {
                kind: "subsidy",
                year,
            });
        }
        subsidy_rows.sort_by_key(|b| b.lower_bound);

        debug!(
            tax_year = year,
            brackets = bracket_rows.len(),
            subsidies = subsidy_rows.len(),
            "building tax tables"
        );

        let brackets = tax_core::BracketTable::new(bracket_rows).map_err(|source| {
            TableLoaderError::InvalidTable {
                kind: "ISR bracket",
                year,
                source,
            }
        })?;
        let subsidies = tax_core::BracketTable::new(subsidy_rows).map_err(|source| {
            TableLoaderError::InvalidTable {
                kind: "subsidy",
                year,
                source,
            }
        })?;

        Ok(TaxTables {
            tax_year: year,
            brackets,
            subsidies,
        })
    }

    /// Build a registry with one entry per tax year found in `brackets`.
    ///
    /// A year present only in `subsidies` is reported as missing its brackets.
    pub fn build_registry(
        brackets: &[BracketRecord],
        subsidies: &[SubsidyRecord],
    ) -> Result<TableRegistry, TableLoaderError> {
        let years: BTreeSet<i32> = brackets
            .iter()
            .map(|r| r.tax_year)
            .chain(subsidies.iter().map(|r| r.tax_year))
            .collect();

        let mut registry = TableRegistry::new();
        for year in years {
            registry.register(Self::build(year, brackets, subsidies)?);
        }

        Ok(registry)
    }

    /// Build a validated IEPS catalog, keeping the CSV order (the first row
    /// is the fallback entry).
    pub fn build_catalog(records: &[ProductRecord]) -> Result<IepsCatalog, TableLoaderError> {
        let products = records
            .iter()
            .map(|r| IepsProductRate {
                product_key: r.product_key.clone(),
                display_name: r.display_name.clone(),
                rate_percent: r.rate_percent,
                description: r.description.clone(),
            })
            .collect();

        IepsCatalog::new(products).map_err(TableLoaderError::InvalidCatalog)
    }

    /// Load every table from a directory holding [`BRACKETS_FILE`] and
    /// [`SUBSIDIES_FILE`], plus [`PRODUCTS_FILE`] when present.
    pub fn load_dir(dir: &Path) -> Result<(TableRegistry, Option<IepsCatalog>), TableLoaderError> {
        let brackets = Self::parse_brackets(open(&dir.join(BRACKETS_FILE))?)?;
        let subsidies = Self::parse_subsidies(open(&dir.join(SUBSIDIES_FILE))?)?;
        let registry = Self::build_registry(&brackets, &subsidies)?;

        let products_path = dir.join(PRODUCTS_FILE);
        let catalog = if products_path.is_file() {
            let records = Self::parse_products(open(&products_path)?)?;
            Some(Self::build_catalog(&records)?)
        } else {
            None
        };

        info!(
            dir = %dir.display(),
            years = ?registry.available_years(),
            ieps_catalog = catalog.is_some(),
            "loaded rate tables"
        );

        Ok((registry, catalog))
    }
}

/// Open a table file, keeping the path in the error.
pub fn open(path: &Path) -> Result<File, TableLoaderError> {
    File::open(path).map_err(|source| TableLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
