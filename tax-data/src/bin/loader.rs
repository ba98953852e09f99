use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_data::{TableLoader, open};

/// Validate ISR, subsidy and IEPS tables stored as CSV files.
///
/// The brackets file has the columns
/// `tax_year,lower_bound,upper_bound,fixed_fee,rate_percent` and the subsidy
/// file `tax_year,lower_bound,upper_bound,subsidy_amount`. An empty
/// `upper_bound` marks the unbounded last row.
#[derive(Parser, Debug)]
#[command(name = "mx-tax-tables")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing ISR brackets
    #[arg(short, long)]
    brackets: PathBuf,

    /// Path to the CSV file containing employment subsidy bands
    #[arg(short, long)]
    subsidies: PathBuf,

    /// Path to a CSV file containing IEPS products
    #[arg(short, long)]
    products: Option<PathBuf>,

    /// Only check this tax year
    #[arg(short, long)]
    year: Option<i32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading ISR brackets from: {}", args.brackets.display());
    let brackets = TableLoader::parse_brackets(open(&args.brackets)?)
        .with_context(|| format!("Failed to parse CSV: {}", args.brackets.display()))?;

    println!("Loading subsidies from: {}", args.subsidies.display());
    let subsidies = TableLoader::parse_subsidies(open(&args.subsidies)?)
        .with_context(|| format!("Failed to parse CSV: {}", args.subsidies.display()))?;

    println!(
        "Parsed {} bracket rows and {} subsidy rows",
        brackets.len(),
        subsidies.len()
    );

    let registry = TableLoader::build_registry(&brackets, &subsidies)
        .context("Tax tables failed validation")?;

    let years = match args.year {
        Some(year) => vec![year],
        None => registry.available_years(),
    };

    for year in years {
        let tables = registry.get(year)?;
        let top = tables
            .brackets
            .rows()
            .last()
            .map(|b| b.marginal_rate_percent)
            .unwrap_or_default();
        println!(
            "{}: {} brackets (top rate {}%), {} subsidy bands",
            year,
            tables.brackets.len(),
            top.normalize(),
            tables.subsidies.len()
        );
    }

    if let Some(path) = &args.products {
        let records = TableLoader::parse_products(open(path)?)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        let catalog = TableLoader::build_catalog(&records).context("IEPS catalog failed validation")?;
        println!(
            "IEPS: {} products, fallback '{}'",
            catalog.len(),
            catalog.fallback().product_key
        );
    }

    println!("All tables are valid.");

    Ok(())
}
