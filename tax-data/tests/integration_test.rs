//! Integration tests loading the CSV fixtures under `test-data/`.

use std::path::Path;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::calculations::common::round_half_up;
use tax_core::calculations::{IepsCalculator, IsrCalculator};
use tax_core::{Period, TableError, TaxTables};
use tax_data::{TableLoader, TableLoaderError};

const BRACKETS_CSV: &str = include_str!("../test-data/isr_brackets.csv");
const SUBSIDIES_CSV: &str = include_str!("../test-data/subsidies.csv");
const PRODUCTS_CSV: &str = include_str!("../test-data/ieps_products.csv");

fn test_data_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/test-data"))
}

#[test]
fn test_fixture_2024_matches_embedded_tables() {
    let brackets = TableLoader::parse_brackets(BRACKETS_CSV.as_bytes()).unwrap();
    let subsidies = TableLoader::parse_subsidies(SUBSIDIES_CSV.as_bytes()).unwrap();

    let tables = TableLoader::build(2024, &brackets, &subsidies).unwrap();

    assert_eq!(&tables, TaxTables::mexico_2024());
}

#[test]
fn test_registry_has_every_fixture_year() {
    let brackets = TableLoader::parse_brackets(BRACKETS_CSV.as_bytes()).unwrap();
    let subsidies = TableLoader::parse_subsidies(SUBSIDIES_CSV.as_bytes()).unwrap();

    let registry = TableLoader::build_registry(&brackets, &subsidies).unwrap();

    assert_eq!(registry.available_years(), vec![2022, 2024]);
    assert_eq!(registry.latest_year(), Some(2024));
}

#[test]
fn test_isr_with_loaded_2022_tables() {
    let (registry, _) = TableLoader::load_dir(test_data_dir()).unwrap();

    let result = IsrCalculator::new(registry.get(2022).unwrap())
        .calculate(dec!(10000), Period::Monthly)
        .unwrap();

    assert_eq!(result.bracket.lower_bound, dec!(9614.67));
    assert_eq!(result.bracket.fixed_fee, dec!(772.10));
    assert_eq!(result.excess, dec!(385.33));
    assert_eq!(round_half_up(result.period_tax), dec!(833.75));
}

#[test]
fn test_loaded_2024_tables_agree_with_embedded_results() {
    let (registry, _) = TableLoader::load_dir(test_data_dir()).unwrap();
    let loaded = IsrCalculator::new(registry.get(2024).unwrap());
    let embedded = IsrCalculator::new(TaxTables::mexico_2024());

    for amount in [dec!(500), dec!(7000), dec!(15000), dec!(100000)] {
        assert_eq!(
            loaded.calculate(amount, Period::Weekly).unwrap(),
            embedded.calculate(amount, Period::Weekly).unwrap(),
            "{amount}"
        );
    }
}

#[test]
fn test_load_dir_reads_product_catalog() {
    let (_, catalog) = TableLoader::load_dir(test_data_dir()).unwrap();
    let catalog = catalog.expect("fixture has ieps_products.csv");

    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.fallback().product_key, "alcohol_bajo");

    let result = IepsCalculator::new(&catalog)
        .calculate(dec!(1000), "bebidas_azucaradas")
        .unwrap();
    assert_eq!(result.tax, dec!(80));
    assert!(!result.used_fallback);
}

#[test]
fn test_loaded_catalog_keeps_csv_order() {
    let records = TableLoader::parse_products(PRODUCTS_CSV.as_bytes()).unwrap();

    let catalog = TableLoader::build_catalog(&records).unwrap();

    let keys: Vec<&str> = catalog
        .products()
        .iter()
        .map(|p| p.product_key.as_str())
        .collect();
    assert_eq!(
        keys,
        vec![
            "alcohol_bajo",
            "alcohol_medio",
            "alcohol_alto",
            "bebidas_azucaradas",
            "juegos_apuestas"
        ]
    );
}

#[test]
fn test_load_dir_missing_directory() {
    let err = TableLoader::load_dir(Path::new("/nonexistent/tables")).unwrap_err();

    assert!(matches!(err, TableLoaderError::Io { .. }));
}

#[test]
fn test_overlapping_rows_are_rejected() {
    let csv = "tax_year,lower_bound,upper_bound,fixed_fee,rate_percent
2024,0.00,746.04,0.00,1.92
2024,700.00,,14.32,6.40
";
    let brackets = TableLoader::parse_brackets(csv.as_bytes()).unwrap();
    let subsidies = TableLoader::parse_subsidies(SUBSIDIES_CSV.as_bytes()).unwrap();

    let err = TableLoader::build(2024, &brackets, &subsidies).unwrap_err();

    assert!(matches!(
        err,
        TableLoaderError::InvalidTable {
            source: TableError::Overlap { row: 2, .. },
            ..
        }
    ));
}
