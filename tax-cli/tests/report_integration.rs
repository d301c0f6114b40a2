//! Renders reports for rules loaded from an on-disk fixture file.

use std::fs::File;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_cli::report::TaxReport;
use tax_core::{CalculationOptions, RuleStore, TaxCalculator};
use tax_data::RuleSetLoader;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("custom_rules.csv")
}

fn store_with_fixture() -> RuleStore {
    let mut store = RuleStore::builtin().clone();
    let file = File::open(fixture_path()).expect("fixture file should open");
    let records = RuleSetLoader::parse(file).expect("fixture should parse");
    RuleSetLoader::load(&mut store, &records).expect("fixture should be valid");
    store
}

#[test]
fn fixture_extends_builtin_countries() {
    let store = store_with_fixture();

    assert_eq!(store.len(), RuleStore::builtin().len() + 1);
    assert!(store.contains("RURITANIA"));
}

#[test]
fn report_for_fixture_country() {
    let store = store_with_fixture();
    let calculator = TaxCalculator::with_store(&store, "ruritania").unwrap();
    let result = calculator
        .calculate(dec!(51000), &CalculationOptions::default())
        .unwrap();

    let text = TaxReport::new(&calculator, &result).to_string();

    let expected = "\
Country:            RURITANIA (GBP)
Gross income:       £51,000.00
Taxable income:     £50,000.00
Brackets:
      10%  £0.00 – £20,000.00: £2,000.00
      30%  £20,001.00 – and above: £8,999.70
Income tax:         £10,999.70
Social security:    £2,000.00
Net income:         £38,000.30
Effective rate:     22%
Marginal rate:      30%";
    assert_eq!(text, expected);
}
