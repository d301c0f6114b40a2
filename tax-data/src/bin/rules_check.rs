use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::RuleStore;
use tax_data::RuleSetLoader;
use tracing_subscriber::EnvFilter;

/// Validate a custom tax rules CSV file.
///
/// The CSV file should have the following columns:
/// - country: Country code (e.g., US)
/// - currency: ISO-4217 currency code, on at least one row per country
/// - min_income: The minimum income for this bracket
/// - max_income: The maximum income (empty for unlimited)
/// - rate: The marginal tax rate as a decimal (e.g., 0.10)
/// - standard_deduction: Optional standard deduction
/// - ss_employee_rate, ss_employer_rate, ss_max_income: Optional social security
#[derive(Parser, Debug)]
#[command(name = "tax-rules-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing tax rules
    #[arg(short, long)]
    file: PathBuf,

    /// Check the file as an overlay on the built-in countries
    #[arg(short, long, default_value_t = false)]
    overlay: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();

    let args = Args::parse();

    println!("Checking tax rules in: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = RuleSetLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let mut store = if args.overlay {
        RuleStore::builtin().clone()
    } else {
        RuleStore::new()
    };

    let loaded = RuleSetLoader::load(&mut store, &records).context("Tax rules are invalid")?;

    println!("{} countries are valid.", loaded);
    for country in store.available_countries() {
        if let Some(rules) = store.get(country) {
            println!(
                "  {:<12} {}  {} brackets",
                country,
                rules.currency,
                rules.brackets.len()
            );
        }
    }

    Ok(())
}
