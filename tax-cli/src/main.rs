use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tax_cli::report::TaxReport;
use tax_cli::utils::parse_decimal;
use tax_core::{CalculationOptions, RuleStore, TaxCalculator};
use tax_data::RuleSetLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income tax calculator.
///
/// Calculates income tax, social security and net income for a gross income
/// under the rules of a supported country.
#[derive(Debug, Parser)]
#[command(name = "tax-calc", version)]
struct Cli {
    /// Country code, case-insensitive (e.g. `US`, `Germany`).
    #[arg(short, long, required_unless_present = "list")]
    country: Option<String>,

    /// Gross annual income. Commas are accepted as thousands separators.
    #[arg(short, long, value_parser = parse_decimal, required_unless_present = "list")]
    income: Option<Decimal>,

    /// Deductions on top of the country's standard deduction.
    #[arg(short, long, value_parser = parse_decimal, default_value = "0")]
    deductions: Decimal,

    /// Leave social security out of the calculation.
    #[arg(long)]
    no_social_security: bool,

    /// CSV file of custom rules, added to (or replacing) the built-in countries.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// List supported countries and exit.
    #[arg(long)]
    list: bool,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_store(rules: Option<&PathBuf>) -> anyhow::Result<RuleStore> {
    let mut store = RuleStore::builtin().clone();

    if let Some(path) = rules {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = RuleSetLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        RuleSetLoader::load(&mut store, &records)
            .with_context(|| format!("Invalid rules in: {}", path.display()))?;
    }

    Ok(store)
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let store = build_store(cli.rules.as_ref())?;

    if cli.list {
        for country in store.available_countries() {
            let currency = store.get(country).map_or("", |rules| rules.currency.as_str());
            println!("{country:<12} {currency}");
        }
        return Ok(());
    }

    let (Some(country), Some(income)) = (cli.country.as_deref(), cli.income) else {
        anyhow::bail!("--country and --income are required");
    };

    let calculator = TaxCalculator::with_store(&store, country)?;
    let mut options = CalculationOptions::default().with_additional_deductions(cli.deductions);
    if cli.no_social_security {
        options = options.without_social_security();
    }

    debug!(?options, "calculating");
    let result = calculator.calculate(income, &options)?;
    println!("{}", TaxReport::new(&calculator, &result));

    Ok(())
}
