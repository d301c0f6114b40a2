use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{CountryTaxRules, RuleSetError, RuleStore, SocialSecurity, TaxBracket};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading custom tax rules.
#[derive(Debug, Error)]
pub enum RuleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Country '{0}' has no currency")]
    MissingCurrency(String),

    #[error("Country '{country}' has conflicting values for {field}: {first} and {second}")]
    ConflictingValue {
        country: String,
        field: &'static str,
        first: String,
        second: String,
    },

    #[error("Country '{0}' must set both social security rates or neither")]
    IncompleteSocialSecurity(String),

    #[error("Invalid rules for '{country}': {source}")]
    InvalidRules {
        country: String,
        #[source]
        source: RuleSetError,
    },
}

impl From<csv::Error> for RuleLoaderError {
    fn from(err: csv::Error) -> Self {
        RuleLoaderError::CsvParse(err.to_string())
    }
}

/// A single bracket row from a rules CSV file.
///
/// Country-level columns (`currency`, `standard_deduction` and the `ss_*`
/// columns) only need to be filled on one row per country; empty cells on
/// the other rows are ignored.
///
/// - `country`: Country code (matched case-insensitively)
/// - `currency`: ISO-4217 currency code
/// - `min_income`: The minimum income for this bracket
/// - `max_income`: The maximum income for this bracket (empty for unlimited)
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
/// - `standard_deduction`: Standard deduction amount
/// - `ss_employee_rate`, `ss_employer_rate`: Social security rates
/// - `ss_max_income`: Income cap for social security (empty for none)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleRecord {
    pub country: String,
    #[serde(default)]
    pub currency: Option<String>,
    pub min_income: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub standard_deduction: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub ss_employee_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub ss_employer_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub ss_max_income: Option<Decimal>,
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

/// Keeps the first value seen for a country-level column and rejects a
/// different one later.
fn merge<T: PartialEq + ToString + Clone>(
    country: &str,
    field: &'static str,
    slot: &mut Option<T>,
    value: Option<&T>,
) -> Result<(), RuleLoaderError> {
    match (slot.as_ref(), value) {
        (_, None) => Ok(()),
        (None, Some(v)) => {
            *slot = Some(v.clone());
            Ok(())
        }
        (Some(existing), Some(v)) if existing == v => Ok(()),
        (Some(existing), Some(v)) => Err(RuleLoaderError::ConflictingValue {
            country: country.to_string(),
            field,
            first: existing.to_string(),
            second: v.to_string(),
        }),
    }
}

/// Rows collected for one country before they become [`CountryTaxRules`].
#[derive(Debug, Default)]
struct CountryRows {
    country: String,
    currency: Option<String>,
    brackets: Vec<TaxBracket>,
    standard_deduction: Option<Decimal>,
    ss_employee_rate: Option<Decimal>,
    ss_employer_rate: Option<Decimal>,
    ss_max_income: Option<Decimal>,
}

impl CountryRows {
    fn new(country: &str) -> Self {
        Self {
            country: country.to_string(),
            ..Self::default()
        }
    }

    fn push(
        &mut self,
        record: &RuleRecord,
    ) -> Result<(), RuleLoaderError> {
        let currency = record
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase);
        merge(&self.country, "currency", &mut self.currency, currency.as_ref())?;
        merge(
            &self.country,
            "standard_deduction",
            &mut self.standard_deduction,
            record.standard_deduction.as_ref(),
        )?;
        merge(
            &self.country,
            "ss_employee_rate",
            &mut self.ss_employee_rate,
            record.ss_employee_rate.as_ref(),
        )?;
        merge(
            &self.country,
            "ss_employer_rate",
            &mut self.ss_employer_rate,
            record.ss_employer_rate.as_ref(),
        )?;
        merge(
            &self.country,
            "ss_max_income",
            &mut self.ss_max_income,
            record.ss_max_income.as_ref(),
        )?;

        self.brackets.push(TaxBracket::new(
            record.min_income,
            record.max_income,
            record.rate,
        ));
        Ok(())
    }

    fn into_rules(self) -> Result<(String, CountryTaxRules), RuleLoaderError> {
        let currency = self
            .currency
            .ok_or_else(|| RuleLoaderError::MissingCurrency(self.country.clone()))?;

        let mut rules = CountryTaxRules::new(currency, self.brackets);
        if let Some(amount) = self.standard_deduction {
            rules = rules.with_standard_deduction(amount);
        }

        match (self.ss_employee_rate, self.ss_employer_rate) {
            (Some(employee_rate), Some(employer_rate)) => {
                rules = rules.with_social_security(SocialSecurity {
                    employee_rate,
                    employer_rate,
                    max_income: self.ss_max_income,
                });
            }
            (None, None) if self.ss_max_income.is_none() => {}
            _ => return Err(RuleLoaderError::IncompleteSocialSecurity(self.country)),
        }

        Ok((self.country, rules))
    }
}

/// Loader for custom country tax rules from CSV.
///
/// Rows are grouped by country in order of first appearance; brackets keep
/// file order and are validated when inserted into a [`RuleStore`].
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Parse rule records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RuleRecord>, RuleLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RuleRecord = result?;
            records.push(record);
        }

        debug!(records = records.len(), "parsed rule records");
        Ok(records)
    }

    /// Group records by country and insert each rule set into `store`.
    ///
    /// Existing entries for the same country are replaced. Returns the number
    /// of countries inserted.
    ///
    /// Every country is validated before any is inserted, so on error the
    /// store is left unchanged.
    ///
    /// # Errors
    ///
    /// Fails on the first country with missing or conflicting country-level
    /// values, or whose brackets do not pass validation.
    pub fn load(
        store: &mut RuleStore,
        records: &[RuleRecord],
    ) -> Result<usize, RuleLoaderError> {
        let mut groups: Vec<CountryRows> = Vec::new();

        for record in records {
            let code = record.country.trim().to_uppercase();
            let index = match groups.iter().position(|g| g.country == code) {
                Some(index) => index,
                None => {
                    groups.push(CountryRows::new(&code));
                    groups.len() - 1
                }
            };
            groups[index].push(record)?;
        }

        let mut rule_sets = Vec::with_capacity(groups.len());
        for group in groups {
            let (country, rules) = group.into_rules()?;
            if let Err(source) = rules.validate() {
                return Err(RuleLoaderError::InvalidRules { country, source });
            }
            rule_sets.push((country, rules));
        }

        let mut inserted = 0;
        for (country, rules) in rule_sets {
            store
                .insert(&country, rules)
                .map_err(|source| RuleLoaderError::InvalidRules {
                    country: country.clone(),
                    source,
                })?;
            inserted += 1;
        }

        info!(countries = inserted, "loaded custom tax rules");
        Ok(inserted)
    }

    /// Build a new store containing only the countries in `records`.
    pub fn build(records: &[RuleRecord]) -> Result<RuleStore, RuleLoaderError> {
        let mut store = RuleStore::new();
        Self::load(&mut store, records)?;
        Ok(store)
    }
}
