use std::collections::HashMap;

use tracing::debug;

use super::validation::RuleSetError;
use crate::models::CountryTaxRules;

/// Country codes are stored and looked up in upper case.
pub(crate) fn normalize_country(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Immutable-once-built mapping from country code to its tax schedule.
///
/// Typical lifetime:
/// 1. Create with `RuleStore::new()` (or use [`RuleStore::builtin`]).
/// 2. Call `insert` once per country; each rule set is validated on the way in.
/// 3. Share by reference with any number of calculators.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    countries: HashMap<String, CountryTaxRules>,
}

impl RuleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The embedded dataset of every supported country.
    pub fn builtin() -> &'static RuleStore {
        &super::builtin::BUILTIN_RULES
    }

    /// Validate `rules` and register them under `country`.
    ///
    /// If rules for the same (case-insensitive) code are already present they
    /// are replaced.
    ///
    /// # Errors
    ///
    /// Returns the [`RuleSetError`] reported by [`CountryTaxRules::validate`].
    pub fn insert(
        &mut self,
        country: &str,
        rules: CountryTaxRules,
    ) -> Result<(), RuleSetError> {
        rules.validate()?;
        let code = normalize_country(country);
        debug!(country = %code, brackets = rules.brackets.len(), "registered tax rules");
        self.countries.insert(code, rules);
        Ok(())
    }

    /// Case-insensitive lookup.
    pub fn get(
        &self,
        country: &str,
    ) -> Option<&CountryTaxRules> {
        self.countries.get(&normalize_country(country))
    }

    pub fn contains(
        &self,
        country: &str,
    ) -> bool {
        self.get(country).is_some()
    }

    /// Codes of every registered country, sorted alphabetically.
    pub fn available_countries(&self) -> Vec<&str> {
        let mut codes: Vec<_> = self.countries.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::TaxBracket;

    fn flat_rules(rate: rust_decimal::Decimal) -> CountryTaxRules {
        CountryTaxRules::new("EUR", vec![TaxBracket::new(dec!(0), None, rate)])
    }

    #[test]
    fn insert_normalizes_code() {
        let mut store = RuleStore::new();
        store.insert("atlantis", flat_rules(dec!(0.1))).unwrap();

        assert_eq!(store.available_countries(), vec!["ATLANTIS"]);
        assert!(store.contains("Atlantis"));
        assert!(store.get("ATLANTIS").is_some());
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let mut store = RuleStore::new();
        store.insert("XX", flat_rules(dec!(0.1))).unwrap();
        store.insert("xx", flat_rules(dec!(0.2))).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("XX").unwrap().brackets[0].tax_rate, dec!(0.2));
    }

    #[test]
    fn insert_rejects_invalid_rules() {
        let mut store = RuleStore::new();

        let result = store.insert("XX", flat_rules(dec!(2)));

        assert_eq!(
            result,
            Err(RuleSetError::InvalidRate {
                index: 0,
                rate: dec!(2)
            })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn available_countries_are_sorted() {
        let mut store = RuleStore::new();
        store.insert("b", flat_rules(dec!(0.1))).unwrap();
        store.insert("c", flat_rules(dec!(0.1))).unwrap();
        store.insert("a", flat_rules(dec!(0.1))).unwrap();

        assert_eq!(store.available_countries(), vec!["A", "B", "C"]);
    }

    #[test]
    fn get_returns_none_for_unknown_country() {
        let store = RuleStore::new();

        assert!(store.get("US").is_none());
    }
}
