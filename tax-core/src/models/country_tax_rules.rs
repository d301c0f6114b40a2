use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// Key of the standard deduction in [`CountryTaxRules::deductions`].
pub const STANDARD_DEDUCTION: &str = "standard";

/// Payroll-style levy applied to gross income independently of brackets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurity {
    pub employee_rate: Decimal,
    pub employer_rate: Decimal,
    /// Income above this amount is not subject to the levy.
    pub max_income: Option<Decimal>,
}

/// A country's complete tax schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTaxRules {
    /// ISO-4217 currency code, e.g. `USD`.
    pub currency: String,
    /// Sorted ascending by `min_income`; the last bracket is open-ended.
    pub brackets: Vec<TaxBracket>,
    #[serde(default)]
    pub deductions: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub social_security: Option<SocialSecurity>,
}

impl CountryTaxRules {
    pub fn new(
        currency: impl Into<String>,
        brackets: Vec<TaxBracket>,
    ) -> Self {
        Self {
            currency: currency.into(),
            brackets,
            deductions: BTreeMap::new(),
            social_security: None,
        }
    }

    pub fn with_standard_deduction(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.deductions.insert(STANDARD_DEDUCTION.to_string(), amount);
        self
    }

    pub fn with_social_security(
        mut self,
        social_security: SocialSecurity,
    ) -> Self {
        self.social_security = Some(social_security);
        self
    }

    /// The standard deduction, or zero when the country defines none.
    pub fn standard_deduction(&self) -> Decimal {
        self.deductions
            .get(STANDARD_DEDUCTION)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn standard_deduction_defaults_to_zero() {
        let rules = CountryTaxRules::new("EUR", vec![TaxBracket::new(dec!(0), None, dec!(0.2))]);

        assert_eq!(rules.standard_deduction(), dec!(0));
        assert!(rules.deductions.is_empty());
    }

    #[test]
    fn with_standard_deduction_sets_standard_key() {
        let rules = CountryTaxRules::new("USD", vec![TaxBracket::new(dec!(0), None, dec!(0.1))])
            .with_standard_deduction(dec!(13850));

        assert_eq!(rules.standard_deduction(), dec!(13850));
        assert_eq!(rules.deductions.get("standard"), Some(&dec!(13850)));
    }
}
