//! Progressive income tax calculation for a single country.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable income: gross income − standard deduction − additional deductions (minimum 0) |
//! | 2    | Bracket tax: each bracket entered by taxable income taxes its slice at its own rate |
//! | 3    | Social security: (capped) gross income × employee rate |
//! | 4    | Effective rate, marginal rate and net income |
//!
//! Social security is based on gross income, so deductions never reduce it.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{CalculationOptions, TaxCalculator};
//!
//! let calculator = TaxCalculator::new("us").unwrap();
//! let result = calculator
//!     .calculate(dec!(100000), &CalculationOptions::default())
//!     .unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(86150));
//! assert_eq!(result.marginal_rate, dec!(0.22));
//! assert_eq!(result.breakdown.len(), 3);
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::max;
use crate::currency;
use crate::models::{
    BracketTax, CalculationOptions, CountryTaxRules, SocialSecurity, TaxBracket, TaxResult,
};
use crate::rules::{RuleStore, normalize_country};

/// Errors that can occur when building a calculator or running a calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculatorError {
    /// No rules exist for the requested country. Carries the identifier as
    /// the caller supplied it.
    #[error("Tax rules not found for country: {0}")]
    CountryNotSupported(String),

    /// A monetary input was negative.
    #[error("{field} must be non-negative, got {value}")]
    InvalidInput { field: &'static str, value: Decimal },
}

/// Calculator bound to one country's tax rules.
///
/// The rules are resolved once at construction; every calculation afterwards
/// is a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct TaxCalculator<'a> {
    country: String,
    rules: &'a CountryTaxRules,
}

impl TaxCalculator<'static> {
    /// Creates a calculator from the built-in rule dataset.
    ///
    /// The country code is matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::CountryNotSupported`] if no rules exist for
    /// `country`.
    pub fn new(country: &str) -> Result<Self, CalculatorError> {
        Self::with_store(RuleStore::builtin(), country)
    }
}

impl<'a> TaxCalculator<'a> {
    /// Creates a calculator from a custom [`RuleStore`].
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::CountryNotSupported`] if `store` has no
    /// rules for `country`.
    pub fn with_store(
        store: &'a RuleStore,
        country: &str,
    ) -> Result<Self, CalculatorError> {
        let code = normalize_country(country);
        let rules = store.get(&code).ok_or_else(|| {
            warn!(country, "no tax rules for country");
            CalculatorError::CountryNotSupported(country.to_string())
        })?;

        debug!(country = %code, currency = %rules.currency, "resolved tax rules");
        Ok(Self {
            country: code,
            rules,
        })
    }

    /// Calculates income tax and social security for `gross_income`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::InvalidInput`] if `gross_income` or
    /// `options.additional_deductions` is negative.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{CalculationOptions, TaxCalculator};
    ///
    /// let calculator = TaxCalculator::new("US").unwrap();
    /// let options = CalculationOptions::default().with_additional_deductions(dec!(10000));
    /// let result = calculator.calculate(dec!(100000), &options).unwrap();
    ///
    /// // 100,000 - 13,850 standard - 10,000 additional
    /// assert_eq!(result.taxable_income, dec!(76150));
    /// ```
    pub fn calculate(
        &self,
        gross_income: Decimal,
        options: &CalculationOptions,
    ) -> Result<TaxResult, CalculatorError> {
        Self::check_non_negative("gross income", gross_income)?;
        Self::check_non_negative("additional deductions", options.additional_deductions)?;

        // Step 1: Taxable income
        let taxable_income = self.taxable_income(gross_income, options.additional_deductions);

        // Step 2: Tax by bracket
        let breakdown = self.bracket_taxes(taxable_income);
        let total_tax = breakdown
            .iter()
            .fold(Decimal::ZERO, |total, b| total.saturating_add(b.tax_amount));
        let marginal_rate = breakdown
            .last()
            .map_or(Decimal::ZERO, |b| b.bracket.tax_rate);

        // Step 3: Social security
        let social_security_tax =
            self.social_security_tax(gross_income, options.include_social_security);

        // Step 4: Derived figures
        let effective_rate = self.effective_rate(total_tax, taxable_income);
        let net_income = gross_income
            .saturating_sub(total_tax)
            .saturating_sub(social_security_tax);

        debug!(
            country = %self.country,
            gross_income = %gross_income,
            taxable_income = %taxable_income,
            total_tax = %total_tax,
            social_security_tax = %social_security_tax,
            "calculated tax"
        );

        Ok(TaxResult {
            gross_income,
            taxable_income,
            total_tax,
            effective_rate,
            marginal_rate,
            social_security_tax,
            net_income,
            breakdown,
        })
    }

    fn check_non_negative(
        field: &'static str,
        value: Decimal,
    ) -> Result<(), CalculatorError> {
        if value < Decimal::ZERO {
            warn!(field, value = %value, "rejected negative input");
            return Err(CalculatorError::InvalidInput { field, value });
        }
        Ok(())
    }

    /// Gross income less all deductions, clamped at zero.
    ///
    /// Deductions saturate at [`Decimal::MAX`], which no income exceeds.
    fn taxable_income(
        &self,
        gross_income: Decimal,
        additional_deductions: Decimal,
    ) -> Decimal {
        let deductions = self
            .rules
            .standard_deduction()
            .saturating_add(additional_deductions);
        max(gross_income.saturating_sub(deductions), Decimal::ZERO)
    }

    /// Tax per bracket, for every bracket whose minimum is below taxable income.
    fn bracket_taxes(
        &self,
        taxable_income: Decimal,
    ) -> Vec<BracketTax> {
        self.rules
            .brackets
            .iter()
            .filter(|bracket| taxable_income > bracket.min_income)
            .map(|bracket| {
                let income_in_bracket = bracket.income_in_bracket(taxable_income);
                let tax_amount = income_in_bracket.saturating_mul(bracket.tax_rate);
                debug!(
                    min_income = %bracket.min_income,
                    rate = %bracket.tax_rate,
                    income_in_bracket = %income_in_bracket,
                    tax_amount = %tax_amount,
                    "bracket applied"
                );
                BracketTax {
                    bracket: bracket.clone(),
                    tax_amount,
                }
            })
            .collect()
    }

    /// Employee social security on gross income, capped when the country
    /// defines a maximum.
    fn social_security_tax(
        &self,
        gross_income: Decimal,
        include: bool,
    ) -> Decimal {
        match (&self.rules.social_security, include) {
            (Some(ss), true) => {
                let base = match ss.max_income {
                    Some(cap) => gross_income.min(cap),
                    None => gross_income,
                };
                base.saturating_mul(ss.employee_rate)
            }
            _ => Decimal::ZERO,
        }
    }

    /// Total tax over taxable income.
    ///
    /// Zero taxable income divides by one instead. This is a compatibility
    /// convention, not a tax rule; it reports zero for zero tax.
    fn effective_rate(
        &self,
        total_tax: Decimal,
        taxable_income: Decimal,
    ) -> Decimal {
        let divisor = if taxable_income.is_zero() {
            Decimal::ONE
        } else {
            taxable_income
        };
        total_tax / divisor
    }

    /// Normalized (upper-case) country code.
    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn rules(&self) -> &'a CountryTaxRules {
        self.rules
    }

    /// Named deductions; empty when the country defines none.
    pub fn deductions(&self) -> &'a BTreeMap<String, Decimal> {
        &self.rules.deductions
    }

    pub fn standard_deduction(&self) -> Decimal {
        self.rules.standard_deduction()
    }

    /// Brackets in stored (ascending) order.
    pub fn tax_brackets(&self) -> &'a [TaxBracket] {
        &self.rules.brackets
    }

    pub fn social_security(&self) -> Option<&'a SocialSecurity> {
        self.rules.social_security.as_ref()
    }

    pub fn currency(&self) -> &'a str {
        &self.rules.currency
    }

    /// Formats `amount` with the locale conventions of this country's currency.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::TaxCalculator;
    ///
    /// let calculator = TaxCalculator::new("Germany").unwrap();
    ///
    /// assert_eq!(calculator.format_currency(dec!(1234.56)), "1.234,56 €");
    /// ```
    pub fn format_currency(
        &self,
        amount: Decimal,
    ) -> String {
        currency::format_currency(amount, &self.rules.currency)
    }
}
