//! Plain-text rendering of a tax calculation.

use std::fmt;

use rust_decimal::Decimal;
use tax_core::{TaxCalculator, TaxResult};

use crate::utils::format_percent;

/// A calculation result paired with the calculator that produced it, so
/// amounts can be shown in the country's currency.
pub struct TaxReport<'a> {
    calculator: &'a TaxCalculator<'a>,
    result: &'a TaxResult,
}

impl<'a> TaxReport<'a> {
    pub fn new(
        calculator: &'a TaxCalculator<'a>,
        result: &'a TaxResult,
    ) -> Self {
        Self { calculator, result }
    }
}

impl fmt::Display for TaxReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let money = |amount: Decimal| self.calculator.format_currency(amount);
        let result = self.result;

        writeln!(
            f,
            "Country:            {} ({})",
            self.calculator.country(),
            self.calculator.currency()
        )?;
        writeln!(f, "Gross income:       {}", money(result.gross_income))?;
        writeln!(f, "Taxable income:     {}", money(result.taxable_income))?;

        if !result.breakdown.is_empty() {
            writeln!(f, "Brackets:")?;
            for entry in &result.breakdown {
                let bracket = &entry.bracket;
                let upper = bracket
                    .max_income
                    .map_or_else(|| "and above".to_string(), money);
                writeln!(
                    f,
                    "  {:>7}  {} – {}: {}",
                    format_percent(bracket.tax_rate),
                    money(bracket.min_income),
                    upper,
                    money(entry.tax_amount)
                )?;
            }
        }

        writeln!(f, "Income tax:         {}", money(result.total_tax))?;
        writeln!(f, "Social security:    {}", money(result.social_security_tax))?;
        writeln!(f, "Net income:         {}", money(result.net_income))?;
        writeln!(f, "Effective rate:     {}", format_percent(result.effective_rate))?;
        write!(f, "Marginal rate:      {}", format_percent(result.marginal_rate))
    }
}
