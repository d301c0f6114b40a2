use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// Tax owed within a single bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub bracket: TaxBracket,
    pub tax_amount: Decimal,
}

/// Result of a single tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub gross_income: Decimal,

    /// Gross income less standard and additional deductions, never below zero.
    pub taxable_income: Decimal,

    /// Sum of every `tax_amount` in `breakdown`.
    pub total_tax: Decimal,

    /// `total_tax / taxable_income`, or `total_tax / 1` when nothing is taxable.
    pub effective_rate: Decimal,

    /// Rate of the highest bracket that contributed tax; zero if none did.
    pub marginal_rate: Decimal,

    /// Employee share of social security, based on (capped) gross income.
    pub social_security_tax: Decimal,

    /// `gross_income - total_tax - social_security_tax`. Not floored at zero.
    pub net_income: Decimal,

    /// Contributing brackets in ascending order.
    pub breakdown: Vec<BracketTax>,
}
