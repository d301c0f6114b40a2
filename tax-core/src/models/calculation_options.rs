use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-call options for [`TaxCalculator::calculate`](crate::TaxCalculator::calculate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationOptions {
    /// Deducted from gross income on top of the standard deduction.
    pub additional_deductions: Decimal,
    pub include_social_security: bool,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            additional_deductions: Decimal::ZERO,
            include_social_security: true,
        }
    }
}

impl CalculationOptions {
    pub fn with_additional_deductions(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.additional_deductions = amount;
        self
    }

    pub fn without_social_security(mut self) -> Self {
        self.include_social_security = false;
        self
    }
}
