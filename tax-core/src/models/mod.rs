mod calculation_options;
mod country_tax_rules;
mod tax_bracket;
mod tax_result;

pub use calculation_options::CalculationOptions;
pub use country_tax_rules::{CountryTaxRules, STANDARD_DEDUCTION, SocialSecurity};
pub use tax_bracket::TaxBracket;
pub use tax_result::{BracketTax, TaxResult};
