pub mod calculations;
pub mod currency;
pub mod models;
pub mod rules;

pub use calculations::{CalculatorError, TaxCalculator};
pub use models::*;
pub use rules::{RuleSetError, RuleStore};
