//! Tax calculation logic.
//!
//! [`TaxCalculator`] binds one country's rules and computes progressive
//! income tax, social security and derived rates.

pub mod calculator;
pub mod common;

pub use calculator::{CalculatorError, TaxCalculator};
