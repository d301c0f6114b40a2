//! Country tax schedules and the store that holds them.

mod builtin;
mod store;
mod validation;

pub use store::RuleStore;
pub(crate) use store::normalize_country;
pub use validation::RuleSetError;
