//! Custom tax rule loading from CSV.

mod loader;

pub use loader::{RuleLoaderError, RuleRecord, RuleSetLoader};
