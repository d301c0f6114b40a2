pub mod report;
pub mod utils;
