//! Command implementations.

pub mod generate;

pub use generate::{GenerateSummary, execute as generate_execute};
