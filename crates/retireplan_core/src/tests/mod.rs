//! Scenario tests for the retirement engine
//!
//! Tests are organized by topic:
//! - `interfaces` - Convenience functions over the built-in tables
//! - `determinism` - Seed reproducibility of paths and ensembles
//! - `couples` - Couple transitions feeding pension and reversionary income
//! - `ensemble` - Statistical properties over large seeded ensembles
//! - `inflation` - Recovering the configured inflation rate from costs

mod interfaces;
