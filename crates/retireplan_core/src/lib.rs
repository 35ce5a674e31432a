//! Australian retirement actuarial engine
//!
//! This crate provides the stochastic and means-tested building blocks of a
//! retirement cash-flow projection:
//! - Life expectancy by age and gender (ABS 2020-22 life tables)
//! - Age Pension asset test for singles and couples, switching household
//!   type when a partner dies
//! - Reversionary defined-benefit continuation to a surviving partner
//! - Seeded irregular expense paths (vehicles, home repairs, dental,
//!   hospital) with age-dependent probabilities and inflation
//! - Ensemble statistics over many seeded paths
//!
//! # Example
//!
//! ```ignore
//! use retireplan_core::{generate_expense_path, get_path_statistics};
//!
//! let path = generate_expense_path(42, 60, 95, 2030);
//! let stats = get_path_statistics(&path);
//! println!("largest year: {:.0}", stats.largest_single_year);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod couple;
pub mod error;
pub mod expense_engine;
pub mod household;
pub mod pension;
pub mod reversionary;
pub mod statistics;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use couple::{CoupleState, CoupleTracker, CoupleYear, PartnerStatus};
pub use error::ConfigError;
pub use expense_engine::{ExpenseConfig, IrregularExpenseEngine};
pub use household::{HouseholdPath, HouseholdScenario, HouseholdYear, simulate_household};
pub use model::{
    ActuarialTables, ExpensePath, Gender, PartnerDetails, PathStatistics, YearRecord,
};
pub use pension::{AgePensionCalculator, AgePensionParams};
pub use reversionary::calculate_reversionary_pension;
pub use statistics::{EnsembleConfig, EnsembleSummary, run_ensemble};

// ============================================================================
// Convenience functions over the built-in tables
// ============================================================================

/// Expense path for `seed` using the standard catalog
#[must_use]
pub fn generate_expense_path(
    seed: u64,
    start_age: u8,
    end_age: u8,
    start_calendar_year: i16,
) -> ExpensePath {
    IrregularExpenseEngine::new(seed).generate_expense_path(start_age, end_age, start_calendar_year)
}

#[must_use]
pub fn get_path_statistics(path: &ExpensePath) -> PathStatistics {
    expense_engine::path_statistics(path)
}

/// Expected age at death for someone currently `age`
#[must_use]
pub fn get_life_expectancy(age: f64, gender: Gender) -> f64 {
    ActuarialTables::builtin().life_expectancy.get(age, gender)
}

/// Annual Age Pension under the 2024-25 asset test
#[must_use]
pub fn calculate_age_pension_for_couple(params: &AgePensionParams) -> f64 {
    AgePensionCalculator::new(&ActuarialTables::builtin().benefit_rates).calculate(params)
}

/// Partner with default assumptions and a death age rounded from the
/// built-in life table
#[must_use]
pub fn create_default_partner(name: &str, current_age: u8, gender: Gender) -> PartnerDetails {
    PartnerDetails::with_defaults(
        name,
        current_age,
        gender,
        &ActuarialTables::builtin().life_expectancy,
    )
}
