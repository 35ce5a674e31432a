//! Year-by-year household view combining expenses, couple state and benefits
//!
//! Drives one seeded expense path along partner 1's ages and, for each
//! year, derives who is alive, the defined-benefit income the household
//! receives and the Age Pension it qualifies for. Investment returns and
//! withdrawals are left to the caller.

use serde::{Deserialize, Serialize};

use crate::couple::{CoupleState, CoupleTracker};
use crate::error::{ConfigError, Result};
use crate::expense_engine::{ExpenseConfig, IrregularExpenseEngine};
use crate::model::{ActuarialTables, ExpenseEvent, PartnerDetails};
use crate::pension::{AgePensionCalculator, index_to_year};

fn default_true() -> bool {
    true
}

fn default_end_age() -> u8 {
    95
}

fn default_indexation_rate() -> f64 {
    0.03
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdScenario {
    pub partner1: PartnerDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner2: Option<PartnerDetails>,
    #[serde(default = "default_true")]
    pub is_homeowner: bool,
    /// Assessable assets in the rate table's reference-year dollars, held
    /// constant in real terms
    #[serde(default)]
    pub assessable_assets: f64,
    pub start_year: i16,
    /// Last simulated age of partner 1
    #[serde(default = "default_end_age")]
    pub end_age: u8,
    /// CPI indexation applied to Age Pension rates
    #[serde(default = "default_indexation_rate")]
    pub indexation_rate: f64,
    #[serde(default)]
    pub expenses: ExpenseConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdYear {
    pub calendar_year: i16,
    /// Partner 1's age
    pub age: u8,
    pub partner2_age: Option<u32>,
    pub state: CoupleState,
    /// Nominal Age Pension for the year
    pub age_pension: f64,
    pub defined_benefit_income: f64,
    pub irregular_expenses: f64,
    pub events: Vec<ExpenseEvent>,
    pub super_transferred: bool,
}

impl HouseholdYear {
    /// Benefit income less irregular expenses
    #[must_use]
    pub fn net_cash_flow(&self) -> f64 {
        self.age_pension + self.defined_benefit_income - self.irregular_expenses
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdTotals {
    pub age_pension: f64,
    pub defined_benefit_income: f64,
    pub irregular_expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdPath {
    pub seed: u64,
    pub years: Vec<HouseholdYear>,
}

impl HouseholdPath {
    #[must_use]
    pub fn totals(&self) -> HouseholdTotals {
        self.years
            .iter()
            .fold(HouseholdTotals::default(), |mut acc, year| {
                acc.age_pension += year.age_pension;
                acc.defined_benefit_income += year.defined_benefit_income;
                acc.irregular_expenses += year.irregular_expenses;
                acc
            })
    }

    /// Calendar year in which the surviving partner inherits the super balance
    #[must_use]
    pub fn first_death_year(&self) -> Option<i16> {
        self.years
            .iter()
            .find(|y| y.super_transferred)
            .map(|y| y.calendar_year)
    }
}

/// Simulate one seeded household path.
///
/// The path runs from partner 1's current age to `end_age`, ending early
/// after the year in which the last partner dies.
pub fn simulate_household(
    scenario: &HouseholdScenario,
    tables: &ActuarialTables,
    seed: u64,
) -> Result<HouseholdPath> {
    let start_age = scenario.partner1.current_age;
    if scenario.end_age < start_age {
        return Err(ConfigError::InvalidAgeRange {
            start_age,
            end_age: scenario.end_age,
        });
    }
    tables.benefit_rates.validate()?;

    let engine = IrregularExpenseEngine::with_config(seed, scenario.expenses.clone())?;
    let expenses = engine.generate_expense_path(start_age, scenario.end_age, scenario.start_year);

    let tracker = CoupleTracker::new(
        &scenario.partner1,
        scenario.partner2.as_ref(),
        scenario.start_year,
    );
    let calculator = AgePensionCalculator::new(&tables.benefit_rates);
    let last_year = tracker.last_death_offset();

    tracing::debug!(
        seed,
        start_age,
        end_age = scenario.end_age,
        couple = scenario.partner2.is_some(),
        "Simulating household"
    );

    let years = expenses
        .records
        .into_iter()
        .zip(0u32..)
        .take_while(|&(_, offset)| offset <= last_year)
        .map(|(record, offset)| {
            let year = tracker.year(offset);

            let of_pension_age = [
                year.state.partner1_alive().then_some(year.partner1_age),
                year.partner2_age.filter(|_| year.state.partner2_alive()),
            ]
            .into_iter()
            .flatten()
            .any(|age| calculator.is_pension_age(age));

            let age_pension = if of_pension_age {
                let params = year.state.pension_params(
                    scenario.assessable_assets,
                    0.0,
                    scenario.is_homeowner,
                );
                let elapsed =
                    i32::from(year.calendar_year) - i32::from(tables.benefit_rates.reference_year);
                index_to_year(calculator.calculate(&params), elapsed, scenario.indexation_rate)
            } else {
                0.0
            };

            HouseholdYear {
                calendar_year: year.calendar_year,
                age: record.age,
                partner2_age: year.partner2_age,
                state: year.state,
                age_pension,
                defined_benefit_income: year.defined_benefit_income,
                irregular_expenses: record.total,
                events: record.events,
                super_transferred: year.super_transferred,
            }
        })
        .collect();

    Ok(HouseholdPath { seed, years })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpenseCatalog, Gender};

    fn partner(name: &str, age: u8, death_age: u8, pension: f64) -> PartnerDetails {
        PartnerDetails {
            name: name.to_string(),
            current_age: age,
            retirement_age: 60,
            super_balance: 0.0,
            pension_income: pension,
            reversionary_rate: 67.0,
            gender: Gender::Female,
            death_age,
            pre_retirement_income: 0.0,
        }
    }

    fn no_expenses() -> ExpenseConfig {
        ExpenseConfig {
            catalog: ExpenseCatalog { events: Vec::new() },
            ..ExpenseConfig::default()
        }
    }

    fn scenario(partner2: Option<PartnerDetails>) -> HouseholdScenario {
        HouseholdScenario {
            partner1: partner("Alex", 65, 80, 101_000.0),
            partner2,
            is_homeowner: true,
            assessable_assets: 250_000.0,
            start_year: 2024,
            end_age: 95,
            indexation_rate: 0.0,
            expenses: no_expenses(),
        }
    }

    #[test]
    fn test_pension_switches_to_single_after_death() {
        let scenario = scenario(Some(partner("Blake", 66, 90, 0.0)));
        let tables = ActuarialTables::default();
        let path = simulate_household(&scenario, &tables, 1).unwrap();

        // Under pension age for the first year
        assert_eq!(path.years[0].age_pension, 0.0);
        assert_eq!(path.years[1].age_pension, 45_952.0);
        // Alex dies at 80 (offset 15); Blake is then assessed as single
        assert_eq!(path.years[15].age_pension, 29_754.0);
        assert!(path.years[15].super_transferred);
        assert_eq!(path.first_death_year(), Some(2039));

        assert_eq!(path.years[15].defined_benefit_income, 101_000.0);
        assert!((path.years[16].defined_benefit_income - 67_670.0).abs() < 1e-6);
    }

    #[test]
    fn test_stops_after_last_death() {
        let scenario = scenario(Some(partner("Blake", 66, 90, 0.0)));
        let path = simulate_household(&scenario, ActuarialTables::builtin(), 1).unwrap();
        // Blake dies at 90, 24 years in
        assert_eq!(path.years.len(), 25);
        let last = path.years.last().unwrap();
        assert_eq!(last.state.alive_count(), 0);
        assert_eq!(last.age_pension, 0.0);
    }

    #[test]
    fn test_single_household_runs_to_death() {
        let scenario = scenario(None);
        let path = simulate_household(&scenario, ActuarialTables::builtin(), 1).unwrap();
        assert_eq!(path.years.len(), 16);
        assert!(path.years.iter().all(|y| !y.super_transferred));
        assert_eq!(path.years[3].age_pension, 29_754.0);
    }

    #[test]
    fn test_pension_is_indexed() {
        let mut scenario = scenario(None);
        scenario.indexation_rate = 0.03;
        scenario.partner1.current_age = 67;
        let path = simulate_household(&scenario, ActuarialTables::builtin(), 1).unwrap();
        let expected = 29_754.0 * 1.03_f64.powi(2);
        assert!(
            (path.years[2].age_pension - expected).abs() < 1e-6,
            "Expected {expected}, got {}",
            path.years[2].age_pension
        );
    }

    #[test]
    fn test_expenses_follow_seeded_path() {
        let mut scenario = scenario(Some(partner("Blake", 66, 90, 0.0)));
        scenario.expenses = ExpenseConfig::default();
        let path = simulate_household(&scenario, ActuarialTables::builtin(), 9).unwrap();
        let expected = IrregularExpenseEngine::new(9).generate_expense_path(65, 95, 2024);
        for (year, record) in path.years.iter().zip(&expected) {
            assert_eq!(year.irregular_expenses, record.total);
            assert_eq!(year.events, record.events);
        }
        let totals = path.totals();
        let sum: f64 = path.years.iter().map(|y| y.irregular_expenses).sum();
        assert_eq!(totals.irregular_expenses, sum);
    }

    #[test]
    fn test_rejects_end_before_start() {
        let mut scenario = scenario(None);
        scenario.end_age = 60;
        assert!(matches!(
            simulate_household(&scenario, ActuarialTables::builtin(), 0),
            Err(ConfigError::InvalidAgeRange { .. })
        ));
    }
}
