//! Individual partner details for couple tracking

use serde::{Deserialize, Serialize};

use super::life_expectancy::{Gender, LifeExpectancyTable};

fn default_retirement_age() -> u8 {
    60
}

fn default_reversionary_rate() -> f64 {
    67.0
}

/// One member of a retiree household.
///
/// `death_age` is a scenario assumption, not a random draw: mortality risk
/// is explored by varying it across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerDetails {
    pub name: String,
    pub current_age: u8,
    #[serde(default = "default_retirement_age")]
    pub retirement_age: u8,
    #[serde(default)]
    pub super_balance: f64,
    /// Annual defined-benefit income (government or employer scheme)
    #[serde(default)]
    pub pension_income: f64,
    /// Percentage of `pension_income` continuing to a surviving partner
    #[serde(default = "default_reversionary_rate")]
    pub reversionary_rate: f64,
    pub gender: Gender,
    pub death_age: u8,
    /// Net annual income before retirement
    #[serde(default)]
    pub pre_retirement_income: f64,
}

impl PartnerDetails {
    /// Partner with default assumptions and a death age taken from the
    /// life table.
    #[must_use]
    pub fn with_defaults(
        name: impl Into<String>,
        current_age: u8,
        gender: Gender,
        life_table: &LifeExpectancyTable,
    ) -> Self {
        let expectancy = life_table.get(f64::from(current_age), gender);
        Self {
            name: name.into(),
            current_age,
            retirement_age: default_retirement_age(),
            super_balance: 0.0,
            pension_income: 0.0,
            reversionary_rate: default_reversionary_rate(),
            gender,
            death_age: expectancy.round().clamp(0.0, f64::from(u8::MAX)) as u8,
            pre_retirement_income: 0.0,
        }
    }

    /// Age reached `years` after the scenario start
    #[must_use]
    pub fn age_in(&self, years: u32) -> u32 {
        u32::from(self.current_age) + years
    }

    #[must_use]
    pub fn is_alive_at(&self, age: u32) -> bool {
        age < u32::from(self.death_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_partner() {
        let table = LifeExpectancyTable::australian_2020_2022();
        let john = PartnerDetails::with_defaults("John", 55, Gender::Male, &table);

        assert_eq!(john.name, "John");
        assert_eq!(john.retirement_age, 60);
        assert_eq!(john.super_balance, 0.0);
        assert_eq!(john.pension_income, 0.0);
        assert_eq!(john.reversionary_rate, 67.0);
        assert_eq!(john.pre_retirement_income, 0.0);
        assert_eq!(
            f64::from(john.death_age),
            table.get(55.0, Gender::Male).round()
        );
        assert_eq!(john.death_age, 85);
    }

    #[test]
    fn test_female_default_outlives_male() {
        let table = LifeExpectancyTable::australian_2020_2022();
        let jane = PartnerDetails::with_defaults("Jane", 65, Gender::Female, &table);
        let jim = PartnerDetails::with_defaults("Jim", 65, Gender::Male, &table);
        assert_eq!(jane.death_age, 89);
        assert_eq!(jim.death_age, 86);
    }

    #[test]
    fn test_alive_until_death_age() {
        let table = LifeExpectancyTable::australian_2020_2022();
        let mut p = PartnerDetails::with_defaults("Sam", 70, Gender::Female, &table);
        p.death_age = 75;
        assert!(p.is_alive_at(p.age_in(4)));
        assert!(!p.is_alive_at(p.age_in(5)));
    }

    #[test]
    fn test_yaml_style_defaults() {
        let json = r#"{"name":"Andy","current_age":60,"gender":"male","death_age":85,"pension_income":101000.0}"#;
        let p: PartnerDetails = serde_json::from_str(json).unwrap();
        assert_eq!(p.retirement_age, 60);
        assert_eq!(p.reversionary_rate, 67.0);
        assert_eq!(p.pension_income, 101_000.0);
    }
}
