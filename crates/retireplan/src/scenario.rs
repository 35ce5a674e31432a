//! YAML scenario files
//!
//! A scenario file describes an optional household and ensemble settings.
//! A top-level `expenses` block, when present, replaces the expense
//! assumptions of both:
//!
//! ```yaml
//! household:
//!   partner1: { name: Sam, current_age: 66, gender: male, death_age: 84 }
//!   assessable_assets: 550000
//!   start_year: 2025
//! ensemble:
//!   runs: 5000
//! expenses:
//!   inflation_rate: 0.025
//! ```

use std::fs;
use std::path::Path;

use retireplan_core::error::ConfigError;
use retireplan_core::statistics::EnsembleConfig;
use retireplan_core::{ExpenseConfig, HouseholdScenario, PartnerDetails};
use serde::{Deserialize, Serialize};

/// Error types for scenario file operations
#[derive(Debug)]
pub enum ScenarioError {
    Io(String),
    Parse(String),
    Serialize(String),
    Config(ConfigError),
    MissingHousehold,
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::Io(msg) => write!(f, "IO error: {}", msg),
            ScenarioError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ScenarioError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            ScenarioError::Config(err) => write!(f, "Invalid scenario: {}", err),
            ScenarioError::MissingHousehold => {
                write!(f, "Scenario file has no household section")
            }
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for ScenarioError {
    fn from(err: ConfigError) -> Self {
        ScenarioError::Config(err)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household: Option<HouseholdScenario>,
    #[serde(default)]
    pub ensemble: EnsembleConfig,
    /// Shared expense assumptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses: Option<ExpenseConfig>,
}

impl ScenarioFile {
    /// Parse and validate a scenario from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        let scenario: ScenarioFile = serde_saphyr::from_str(yaml)
            .map_err(|e| ScenarioError::Parse(format!("Failed to parse scenario: {}", e)))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        serde_saphyr::to_string(self)
            .map_err(|e| ScenarioError::Serialize(format!("Failed to serialize scenario: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScenarioError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let scenario = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded scenario");
        Ok(scenario)
    }

    pub fn save(&self, path: &Path) -> Result<(), ScenarioError> {
        let yaml = self.to_yaml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ScenarioError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(path, yaml)
            .map_err(|e| ScenarioError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.ensemble_config().validate()?;
        if let Some(household) = self.household_config() {
            household.expenses.validate()?;
            if household.end_age < household.partner1.current_age {
                return Err(ConfigError::InvalidAgeRange {
                    start_age: household.partner1.current_age,
                    end_age: household.end_age,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Ensemble settings with the shared expenses applied
    #[must_use]
    pub fn ensemble_config(&self) -> EnsembleConfig {
        let mut config = self.ensemble.clone();
        if let Some(expenses) = &self.expenses {
            config.expenses = expenses.clone();
        }
        config
    }

    /// Household with the shared expenses applied
    #[must_use]
    pub fn household_config(&self) -> Option<HouseholdScenario> {
        let mut household = self.household.clone()?;
        if let Some(expenses) = &self.expenses {
            household.expenses = expenses.clone();
        }
        Some(household)
    }

    pub fn require_household(&self) -> Result<HouseholdScenario, ScenarioError> {
        self.household_config().ok_or(ScenarioError::MissingHousehold)
    }

    /// Starter scenario: a couple with a defined-benefit pension
    #[must_use]
    pub fn example(start_year: i16) -> Self {
        let mut partner1 = retireplan_core::create_default_partner(
            "Partner 1",
            62,
            retireplan_core::Gender::Male,
        );
        partner1.super_balance = 450_000.0;
        partner1.pension_income = 60_000.0;

        let mut partner2: PartnerDetails = retireplan_core::create_default_partner(
            "Partner 2",
            60,
            retireplan_core::Gender::Female,
        );
        partner2.super_balance = 250_000.0;

        Self {
            household: Some(HouseholdScenario {
                partner1,
                partner2: Some(partner2),
                is_homeowner: true,
                assessable_assets: 700_000.0,
                start_year,
                end_age: 95,
                indexation_rate: 0.03,
                expenses: ExpenseConfig::default(),
            }),
            ensemble: EnsembleConfig {
                start_year,
                ..EnsembleConfig::default()
            },
            expenses: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
household:
  partner1:
    name: Sam
    current_age: 66
    gender: male
    death_age: 84
    pension_income: 40000
  assessable_assets: 550000
  start_year: 2025
ensemble:
  runs: 500
  first_seed: 10
"#;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let scenario = ScenarioFile::from_yaml(MINIMAL).unwrap();
        let household = scenario.require_household().unwrap();
        assert_eq!(household.partner1.name, "Sam");
        assert_eq!(household.partner1.reversionary_rate, 67.0);
        assert!(household.partner2.is_none());
        assert!(household.is_homeowner);
        assert_eq!(household.end_age, 95);

        let ensemble = scenario.ensemble_config();
        assert_eq!(ensemble.runs, 500);
        assert_eq!(ensemble.first_seed, 10);
        assert_eq!(ensemble.bucket_anchors, vec![60, 65, 70, 75, 80, 85, 90]);
        assert_eq!(ensemble.expenses.inflation_rate, 0.03);
    }

    #[test]
    fn test_shared_expenses_override_both_sections() {
        let yaml = format!("{MINIMAL}expenses:\n  inflation_rate: 0.025\n  reference_year: 2025\n");
        let scenario = ScenarioFile::from_yaml(&yaml).unwrap();
        assert_eq!(scenario.ensemble_config().expenses.inflation_rate, 0.025);
        let household = scenario.require_household().unwrap();
        assert_eq!(household.expenses.reference_year, 2025);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let err = ScenarioFile::from_yaml("ensemble:\n  runs: 0\n").unwrap_err();
        assert!(matches!(err, ScenarioError::Config(ConfigError::EmptyEnsemble)));

        let err = ScenarioFile::from_yaml("ensemble: [not, a, map]\n").unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }

    #[test]
    fn test_missing_household() {
        let scenario = ScenarioFile::from_yaml("ensemble:\n  runs: 10\n").unwrap();
        assert!(matches!(
            scenario.require_household(),
            Err(ScenarioError::MissingHousehold)
        ));
    }

    #[test]
    fn test_save_and_load_example() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenarios").join("couple.yaml");

        let example = ScenarioFile::example(2026);
        example.save(&path).unwrap();
        let loaded = ScenarioFile::load(&path).unwrap();

        assert_eq!(loaded, example);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScenarioFile::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ScenarioError::Io(_)));
        assert!(err.to_string().contains("nope.yaml"));
    }
}
