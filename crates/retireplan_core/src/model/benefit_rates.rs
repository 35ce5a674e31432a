//! Age Pension means-test configuration
//!
//! Rates and thresholds are expressed in the dollars of `reference_year`.
//! The table is built once and shared read-only by every calculation.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Household composition used to pick a rate schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseholdType {
    Single,
    Couple,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetThresholds {
    pub homeowner: f64,
    pub non_homeowner: f64,
}

impl AssetThresholds {
    #[must_use]
    pub fn for_homeowner(&self, is_homeowner: bool) -> f64 {
        if is_homeowner {
            self.homeowner
        } else {
            self.non_homeowner
        }
    }
}

/// Rate schedule for one household type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PensionRates {
    /// Maximum annual payment (combined for couples)
    pub max_rate: f64,
    /// Fortnightly income-test free area. Not applied yet.
    pub income_test_threshold: f64,
    pub asset_test_threshold: AssetThresholds,
}

/// Asset-test taper: a fixed reduction per $1000 of excess assets per
/// payment period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetTaper {
    pub dollars_per_thousand: f64,
    pub periods_per_year: f64,
}

impl AssetTaper {
    /// Annual reduction for `excess` dollars above the threshold
    #[must_use]
    pub fn annual_reduction(&self, excess: f64) -> f64 {
        excess / 1000.0 * self.dollars_per_thousand * self.periods_per_year
    }

    /// Annual reduction per single dollar of excess assets
    #[must_use]
    pub fn annual_rate_per_dollar(&self) -> f64 {
        self.dollars_per_thousand / 1000.0 * self.periods_per_year
    }
}

/// Two-tier deeming of financial assets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeemingRates {
    pub lower_threshold: f64,
    pub lower_rate: f64,
    pub upper_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitRateTable {
    pub reference_year: i16,
    /// Minimum age at which a household member qualifies
    pub pension_age: u8,
    pub single: PensionRates,
    pub couple: PensionRates,
    pub taper: AssetTaper,
    pub single_deeming: DeemingRates,
    pub couple_deeming: DeemingRates,
}

impl BenefitRateTable {
    /// 2024-25 Age Pension rates and asset-test thresholds
    #[must_use]
    pub fn australian_2024_25() -> Self {
        Self {
            reference_year: 2024,
            pension_age: 67,
            single: PensionRates {
                max_rate: 29_754.0,
                income_test_threshold: 212.0,
                asset_test_threshold: AssetThresholds {
                    homeowner: 301_750.0,
                    non_homeowner: 543_750.0,
                },
            },
            couple: PensionRates {
                max_rate: 45_952.0,
                income_test_threshold: 360.0,
                asset_test_threshold: AssetThresholds {
                    homeowner: 451_500.0,
                    non_homeowner: 693_500.0,
                },
            },
            taper: AssetTaper {
                dollars_per_thousand: 3.0,
                periods_per_year: 26.0,
            },
            single_deeming: DeemingRates {
                lower_threshold: 60_400.0,
                lower_rate: 0.025,
                upper_rate: 0.0425,
            },
            couple_deeming: DeemingRates {
                lower_threshold: 100_200.0,
                lower_rate: 0.025,
                upper_rate: 0.0425,
            },
        }
    }

    #[must_use]
    pub fn rates(&self, household: HouseholdType) -> &PensionRates {
        match household {
            HouseholdType::Single => &self.single,
            HouseholdType::Couple => &self.couple,
        }
    }

    #[must_use]
    pub fn deeming(&self, household: HouseholdType) -> &DeemingRates {
        match household {
            HouseholdType::Single => &self.single_deeming,
            HouseholdType::Couple => &self.couple_deeming,
        }
    }

    /// Check the structural relationships between the two schedules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (s, c) = (&self.single, &self.couple);
        if c.max_rate <= s.max_rate {
            return Err(ConfigError::InvalidRateTable(
                "couple max rate must exceed single max rate",
            ));
        }
        if c.max_rate >= 2.0 * s.max_rate {
            return Err(ConfigError::InvalidRateTable(
                "couple max rate must be below twice the single rate",
            ));
        }
        if c.asset_test_threshold.homeowner <= s.asset_test_threshold.homeowner
            || c.asset_test_threshold.non_homeowner <= s.asset_test_threshold.non_homeowner
        {
            return Err(ConfigError::InvalidRateTable(
                "couple asset thresholds must exceed single thresholds",
            ));
        }
        for rates in [s, c] {
            if rates.asset_test_threshold.non_homeowner <= rates.asset_test_threshold.homeowner {
                return Err(ConfigError::InvalidRateTable(
                    "non-homeowner threshold must exceed homeowner threshold",
                ));
            }
        }
        if self.taper.dollars_per_thousand <= 0.0 || self.taper.periods_per_year <= 0.0 {
            return Err(ConfigError::InvalidRateTable("taper must be positive"));
        }
        Ok(())
    }
}

impl Default for BenefitRateTable {
    fn default() -> Self {
        Self::australian_2024_25()
    }
}
