//! Age Pension means testing
//!
//! Applies the asset test to a household whose composition follows the
//! alive/deceased state of each partner. A couple where one partner has died
//! is assessed as a single household in its own right, not as half a couple.
//!
//! The income test is not applied: `total_income` is accepted so callers can
//! pass it through, but it does not reduce the result.

use serde::{Deserialize, Serialize};

use crate::model::{BenefitRateTable, HouseholdType};

/// Inputs to a single-year pension assessment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgePensionParams {
    pub partner1_alive: bool,
    pub partner2_alive: bool,
    /// Assessable assets in the rate table's dollars
    pub total_assets: f64,
    /// Assessable annual income. Reserved for the income test.
    pub total_income: f64,
    pub is_homeowner: bool,
}

impl AgePensionParams {
    /// Household type implied by which partners are alive
    #[must_use]
    pub fn household(&self) -> Option<HouseholdType> {
        match (self.partner1_alive, self.partner2_alive) {
            (true, true) => Some(HouseholdType::Couple),
            (true, false) | (false, true) => Some(HouseholdType::Single),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AgePensionCalculator<'a> {
    rates: &'a BenefitRateTable,
}

impl<'a> AgePensionCalculator<'a> {
    #[must_use]
    pub fn new(rates: &'a BenefitRateTable) -> Self {
        Self { rates }
    }

    /// Annual pension for the household described by `params`.
    #[must_use]
    pub fn calculate(&self, params: &AgePensionParams) -> f64 {
        match params.household() {
            Some(household) => self.asset_test(household, params.total_assets, params.is_homeowner),
            None => 0.0,
        }
    }

    /// Annual pension after the asset test alone.
    #[must_use]
    pub fn asset_test(&self, household: HouseholdType, assets: f64, is_homeowner: bool) -> f64 {
        let rates = self.rates.rates(household);
        let threshold = rates.asset_test_threshold.for_homeowner(is_homeowner);

        if assets <= threshold {
            return rates.max_rate;
        }

        let reduction = self.rates.taper.annual_reduction(assets - threshold);
        (rates.max_rate - reduction).max(0.0)
    }

    /// Asset level at which the pension tapers to zero
    #[must_use]
    pub fn asset_cutoff(&self, household: HouseholdType, is_homeowner: bool) -> f64 {
        let rates = self.rates.rates(household);
        let threshold = rates.asset_test_threshold.for_homeowner(is_homeowner);
        threshold + rates.max_rate / self.rates.taper.annual_rate_per_dollar()
    }

    /// Deemed annual income on financial assets.
    ///
    /// Reported alongside the pension; it does not feed into `calculate`.
    #[must_use]
    pub fn deemed_income(&self, household: HouseholdType, financial_assets: f64) -> f64 {
        let deeming = self.rates.deeming(household);
        if financial_assets <= deeming.lower_threshold {
            return financial_assets * deeming.lower_rate;
        }
        deeming.lower_threshold * deeming.lower_rate
            + (financial_assets - deeming.lower_threshold) * deeming.upper_rate
    }

    #[must_use]
    pub fn is_eligible(&self, params: &AgePensionParams) -> bool {
        self.calculate(params) > 0.0
    }

    /// Whether `age` has reached the qualifying pension age
    #[must_use]
    pub fn is_pension_age(&self, age: u32) -> bool {
        age >= u32::from(self.rates.pension_age)
    }

    #[must_use]
    pub fn rates(&self) -> &'a BenefitRateTable {
        self.rates
    }
}

/// Index a today's-dollars amount forward by CPI.
#[must_use]
pub fn index_to_year(amount: f64, years: i32, inflation_rate: f64) -> f64 {
    amount * (1.0 + inflation_rate).powi(years)
}
