//! Alive/deceased tracking for retiree couples
//!
//! Each partner moves from `Alive` to `Deceased` (terminal) in the year they
//! reach their scenario `death_age`. Nothing here is random: mortality risk is
//! explored by varying `death_age` across runs.
//!
//! Defined-benefit income follows the state machine:
//! - a living partner is paid their own `pension_income`;
//! - a partner is still paid in the year they die;
//! - from the following year the survivor receives the reversionary share
//!   of the deceased partner's pension.

use serde::{Deserialize, Serialize};

use crate::model::{HouseholdType, PartnerDetails};
use crate::pension::AgePensionParams;
use crate::reversionary::calculate_reversionary_pension;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerStatus {
    Alive,
    Deceased,
}

impl PartnerStatus {
    #[must_use]
    pub fn is_alive(self) -> bool {
        self == PartnerStatus::Alive
    }
}

/// Status of both household members in one year.
///
/// `partner2` is `None` for a single retiree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoupleState {
    pub partner1: PartnerStatus,
    pub partner2: Option<PartnerStatus>,
}

impl CoupleState {
    #[must_use]
    pub fn partner1_alive(&self) -> bool {
        self.partner1.is_alive()
    }

    #[must_use]
    pub fn partner2_alive(&self) -> bool {
        self.partner2.is_some_and(PartnerStatus::is_alive)
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        usize::from(self.partner1_alive()) + usize::from(self.partner2_alive())
    }

    #[must_use]
    pub fn household(&self) -> Option<HouseholdType> {
        match self.alive_count() {
            2 => Some(HouseholdType::Couple),
            1 => Some(HouseholdType::Single),
            _ => None,
        }
    }

    /// Pension inputs for this state
    #[must_use]
    pub fn pension_params(
        &self,
        total_assets: f64,
        total_income: f64,
        is_homeowner: bool,
    ) -> AgePensionParams {
        AgePensionParams {
            partner1_alive: self.partner1_alive(),
            partner2_alive: self.partner2_alive(),
            total_assets,
            total_income,
            is_homeowner,
        }
    }
}

/// Household snapshot for one simulated year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoupleYear {
    pub year_offset: u32,
    pub calendar_year: i16,
    pub partner1_age: u32,
    pub partner2_age: Option<u32>,
    pub state: CoupleState,
    /// Defined-benefit income paid to the household, including any
    /// reversionary continuation
    pub defined_benefit_income: f64,
    /// A partner died this year leaving a survivor, whose super balance
    /// absorbs the deceased partner's
    pub super_transferred: bool,
}

/// Derives per-year couple state from fixed scenario death ages
#[derive(Debug, Clone, Copy)]
pub struct CoupleTracker<'a> {
    partner1: &'a PartnerDetails,
    partner2: Option<&'a PartnerDetails>,
    start_year: i16,
}

impl<'a> CoupleTracker<'a> {
    #[must_use]
    pub fn new(
        partner1: &'a PartnerDetails,
        partner2: Option<&'a PartnerDetails>,
        start_year: i16,
    ) -> Self {
        Self {
            partner1,
            partner2,
            start_year,
        }
    }

    #[must_use]
    pub fn status(partner: &PartnerDetails, year_offset: u32) -> PartnerStatus {
        if partner.is_alive_at(partner.age_in(year_offset)) {
            PartnerStatus::Alive
        } else {
            PartnerStatus::Deceased
        }
    }

    #[must_use]
    pub fn state(&self, year_offset: u32) -> CoupleState {
        CoupleState {
            partner1: Self::status(self.partner1, year_offset),
            partner2: self.partner2.map(|p| Self::status(p, year_offset)),
        }
    }

    #[must_use]
    pub fn year(&self, year_offset: u32) -> CoupleYear {
        let state = self.state(year_offset);
        let offset = i64::from(year_offset);

        let mut income = own_income(self.partner1, offset);
        let mut super_transferred = false;

        if let Some(partner2) = self.partner2 {
            income += own_income(partner2, offset);
            income += reversionary_income(self.partner1, partner2, offset);
            income += reversionary_income(partner2, self.partner1, offset);

            let d1 = death_offset(self.partner1);
            let d2 = death_offset(partner2);
            super_transferred = (d1 == offset && d2 > offset) || (d2 == offset && d1 > offset);
        }

        CoupleYear {
            year_offset,
            calendar_year: calendar_year(self.start_year, year_offset),
            partner1_age: self.partner1.age_in(year_offset),
            partner2_age: self.partner2.map(|p| p.age_in(year_offset)),
            state,
            defined_benefit_income: income,
            super_transferred,
        }
    }

    /// Per-year records for offsets `0..years`
    #[must_use]
    pub fn timeline(&self, years: u32) -> Vec<CoupleYear> {
        (0..years).map(|offset| self.year(offset)).collect()
    }

    /// Offset of the first death within the scenario, for couples
    #[must_use]
    pub fn first_death_offset(&self) -> Option<u32> {
        let partner2 = self.partner2?;
        let first = death_offset(self.partner1).min(death_offset(partner2));
        Some(first.max(0) as u32)
    }

    /// Offset of the year after which nobody in the household is alive
    #[must_use]
    pub fn last_death_offset(&self) -> u32 {
        let last = match self.partner2 {
            Some(p2) => death_offset(self.partner1).max(death_offset(p2)),
            None => death_offset(self.partner1),
        };
        last.max(0) as u32
    }
}

/// Years from scenario start to the death year; negative if already deceased
fn death_offset(partner: &PartnerDetails) -> i64 {
    i64::from(partner.death_age) - i64::from(partner.current_age)
}

/// Paid through the death year
fn receives_income(partner: &PartnerDetails, offset: i64) -> bool {
    offset <= death_offset(partner)
}

fn own_income(partner: &PartnerDetails, offset: i64) -> f64 {
    if receives_income(partner, offset) {
        partner.pension_income
    } else {
        0.0
    }
}

/// Continuation of `deceased`'s pension paid to `survivor`, starting the
/// year after the death
fn reversionary_income(deceased: &PartnerDetails, survivor: &PartnerDetails, offset: i64) -> f64 {
    if death_offset(deceased) < offset && receives_income(survivor, offset) {
        calculate_reversionary_pension(deceased.pension_income, deceased.reversionary_rate)
    } else {
        0.0
    }
}

fn calendar_year(start_year: i16, offset: u32) -> i16 {
    (i32::from(start_year) + offset as i32) as i16
}
