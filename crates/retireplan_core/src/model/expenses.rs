//! Irregular expense records produced by the expense engine

use std::collections::BTreeMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Transport,
    Housing,
    Medical,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 3] = [
        ExpenseCategory::Transport,
        ExpenseCategory::Housing,
        ExpenseCategory::Medical,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Housing => "housing",
            ExpenseCategory::Medical => "medical",
        }
    }
}

/// Amount per expense category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmounts {
    pub transport: f64,
    pub housing: f64,
    pub medical: f64,
}

impl CategoryAmounts {
    #[must_use]
    pub fn get(&self, category: ExpenseCategory) -> f64 {
        match category {
            ExpenseCategory::Transport => self.transport,
            ExpenseCategory::Housing => self.housing,
            ExpenseCategory::Medical => self.medical,
        }
    }

    pub fn add(&mut self, category: ExpenseCategory, amount: f64) {
        match category {
            ExpenseCategory::Transport => self.transport += amount,
            ExpenseCategory::Housing => self.housing += amount,
            ExpenseCategory::Medical => self.medical += amount,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.transport + self.housing + self.medical
    }

    /// Every category scaled by `factor`
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            transport: self.transport * factor,
            housing: self.housing * factor,
            medical: self.medical * factor,
        }
    }

    /// `(category, amount)` pairs in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, f64)> + '_ {
        ExpenseCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

impl AddAssign for CategoryAmounts {
    fn add_assign(&mut self, rhs: Self) {
        self.transport += rhs.transport;
        self.housing += rhs.housing;
        self.medical += rhs.medical;
    }
}

/// Life events tracked by the irregular expense engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseEventKind {
    VehicleReplacement,
    MajorVehicleRepair,
    HomeRepair,
    ApplianceReplacement,
    MajorDental,
    Hospitalization,
}

impl ExpenseEventKind {
    pub const ALL: [ExpenseEventKind; 6] = [
        ExpenseEventKind::VehicleReplacement,
        ExpenseEventKind::MajorVehicleRepair,
        ExpenseEventKind::HomeRepair,
        ExpenseEventKind::ApplianceReplacement,
        ExpenseEventKind::MajorDental,
        ExpenseEventKind::Hospitalization,
    ];

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            ExpenseEventKind::VehicleReplacement => "Vehicle replacement",
            ExpenseEventKind::MajorVehicleRepair => "Major vehicle repair",
            ExpenseEventKind::HomeRepair => "Major home repair",
            ExpenseEventKind::ApplianceReplacement => "Appliance replacement",
            ExpenseEventKind::MajorDental => "Major dental work",
            ExpenseEventKind::Hospitalization => "Hospital admission (out-of-pocket)",
        }
    }

    #[must_use]
    pub fn category(self) -> ExpenseCategory {
        match self {
            ExpenseEventKind::VehicleReplacement | ExpenseEventKind::MajorVehicleRepair => {
                ExpenseCategory::Transport
            }
            ExpenseEventKind::HomeRepair | ExpenseEventKind::ApplianceReplacement => {
                ExpenseCategory::Housing
            }
            ExpenseEventKind::MajorDental | ExpenseEventKind::Hospitalization => {
                ExpenseCategory::Medical
            }
        }
    }
}

/// A single event occurrence and its inflated cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEvent {
    pub kind: ExpenseEventKind,
    pub amount: f64,
}

impl ExpenseEvent {
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.kind.description()
    }
}

/// Irregular expenses for one simulated year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub calendar_year: i16,
    pub age: u8,
    pub categories: CategoryAmounts,
    pub events: Vec<ExpenseEvent>,
    pub total: f64,
}

impl YearRecord {
    #[must_use]
    pub fn empty(calendar_year: i16, age: u8) -> Self {
        Self {
            calendar_year,
            age,
            categories: CategoryAmounts::default(),
            events: Vec::new(),
            total: 0.0,
        }
    }

    /// Record an occurrence, keeping categories, events and total in step.
    pub fn push(&mut self, event: ExpenseEvent) {
        self.categories.add(event.kind.category(), event.amount);
        self.total += event.amount;
        self.events.push(event);
    }

    #[must_use]
    pub fn has_event(&self, kind: ExpenseEventKind) -> bool {
        self.events.iter().any(|e| e.kind == kind)
    }
}

/// One seeded path of yearly irregular expenses, ordered by age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePath {
    pub seed: u64,
    pub records: Vec<YearRecord>,
}

impl ExpensePath {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YearRecord> {
        self.records.iter()
    }

    /// All occurrences of `kind` with the year they happened in
    pub fn occurrences(
        &self,
        kind: ExpenseEventKind,
    ) -> impl Iterator<Item = (&YearRecord, &ExpenseEvent)> {
        self.records.iter().flat_map(move |r| {
            r.events
                .iter()
                .filter(move |e| e.kind == kind)
                .map(move |e| (r, e))
        })
    }
}

impl<'a> IntoIterator for &'a ExpensePath {
    type Item = &'a YearRecord;
    type IntoIter = std::slice::Iter<'a, YearRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Summary of a single expense path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathStatistics {
    pub total_by_category: CategoryAmounts,
    pub yearly_averages: CategoryAmounts,
    pub largest_single_year: f64,
    pub event_counts: BTreeMap<ExpenseEventKind, u32>,
}

impl PathStatistics {
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.total_by_category.total()
    }

    #[must_use]
    pub fn count(&self, kind: ExpenseEventKind) -> u32 {
        self.event_counts.get(&kind).copied().unwrap_or(0)
    }
}
