//! Seeded irregular expense paths
//!
//! One engine owns one seed. Every call to [`IrregularExpenseEngine::generate_expense_path`]
//! starts a fresh `ChaCha8Rng` stream from that seed, so identical arguments
//! always reproduce the identical path.

use rand::distr::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::model::{
    AgeCurve, CategoryAmounts, CostSampler, ExpenseCatalog, ExpenseEvent, ExpenseEventKind,
    ExpensePath, Occurrence, PathStatistics, YearRecord,
};

fn default_inflation_rate() -> f64 {
    0.03
}

fn default_reference_year() -> i16 {
    2024
}

/// Inflation assumptions and event catalog for expense generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseConfig {
    /// Annual rate applied to catalog costs
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: f64,
    /// Calendar year the catalog costs are expressed in
    #[serde(default = "default_reference_year")]
    pub reference_year: i16,
    #[serde(default)]
    pub catalog: ExpenseCatalog,
}

impl Default for ExpenseConfig {
    fn default() -> Self {
        Self {
            inflation_rate: default_inflation_rate(),
            reference_year: default_reference_year(),
            catalog: ExpenseCatalog::standard(),
        }
    }
}

impl ExpenseConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.inflation_rate.is_finite() || self.inflation_rate <= -1.0 {
            return Err(ConfigError::InvalidInflationRate(self.inflation_rate));
        }
        self.catalog.validate()
    }

    /// Multiplier taking a reference-year cost to `calendar_year` dollars
    #[must_use]
    pub fn inflation_factor(&self, calendar_year: i16) -> f64 {
        let elapsed = i32::from(calendar_year) - i32::from(self.reference_year);
        (1.0 + self.inflation_rate).powi(elapsed)
    }
}

#[derive(Debug, Clone)]
enum Trigger {
    Probability(AgeCurve),
    Interval(Uniform<u32>),
}

/// Catalog entry with its samplers built
#[derive(Debug, Clone)]
struct PreparedEvent {
    kind: ExpenseEventKind,
    trigger: Trigger,
    cost: CostSampler,
    suppressed_by: Option<ExpenseEventKind>,
}

/// Years since the item was last replaced, and the interval drawn for the
/// next replacement
#[derive(Debug, Clone, Copy)]
struct IntervalState {
    years_since: u32,
    next_due: u32,
}

impl IntervalState {
    /// Item of unknown age at path start
    fn initial<R: Rng + ?Sized>(interval: &Uniform<u32>, rng: &mut R) -> Self {
        let next_due = interval.sample(rng);
        Self {
            years_since: rng.random_range(0..next_due),
            next_due,
        }
    }

    /// Age the item by one year and report whether it is due
    fn advance(&mut self) -> bool {
        self.years_since += 1;
        self.years_since >= self.next_due
    }

    fn replaced<R: Rng + ?Sized>(&mut self, interval: &Uniform<u32>, rng: &mut R) {
        self.years_since = 0;
        self.next_due = interval.sample(rng);
    }
}

/// Generates reproducible irregular expense paths for a single seed
#[derive(Debug, Clone)]
pub struct IrregularExpenseEngine {
    seed: u64,
    config: ExpenseConfig,
    events: Vec<PreparedEvent>,
}

impl IrregularExpenseEngine {
    /// Engine using the standard catalog at 3% inflation from 2024 dollars.
    ///
    /// # Panics
    ///
    /// Never: the built-in configuration always validates.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, ExpenseConfig::default())
            .expect("built-in expense configuration is valid")
    }

    pub fn with_config(seed: u64, config: ExpenseConfig) -> Result<Self> {
        config.validate()?;

        let events = config
            .catalog
            .events
            .iter()
            .map(|spec| -> Result<PreparedEvent> {
                let trigger = match &spec.occurrence {
                    Occurrence::AgeCurve(curve) => Trigger::Probability(curve.clone()),
                    Occurrence::Interval {
                        min_years,
                        max_years,
                    } => Uniform::new_inclusive(*min_years, *max_years)
                        .map(Trigger::Interval)
                        .map_err(|_| ConfigError::InvalidInterval {
                            kind: spec.kind,
                            min_years: *min_years,
                            max_years: *max_years,
                        })?,
                };
                Ok(PreparedEvent {
                    kind: spec.kind,
                    trigger,
                    cost: spec.cost.sampler(spec.kind)?,
                    suppressed_by: spec.suppressed_by,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            seed,
            config,
            events,
        })
    }

    /// Same validated configuration under a different seed
    #[must_use]
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn config(&self) -> &ExpenseConfig {
        &self.config
    }

    /// One record per age in `start_age..=end_age`; empty when the range is
    /// inverted.
    ///
    /// Per year, catalog entries are evaluated in order. Probability events
    /// consume one uniform draw and occur when it falls below the age's
    /// probability. A suppressed event makes no draws in that year. Each
    /// occurrence draws its cost and is inflated to the calendar year.
    #[must_use]
    pub fn generate_expense_path(
        &self,
        start_age: u8,
        end_age: u8,
        start_calendar_year: i16,
    ) -> ExpensePath {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let mut intervals: Vec<Option<IntervalState>> = self
            .events
            .iter()
            .map(|event| match &event.trigger {
                Trigger::Interval(interval) => Some(IntervalState::initial(interval, &mut rng)),
                Trigger::Probability(_) => None,
            })
            .collect();

        let records = (start_age..=end_age)
            .map(|age| {
                let offset = i16::from(age - start_age);
                let calendar_year = start_calendar_year.saturating_add(offset);
                let inflation = self.config.inflation_factor(calendar_year);
                let mut record = YearRecord::empty(calendar_year, age);

                for (event, state) in self.events.iter().zip(intervals.iter_mut()) {
                    let suppressed = event
                        .suppressed_by
                        .is_some_and(|other| record.has_event(other));

                    let occurs = match (&event.trigger, state) {
                        (Trigger::Interval(interval), Some(state)) => {
                            let due = state.advance();
                            if due && !suppressed {
                                state.replaced(interval, &mut rng);
                                true
                            } else {
                                false
                            }
                        }
                        (Trigger::Probability(curve), _) => {
                            !suppressed && rng.random::<f64>() < curve.value_at(f64::from(age))
                        }
                        (Trigger::Interval(_), None) => false,
                    };

                    if occurs {
                        let amount = event.cost.sample(&mut rng) * inflation;
                        record.push(ExpenseEvent {
                            kind: event.kind,
                            amount,
                        });
                    }
                }
                record
            })
            .collect();

        ExpensePath {
            seed: self.seed,
            records,
        }
    }

    #[must_use]
    pub fn get_path_statistics(&self, path: &ExpensePath) -> PathStatistics {
        path_statistics(path)
    }
}

/// Category totals, yearly averages, worst year and event counts for a path.
///
/// An empty path yields all-zero statistics.
#[must_use]
pub fn path_statistics(path: &ExpensePath) -> PathStatistics {
    let mut stats = PathStatistics::default();
    if path.is_empty() {
        return stats;
    }

    let mut totals = CategoryAmounts::default();
    for record in path {
        totals += record.categories;
        stats.largest_single_year = stats.largest_single_year.max(record.total);
        for event in &record.events {
            *stats.event_counts.entry(event.kind).or_insert(0) += 1;
        }
    }

    stats.total_by_category = totals;
    stats.yearly_averages = totals.scaled(1.0 / path.len() as f64);
    stats
}
