//! Ensemble statistics over many seeded expense paths
//!
//! Each seed in `first_seed..first_seed + runs` produces one independent
//! path. Per-path metrics are collected in seed order and reduced
//! sequentially, so results do not depend on thread scheduling.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::expense_engine::{ExpenseConfig, IrregularExpenseEngine, path_statistics};
use crate::model::{CategoryAmounts, ExpenseCategory, ExpenseEventKind};

fn default_runs() -> u32 {
    1_000
}

fn default_start_age() -> u8 {
    60
}

fn default_end_age() -> u8 {
    95
}

fn default_start_year() -> i16 {
    2030
}

fn default_bucket_anchors() -> Vec<u8> {
    (60..=90).step_by(5).collect()
}

fn default_tail_threshold() -> f64 {
    50_000.0
}

fn default_percentiles() -> Vec<f64> {
    vec![10.0, 25.0, 50.0, 75.0, 90.0]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    #[serde(default = "default_runs")]
    pub runs: u32,
    #[serde(default)]
    pub first_seed: u64,
    #[serde(default = "default_start_age")]
    pub start_age: u8,
    #[serde(default = "default_end_age")]
    pub end_age: u8,
    #[serde(default = "default_start_year")]
    pub start_year: i16,
    /// Representative ages for event-rate buckets
    #[serde(default = "default_bucket_anchors")]
    pub bucket_anchors: Vec<u8>,
    /// Yearly total above which a (path, year) cell counts as a tail event
    #[serde(default = "default_tail_threshold")]
    pub tail_threshold: f64,
    /// Cut points in percent
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,
    #[serde(default)]
    pub expenses: ExpenseConfig,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            first_seed: 0,
            start_age: default_start_age(),
            end_age: default_end_age(),
            start_year: default_start_year(),
            bucket_anchors: default_bucket_anchors(),
            tail_threshold: default_tail_threshold(),
            percentiles: default_percentiles(),
            expenses: ExpenseConfig::default(),
        }
    }
}

impl EnsembleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(ConfigError::EmptyEnsemble);
        }
        if self.end_age < self.start_age {
            return Err(ConfigError::InvalidAgeRange {
                start_age: self.start_age,
                end_age: self.end_age,
            });
        }
        if self.bucket_anchors.is_empty() {
            return Err(ConfigError::NoBuckets);
        }
        self.expenses.validate()
    }

    #[must_use]
    pub fn years(&self) -> usize {
        usize::from(self.end_age.saturating_sub(self.start_age)) + 1
    }
}

/// Value at sorted position `floor(N * p / 100)`, clamped to the last
/// element. Returns 0.0 for an empty slice.
#[must_use]
pub fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (sorted.len() as f64 * percentile / 100.0).floor().max(0.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Index of the anchor closest to `age`; ties go to the lower anchor
#[must_use]
pub fn nearest_anchor(anchors: &[u8], age: u8) -> Option<usize> {
    anchors
        .iter()
        .enumerate()
        .min_by_key(|&(_, &anchor)| (anchor.abs_diff(age), anchor))
        .map(|(idx, _)| idx)
}

/// Distribution of one per-path metric across the ensemble
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// `(percentile, value)` pairs in the configured order
    pub values: Vec<(f64, f64)>,
}

impl PercentileBand {
    #[must_use]
    pub fn from_samples(mut samples: Vec<f64>, percentiles: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        samples.sort_by(f64::total_cmp);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        Self {
            mean,
            min: samples[0],
            max: samples[samples.len() - 1],
            values: percentiles
                .iter()
                .map(|&p| (p, nearest_rank(&samples, p)))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values
            .iter()
            .find(|(p, _)| (*p - percentile).abs() < 1e-9)
            .map(|(_, v)| *v)
    }
}

/// Empirical annual event rates for ages mapped to one anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRate {
    pub anchor: u8,
    /// Simulated ages mapped to this anchor
    pub years: u32,
    pub rates: BTreeMap<ExpenseEventKind, f64>,
}

impl BucketRate {
    #[must_use]
    pub fn rate(&self, kind: ExpenseEventKind) -> f64 {
        self.rates.get(&kind).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleSummary {
    pub runs: u32,
    pub first_seed: u64,
    pub category_totals: BTreeMap<ExpenseCategory, PercentileBand>,
    pub yearly_average_total: PercentileBand,
    pub largest_single_year: PercentileBand,
    pub bucket_rates: Vec<BucketRate>,
    pub tail_threshold: f64,
    /// Share of (path, year) cells whose total exceeds `tail_threshold`
    pub tail_probability: f64,
    /// Average occurrences of each event per path
    pub mean_event_counts: BTreeMap<ExpenseEventKind, f64>,
}

impl EnsembleSummary {
    #[must_use]
    pub fn bucket(&self, anchor: u8) -> Option<&BucketRate> {
        self.bucket_rates.iter().find(|b| b.anchor == anchor)
    }

    #[must_use]
    pub fn bucket_rate(&self, anchor: u8, kind: ExpenseEventKind) -> Option<f64> {
        self.bucket(anchor).map(|b| b.rate(kind))
    }
}

/// Scalar metrics kept from one path
#[derive(Debug, Clone)]
struct PathMetrics {
    totals: CategoryAmounts,
    yearly_average: f64,
    largest_single_year: f64,
    tail_cells: u32,
    bucket_counts: FxHashMap<(usize, ExpenseEventKind), u32>,
    event_counts: BTreeMap<ExpenseEventKind, u32>,
}

fn path_metrics(
    engine: &IrregularExpenseEngine,
    config: &EnsembleConfig,
    age_buckets: &[usize],
) -> PathMetrics {
    let path = engine.generate_expense_path(config.start_age, config.end_age, config.start_year);
    let stats = path_statistics(&path);

    let mut bucket_counts = FxHashMap::default();
    let mut tail_cells = 0;
    for (record, &bucket) in path.iter().zip(age_buckets) {
        if record.total > config.tail_threshold {
            tail_cells += 1;
        }
        for event in &record.events {
            *bucket_counts.entry((bucket, event.kind)).or_insert(0) += 1;
        }
    }

    PathMetrics {
        totals: stats.total_by_category,
        yearly_average: stats.yearly_averages.total(),
        largest_single_year: stats.largest_single_year,
        tail_cells,
        bucket_counts,
        event_counts: stats.event_counts,
    }
}

/// Run one expense path per seed and summarise the ensemble.
pub fn run_ensemble(config: &EnsembleConfig) -> Result<EnsembleSummary> {
    config.validate()?;

    let template = IrregularExpenseEngine::with_config(config.first_seed, config.expenses.clone())?;
    let age_buckets: Vec<usize> = (config.start_age..=config.end_age)
        .map(|age| nearest_anchor(&config.bucket_anchors, age).unwrap_or(0))
        .collect();

    tracing::debug!(
        runs = config.runs,
        first_seed = config.first_seed,
        start_age = config.start_age,
        end_age = config.end_age,
        "Running expense ensemble"
    );

    let evaluate = |i: u32| {
        let engine = template.with_seed(config.first_seed.wrapping_add(u64::from(i)));
        path_metrics(&engine, config, &age_buckets)
    };

    #[cfg(feature = "parallel")]
    let metrics: Vec<PathMetrics> = (0..config.runs).into_par_iter().map(evaluate).collect();

    #[cfg(not(feature = "parallel"))]
    let metrics: Vec<PathMetrics> = (0..config.runs).map(evaluate).collect();

    let summary = summarise(config, &age_buckets, &metrics);

    tracing::debug!(
        tail_probability = summary.tail_probability,
        "Expense ensemble complete"
    );

    Ok(summary)
}

fn summarise(config: &EnsembleConfig, age_buckets: &[usize], metrics: &[PathMetrics]) -> EnsembleSummary {
    let runs = metrics.len() as f64;
    let kinds: Vec<ExpenseEventKind> = config.expenses.catalog.events.iter().map(|e| e.kind).collect();

    let category_totals = ExpenseCategory::ALL
        .into_iter()
        .map(|category| {
            let samples = metrics.iter().map(|m| m.totals.get(category)).collect();
            (category, PercentileBand::from_samples(samples, &config.percentiles))
        })
        .collect();

    let yearly_average_total = PercentileBand::from_samples(
        metrics.iter().map(|m| m.yearly_average).collect(),
        &config.percentiles,
    );
    let largest_single_year = PercentileBand::from_samples(
        metrics.iter().map(|m| m.largest_single_year).collect(),
        &config.percentiles,
    );

    let mut combined: FxHashMap<(usize, ExpenseEventKind), u64> = FxHashMap::default();
    for m in metrics {
        for (&key, &count) in &m.bucket_counts {
            *combined.entry(key).or_insert(0) += u64::from(count);
        }
    }

    let bucket_rates = config
        .bucket_anchors
        .iter()
        .enumerate()
        .map(|(idx, &anchor)| {
            let years = age_buckets.iter().filter(|&&b| b == idx).count() as u32;
            let rates = kinds
                .iter()
                .map(|&kind| {
                    let count = combined.get(&(idx, kind)).copied().unwrap_or(0);
                    let rate = if years == 0 {
                        0.0
                    } else {
                        count as f64 / (f64::from(years) * runs)
                    };
                    (kind, rate)
                })
                .collect();
            BucketRate {
                anchor,
                years,
                rates,
            }
        })
        .collect();

    let cells = runs * config.years() as f64;
    let tail_cells: u64 = metrics.iter().map(|m| u64::from(m.tail_cells)).sum();

    let mean_event_counts = kinds
        .iter()
        .map(|&kind| {
            let total: u64 = metrics
                .iter()
                .map(|m| u64::from(m.event_counts.get(&kind).copied().unwrap_or(0)))
                .sum();
            (kind, total as f64 / runs)
        })
        .collect();

    EnsembleSummary {
        runs: config.runs,
        first_seed: config.first_seed,
        category_totals,
        yearly_average_total,
        largest_single_year,
        bucket_rates,
        tail_threshold: config.tail_threshold,
        tail_probability: tail_cells as f64 / cells,
        mean_event_counts,
    }
}
