//! Event catalog for the irregular expense engine
//!
//! Each tracked event has an occurrence rule (an age-dependent annual
//! probability, or a recurrence interval with state carried across years)
//! and a cost distribution in reference-year dollars.

use rand::Rng;
use rand::distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use super::curve::AgeCurve;
use super::expenses::ExpenseEventKind;
use crate::error::ConfigError;

/// Cost of a single occurrence before inflation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostDistribution {
    Fixed(f64),
    Uniform { min: f64, max: f64 },
    /// Log-normal parameterised by its median and the sigma of ln(cost)
    LogNormal { median: f64, sigma: f64 },
}

impl CostDistribution {
    /// Validate parameters and build a sampler.
    pub fn sampler(&self, kind: ExpenseEventKind) -> Result<CostSampler, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidDistribution { kind, reason };
        match *self {
            CostDistribution::Fixed(amount) => {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(invalid(format!("fixed cost {amount} must be non-negative")));
                }
                Ok(CostSampler::Fixed(amount))
            }
            CostDistribution::Uniform { min, max } => {
                if min < 0.0 {
                    return Err(invalid(format!("uniform minimum {min} is negative")));
                }
                Uniform::new_inclusive(min, max)
                    .map(CostSampler::Uniform)
                    .map_err(|e| invalid(format!("uniform({min}, {max}): {e}")))
            }
            CostDistribution::LogNormal { median, sigma } => {
                if !median.is_finite() || median <= 0.0 {
                    return Err(invalid(format!("log-normal median {median} must be positive")));
                }
                if !sigma.is_finite() || sigma < 0.0 {
                    return Err(invalid(format!("log-normal sigma {sigma} must be non-negative")));
                }
                rand_distr::LogNormal::new(median.ln(), sigma)
                    .map(CostSampler::LogNormal)
                    .map_err(|e| invalid(format!("log-normal sigma {sigma}: {e}")))
            }
        }
    }

    /// Expected cost in reference-year dollars
    #[must_use]
    pub fn mean(&self) -> f64 {
        match *self {
            CostDistribution::Fixed(amount) => amount,
            CostDistribution::Uniform { min, max } => (min + max) / 2.0,
            CostDistribution::LogNormal { median, sigma } => median * (sigma * sigma / 2.0).exp(),
        }
    }
}

/// Validated cost sampler
#[derive(Debug, Clone)]
pub enum CostSampler {
    Fixed(f64),
    Uniform(Uniform<f64>),
    LogNormal(rand_distr::LogNormal<f64>),
}

impl Distribution<f64> for CostSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            CostSampler::Fixed(amount) => *amount,
            CostSampler::Uniform(d) => d.sample(rng),
            CostSampler::LogNormal(d) => d.sample(rng),
        }
    }
}

/// When an event happens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occurrence {
    /// Independent annual draw against an age-dependent probability
    AgeCurve(AgeCurve),
    /// Recurs every `min_years..=max_years` years; the interval is redrawn
    /// after each occurrence
    Interval { min_years: u32, max_years: u32 },
}

/// One tracked event type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSpec {
    pub kind: ExpenseEventKind,
    pub occurrence: Occurrence,
    pub cost: CostDistribution,
    /// Skip this event in a year where the named event already occurred.
    /// The named event must come earlier in the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppressed_by: Option<ExpenseEventKind>,
}

impl EventSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.occurrence {
            Occurrence::AgeCurve(curve) => {
                for p in curve.points() {
                    if !(0.0..=1.0).contains(&p.value) {
                        return Err(ConfigError::ProbabilityOutOfRange {
                            kind: self.kind,
                            probability: p.value,
                        });
                    }
                }
                if !curve.is_non_decreasing() {
                    return Err(ConfigError::DecreasingProbability(self.kind));
                }
            }
            Occurrence::Interval {
                min_years,
                max_years,
            } => {
                if *min_years == 0 || min_years > max_years {
                    return Err(ConfigError::InvalidInterval {
                        kind: self.kind,
                        min_years: *min_years,
                        max_years: *max_years,
                    });
                }
            }
        }
        self.cost.sampler(self.kind).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCatalog {
    pub events: Vec<EventSpec>,
}

impl ExpenseCatalog {
    /// Retiree life events, costs in 2024 dollars.
    #[must_use]
    pub fn standard() -> Self {
        let curve = |points: &[(f64, f64)]| {
            AgeCurve::new(points).expect("static probability curve is sorted")
        };

        Self {
            events: vec![
                EventSpec {
                    kind: ExpenseEventKind::VehicleReplacement,
                    occurrence: Occurrence::Interval {
                        min_years: 8,
                        max_years: 12,
                    },
                    cost: CostDistribution::Uniform {
                        min: 50_000.0,
                        max: 70_000.0,
                    },
                    suppressed_by: None,
                },
                EventSpec {
                    kind: ExpenseEventKind::MajorVehicleRepair,
                    occurrence: Occurrence::AgeCurve(curve(&[(60.0, 0.06), (85.0, 0.10)])),
                    cost: CostDistribution::Uniform {
                        min: 2_000.0,
                        max: 6_000.0,
                    },
                    suppressed_by: Some(ExpenseEventKind::VehicleReplacement),
                },
                EventSpec {
                    kind: ExpenseEventKind::HomeRepair,
                    occurrence: Occurrence::AgeCurve(curve(&[(60.0, 0.10), (85.0, 0.15)])),
                    cost: CostDistribution::LogNormal {
                        median: 12_000.0,
                        sigma: 0.5,
                    },
                    suppressed_by: None,
                },
                EventSpec {
                    kind: ExpenseEventKind::ApplianceReplacement,
                    occurrence: Occurrence::AgeCurve(AgeCurve::flat(0.15)),
                    cost: CostDistribution::Uniform {
                        min: 1_500.0,
                        max: 4_000.0,
                    },
                    suppressed_by: None,
                },
                EventSpec {
                    kind: ExpenseEventKind::MajorDental,
                    occurrence: Occurrence::AgeCurve(curve(&[
                        (60.0, 0.05),
                        (70.0, 0.10),
                        (80.0, 0.15),
                    ])),
                    cost: CostDistribution::Uniform {
                        min: 3_000.0,
                        max: 12_000.0,
                    },
                    suppressed_by: None,
                },
                EventSpec {
                    kind: ExpenseEventKind::Hospitalization,
                    occurrence: Occurrence::AgeCurve(curve(&[
                        (60.0, 0.10),
                        (70.0, 0.15),
                        (85.0, 0.25),
                    ])),
                    cost: CostDistribution::LogNormal {
                        median: 5_000.0,
                        sigma: 0.6,
                    },
                    suppressed_by: None,
                },
            ],
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, spec) in self.events.iter().enumerate() {
            spec.validate()?;
            if let Some(suppressed_by) = spec.suppressed_by {
                if !self.events[..i].iter().any(|e| e.kind == suppressed_by) {
                    return Err(ConfigError::MisorderedSuppression {
                        kind: spec.kind,
                        suppressed_by,
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, kind: ExpenseEventKind) -> Option<&EventSpec> {
        self.events.iter().find(|e| e.kind == kind)
    }
}

impl Default for ExpenseCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = ExpenseCatalog::standard();
        catalog.validate().unwrap();
        assert_eq!(catalog.events.len(), ExpenseEventKind::ALL.len());
    }

    #[test]
    fn test_probability_curves_match_targets() {
        let catalog = ExpenseCatalog::standard();
        let Occurrence::AgeCurve(dental) = &catalog.get(ExpenseEventKind::MajorDental).unwrap().occurrence
        else {
            panic!("dental should be probability based");
        };
        assert_eq!(dental.value_at(60.0), 0.05);
        assert_eq!(dental.value_at(90.0), 0.15);

        let Occurrence::AgeCurve(hospital) =
            &catalog.get(ExpenseEventKind::Hospitalization).unwrap().occurrence
        else {
            panic!("hospitalization should be probability based");
        };
        assert_eq!(hospital.value_at(60.0), 0.10);
        assert_eq!(hospital.value_at(90.0), 0.25);
    }

    #[test]
    fn test_rejects_decreasing_curve() {
        let spec = EventSpec {
            kind: ExpenseEventKind::MajorDental,
            occurrence: Occurrence::AgeCurve(AgeCurve::new(&[(60.0, 0.2), (80.0, 0.1)]).unwrap()),
            cost: CostDistribution::Fixed(1_000.0),
            suppressed_by: None,
        };
        assert_eq!(
            spec.validate(),
            Err(ConfigError::DecreasingProbability(ExpenseEventKind::MajorDental))
        );
    }

    #[test]
    fn test_rejects_probability_above_one() {
        let spec = EventSpec {
            kind: ExpenseEventKind::HomeRepair,
            occurrence: Occurrence::AgeCurve(AgeCurve::flat(1.5)),
            cost: CostDistribution::Fixed(1_000.0),
            suppressed_by: None,
        };
        assert!(matches!(
            spec.validate(),
            Err(ConfigError::ProbabilityOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_interval_and_costs() {
        let mut spec = EventSpec {
            kind: ExpenseEventKind::VehicleReplacement,
            occurrence: Occurrence::Interval {
                min_years: 12,
                max_years: 8,
            },
            cost: CostDistribution::Fixed(60_000.0),
            suppressed_by: None,
        };
        assert!(matches!(
            spec.validate(),
            Err(ConfigError::InvalidInterval { .. })
        ));

        spec.occurrence = Occurrence::Interval {
            min_years: 8,
            max_years: 12,
        };
        spec.cost = CostDistribution::LogNormal {
            median: 10_000.0,
            sigma: -1.0,
        };
        assert!(matches!(
            spec.validate(),
            Err(ConfigError::InvalidDistribution { .. })
        ));

        for sigma in [f64::NAN, f64::INFINITY, -0.25] {
            spec.cost = CostDistribution::LogNormal {
                median: 10_000.0,
                sigma,
            };
            assert!(
                matches!(spec.validate(), Err(ConfigError::InvalidDistribution { .. })),
                "sigma {sigma} accepted"
            );
        }
        spec.cost = CostDistribution::LogNormal {
            median: 10_000.0,
            sigma: 0.0,
        };
        assert!(spec.validate().is_ok());

        spec.cost = CostDistribution::Uniform {
            min: 5_000.0,
            max: 1_000.0,
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_suppressor_must_come_first() {
        let mut catalog = ExpenseCatalog::standard();
        catalog.events.swap(0, 1);
        assert_eq!(
            catalog.validate(),
            Err(ConfigError::MisorderedSuppression {
                kind: ExpenseEventKind::MajorVehicleRepair,
                suppressed_by: ExpenseEventKind::VehicleReplacement,
            })
        );
    }

    #[test]
    fn test_samplers_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let uniform = CostDistribution::Uniform {
            min: 50_000.0,
            max: 70_000.0,
        }
        .sampler(ExpenseEventKind::VehicleReplacement)
        .unwrap();
        for _ in 0..1_000 {
            let cost = uniform.sample(&mut rng);
            assert!((50_000.0..=70_000.0).contains(&cost));
        }

        let lognormal = CostDistribution::LogNormal {
            median: 5_000.0,
            sigma: 0.6,
        }
        .sampler(ExpenseEventKind::Hospitalization)
        .unwrap();
        let mut samples: Vec<f64> = (0..5_001).map(|_| lognormal.sample(&mut rng)).collect();
        assert!(samples.iter().all(|&c| c > 0.0));
        samples.sort_by(f64::total_cmp);
        let median = samples[samples.len() / 2];
        assert!(
            (median - 5_000.0).abs() < 300.0,
            "Expected median near 5000, got {median}"
        );
    }

    #[test]
    fn test_distribution_means() {
        assert_eq!(CostDistribution::Fixed(10.0).mean(), 10.0);
        assert_eq!(CostDistribution::Uniform { min: 2.0, max: 4.0 }.mean(), 3.0);
        let ln = CostDistribution::LogNormal {
            median: 100.0,
            sigma: 0.0,
        };
        assert_eq!(ln.mean(), 100.0);
    }
}
