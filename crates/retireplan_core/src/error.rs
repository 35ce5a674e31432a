use std::fmt;

use crate::model::ExpenseEventKind;

/// Errors raised while validating user-supplied configuration.
///
/// The engine arithmetic itself is total; only tables, catalogs and
/// ensemble settings built from outside input can be rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// End age lies before start age
    InvalidAgeRange { start_age: u8, end_age: u8 },
    /// An age curve was built without any anchor points
    EmptyCurve,
    /// Age curve keys must be finite and strictly increasing
    UnsortedCurve,
    /// An occurrence probability fell outside [0, 1]
    ProbabilityOutOfRange {
        kind: ExpenseEventKind,
        probability: f64,
    },
    /// Occurrence probabilities must not fall as age increases
    DecreasingProbability(ExpenseEventKind),
    /// Cost distribution parameters rejected by the sampler
    InvalidDistribution {
        kind: ExpenseEventKind,
        reason: String,
    },
    /// Recurrence interval bounds are zero or inverted
    InvalidInterval {
        kind: ExpenseEventKind,
        min_years: u32,
        max_years: u32,
    },
    /// An event names a suppressing event that does not precede it
    MisorderedSuppression {
        kind: ExpenseEventKind,
        suppressed_by: ExpenseEventKind,
    },
    /// Inflation must be finite and above -100%
    InvalidInflationRate(f64),
    /// An ensemble needs at least one run
    EmptyEnsemble,
    /// Event-rate bucketing needs at least one anchor age
    NoBuckets,
    /// Benefit rate table breaks a structural invariant
    InvalidRateTable(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAgeRange { start_age, end_age } => {
                write!(f, "end age {end_age} is before start age {start_age}")
            }
            ConfigError::EmptyCurve => write!(f, "age curve has no points"),
            ConfigError::UnsortedCurve => {
                write!(f, "age curve keys must be finite and strictly increasing")
            }
            ConfigError::ProbabilityOutOfRange { kind, probability } => {
                write!(
                    f,
                    "probability {probability} for {} is outside [0, 1]",
                    kind.description()
                )
            }
            ConfigError::DecreasingProbability(kind) => {
                write!(
                    f,
                    "probability curve for {} decreases with age",
                    kind.description()
                )
            }
            ConfigError::InvalidDistribution { kind, reason } => {
                write!(
                    f,
                    "invalid cost distribution for {}: {reason}",
                    kind.description()
                )
            }
            ConfigError::InvalidInterval {
                kind,
                min_years,
                max_years,
            } => write!(
                f,
                "invalid recurrence interval {min_years}..={max_years} years for {}",
                kind.description()
            ),
            ConfigError::MisorderedSuppression {
                kind,
                suppressed_by,
            } => write!(
                f,
                "{} is suppressed by {}, which must appear earlier in the catalog",
                kind.description(),
                suppressed_by.description()
            ),
            ConfigError::InvalidInflationRate(rate) => {
                write!(f, "inflation rate {rate} must be finite and above -1")
            }
            ConfigError::EmptyEnsemble => write!(f, "ensemble must contain at least one run"),
            ConfigError::NoBuckets => write!(f, "at least one age bucket is required"),
            ConfigError::InvalidRateTable(msg) => write!(f, "invalid benefit rate table: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub type Result<T> = std::result::Result<T, ConfigError>;
