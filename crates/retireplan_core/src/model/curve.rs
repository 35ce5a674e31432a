//! Piecewise-linear curves keyed by age
//!
//! Sparse actuarial data (life expectancy brackets, event probabilities)
//! is stored as anchor points and linearly interpolated in between.
//! Ages outside the anchored domain clamp to the nearest end point.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Single anchor point on an age curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub age: f64,
    pub value: f64,
}

/// Sorted anchor points with clamped linear interpolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CurvePoint>", into = "Vec<CurvePoint>")]
pub struct AgeCurve {
    points: Vec<CurvePoint>,
}

impl AgeCurve {
    /// Build a curve from `(age, value)` pairs.
    ///
    /// Keys must be finite and strictly increasing.
    pub fn new(points: &[(f64, f64)]) -> Result<Self, ConfigError> {
        let points: Vec<CurvePoint> = points
            .iter()
            .map(|&(age, value)| CurvePoint { age, value })
            .collect();
        Self::try_from(points)
    }

    /// Curve with the same value at every age
    #[must_use]
    pub fn flat(value: f64) -> Self {
        Self {
            points: vec![CurvePoint { age: 0.0, value }],
        }
    }

    #[must_use]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Interpolated value at `age`, clamped to the first/last anchor.
    #[must_use]
    pub fn value_at(&self, age: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];

        if age <= first.age {
            return first.value;
        }
        if age >= last.age {
            return last.value;
        }

        // First anchor strictly above `age`; guaranteed to exist and be > 0 here
        let upper_idx = self.points.partition_point(|p| p.age <= age);
        let lower = self.points[upper_idx - 1];
        let upper = self.points[upper_idx];

        let ratio = (age - lower.age) / (upper.age - lower.age);
        lower.value + ratio * (upper.value - lower.value)
    }

    /// Whether values never decrease as age increases
    #[must_use]
    pub fn is_non_decreasing(&self) -> bool {
        self.points.windows(2).all(|w| w[1].value >= w[0].value)
    }

    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.value)
            .fold(f64::INFINITY, f64::min)
    }

    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.value)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl TryFrom<Vec<CurvePoint>> for AgeCurve {
    type Error = ConfigError;

    fn try_from(points: Vec<CurvePoint>) -> Result<Self, Self::Error> {
        if points.is_empty() {
            return Err(ConfigError::EmptyCurve);
        }
        let finite = points
            .iter()
            .all(|p| p.age.is_finite() && p.value.is_finite());
        let increasing = points.windows(2).all(|w| w[1].age > w[0].age);
        if !finite || !increasing {
            return Err(ConfigError::UnsortedCurve);
        }
        Ok(Self { points })
    }
}

impl From<AgeCurve> for Vec<CurvePoint> {
    fn from(curve: AgeCurve) -> Self {
        curve.points
    }
}
