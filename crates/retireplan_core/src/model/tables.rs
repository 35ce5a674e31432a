use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::benefit_rates::BenefitRateTable;
use super::life_expectancy::LifeExpectancyTable;

/// Read-only actuarial configuration shared by every calculation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActuarialTables {
    #[serde(default)]
    pub life_expectancy: LifeExpectancyTable,
    #[serde(default)]
    pub benefit_rates: BenefitRateTable,
}

static DEFAULT_TABLES: LazyLock<ActuarialTables> = LazyLock::new(ActuarialTables::default);

impl ActuarialTables {
    /// Process-wide built-in tables, initialised on first use
    #[must_use]
    pub fn builtin() -> &'static ActuarialTables {
        &DEFAULT_TABLES
    }
}
