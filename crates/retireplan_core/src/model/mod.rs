mod benefit_rates;
mod catalog;
mod curve;
mod expenses;
mod life_expectancy;
mod partner;
mod tables;

pub use benefit_rates::{
    AssetTaper, AssetThresholds, BenefitRateTable, DeemingRates, HouseholdType, PensionRates,
};
pub use catalog::{CostDistribution, CostSampler, EventSpec, ExpenseCatalog, Occurrence};
pub use curve::{AgeCurve, CurvePoint};
pub use expenses::{
    CategoryAmounts, ExpenseCategory, ExpenseEvent, ExpenseEventKind, ExpensePath,
    PathStatistics, YearRecord,
};
pub use life_expectancy::{Gender, LifeExpectancyTable};
pub use partner::PartnerDetails;
pub use tables::ActuarialTables;
