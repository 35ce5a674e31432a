//! Plain-text report rendering

use std::fmt::Write;

use retireplan_core::household::HouseholdPath;
use retireplan_core::model::{ExpenseEventKind, HouseholdType};
use retireplan_core::statistics::{EnsembleSummary, PercentileBand};
use retireplan_core::{ExpensePath, Gender, PartnerStatus, PathStatistics};
use serde::Serialize;

use crate::format::{format_currency, format_percentage};

/// Age Pension assessment for one household
#[derive(Debug, Clone, Serialize)]
pub struct PensionReport {
    pub household: HouseholdType,
    pub is_homeowner: bool,
    pub assets: f64,
    pub annual_pension: f64,
    pub fortnightly_pension: f64,
    pub asset_cutoff: f64,
    pub deemed_income: f64,
}

/// Life expectancy lookup
#[derive(Debug, Clone, Serialize)]
pub struct LifeReport {
    pub age: f64,
    pub gender: Gender,
    pub life_expectancy: f64,
    pub default_death_age: u8,
}

fn household_name(household: HouseholdType) -> &'static str {
    match household {
        HouseholdType::Single => "single",
        HouseholdType::Couple => "couple",
    }
}

fn gender_name(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "male",
        Gender::Female => "female",
    }
}

pub fn render_path(path: &ExpensePath, stats: &PathStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Irregular expenses (seed {})", path.seed);
    let _ = writeln!(
        out,
        "{:>6} {:>4} {:>12} {:>12} {:>12} {:>12}  Events",
        "Year", "Age", "Transport", "Housing", "Medical", "Total"
    );

    for record in path {
        let events = record
            .events
            .iter()
            .map(|e| e.description())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "{:>6} {:>4} {:>12} {:>12} {:>12} {:>12}  {}",
            record.calendar_year,
            record.age,
            format_currency(record.categories.transport),
            format_currency(record.categories.housing),
            format_currency(record.categories.medical),
            format_currency(record.total),
            events
        );
    }

    let _ = writeln!(out);
    for (category, total) in stats.total_by_category.iter() {
        let _ = writeln!(
            out,
            "{:<12} total {:>12}  yearly average {:>10}",
            category.name(),
            format_currency(total),
            format_currency(stats.yearly_averages.get(category))
        );
    }
    let _ = writeln!(
        out,
        "Largest single year: {}",
        format_currency(stats.largest_single_year)
    );
    let _ = writeln!(out, "Event counts:");
    for (kind, count) in &stats.event_counts {
        let _ = writeln!(out, "  {:<36} {}", kind.description(), count);
    }
    out
}

fn band_row(out: &mut String, label: &str, band: &PercentileBand) {
    let _ = write!(out, "{:<22}", label);
    for (_, value) in &band.values {
        let _ = write!(out, " {:>12}", format_currency(*value));
    }
    let _ = writeln!(out, " {:>12}", format_currency(band.mean));
}

pub fn render_ensemble(summary: &EnsembleSummary) -> String {
    let mut out = String::new();
    let last_seed = summary
        .first_seed
        .wrapping_add(u64::from(summary.runs).saturating_sub(1));
    let _ = writeln!(
        out,
        "Ensemble of {} paths (seeds {}..={})",
        summary.runs, summary.first_seed, last_seed
    );

    let _ = write!(out, "{:<22}", "Per-path metric");
    for (p, _) in &summary.yearly_average_total.values {
        let _ = write!(out, " {:>12}", format!("P{p}"));
    }
    let _ = writeln!(out, " {:>12}", "Mean");

    for (category, band) in &summary.category_totals {
        band_row(&mut out, &format!("{} total", category.name()), band);
    }
    band_row(&mut out, "yearly average", &summary.yearly_average_total);
    band_row(&mut out, "largest single year", &summary.largest_single_year);

    let kinds: Vec<ExpenseEventKind> = summary
        .mean_event_counts
        .keys()
        .copied()
        .collect();

    let _ = writeln!(out);
    let _ = writeln!(out, "Annual event rate by age bucket");
    let _ = write!(out, "{:<36}", "Event");
    for bucket in &summary.bucket_rates {
        let _ = write!(out, " {:>8}", bucket.anchor);
    }
    let _ = writeln!(out);
    for kind in &kinds {
        let _ = write!(out, "{:<36}", kind.description());
        for bucket in &summary.bucket_rates {
            let _ = write!(out, " {:>8}", format_percentage(bucket.rate(*kind)));
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Years with expenses above {}: {}",
        format_currency(summary.tail_threshold),
        format_percentage(summary.tail_probability)
    );
    let _ = writeln!(out, "Mean occurrences per path:");
    for (kind, mean) in &summary.mean_event_counts {
        let _ = writeln!(out, "  {:<36} {:.2}", kind.description(), mean);
    }
    out
}

fn status_mark(status: Option<PartnerStatus>) -> &'static str {
    match status {
        Some(PartnerStatus::Alive) => "alive",
        Some(PartnerStatus::Deceased) => "dead",
        None => "-",
    }
}

pub fn render_household(path: &HouseholdPath) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Household projection (seed {})", path.seed);
    let _ = writeln!(
        out,
        "{:>6} {:>4} {:>6} {:>6} {:>12} {:>12} {:>12} {:>12}",
        "Year", "Age", "P1", "P2", "Age pension", "DB income", "Expenses", "Net"
    );

    for year in &path.years {
        let _ = writeln!(
            out,
            "{:>6} {:>4} {:>6} {:>6} {:>12} {:>12} {:>12} {:>12}{}",
            year.calendar_year,
            year.age,
            status_mark(Some(year.state.partner1)),
            status_mark(year.state.partner2),
            format_currency(year.age_pension),
            format_currency(year.defined_benefit_income),
            format_currency(year.irregular_expenses),
            format_currency(year.net_cash_flow()),
            if year.super_transferred {
                "  super passes to survivor"
            } else {
                ""
            }
        );
    }

    let totals = path.totals();
    let _ = writeln!(out);
    let _ = writeln!(out, "Total age pension:      {}", format_currency(totals.age_pension));
    let _ = writeln!(
        out,
        "Total DB income:        {}",
        format_currency(totals.defined_benefit_income)
    );
    let _ = writeln!(
        out,
        "Total irregular costs:  {}",
        format_currency(totals.irregular_expenses)
    );
    out
}

pub fn render_pension(report: &PensionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Age Pension ({}, {})",
        household_name(report.household),
        if report.is_homeowner {
            "homeowner"
        } else {
            "non-homeowner"
        }
    );
    let _ = writeln!(out, "  Assessable assets: {}", format_currency(report.assets));
    let _ = writeln!(
        out,
        "  Annual pension:    {}",
        format_currency(report.annual_pension)
    );
    let _ = writeln!(
        out,
        "  Per fortnight:     {}",
        format_currency(report.fortnightly_pension)
    );
    let _ = writeln!(
        out,
        "  Asset cut-off:     {}",
        format_currency(report.asset_cutoff)
    );
    let _ = writeln!(
        out,
        "  Deemed income:     {} (not income tested)",
        format_currency(report.deemed_income)
    );
    out
}

pub fn render_life(report: &LifeReport) -> String {
    format!(
        "Life expectancy for a {} aged {}: {:.1} (default death age {})\n",
        gender_name(report.gender),
        report.age,
        report.life_expectancy,
        report.default_death_age
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use retireplan_core::statistics::{EnsembleConfig, run_ensemble};
    use retireplan_core::{generate_expense_path, get_path_statistics};

    #[test]
    fn test_path_report_lists_every_year() {
        let path = generate_expense_path(42, 60, 70, 2030);
        let stats = get_path_statistics(&path);
        let text = render_path(&path, &stats);

        assert!(text.starts_with("Irregular expenses (seed 42)"));
        for year in 2030..=2040 {
            assert!(text.contains(&year.to_string()), "missing {year}");
        }
        assert!(text.contains("Largest single year"));
    }

    #[test]
    fn test_ensemble_report_has_percentile_header() {
        let summary = run_ensemble(&EnsembleConfig {
            runs: 20,
            ..EnsembleConfig::default()
        })
        .unwrap();
        let text = render_ensemble(&summary);
        assert!(text.contains("seeds 0..=19"));
        assert!(text.contains("P10"));
        assert!(text.contains("P90"));
        assert!(text.contains("Major dental work"));
        assert!(text.contains("Years with expenses above $50,000"));
    }

    #[test]
    fn test_ensemble_report_wraps_seed_range() {
        let summary = run_ensemble(&EnsembleConfig {
            runs: 2,
            first_seed: u64::MAX,
            ..EnsembleConfig::default()
        })
        .unwrap();
        let text = render_ensemble(&summary);
        assert!(text.contains(&format!("seeds {}..=0", u64::MAX)));
    }

    #[test]
    fn test_pension_report() {
        let report = PensionReport {
            household: HouseholdType::Couple,
            is_homeowner: true,
            assets: 551_500.0,
            annual_pension: 38_152.0,
            fortnightly_pension: 38_152.0 / 26.0,
            asset_cutoff: 1_040_628.2,
            deemed_income: 0.0,
        };
        let text = render_pension(&report);
        assert!(text.contains("couple, homeowner"));
        assert!(text.contains("$38,152"));
        assert!(text.contains("$1,040,628"));
    }

    #[test]
    fn test_life_report() {
        let report = LifeReport {
            age: 57.5,
            gender: Gender::Male,
            life_expectancy: 85.4,
            default_death_age: 85,
        };
        assert_eq!(
            render_life(&report),
            "Life expectancy for a male aged 57.5: 85.4 (default death age 85)\n"
        );
    }
}
