//! Tests for the crate-level convenience functions

use crate::model::Gender;
use crate::{
    AgePensionParams, calculate_age_pension_for_couple, calculate_reversionary_pension,
    create_default_partner, get_life_expectancy,
};

fn params(p1: bool, p2: bool, assets: f64) -> AgePensionParams {
    AgePensionParams {
        partner1_alive: p1,
        partner2_alive: p2,
        total_assets: assets,
        total_income: 0.0,
        is_homeowner: true,
    }
}

#[test]
fn test_life_expectancy_interpolates_between_brackets() {
    let value = get_life_expectancy(57.5, Gender::Male);
    assert!((value - 85.4).abs() < 1e-9, "Expected 85.4, got {value}");
}

#[test]
fn test_life_expectancy_clamps_outside_table() {
    assert_eq!(
        get_life_expectancy(50.0, Gender::Male),
        get_life_expectancy(55.0, Gender::Male)
    );
    assert_eq!(
        get_life_expectancy(85.0, Gender::Male),
        get_life_expectancy(80.0, Gender::Male)
    );
    assert_eq!(
        get_life_expectancy(101.0, Gender::Female),
        get_life_expectancy(80.0, Gender::Female)
    );
}

#[test]
fn test_women_outlive_men_at_65() {
    let female = get_life_expectancy(65.0, Gender::Female);
    let male = get_life_expectancy(65.0, Gender::Male);
    assert!(female > male);
    assert!((female - male - 2.9).abs() < 1e-9, "Expected gap 2.9, got {}", female - male);
}

#[test]
fn test_couple_pension_properties() {
    assert_eq!(calculate_age_pension_for_couple(&params(true, true, 400_000.0)), 45_952.0);

    let tapered = calculate_age_pension_for_couple(&params(true, true, 551_500.0));
    assert!((tapered - (45_952.0 - 100.0 * 3.0 * 26.0)).abs() < 1e-6);

    assert_eq!(calculate_age_pension_for_couple(&params(true, true, 2_000_000.0)), 0.0);
    assert_eq!(calculate_age_pension_for_couple(&params(false, true, 250_000.0)), 29_754.0);
    assert_eq!(calculate_age_pension_for_couple(&params(false, false, 0.0)), 0.0);
}

#[test]
fn test_reversionary_linearity() {
    assert!((calculate_reversionary_pension(101_000.0, 67.0) - 67_670.0).abs() < 1e-6);
    assert_eq!(calculate_reversionary_pension(101_000.0, 0.0), 0.0);
    assert_eq!(calculate_reversionary_pension(101_000.0, 100.0), 101_000.0);
}

#[test]
fn test_default_partner_uses_rounded_life_expectancy() {
    let john = create_default_partner("John", 55, Gender::Male);
    let expected = get_life_expectancy(55.0, Gender::Male).round();
    assert_eq!(f64::from(john.death_age), expected);
    assert_eq!(john.death_age, 85);
    assert_eq!(john.name, "John");
    assert_eq!(john.retirement_age, 60);
    assert_eq!(john.super_balance, 0.0);
    assert_eq!(john.pension_income, 0.0);
    assert_eq!(john.reversionary_rate, 67.0);
    assert_eq!(john.pre_retirement_income, 0.0);

    let jane = create_default_partner("Jane", 65, Gender::Female);
    assert_eq!(jane.death_age, 89);
}
