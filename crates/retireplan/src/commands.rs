//! Command execution. Each command returns the text (or JSON) to print.

use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use retireplan_core::household::simulate_household;
use retireplan_core::model::{ActuarialTables, HouseholdType};
use retireplan_core::statistics::{EnsembleConfig, run_ensemble};
use retireplan_core::{
    AgePensionCalculator, AgePensionParams, ExpensePath, Gender, IrregularExpenseEngine,
    PathStatistics, get_life_expectancy,
};
use serde::Serialize;

use crate::cli::{
    Cli, Command, EnsembleArgs, HouseholdArgs, InitArgs, LifeArgs, PathArgs, PensionArgs,
};
use crate::report::{self, LifeReport, PensionReport};
use crate::scenario::ScenarioFile;

/// Current calendar year in the system time zone
pub fn current_year() -> i16 {
    jiff::Zoned::now().year()
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

pub fn run(cli: &Cli, data_dir: &Path) -> Result<String> {
    match &cli.command {
        Command::Path(args) => path(args, cli.json),
        Command::Ensemble(args) => ensemble(args, cli.json),
        Command::Pension(args) => pension(args, cli.json),
        Command::Life(args) => life(args, cli.json),
        Command::Household(args) => household(args, cli.json),
        Command::Init(args) => init(args, data_dir),
    }
}

#[derive(Serialize)]
struct PathOutput<'a> {
    path: &'a ExpensePath,
    statistics: &'a PathStatistics,
}

fn path(args: &PathArgs, json: bool) -> Result<String> {
    let start_year = args.start_year.unwrap_or_else(current_year);
    tracing::info!(
        seed = args.seed,
        start_age = args.start_age,
        end_age = args.end_age,
        start_year,
        "Generating expense path"
    );

    let engine = IrregularExpenseEngine::new(args.seed);
    let path = engine.generate_expense_path(args.start_age, args.end_age, start_year);
    let statistics = engine.get_path_statistics(&path);

    if json {
        to_json(&PathOutput {
            path: &path,
            statistics: &statistics,
        })
    } else {
        Ok(report::render_path(&path, &statistics))
    }
}

fn ensemble_config(args: &EnsembleArgs) -> Result<EnsembleConfig> {
    let mut config = match &args.scenario {
        Some(file) => ScenarioFile::load(file)
            .wrap_err_with(|| format!("Failed to load scenario {}", file.display()))?
            .ensemble_config(),
        None => EnsembleConfig {
            start_year: current_year(),
            ..EnsembleConfig::default()
        },
    };

    if let Some(runs) = args.runs {
        config.runs = runs;
    }
    if let Some(first_seed) = args.first_seed {
        config.first_seed = first_seed;
    }
    if let Some(start_age) = args.start_age {
        config.start_age = start_age;
    }
    if let Some(end_age) = args.end_age {
        config.end_age = end_age;
    }
    if let Some(start_year) = args.start_year {
        config.start_year = start_year;
    }
    Ok(config)
}

fn ensemble(args: &EnsembleArgs, json: bool) -> Result<String> {
    let config = ensemble_config(args)?;
    tracing::info!(runs = config.runs, first_seed = config.first_seed, "Running ensemble");

    let summary = run_ensemble(&config).wrap_err("Invalid ensemble settings")?;
    tracing::info!(
        tail_probability = summary.tail_probability,
        "Ensemble finished"
    );

    if json {
        to_json(&summary)
    } else {
        Ok(report::render_ensemble(&summary))
    }
}

fn pension(args: &PensionArgs, json: bool) -> Result<String> {
    let tables = ActuarialTables::builtin();
    let calculator = AgePensionCalculator::new(&tables.benefit_rates);
    let household = if args.single {
        HouseholdType::Single
    } else {
        HouseholdType::Couple
    };

    let params = AgePensionParams {
        partner1_alive: true,
        partner2_alive: !args.single,
        total_assets: args.assets,
        total_income: 0.0,
        is_homeowner: !args.renter,
    };
    let annual_pension = calculator.calculate(&params);

    let assessment = PensionReport {
        household,
        is_homeowner: !args.renter,
        assets: args.assets,
        annual_pension,
        fortnightly_pension: annual_pension / tables.benefit_rates.taper.periods_per_year,
        asset_cutoff: calculator.asset_cutoff(household, !args.renter),
        deemed_income: calculator
            .deemed_income(household, args.financial_assets.unwrap_or(args.assets)),
    };

    if json {
        to_json(&assessment)
    } else {
        Ok(report::render_pension(&assessment))
    }
}

fn life(args: &LifeArgs, json: bool) -> Result<String> {
    let gender = Gender::from(args.gender);
    let life_expectancy = get_life_expectancy(args.age, gender);
    let lookup = LifeReport {
        age: args.age,
        gender,
        life_expectancy,
        default_death_age: life_expectancy.round().clamp(0.0, f64::from(u8::MAX)) as u8,
    };

    if json {
        to_json(&lookup)
    } else {
        Ok(report::render_life(&lookup))
    }
}

fn household(args: &HouseholdArgs, json: bool) -> Result<String> {
    let scenario = ScenarioFile::load(&args.scenario)
        .wrap_err_with(|| format!("Failed to load scenario {}", args.scenario.display()))?;
    let household = scenario.require_household()?;

    tracing::info!(seed = args.seed, "Projecting household");
    let path = simulate_household(&household, ActuarialTables::builtin(), args.seed)
        .wrap_err("Invalid household scenario")?;

    if json {
        to_json(&path)
    } else {
        Ok(report::render_household(&path))
    }
}

fn init(args: &InitArgs, data_dir: &Path) -> Result<String> {
    let path = args
        .path
        .clone()
        .unwrap_or_else(|| data_dir.join("scenario.yaml"));

    if path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to replace it)",
            path.display()
        );
    }

    ScenarioFile::example(current_year()).save(&path)?;
    tracing::info!(path = %path.display(), "Wrote example scenario");
    Ok(format!("Wrote example scenario to {}\n", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run_args(args: &[&str], data_dir: &Path) -> Result<String> {
        let cli = Cli::try_parse_from(args)?;
        run(&cli, data_dir)
    }

    #[test]
    fn test_path_json_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let args = [
            "retireplan", "path", "--seed", "7", "--start-year", "2030", "--json",
        ];
        let first = run_args(&args, dir.path()).unwrap();
        let second = run_args(&args, dir.path()).unwrap();
        assert_eq!(first, second);

        let value: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(value["path"]["seed"], 7);
        assert_eq!(value["path"]["records"].as_array().unwrap().len(), 36);
    }

    #[test]
    fn test_pension_command() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_args(
            &["retireplan", "pension", "--assets", "551500", "--json"],
            dir.path(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let annual = value["annual_pension"].as_f64().unwrap();
        assert!((annual - 38_152.0).abs() < 1e-6);
        assert_eq!(value["household"], "couple");

        let out = run_args(
            &["retireplan", "pension", "--assets", "250000", "--single"],
            dir.path(),
        )
        .unwrap();
        assert!(out.contains("$29,754"));
    }

    #[test]
    fn test_life_command() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_args(
            &["retireplan", "life", "--age", "55", "--gender", "male"],
            dir.path(),
        )
        .unwrap();
        assert!(out.contains("85.2"));
        assert!(out.contains("default death age 85"));
    }

    #[test]
    fn test_init_then_household() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_args(&["retireplan", "init"], dir.path()).unwrap();
        let scenario = dir.path().join("scenario.yaml");
        assert!(out.contains("scenario.yaml"));
        assert!(scenario.exists());

        // Refuses to overwrite without --force
        assert!(run_args(&["retireplan", "init"], dir.path()).is_err());
        run_args(&["retireplan", "init", "--force"], dir.path()).unwrap();

        let scenario_arg = scenario.to_string_lossy().into_owned();
        let out = run_args(
            &["retireplan", "household", "--scenario", &scenario_arg, "--seed", "3"],
            dir.path(),
        )
        .unwrap();
        assert!(out.starts_with("Household projection (seed 3)"));
        assert!(out.contains("super passes to survivor"));
    }

    #[test]
    fn test_ensemble_from_scenario_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("small.yaml");
        std::fs::write(&file, "ensemble:\n  runs: 500\n  start_year: 2030\n").unwrap();
        let file_arg = file.to_string_lossy().into_owned();

        let out = run_args(
            &[
                "retireplan", "ensemble", "--scenario", &file_arg, "--runs", "25", "--json",
            ],
            dir.path(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["runs"], 25);
    }

    #[test]
    fn test_household_without_section_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("no_household.yaml");
        std::fs::write(&file, "ensemble:\n  runs: 5\n").unwrap();
        let file_arg = file.to_string_lossy().into_owned();

        let err = run_args(&["retireplan", "household", "--scenario", &file_arg], dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("no household section"));
    }
}
