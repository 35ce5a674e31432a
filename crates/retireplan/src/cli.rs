use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use retireplan_core::Gender;

#[derive(Parser, Debug)]
#[command(name = "retireplan")]
#[command(about = "Australian retirement actuarial engine: irregular expenses, Age Pension and couple transitions")]
pub struct Cli {
    /// Path to the data directory (default: ~/.retireplan/)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Print JSON instead of text tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one seeded irregular expense path
    Path(PathArgs),
    /// Summarise an ensemble of seeded expense paths
    Ensemble(EnsembleArgs),
    /// Age Pension for a household's assets
    Pension(PensionArgs),
    /// Life expectancy lookup
    Life(LifeArgs),
    /// Year-by-year household projection from a scenario file
    Household(HouseholdArgs),
    /// Write an example scenario file
    Init(InitArgs),
}

#[derive(Args, Debug)]
pub struct PathArgs {
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    #[arg(long, default_value_t = 60)]
    pub start_age: u8,
    #[arg(long, default_value_t = 95)]
    pub end_age: u8,
    /// Calendar year of the first age (default: current year)
    #[arg(long)]
    pub start_year: Option<i16>,
}

#[derive(Args, Debug)]
pub struct EnsembleArgs {
    /// Scenario file supplying ensemble and expense settings
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,
    #[arg(long)]
    pub runs: Option<u32>,
    #[arg(long)]
    pub first_seed: Option<u64>,
    #[arg(long)]
    pub start_age: Option<u8>,
    #[arg(long)]
    pub end_age: Option<u8>,
    #[arg(long)]
    pub start_year: Option<i16>,
}

#[derive(Args, Debug)]
pub struct PensionArgs {
    /// Assessable assets in today's dollars
    #[arg(long)]
    pub assets: f64,
    /// Assess a single person instead of a couple
    #[arg(long)]
    pub single: bool,
    /// Use non-homeowner thresholds
    #[arg(long)]
    pub renter: bool,
    /// Financial assets for deeming (default: all assets)
    #[arg(long)]
    pub financial_assets: Option<f64>,
}

#[derive(Args, Debug)]
pub struct LifeArgs {
    #[arg(long)]
    pub age: f64,
    #[arg(long, value_enum)]
    pub gender: GenderArg,
}

#[derive(Args, Debug)]
pub struct HouseholdArgs {
    /// Scenario file with a household section
    #[arg(short, long)]
    pub scenario: PathBuf,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Destination file (default: {data_dir}/scenario.yaml)
    pub path: Option<PathBuf>,
    /// Replace an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}
