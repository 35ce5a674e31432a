//! Command-line front end for the retireplan actuarial engine
//!
//! Provides:
//! - Argument parsing for the `path`, `ensemble`, `pension`, `life`,
//!   `household` and `init` commands
//! - YAML scenario files
//! - File logging with size-based rotation
//! - Text and JSON reports

pub mod cli;
pub mod commands;
pub mod format;
pub mod logging;
pub mod report;
pub mod scenario;

pub use cli::{Cli, Command};
pub use commands::run;
pub use logging::{default_data_dir, init_logging};
pub use scenario::{ScenarioError, ScenarioFile};
