use clap::Parser;
use retireplan::{Cli, default_data_dir, init_logging, run};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &cli.log_level)?;

    let output = run(&cli, &data_dir)?;
    print!("{output}");

    tracing::info!("retireplan finished");
    Ok(())
}
