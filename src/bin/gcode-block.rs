use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use gcode_block::cli;
use gcode_block::config::{Args, Config};

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    let config = Config::from_args(&args)?;
    if let Some(source) = &config.source {
        log::info!("Loaded configuration from {}", source.display());
    }

    let ok = cli::run(&args.command, &config, &mut std::io::stdout().lock())?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
