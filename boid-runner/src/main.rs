use anyhow::{Context, Result};
use boid_runner::{run, Args, RunnerConfig};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Boid runner starting...");
    if let Some(path) = &args.config {
        log::info!("Settings file: {}", path.display());
    }

    let config = RunnerConfig::from_args(&args).context("Invalid configuration")?;

    match &args.snapshot {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create snapshot file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            run(&config, &mut writer).context("Simulation error")?;
            writer.flush().context("Failed to flush snapshot file")?;
            log::info!("Snapshots written to {}", path.display());
        }
        None => {
            run(&config, &mut io::sink()).context("Simulation error")?;
        }
    }

    Ok(())
}
