use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ArgMatches;

use callzone_classifiers::config::{load_config, PipelineConfig};

/// Players analysed when none are named on the command line.
pub const DEFAULT_PLAYERS: [&str; 3] = ["Aaron Judge", "Jose Altuve", "David Ortiz"];

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

/// Build the pipeline configuration from an optional JSON file and CLI overrides.
pub fn config_from_arguments(matches: &ArgMatches) -> Result<PipelineConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            log::info!("[callzone] Using config: {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config file: {:?}", path))?
        }
        None => PipelineConfig::default(),
    };

    if let Some(start) = matches.get_one::<String>("start") {
        config.start_date = parse_date(start)?;
    }
    if let Some(end) = matches.get_one::<String>("end") {
        config.end_date = parse_date(end)?;
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.split.seed = *seed;
    }
    if let Some(dir) = matches.get_one::<PathBuf>("plot_dir") {
        config.plot.output_dir = Some(dir.clone());
    }
    if matches.get_flag("no_plot") {
        config.plot.enabled = false;
    }
    if let Some(strikes) = matches.get_one::<u8>("decision_region") {
        config.plot.decision_region = Some(*strikes);
    }
    if let Some(path) = matches.get_one::<PathBuf>("pitch_csv") {
        config.provider.pitch_csv = Some(path.clone());
    }
    if let Some(path) = matches.get_one::<PathBuf>("register_csv") {
        config.provider.register_csv = Some(path.clone());
    }
    if let Some(days) = matches.get_one::<u32>("window_days") {
        config.provider.window_days = Some(*days);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Player names from the command line, or the defaults.
pub fn players_from_arguments(matches: &ArgMatches) -> Vec<String> {
    match matches.get_many::<String>("players") {
        Some(names) => names.cloned().collect(),
        None => DEFAULT_PLAYERS.iter().map(|s| s.to_string()).collect(),
    }
}
