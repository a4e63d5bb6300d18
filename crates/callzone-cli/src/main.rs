use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use callzone_classifiers::config::PipelineConfig;
use callzone_classifiers::io::registry::split_full_name;
use callzone_classifiers::io::PlayerRegistry;
use callzone_classifiers::report::summary::write_summary;

mod input;
mod run;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CALLZONE_LOG", "error,callzone=info"))
        .init();

    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("run", sub_m)) => handle_run(sub_m),
        Some(("lookup", sub_m)) => handle_lookup(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1)
    }
    Ok(())
}

fn cli() -> Command {
    Command::new("callzone")
        .version(clap::crate_version!())
        .about("\u{26BE} callzone - ball/strike call classification from Statcast pitch locations")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Fit, tune and plot ball/strike classifiers for one or more batters")
                .arg(
                    Arg::new("players")
                        .help("Batter names as \"First Last\". Defaults to Aaron Judge, Jose Altuve and David Ortiz.")
                        .num_args(1..)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON pipeline configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .help("First game date (YYYY-MM-DD). Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("end")
                        .long("end")
                        .help("Last game date (YYYY-MM-DD). Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for the train/validation shuffle")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("plot_dir")
                        .long("plot-dir")
                        .help("Write one HTML scatter plot per player into this directory instead of opening a browser")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("no_plot")
                        .long("no-plot")
                        .help("Skip plotting entirely.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("decision_region")
                        .long("decision-region")
                        .help("Overlay the best grid model's predicted calls at this strike count (0-2)")
                        .value_parser(clap::value_parser!(u8).range(0..=2)),
                )
                .arg(
                    Arg::new("pitch_csv")
                        .long("pitch-csv")
                        .help("Read pitches from a local Statcast CSV export instead of Baseball Savant")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("register_csv")
                        .long("register-csv")
                        .help("Read players from a local Chadwick register CSV instead of downloading it")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("window_days")
                        .long("window-days")
                        .help("Split the Statcast download into requests of at most this many days")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .help("Write an HTML summary table of all players to this path")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("lookup")
                .about("Resolve a player name to its register identifiers")
                .arg(
                    Arg::new("player")
                        .help("Player name as \"First Last\"")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("register_csv")
                        .long("register-csv")
                        .help("Read players from a local Chadwick register CSV instead of downloading it")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}

fn handle_run(matches: &ArgMatches) -> Result<()> {
    let config = input::config_from_arguments(matches)?;
    let players = input::players_from_arguments(matches);
    log::info!(
        "[callzone] Running {} player(s) from {} to {}",
        players.len(),
        config.start_date,
        config.end_date
    );

    let mut pipeline = run::build_pipeline(config).context("Run failed")?;
    let reports = run::run_players(&mut pipeline, &players).context("Run failed")?;

    if let Some(path) = matches.get_one::<PathBuf>("report") {
        write_summary(path, &reports, pipeline.config())
            .with_context(|| format!("Failed to write summary report: {:?}", path))?;
    }
    Ok(())
}

fn handle_lookup(matches: &ArgMatches) -> Result<()> {
    let mut config = PipelineConfig::default();
    if let Some(path) = matches.get_one::<PathBuf>("register_csv") {
        config.provider.register_csv = Some(path.clone());
    }
    let name = matches
        .get_one::<String>("player")
        .map(String::as_str)
        .unwrap_or_default();

    let (first, last) = split_full_name(name).context("Lookup failed")?;
    let register = run::load_register(&config).context("Lookup failed")?;
    let rows = register.lookup(&first, &last);
    if rows.is_empty() {
        bail!("Lookup failed: no register rows match '{}'", name);
    }
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_failures_are_returned_to_the_error_handler() {
        let missing = std::env::temp_dir().join("callzone-no-such-register.csv");
        let matches = cli()
            .try_get_matches_from([
                "callzone",
                "run",
                "Aaron Judge",
                "--no-plot",
                "--register-csv",
                missing.to_str().unwrap(),
            ])
            .unwrap();
        let err = handle_run(matches.subcommand_matches("run").unwrap()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("Run failed: Failed to read register CSV"), "{}", message);
    }

    #[test]
    fn lookup_without_a_match_is_an_error() {
        let path = std::env::temp_dir().join(format!("callzone-lookup-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "key_mlbam,name_last,name_first\n592450,Judge,Aaron\n",
        )
        .unwrap();
        let matches = cli()
            .try_get_matches_from(["callzone", "lookup", "Jose Altuve", "--register-csv", path.to_str().unwrap()])
            .unwrap();
        let err = handle_lookup(matches.subcommand_matches("lookup").unwrap()).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(format!("{:#}", err).contains("no register rows match 'Jose Altuve'"));
    }
}
