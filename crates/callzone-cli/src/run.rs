use anyhow::{Context, Result};

use callzone_classifiers::config::PipelineConfig;
use callzone_classifiers::io::http::http_client;
use callzone_classifiers::io::{ChadwickRegister, CsvPitchSource, PitchSource, SavantClient};
use callzone_classifiers::pipeline::{Pipeline, PlayerReport};
use callzone_classifiers::report::sink::{BrowserSink, HtmlFileSink, NullSink, PlotSink};

/// Local register CSV when configured, otherwise the downloaded shards.
pub fn load_register(config: &PipelineConfig) -> Result<ChadwickRegister> {
    match &config.provider.register_csv {
        Some(path) => ChadwickRegister::from_path(path)
            .with_context(|| format!("Failed to read register CSV: {:?}", path)),
        None => {
            let client = http_client(config.provider.timeout_secs)?;
            ChadwickRegister::download(&client, &config.provider.register_url)
                .context("Failed to download the Chadwick register")
        }
    }
}

fn pitch_source(config: &PipelineConfig) -> Result<Box<dyn PitchSource>> {
    Ok(match &config.provider.pitch_csv {
        Some(path) => Box::new(CsvPitchSource::new(path)),
        None => Box::new(SavantClient::new(
            http_client(config.provider.timeout_secs)?,
            config.provider.statcast_url.clone(),
            config.provider.window_days,
        )),
    })
}

fn plot_sink(config: &PipelineConfig) -> Box<dyn PlotSink> {
    match (&config.plot.output_dir, config.plot.enabled) {
        (_, false) => Box::new(NullSink),
        (Some(dir), true) => Box::new(HtmlFileSink::new(dir)),
        (None, true) => Box::new(BrowserSink),
    }
}

pub fn build_pipeline(config: PipelineConfig) -> Result<Pipeline> {
    let registry = load_register(&config)?;
    let source = pitch_source(&config)?;
    let sink = plot_sink(&config);
    Ok(Pipeline::new(Box::new(registry), source, sink, config))
}

fn format_param(value: Option<u32>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

/// Console block for one player, in the order the fits ran.
pub fn format_report(report: &PlayerReport) -> String {
    let best = &report.grid.best;
    format!(
        "{} :\n\n\
         Validation accuracy:  {}\n\
         Overfitted validation accuracy:  {}\n\
         Best validation accuracy:  {}\n\
         Best parameters:  {{'gamma': {}, 'C': {}}}\n",
        report.player_name,
        report.baseline_accuracy,
        report.overfit_accuracy,
        best.score,
        format_param(best.gamma),
        format_param(best.c),
    )
}

/// Run each player in turn, printing results as they finish.
pub fn run_players(pipeline: &mut Pipeline, players: &[String]) -> Result<Vec<PlayerReport>> {
    let mut reports = Vec::with_capacity(players.len());
    for name in players {
        let report = pipeline
            .run_player(name)
            .with_context(|| format!("Pipeline failed for '{}'", name))?;
        println!("{}", format_report(&report));
        reports.push(report);
    }
    Ok(reports)
}
