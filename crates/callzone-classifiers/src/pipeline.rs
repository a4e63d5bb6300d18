//! Per-player ball/strike pipeline.
//!
//! resolve name -> fetch pitches -> clean -> split -> baseline fit ->
//! overfit fit -> grid search -> plot. The external collaborators are passed
//! in as trait objects so the whole sequence runs against in-memory data in
//! tests.
use serde::Serialize;

use crate::config::{Gamma, PipelineConfig, SvmConfig};
use crate::data_handling::{train_validation_split, DatasetSplit, PitchDataset};
use crate::error::{CallzoneError, Result};
use crate::io::{PitchSource, PlayerRegistry};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::factory::build_model;
use crate::preprocessing::build_dataset;
use crate::report::plots::{decision_region, plot_pitch_locations};
use crate::report::sink::PlotSink;
use crate::search::{grid_search, GridSearchResult};

/// Training sets above this size get a memory warning: linfa keeps a dense
/// n x n kernel matrix for every fit.
const LARGE_TRAINING_SET: usize = 5_000;

/// Approximate size in GB of the dense f64 kernel matrix for `n_rows` training rows.
pub fn dense_kernel_gb(n_rows: usize) -> f64 {
    (n_rows as f64).powi(2) * 8.0 / 1e9
}

/// Outcome of the three fit/score cycles on one dataset.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub split: DatasetSplit,
    pub baseline_accuracy: f64,
    pub overfit_accuracy: f64,
    pub grid: GridSearchResult,
}

/// What a player run prints and what the summary report lists.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub requested_name: String,
    pub player_name: String,
    pub player_id: u32,
    pub n_pitches: usize,
    pub n_train: usize,
    pub n_validation: usize,
    pub baseline_accuracy: f64,
    pub overfit_accuracy: f64,
    pub grid: GridSearchResult,
}

fn fit_and_score(params: &SvmConfig, split: &DatasetSplit) -> Result<(Box<dyn ClassifierModel>, f64)> {
    let mut model = build_model(params);
    model.fit(&split.train.x, &split.train.y)?;
    let score = model.score(&split.validation.x, &split.validation.y)?;
    Ok((model, score))
}

/// Split `dataset` and run the baseline, overfit and grid-search fits on that one split.
pub fn evaluate(dataset: &PitchDataset, config: &PipelineConfig) -> Result<Evaluation> {
    let split = train_validation_split(
        dataset,
        config.split.validation_fraction,
        config.split.seed,
    )?;

    let n_train = split.train.len();
    if n_train > LARGE_TRAINING_SET {
        log::warn!(
            "{}: {} training rows, each of the {} SVM fits holds a ~{:.1} GB kernel matrix; \
             narrow the date range to reduce memory and run time",
            dataset.player_name,
            n_train,
            config.grid.n_trials() + 2,
            dense_kernel_gb(n_train)
        );
    }

    let (_, baseline_accuracy) = fit_and_score(&config.baseline, &split)?;
    log::info!(
        "{}: baseline (gamma={}, C={}) validation accuracy {:.4}",
        dataset.player_name,
        config.baseline.gamma,
        config.baseline.c,
        baseline_accuracy
    );

    let (_, overfit_accuracy) = fit_and_score(&config.overfit, &split)?;
    log::info!(
        "{}: overfit (gamma={}, C={}) validation accuracy {:.4}",
        dataset.player_name,
        config.overfit.gamma,
        config.overfit.c,
        overfit_accuracy
    );

    log::info!(
        "{}: grid search over {} (gamma, C) pairs",
        dataset.player_name,
        config.grid.n_trials()
    );
    let grid = grid_search(&split, &config.grid)?;

    Ok(Evaluation {
        split,
        baseline_accuracy,
        overfit_accuracy,
        grid,
    })
}

/// Runs players one after another against fixed collaborators.
pub struct Pipeline {
    registry: Box<dyn PlayerRegistry>,
    source: Box<dyn PitchSource>,
    sink: Box<dyn PlotSink>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        registry: Box<dyn PlayerRegistry>,
        source: Box<dyn PitchSource>,
        sink: Box<dyn PlotSink>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            registry,
            source,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full sequence for one "First Last" name.
    pub fn run_player(&mut self, full_name: &str) -> Result<PlayerReport> {
        let record = self.registry.resolve(full_name)?;
        let player_id = record
            .key_mlbam
            .ok_or_else(|| CallzoneError::PlayerNotFound {
                first: record.name_first.clone(),
                last: record.name_last.clone(),
            })?;
        log::info!("Resolved '{}' to MLBAM id {}", full_name, player_id);

        let (start, end) = (self.config.start_date, self.config.end_date);
        let events = self.source.fetch(player_id, start, end)?;
        if events.is_empty() {
            return Err(CallzoneError::NoDataInRange {
                player_id,
                start,
                end,
            });
        }

        let dataset = build_dataset(&events, full_name)?;
        dataset.log_summary();

        let evaluation = evaluate(&dataset, &self.config)?;

        if self.config.plot.enabled {
            self.render(&dataset, &evaluation)?;
        }

        Ok(PlayerReport {
            requested_name: full_name.to_string(),
            player_name: dataset.player_name.clone(),
            player_id,
            n_pitches: dataset.len(),
            n_train: evaluation.split.train.len(),
            n_validation: evaluation.split.validation.len(),
            baseline_accuracy: evaluation.baseline_accuracy,
            overfit_accuracy: evaluation.overfit_accuracy,
            grid: evaluation.grid,
        })
    }

    /// Run every name in order, stopping at the first failure.
    pub fn run_all<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<PlayerReport>> {
        names.iter().map(|name| self.run_player(name.as_ref())).collect()
    }

    fn render(&mut self, dataset: &PitchDataset, evaluation: &Evaluation) -> Result<()> {
        let plot_config = &self.config.plot;
        let region = match (plot_config.decision_region, evaluation.grid.best.params()) {
            (Some(strikes), Some((gamma, c))) => {
                let params = SvmConfig {
                    gamma: Gamma::Value(f64::from(gamma)),
                    c: f64::from(c),
                    eps: self.config.grid.eps,
                };
                let (model, _) = fit_and_score(&params, &evaluation.split)?;
                Some(decision_region(model.as_ref(), strikes, plot_config)?)
            }
            _ => None,
        };
        let plot = plot_pitch_locations(dataset, plot_config, region.as_ref());
        self.sink.emit(&dataset.player_name, plot)
    }
}
