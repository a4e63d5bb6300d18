//! Exhaustive (gamma, C) grid search on a fixed train/validation split.
//!
//! Every candidate is fitted on the training rows and scored on the same
//! validation rows, so the reported best accuracy is also the accuracy used
//! to select it.
use serde::Serialize;

use crate::config::GridConfig;
use crate::data_handling::DatasetSplit;
use crate::error::Result;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::factory::build_grid_model;

/// One fitted and scored grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridTrial {
    pub gamma: u32,
    pub c: u32,
    pub score: f64,
}

/// Best validation accuracy seen so far and the parameters that reached it.
///
/// Starts at a score of 0 with no parameters; only a strictly better trial
/// replaces it, so ties keep the earliest trial.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BestParams {
    pub score: f64,
    pub gamma: Option<u32>,
    pub c: Option<u32>,
}

impl BestParams {
    /// Record `trial` if it beats the current best. Returns true when it did.
    pub fn offer(&mut self, trial: &GridTrial) -> bool {
        if trial.score > self.score {
            self.score = trial.score;
            self.gamma = Some(trial.gamma);
            self.c = Some(trial.c);
            true
        } else {
            false
        }
    }

    pub fn params(&self) -> Option<(u32, u32)> {
        self.gamma.zip(self.c)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSearchResult {
    pub best: BestParams,
    /// All trials in evaluation order.
    pub trials: Vec<GridTrial>,
}

/// Walk the grid with gamma as the outer loop and C as the inner loop, both ascending.
///
/// `build` creates a fresh unfitted model for each (gamma, C) pair.
pub fn grid_search_with<F>(split: &DatasetSplit, grid: &GridConfig, mut build: F) -> Result<GridSearchResult>
where
    F: FnMut(u32, u32) -> Box<dyn ClassifierModel>,
{
    let (gamma_lo, gamma_hi) = grid.gamma;
    let (c_lo, c_hi) = grid.c;

    let mut best = BestParams::default();
    let mut trials = Vec::with_capacity(grid.n_trials());

    for gamma in gamma_lo..=gamma_hi {
        for c in c_lo..=c_hi {
            let mut model = build(gamma, c);
            model.fit(&split.train.x, &split.train.y)?;
            let score = model.score(&split.validation.x, &split.validation.y)?;
            let trial = GridTrial { gamma, c, score };
            log::debug!("{}: gamma={} C={} accuracy={:.4}", model.name(), gamma, c, score);
            if best.offer(&trial) {
                log::trace!("New best at gamma={} C={}: {:.4}", gamma, c, score);
            }
            trials.push(trial);
        }
    }

    Ok(GridSearchResult { best, trials })
}

/// Grid search over RBF support vector classifiers.
pub fn grid_search(split: &DatasetSplit, grid: &GridConfig) -> Result<GridSearchResult> {
    let eps = grid.eps;
    grid_search_with(split, grid, |gamma, c| build_grid_model(gamma, c, eps))
}
