//! Data structures for pitch events and the labelled datasets built from them.
//!
//! This module defines `PitchEvent` (one raw provider row), `PitchDataset`
//! (the cleaned feature matrix and ball/strike labels) and the seeded
//! train/validation split used by every fit of a player run.
use chrono::NaiveDate;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{CallzoneError, Result};

/// Feature columns, in matrix order.
pub const FEATURE_NAMES: [&str; 3] = ["plate_x", "plate_z", "strikes"];

/// One pitch as returned by the provider. Blank cells stay `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PitchEvent {
    pub player_name: Option<String>,
    /// MLBAM id of the batter.
    pub batter_id: Option<u32>,
    pub game_date: Option<NaiveDate>,
    /// Horizontal position crossing the plate, feet from the centre, catcher's view.
    pub plate_x: Option<f64>,
    /// Height crossing the plate, feet above the ground.
    pub plate_z: Option<f64>,
    pub strikes: Option<u8>,
    /// Raw call code: `S`, `B` or `X`.
    pub call_type: Option<String>,
}

/// Umpire call for a pitch that was not put in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    Ball,
    Strike,
}

impl CallType {
    pub fn from_code(code: &str) -> Option<CallType> {
        match code.trim() {
            "S" => Some(CallType::Strike),
            "B" => Some(CallType::Ball),
            _ => None,
        }
    }

    /// Binary label: strike = 1, ball = 0.
    pub fn label(self) -> u8 {
        match self {
            CallType::Strike => 1,
            CallType::Ball => 0,
        }
    }
}

/// Cleaned pitches for one player: `x` holds `FEATURE_NAMES`, `y` is true for strikes.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchDataset {
    pub player_name: String,
    pub x: Array2<f64>,
    pub y: Array1<bool>,
}

impl PitchDataset {
    pub fn new(player_name: impl Into<String>, x: Array2<f64>, y: Array1<bool>) -> Result<Self> {
        if x.ncols() != FEATURE_NAMES.len() {
            return Err(CallzoneError::ShapeMismatch {
                expected: FEATURE_NAMES.len(),
                found: x.ncols(),
            });
        }
        if x.nrows() != y.len() {
            return Err(CallzoneError::ShapeMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        Ok(Self {
            player_name: player_name.into(),
            x,
            y,
        })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn n_strikes(&self) -> usize {
        self.y.iter().filter(|&&s| s).count()
    }

    pub fn n_balls(&self) -> usize {
        self.len() - self.n_strikes()
    }

    /// Rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> PitchDataset {
        PitchDataset {
            player_name: self.player_name.clone(),
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "{}: {} labelled pitches ({} strikes, {} balls)",
            self.player_name,
            self.len(),
            self.n_strikes(),
            self.n_balls()
        );
    }
}

/// Disjoint training and validation subsets of one `PitchDataset`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    pub train: PitchDataset,
    pub validation: PitchDataset,
    /// Source row of each training row.
    pub train_indices: Vec<usize>,
    /// Source row of each validation row.
    pub validation_indices: Vec<usize>,
}

/// Shuffle the rows with a seeded RNG and hold out `ceil(n * validation_fraction)` of them.
///
/// The same dataset, fraction and seed always produce the same split.
pub fn train_validation_split(
    dataset: &PitchDataset,
    validation_fraction: f64,
    seed: u64,
) -> Result<DatasetSplit> {
    let n_samples = dataset.len();
    if n_samples < 2 {
        return Err(CallzoneError::InsufficientData { rows: n_samples });
    }
    if !(validation_fraction > 0.0 && validation_fraction < 1.0) {
        return Err(CallzoneError::Config(format!(
            "validation_fraction must be in (0, 1), got {}",
            validation_fraction
        )));
    }

    let n_validation = (n_samples as f64 * validation_fraction).ceil() as usize;
    if n_validation == 0 || n_validation >= n_samples {
        return Err(CallzoneError::InsufficientData { rows: n_samples });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(&mut rng);

    let train_indices = indices.split_off(n_validation);
    let validation_indices = indices;

    log::debug!(
        "Split {} pitches into {} training / {} validation rows (seed {})",
        n_samples,
        train_indices.len(),
        validation_indices.len(),
        seed
    );

    Ok(DatasetSplit {
        train: dataset.select(&train_indices),
        validation: dataset.select(&validation_indices),
        train_indices,
        validation_indices,
    })
}
