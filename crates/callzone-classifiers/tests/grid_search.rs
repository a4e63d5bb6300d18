//! Integration tests for the (gamma, C) grid search.

use callzone_classifiers::config::GridConfig;
use callzone_classifiers::data_handling::{train_validation_split, DatasetSplit, PitchDataset};
use callzone_classifiers::models::classifier_trait::ClassifierModel;
use callzone_classifiers::search::{grid_search, grid_search_with, GridTrial};
use callzone_classifiers::{CallzoneError, Result};
use ndarray::{Array1, Array2};

fn in_zone(px: f64, pz: f64) -> bool {
    px.abs() <= 0.83 && (1.5..=3.5).contains(&pz)
}

fn synthetic_split() -> DatasetSplit {
    let x = Array2::from_shape_fn((100, 3), |(r, c)| match c {
        0 => -2.0 + (r % 10) as f64 * 0.45,
        1 => 0.5 + (r / 10) as f64 * 0.45,
        _ => (r % 3) as f64,
    });
    let y = Array1::from_shape_fn(100, |r| in_zone(x[(r, 0)], x[(r, 1)]));
    let ds = PitchDataset::new("Synthetic, Player", x, y).unwrap();
    train_validation_split(&ds, 0.25, 1).unwrap()
}

/// Knows the true zone when `perfect`, otherwise calls everything a ball.
struct RuleModel {
    perfect: bool,
}

impl ClassifierModel for RuleModel {
    fn fit(&mut self, _x: &Array2<f64>, _y: &Array1<bool>) -> Result<()> {
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>> {
        Ok(x
            .outer_iter()
            .map(|row| self.perfect && in_zone(row[0], row[1]))
            .collect())
    }
}

/// Returns one prediction fewer than it was asked for.
struct ShortModel;

impl ClassifierModel for ShortModel {
    fn fit(&mut self, _x: &Array2<f64>, _y: &Array1<bool>) -> Result<()> {
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>> {
        Ok(Array1::from_elem(x.nrows().saturating_sub(1), true))
    }
}

#[test]
fn short_predictions_fail_the_search_instead_of_panicking() {
    let split = synthetic_split();
    let n_validation = split.validation.len();
    let err = grid_search_with(&split, &GridConfig::default(), |_, _| Box::new(ShortModel)).unwrap_err();
    match err {
        CallzoneError::ShapeMismatch { expected, found } => {
            assert_eq!(expected, n_validation);
            assert_eq!(found, n_validation - 1);
        }
        other => panic!("expected ShapeMismatch, got {}", other),
    }
}

#[test]
fn trials_follow_gamma_outer_c_inner_order() {
    let split = synthetic_split();
    let result = grid_search_with(&split, &GridConfig::default(), |_, _| {
        Box::new(RuleModel { perfect: false })
    })
    .unwrap();

    assert_eq!(result.trials.len(), 81);
    let order: Vec<(u32, u32)> = result.trials.iter().map(|t| (t.gamma, t.c)).collect();
    let expected: Vec<(u32, u32)> = (1..=9).flat_map(|g| (1..=9).map(move |c| (g, c))).collect();
    assert_eq!(order, expected);
}

#[test]
fn ties_resolve_to_the_earliest_pair() {
    let split = synthetic_split();
    let result = grid_search_with(&split, &GridConfig::default(), |gamma, c| {
        Box::new(RuleModel {
            perfect: (gamma, c) == (5, 2) || (gamma, c) == (3, 4) || (gamma, c) == (9, 9),
        })
    })
    .unwrap();

    assert_eq!(result.best.score, 1.0);
    assert_eq!(result.best.params(), Some((3, 4)));
}

#[test]
fn svm_grid_reports_the_first_maximum() {
    let split = synthetic_split();
    let grid = GridConfig {
        gamma: (1, 3),
        c: (1, 3),
        ..GridConfig::default()
    };
    let result = grid_search(&split, &grid).unwrap();
    assert_eq!(result.trials.len(), 9);

    let max = result
        .trials
        .iter()
        .map(|t| t.score)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(result.best.score, max);

    let first: &GridTrial = result.trials.iter().find(|t| t.score == max).unwrap();
    assert_eq!(result.best.params(), Some((first.gamma, first.c)));
    assert!(max > 0.5, "zone should be learnable, best accuracy {}", max);
}
