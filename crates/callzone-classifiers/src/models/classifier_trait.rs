use ndarray::{Array1, Array2};

use crate::error::Result;
use crate::stats::accuracy;

/// A small trait abstraction for binary ball/strike classifiers.
///
/// Labels use `true` for a called strike and `false` for a ball. A model is
/// fitted once; the pipeline builds a fresh instance for every fit.
pub trait ClassifierModel {
    /// Fit the model on rows of `x` (`plate_x`, `plate_z`, `strikes`) against `y`.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<bool>) -> Result<()>;

    /// Predict a call for every row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>>;

    /// Plain classification accuracy on held-out rows. A prediction count that
    /// differs from `y` is a `ShapeMismatch`.
    fn score(&self, x: &Array2<f64>, y: &Array1<bool>) -> Result<f64> {
        let predicted = self.predict(x)?;
        accuracy(&predicted, y)
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
