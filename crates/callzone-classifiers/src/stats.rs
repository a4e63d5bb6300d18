use ndarray::Array1;

use crate::error::{CallzoneError, Result};

/// Fraction of predictions matching the ground truth.
///
/// Returns 0.0 for empty input and `ShapeMismatch` if the arrays differ in length.
pub fn accuracy(predicted: &Array1<bool>, truth: &Array1<bool>) -> Result<f64> {
    if predicted.len() != truth.len() {
        return Err(CallzoneError::ShapeMismatch {
            expected: truth.len(),
            found: predicted.len(),
        });
    }
    if truth.is_empty() {
        return Ok(0.0);
    }
    let correct = predicted
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    Ok(correct as f64 / truth.len() as f64)
}
