//! Label encoding and missing-value filtering.
//!
//! Turns raw provider rows into a `PitchDataset`. No outlier handling and no
//! feature scaling happen here; the classifier sees plate coordinates in feet
//! and the raw strike count.

use ndarray::{Array1, Array2};

use crate::data_handling::{CallType, PitchDataset, PitchEvent, FEATURE_NAMES};
use crate::error::{CallzoneError, Result};

/// Binary label for a raw call code. `None` for anything but `S` or `B`.
pub fn encode_call(code: Option<&str>) -> Option<u8> {
    code.and_then(CallType::from_code).map(CallType::label)
}

/// Features and label of one event, or `None` if any of them is missing.
fn labelled_row(event: &PitchEvent) -> Option<([f64; 3], bool)> {
    let label = encode_call(event.call_type.as_deref())?;
    let x = event.plate_x.filter(|v| v.is_finite())?;
    let z = event.plate_z.filter(|v| v.is_finite())?;
    let strikes = event.strikes?;
    Some(([x, z, f64::from(strikes)], label == 1))
}

/// Drop rows with a missing position, count or unmapped call and stack the rest.
///
/// `player_name` is used when no event carries a name.
pub fn build_dataset(events: &[PitchEvent], player_name: &str) -> Result<PitchDataset> {
    let name = events
        .iter()
        .find_map(|e| e.player_name.clone())
        .unwrap_or_else(|| player_name.to_string());

    let mut features = Vec::with_capacity(events.len() * FEATURE_NAMES.len());
    let mut labels = Vec::with_capacity(events.len());
    for event in events {
        if let Some((row, strike)) = labelled_row(event) {
            features.extend_from_slice(&row);
            labels.push(strike);
        }
    }

    let dropped = events.len() - labels.len();
    if dropped > 0 {
        log::debug!(
            "{}: dropped {} of {} pitches without a ball/strike call or location",
            name,
            dropped,
            events.len()
        );
    }

    let n_rows = labels.len();
    let x = Array2::from_shape_vec((n_rows, FEATURE_NAMES.len()), features)
        .map_err(|e| CallzoneError::ProviderResponse(e.to_string()))?;
    PitchDataset::new(name, x, Array1::from_vec(labels))
}

/// Variance of every feature value pooled together, as used by `Gamma::Scale`.
pub fn pooled_variance(x: &Array2<f64>) -> f64 {
    let n = x.len();
    if n == 0 {
        return 0.0;
    }
    let mean = x.iter().sum::<f64>() / n as f64;
    x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64
}

/// `1 / (n_features * var(X))`, or 1.0 for constant features.
pub fn scale_gamma(x: &Array2<f64>) -> f64 {
    let var = pooled_variance(x);
    if var > 0.0 && x.ncols() > 0 {
        1.0 / (x.ncols() as f64 * var)
    } else {
        1.0
    }
}
