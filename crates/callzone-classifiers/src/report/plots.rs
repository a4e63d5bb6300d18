use itertools_num::linspace;
use ndarray::Array2;
use plotly::common::{Marker, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

use crate::config::PlotConfig;
use crate::data_handling::PitchDataset;
use crate::error::{CallzoneError, Result};
use crate::models::classifier_trait::ClassifierModel;

// ends of matplotlib's coolwarm map
const BALL_COLOR: &str = "rgb(59, 76, 192)";
const STRIKE_COLOR: &str = "rgb(180, 4, 38)";
const REGION_COLOR: &str = "rgb(221, 221, 221)";

/// Lattice points the classifier calls strikes, at a fixed strike count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecisionRegion {
    pub strikes: u8,
    pub x: Vec<f64>,
    pub z: Vec<f64>,
}

/// Predict over a `resolution` x `resolution` lattice spanning the plot limits.
pub fn decision_region(
    model: &dyn ClassifierModel,
    strikes: u8,
    config: &PlotConfig,
) -> Result<DecisionRegion> {
    let n = config.decision_resolution;
    if n < 2 {
        return Err(CallzoneError::Config(format!(
            "decision_resolution must be at least 2, got {}",
            n
        )));
    }
    let xs: Vec<f64> = linspace(config.x_range.0, config.x_range.1, n).collect();
    let zs: Vec<f64> = linspace(config.z_range.0, config.z_range.1, n).collect();

    let mut lattice = Vec::with_capacity(n * n * 3);
    for &x in &xs {
        for &z in &zs {
            lattice.extend_from_slice(&[x, z, f64::from(strikes)]);
        }
    }
    let lattice = Array2::from_shape_vec((n * n, 3), lattice)
        .map_err(|e| CallzoneError::Config(e.to_string()))?;
    let predicted = model.predict(&lattice)?;

    let mut region = DecisionRegion {
        strikes,
        ..DecisionRegion::default()
    };
    for (row, &strike) in lattice.outer_iter().zip(predicted.iter()) {
        if strike {
            region.x.push(row[0]);
            region.z.push(row[1]);
        }
    }
    Ok(region)
}

/// Scatter every retained pitch at its plate location, coloured by the call.
pub fn plot_pitch_locations(
    dataset: &PitchDataset,
    config: &PlotConfig,
    region: Option<&DecisionRegion>,
) -> Plot {
    let mut ball_x = Vec::new();
    let mut ball_z = Vec::new();
    let mut strike_x = Vec::new();
    let mut strike_z = Vec::new();

    for (row, &strike) in dataset.x.outer_iter().zip(dataset.y.iter()) {
        if strike {
            strike_x.push(row[0]);
            strike_z.push(row[1]);
        } else {
            ball_x.push(row[0]);
            ball_z.push(row[1]);
        }
    }

    let mut plot = Plot::new();

    if let Some(region) = region {
        plot.add_trace(
            Scatter::new(region.x.clone(), region.z.clone())
                .mode(Mode::Markers)
                .name(format!("Predicted strike ({} strikes)", region.strikes).as_str())
                .marker(Marker::new().color(REGION_COLOR).size(4))
                .opacity(0.5),
        );
    }

    plot.add_trace(
        Scatter::new(ball_x, ball_z)
            .mode(Mode::Markers)
            .name("Ball")
            .marker(Marker::new().color(BALL_COLOR))
            .opacity(config.opacity),
    );
    plot.add_trace(
        Scatter::new(strike_x, strike_z)
            .mode(Mode::Markers)
            .name("Strike")
            .marker(Marker::new().color(STRIKE_COLOR))
            .opacity(config.opacity),
    );

    let layout = Layout::new()
        .title(dataset.player_name.as_str())
        .x_axis(
            Axis::new()
                .title("plate_x (ft)")
                .range(vec![config.x_range.0, config.x_range.1]),
        )
        .y_axis(
            Axis::new()
                .title("plate_z (ft)")
                .range(vec![config.z_range.0, config.z_range.1]),
        );
    plot.set_layout(layout);

    plot
}
