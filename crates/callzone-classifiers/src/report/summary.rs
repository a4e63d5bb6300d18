use std::path::Path;

use maud::{html, Markup, DOCTYPE};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::PlayerReport;

fn param_cell(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// HTML table with one row per player run.
pub fn render_summary(reports: &[PlayerReport], config: &PipelineConfig) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "callzone summary" }
            }
            body {
                h1 { "Ball/strike classification" }
                p {
                    "Pitches from " (config.start_date) " to " (config.end_date)
                    ", validation fraction " (config.split.validation_fraction)
                    ", seed " (config.split.seed) "."
                }
                table {
                    thead {
                        tr {
                            th { "Player" }
                            th { "MLBAM id" }
                            th { "Pitches" }
                            th { "Baseline accuracy" }
                            th { "Overfit accuracy" }
                            th { "Best accuracy" }
                            th { "Best gamma" }
                            th { "Best C" }
                        }
                    }
                    tbody {
                        @for report in reports {
                            tr {
                                td { (report.player_name) }
                                td { (report.player_id) }
                                td { (report.n_pitches) }
                                td { (format!("{:.4}", report.baseline_accuracy)) }
                                td { (format!("{:.4}", report.overfit_accuracy)) }
                                td { (format!("{:.4}", report.grid.best.score)) }
                                td { (param_cell(report.grid.best.gamma)) }
                                td { (param_cell(report.grid.best.c)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn write_summary<P: AsRef<Path>>(path: P, reports: &[PlayerReport], config: &PipelineConfig) -> Result<()> {
    std::fs::write(&path, render_summary(reports, config).into_string())?;
    log::info!("Summary report saved to {}", path.as_ref().display());
    Ok(())
}
