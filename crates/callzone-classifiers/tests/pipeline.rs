//! End-to-end runs of the player pipeline against in-memory collaborators.

use std::cell::RefCell;
use std::rc::Rc;

use callzone_classifiers::config::{GridConfig, PipelineConfig};
use callzone_classifiers::data_handling::PitchEvent;
use callzone_classifiers::io::{ChadwickRegister, PitchSource, PlayerRecord};
use callzone_classifiers::pipeline::{evaluate, Pipeline};
use callzone_classifiers::preprocessing::build_dataset;
use callzone_classifiers::report::sink::{NullSink, PlotSink};
use callzone_classifiers::{CallzoneError, Result};
use chrono::NaiveDate;
use plotly::Plot;

const JUDGE_ID: u32 = 592450;

fn register() -> ChadwickRegister {
    ChadwickRegister::new(vec![PlayerRecord {
        name_first: "Aaron".to_string(),
        name_last: "Judge".to_string(),
        key_mlbam: Some(JUDGE_ID),
        key_retro: Some("judga001".to_string()),
        key_bbref: Some("judgeaa01".to_string()),
        key_fangraphs: Some(15640),
        mlb_played_first: Some(2016),
        mlb_played_last: Some(2024),
    }])
}

/// 100 labelled pitches on a lattice plus a few balls in play, which get dropped.
fn synthetic_events() -> Vec<PitchEvent> {
    let mut events = Vec::new();
    for r in 0..100 {
        let px = -2.0 + (r % 10) as f64 * 0.45;
        let pz = 0.5 + (r / 10) as f64 * 0.45;
        let strike = px.abs() <= 0.83 && (1.5..=3.5).contains(&pz);
        events.push(PitchEvent {
            player_name: Some("Judge, Aaron".to_string()),
            batter_id: Some(JUDGE_ID),
            game_date: NaiveDate::from_ymd_opt(2017, 5, 1 + (r % 28) as u32),
            plate_x: Some(px),
            plate_z: Some(pz),
            strikes: Some((r % 3) as u8),
            call_type: Some(if strike { "S" } else { "B" }.to_string()),
        });
    }
    for _ in 0..5 {
        events.push(PitchEvent {
            player_name: Some("Judge, Aaron".to_string()),
            plate_x: Some(0.0),
            plate_z: Some(2.5),
            strikes: Some(1),
            call_type: Some("X".to_string()),
            ..PitchEvent::default()
        });
    }
    events
}

struct FixedSource(Vec<PitchEvent>);

impl PitchSource for FixedSource {
    fn fetch(&self, player_id: u32, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<PitchEvent>> {
        Ok(self
            .0
            .iter()
            .filter(|e| e.batter_id.map_or(true, |id| id == player_id))
            .cloned()
            .collect())
    }
}

/// Keeps the player name and figure JSON of every emitted plot.
#[derive(Default, Clone)]
struct RecordingSink(Rc<RefCell<Vec<(String, String)>>>);

impl RecordingSink {
    fn names(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(name, _)| name.clone()).collect()
    }
}

impl PlotSink for RecordingSink {
    fn emit(&mut self, player_name: &str, plot: Plot) -> Result<()> {
        self.0
            .borrow_mut()
            .push((player_name.to_string(), plot.to_json()));
        Ok(())
    }
}

fn small_grid_config() -> PipelineConfig {
    PipelineConfig {
        grid: GridConfig {
            gamma: (1, 3),
            c: (1, 3),
            ..GridConfig::default()
        },
        ..PipelineConfig::default()
    }
}

#[test]
fn run_player_reports_all_three_fits() {
    let sink = RecordingSink::default();
    let mut pipeline = Pipeline::new(
        Box::new(register()),
        Box::new(FixedSource(synthetic_events())),
        Box::new(sink.clone()),
        small_grid_config(),
    );

    let report = pipeline.run_player("Aaron Judge").unwrap();
    assert_eq!(report.player_id, JUDGE_ID);
    assert_eq!(report.player_name, "Judge, Aaron");
    assert_eq!(report.n_pitches, 100);
    assert_eq!(report.n_train, 75);
    assert_eq!(report.n_validation, 25);
    assert_eq!(report.grid.trials.len(), 9);
    for acc in [report.baseline_accuracy, report.overfit_accuracy, report.grid.best.score] {
        assert!((0.0..=1.0).contains(&acc));
    }
    assert_eq!(sink.names(), vec!["Judge, Aaron".to_string()]);
    let figures = sink.0.borrow();
    let json = &figures[0].1;
    assert!(json.contains("\"Strike\""));
    assert!(!json.contains("Predicted strike"));
}

#[test]
fn decision_region_overlay_reaches_the_sink() {
    let sink = RecordingSink::default();
    let mut config = small_grid_config();
    config.plot.decision_region = Some(1);
    config.plot.decision_resolution = 15;
    let mut pipeline = Pipeline::new(
        Box::new(register()),
        Box::new(FixedSource(synthetic_events())),
        Box::new(sink.clone()),
        config,
    );

    let report = pipeline.run_player("Aaron Judge").unwrap();
    assert!(report.grid.best.params().is_some());

    let figures = sink.0.borrow();
    assert_eq!(figures.len(), 1);
    let json = &figures[0].1;
    assert!(json.contains("Predicted strike (1 strikes)"), "{}", json);
    assert!(json.contains("\"Ball\""));
    assert!(json.contains("\"Strike\""));
}

#[test]
fn disabled_plots_never_reach_the_sink() {
    let sink = RecordingSink::default();
    let mut config = small_grid_config();
    config.plot.enabled = false;
    config.plot.decision_region = Some(0);
    let mut pipeline = Pipeline::new(
        Box::new(register()),
        Box::new(FixedSource(synthetic_events())),
        Box::new(sink.clone()),
        config,
    );
    pipeline.run_player("Aaron Judge").unwrap();
    assert!(sink.0.borrow().is_empty());
}

#[test]
fn rerunning_on_the_same_data_is_reproducible() {
    let dataset = build_dataset(&synthetic_events(), "Aaron Judge").unwrap();
    let config = small_grid_config();

    let first = evaluate(&dataset, &config).unwrap();
    let second = evaluate(&dataset, &config).unwrap();

    assert_eq!(first.split, second.split);
    assert_eq!(first.baseline_accuracy, second.baseline_accuracy);
    assert_eq!(first.overfit_accuracy, second.overfit_accuracy);
    assert_eq!(first.grid.best, second.grid.best);
}

#[test]
fn unknown_player_is_reported_by_name() {
    let mut pipeline = Pipeline::new(
        Box::new(register()),
        Box::new(FixedSource(synthetic_events())),
        Box::new(NullSink),
        small_grid_config(),
    );
    match pipeline.run_player("Jose Altuve") {
        Err(CallzoneError::PlayerNotFound { first, last }) => {
            assert_eq!(first, "Jose");
            assert_eq!(last, "Altuve");
        }
        other => panic!("expected PlayerNotFound, got {:?}", other.map(|r| r.player_id)),
    }
}

#[test]
fn empty_provider_response_is_no_data_in_range() {
    let mut pipeline = Pipeline::new(
        Box::new(register()),
        Box::new(FixedSource(Vec::new())),
        Box::new(NullSink),
        small_grid_config(),
    );
    assert!(matches!(
        pipeline.run_player("Aaron Judge"),
        Err(CallzoneError::NoDataInRange { player_id: JUDGE_ID, .. })
    ));
}

#[test]
fn single_class_training_set_is_a_named_error() {
    let only_balls: Vec<PitchEvent> = synthetic_events()
        .into_iter()
        .map(|mut e| {
            if e.call_type.as_deref() == Some("S") {
                e.call_type = Some("B".to_string());
            }
            e
        })
        .collect();
    let mut pipeline = Pipeline::new(
        Box::new(register()),
        Box::new(FixedSource(only_balls)),
        Box::new(NullSink),
        small_grid_config(),
    );
    assert!(matches!(
        pipeline.run_player("Aaron Judge"),
        Err(CallzoneError::SingleClass(false))
    ));
}

#[test]
fn run_all_stops_at_the_first_failure() {
    let sink = RecordingSink::default();
    let mut pipeline = Pipeline::new(
        Box::new(register()),
        Box::new(FixedSource(synthetic_events())),
        Box::new(sink.clone()),
        small_grid_config(),
    );
    let result = pipeline.run_all(&["Aaron Judge", "Nobody Atall", "Aaron Judge"]);
    assert!(matches!(result, Err(CallzoneError::PlayerNotFound { .. })));
    assert_eq!(sink.names().len(), 1);
}
