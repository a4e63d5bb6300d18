//! Statcast pitch retrieval from Baseball Savant or a local CSV export.
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use csv::StringRecord;
use reqwest::blocking::Client;

use crate::data_handling::PitchEvent;
use crate::error::{CallzoneError, Result};
use crate::io::http::get_text;

/// Source of pitch events for one batter over an inclusive date range.
pub trait PitchSource {
    fn fetch(&self, player_id: u32, start: NaiveDate, end: NaiveDate) -> Result<Vec<PitchEvent>>;
}

/// Baseball Savant `statcast_search/csv` client for batter searches.
pub struct SavantClient {
    client: Client,
    base_url: String,
    window_days: Option<u32>,
}

impl SavantClient {
    pub fn new(client: Client, base_url: impl Into<String>, window_days: Option<u32>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            window_days,
        }
    }

    fn query(player_id: u32, start: NaiveDate, end: NaiveDate) -> Vec<(&'static str, String)> {
        vec![
            ("all", "true".to_string()),
            ("player_type", "batter".to_string()),
            // regular season, postseason and spring training
            ("hfGT", "R|PO|S|".to_string()),
            ("game_date_gt", start.format("%Y-%m-%d").to_string()),
            ("game_date_lt", end.format("%Y-%m-%d").to_string()),
            ("batters_lookup[]", player_id.to_string()),
            ("min_pitches", "0".to_string()),
            ("min_results", "0".to_string()),
            ("min_abs", "0".to_string()),
            ("group_by", "name".to_string()),
            ("sort_col", "pitches".to_string()),
            ("player_event_sort", "h_launch_speed".to_string()),
            ("sort_order", "desc".to_string()),
            ("type", "details".to_string()),
        ]
    }
}

impl PitchSource for SavantClient {
    fn fetch(&self, player_id: u32, start: NaiveDate, end: NaiveDate) -> Result<Vec<PitchEvent>> {
        let windows = date_windows(start, end, self.window_days);
        let mut events = Vec::new();
        for (window_start, window_end) in windows {
            log::info!(
                "Fetching Statcast pitches for batter {} from {} to {}",
                player_id,
                window_start,
                window_end
            );
            let body = get_text(
                &self.client,
                &self.base_url,
                &Self::query(player_id, window_start, window_end),
            )?;
            let chunk = parse_statcast_csv(body.as_bytes())?;
            log::debug!("Received {} pitches", chunk.len());
            events.extend(chunk);
        }
        Ok(events)
    }
}

/// Reads a Savant CSV export from disk, keeping rows for the requested batter and dates.
///
/// Rows without a `batter` or `game_date` value are kept.
pub struct CsvPitchSource {
    path: PathBuf,
}

impl CsvPitchSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PitchSource for CsvPitchSource {
    fn fetch(&self, player_id: u32, start: NaiveDate, end: NaiveDate) -> Result<Vec<PitchEvent>> {
        let file = std::fs::File::open(&self.path)?;
        let events = parse_statcast_csv(std::io::BufReader::new(file))?;
        let total = events.len();
        let kept: Vec<PitchEvent> = events
            .into_iter()
            .filter(|e| e.batter_id.map_or(true, |id| id == player_id))
            .filter(|e| e.game_date.map_or(true, |d| d >= start && d <= end))
            .collect();
        log::info!(
            "Read {} pitches from {} ({} for batter {} in range)",
            total,
            self.path.display(),
            kept.len(),
            player_id
        );
        Ok(kept)
    }
}

/// Consecutive inclusive windows covering `start..=end`, each at most `window_days` long.
///
/// `None` (or zero) yields the whole range as one window.
pub fn date_windows(start: NaiveDate, end: NaiveDate, window_days: Option<u32>) -> Vec<(NaiveDate, NaiveDate)> {
    if start > end {
        return Vec::new();
    }
    let days = match window_days {
        Some(days) if days > 0 => i64::from(days),
        _ => return vec![(start, end)],
    };

    let mut windows = Vec::new();
    let mut current = start;
    while current <= end {
        let window_end = (current + Duration::days(days - 1)).min(end);
        windows.push((current, window_end));
        current = window_end + Duration::days(1);
    }
    windows
}

/// Positions of the columns read from a Statcast CSV header.
struct Columns {
    plate_x: usize,
    plate_z: usize,
    strikes: usize,
    call_type: usize,
    player_name: Option<usize>,
    batter: Option<usize>,
    game_date: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim().trim_matches('"') == name)
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                CallzoneError::ProviderResponse(format!("missing '{}' column in Statcast CSV", name))
            })
        };
        Ok(Self {
            plate_x: require("plate_x")?,
            plate_z: require("plate_z")?,
            strikes: require("strikes")?,
            call_type: require("type")?,
            player_name: find("player_name"),
            batter: find("batter"),
            game_date: find("game_date"),
        })
    }
}

fn cell<'r>(record: &'r StringRecord, idx: usize) -> Option<&'r str> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|v| !v.is_empty() && !matches!(*v, "NA" | "NaN" | "nan" | "null" | "None"))
}

fn parse_f64(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.parse::<f64>().ok()).filter(|v| v.is_finite())
}

/// Counts may arrive as "1" or "1.0".
fn parse_count(value: Option<&str>) -> Option<u8> {
    parse_f64(value)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= f64::from(u8::MAX))
        .map(|v| v as u8)
}

/// Parse a Statcast "details" CSV into pitch events.
///
/// An empty body yields no events. A body without the location, count or
/// call columns is a malformed response.
pub fn parse_statcast_csv<R: Read>(reader: R) -> Result<Vec<PitchEvent>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Ok(Vec::new());
    }
    let columns = Columns::from_headers(&headers)?;

    let mut events = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            CallzoneError::ProviderResponse(format!("Statcast row {}: {}", row_idx + 1, e))
        })?;
        events.push(PitchEvent {
            player_name: columns
                .player_name
                .and_then(|i| cell(&record, i))
                .map(str::to_string),
            batter_id: columns
                .batter
                .and_then(|i| cell(&record, i))
                .and_then(|v| v.parse::<u32>().ok()),
            game_date: columns
                .game_date
                .and_then(|i| cell(&record, i))
                .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok()),
            plate_x: parse_f64(cell(&record, columns.plate_x)),
            plate_z: parse_f64(cell(&record, columns.plate_z)),
            strikes: parse_count(cell(&record, columns.strikes)),
            call_type: cell(&record, columns.call_type).map(str::to_string),
        });
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_window_without_limit() {
        let w = date_windows(date(2008, 4, 1), date(2017, 7, 15), None);
        assert_eq!(w, vec![(date(2008, 4, 1), date(2017, 7, 15))]);
    }

    #[test]
    fn windows_cover_range_without_overlap() {
        let w = date_windows(date(2017, 1, 1), date(2017, 1, 10), Some(4));
        assert_eq!(
            w,
            vec![
                (date(2017, 1, 1), date(2017, 1, 4)),
                (date(2017, 1, 5), date(2017, 1, 8)),
                (date(2017, 1, 9), date(2017, 1, 10)),
            ]
        );
        assert!(date_windows(date(2017, 1, 2), date(2017, 1, 1), Some(4)).is_empty());
    }

    #[test]
    fn parses_details_rows_with_bom_and_blanks() {
        let body = "\u{feff}pitch_type,game_date,player_name,batter,type,strikes,plate_x,plate_z\n\
                    FF,2017-06-01,\"Judge, Aaron\",592450,S,0,0.12,2.61\n\
                    SL,2017-06-01,\"Judge, Aaron\",592450,B,1.0,-1.5,NA\n\
                    CH,2017-06-02,\"Judge, Aaron\",592450,X,2,0.3,2.2\n";
        let events = parse_statcast_csv(body.as_bytes()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].player_name.as_deref(), Some("Judge, Aaron"));
        assert_eq!(events[0].batter_id, Some(592450));
        assert_eq!(events[0].game_date, Some(date(2017, 6, 1)));
        assert_eq!(events[0].plate_x, Some(0.12));
        assert_eq!(events[0].strikes, Some(0));
        assert_eq!(events[1].strikes, Some(1));
        assert_eq!(events[1].plate_z, None);
        assert_eq!(events[2].call_type.as_deref(), Some("X"));
    }

    #[test]
    fn empty_body_has_no_events() {
        assert!(parse_statcast_csv("".as_bytes()).unwrap().is_empty());
        assert!(parse_statcast_csv("type,strikes,plate_x,plate_z\n".as_bytes())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn html_error_page_is_malformed() {
        let err = parse_statcast_csv("<html><body>error</body></html>".as_bytes()).unwrap_err();
        assert!(matches!(err, CallzoneError::ProviderResponse(_)));
    }
}
