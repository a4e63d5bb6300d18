//! Player-name resolution against the Chadwick Bureau person register.
use std::io::Read;
use std::path::Path;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{CallzoneError, Result};
use crate::io::http::get_text;

/// Hex suffixes of the register's `people-<x>.csv` shards.
const REGISTER_SHARDS: &str = "0123456789abcdef";

/// One person row of the register. Only the columns used here are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerRecord {
    pub name_first: String,
    pub name_last: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub key_mlbam: Option<u32>,
    #[serde(default)]
    pub key_retro: Option<String>,
    #[serde(default)]
    pub key_bbref: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub key_fangraphs: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub mlb_played_first: Option<u16>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub mlb_played_last: Option<u16>,
}

impl PlayerRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name_first, self.name_last)
    }

    fn matches(&self, first: &str, last: &str) -> bool {
        self.name_first.trim().to_lowercase() == first && self.name_last.trim().to_lowercase() == last
    }
}

/// Split "First Last" into its first token and the rest.
pub fn split_full_name(full_name: &str) -> Result<(String, String)> {
    let mut tokens = full_name.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(first), Some(_)) => {
            let last = full_name
                .split_whitespace()
                .skip(1)
                .collect::<Vec<_>>()
                .join(" ");
            Ok((first.to_string(), last))
        }
        _ => Err(CallzoneError::InvalidPlayerName(full_name.to_string())),
    }
}

/// Lookup of player identities by name.
pub trait PlayerRegistry {
    /// All rows whose first and last names match, case-insensitively, in register order.
    fn lookup(&self, first: &str, last: &str) -> Vec<PlayerRecord>;

    /// Resolve a "First Last" name to the first matching row that carries an MLBAM id.
    fn resolve(&self, full_name: &str) -> Result<PlayerRecord> {
        let (first, last) = split_full_name(full_name)?;
        let candidates: Vec<PlayerRecord> = self
            .lookup(&first, &last)
            .into_iter()
            .filter(|r| r.key_mlbam.is_some())
            .collect();

        if candidates.len() > 1 {
            log::warn!(
                "{} register rows match '{}'; using the first (MLBAM id {:?})",
                candidates.len(),
                full_name,
                candidates[0].key_mlbam
            );
        }

        candidates
            .into_iter()
            .next()
            .ok_or(CallzoneError::PlayerNotFound { first, last })
    }
}

/// In-memory copy of the register.
#[derive(Debug, Clone, Default)]
pub struct ChadwickRegister {
    records: Vec<PlayerRecord>,
}

impl ChadwickRegister {
    pub fn new(records: Vec<PlayerRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::new(parse_register_csv(reader)?))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(&path)?;
        let register = Self::from_reader(std::io::BufReader::new(file))?;
        log::info!(
            "Loaded {} register rows from {}",
            register.len(),
            path.as_ref().display()
        );
        Ok(register)
    }

    /// Download every `people-<x>.csv` shard below `base_url`.
    pub fn download(client: &Client, base_url: &str) -> Result<Self> {
        let mut records = Vec::new();
        for shard in REGISTER_SHARDS.chars() {
            let url = format!("{}/people-{}.csv", base_url.trim_end_matches('/'), shard);
            log::debug!("Downloading register shard {}", url);
            let body = get_text(client, &url, &[])?;
            records.extend(parse_register_csv(body.as_bytes())?);
        }
        log::info!("Downloaded {} register rows", records.len());
        Ok(Self::new(records))
    }
}

impl PlayerRegistry for ChadwickRegister {
    fn lookup(&self, first: &str, last: &str) -> Vec<PlayerRecord> {
        let first = first.trim().to_lowercase();
        let last = last.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.matches(&first, &last))
            .cloned()
            .collect()
    }
}

/// Parse register CSV rows. Unknown columns are ignored.
pub fn parse_register_csv<R: Read>(reader: R) -> Result<Vec<PlayerRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row_idx, result) in reader.deserialize::<PlayerRecord>().enumerate() {
        let record = result.map_err(|e| {
            CallzoneError::ProviderResponse(format!("register row {}: {}", row_idx + 1, e))
        })?;
        records.push(record);
    }
    Ok(records)
}
