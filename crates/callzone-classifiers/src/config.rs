use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CallzoneError, Result};

/// Kernel spread for the RBF classifier.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum Gamma {
    /// Derived from the training data: `1 / (n_features * var(X))`.
    Scale(ScaleTag),
    Value(f64),
}

/// Serialized form of `Gamma::Scale`, the literal string `"scale"`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScaleTag {
    Scale,
}

impl Gamma {
    pub const SCALE: Gamma = Gamma::Scale(ScaleTag::Scale);
}

impl fmt::Display for Gamma {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Gamma::Scale(_) => write!(f, "scale"),
            Gamma::Value(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for Gamma {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scale" => Ok(Gamma::SCALE),
            other => match other.parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => Ok(Gamma::Value(v)),
                _ => Err(format!(
                    "Invalid gamma: {}. Expected 'scale' or a positive number",
                    s
                )),
            },
        }
    }
}

/// Hyper-parameters of one RBF support-vector fit.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SvmConfig {
    pub gamma: Gamma,
    pub c: f64,
    /// Solver stopping tolerance.
    pub eps: f64,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            gamma: Gamma::SCALE,
            c: 1.0,
            eps: 1e-3,
        }
    }
}

impl SvmConfig {
    pub fn new(gamma: Gamma, c: f64) -> Self {
        Self {
            gamma,
            c,
            ..Self::default()
        }
    }

    /// Fixed parameters large enough to memorise the training split.
    pub fn overfit() -> Self {
        Self::new(Gamma::Value(100.0), 100.0)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SplitConfig {
    pub seed: u64,
    pub validation_fraction: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            validation_fraction: 0.25,
        }
    }
}

/// Inclusive integer ranges walked by the grid search, gamma outermost.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub gamma: (u32, u32),
    pub c: (u32, u32),
    pub eps: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            gamma: (1, 9),
            c: (1, 9),
            eps: 1e-3,
        }
    }
}

impl GridConfig {
    pub fn n_trials(&self) -> usize {
        let span = |(lo, hi): (u32, u32)| if hi < lo { 0 } else { (hi - lo + 1) as usize };
        span(self.gamma) * span(self.c)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL holding the Chadwick register `people-*.csv` shards.
    pub register_url: String,
    /// Local register CSV used instead of downloading the shards.
    pub register_csv: Option<PathBuf>,
    pub statcast_url: String,
    /// Local Savant CSV export used instead of querying the provider.
    pub pitch_csv: Option<PathBuf>,
    pub timeout_secs: u64,
    /// Split the date range into windows of at most this many days.
    pub window_days: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            register_url: "https://raw.githubusercontent.com/chadwickbureau/register/master/data"
                .to_string(),
            register_csv: None,
            statcast_url: "https://baseballsavant.mlb.com/statcast_search/csv".to_string(),
            pitch_csv: None,
            timeout_secs: 60,
            window_days: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    pub enabled: bool,
    /// Write `<player>.html` files here instead of opening a browser.
    pub output_dir: Option<PathBuf>,
    pub x_range: (f64, f64),
    pub z_range: (f64, f64),
    pub opacity: f64,
    /// Overlay the best grid model's strike region at this strike count.
    pub decision_region: Option<u8>,
    pub decision_resolution: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: None,
            x_range: (-3.0, 3.0),
            z_range: (-2.0, 6.0),
            opacity: 0.25,
            decision_region: None,
            decision_resolution: 60,
        }
    }
}

/// Everything one pipeline run needs besides the player names.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub split: SplitConfig,
    pub baseline: SvmConfig,
    pub overfit: SvmConfig,
    pub grid: GridConfig,
    pub provider: ProviderConfig,
    pub plot: PlotConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2008, 4, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2017, 7, 15).unwrap_or_default(),
            split: SplitConfig::default(),
            baseline: SvmConfig::default(),
            overfit: SvmConfig::overfit(),
            grid: GridConfig::default(),
            provider: ProviderConfig::default(),
            plot: PlotConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(CallzoneError::Config(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        let frac = self.split.validation_fraction;
        if !(frac > 0.0 && frac < 1.0) {
            return Err(CallzoneError::Config(format!(
                "validation_fraction must be in (0, 1), got {}",
                frac
            )));
        }
        for svm in [&self.baseline, &self.overfit] {
            if !(svm.c > 0.0) {
                return Err(CallzoneError::Config(format!("C must be positive, got {}", svm.c)));
            }
        }
        if self.grid.gamma.0 == 0 || self.grid.c.0 == 0 || self.grid.n_trials() == 0 {
            return Err(CallzoneError::Config(format!(
                "grid ranges must be non-empty and start at 1 or above, got gamma {:?} and C {:?}",
                self.grid.gamma, self.grid.c
            )));
        }
        Ok(())
    }
}

/// Load a pipeline configuration from a JSON file. Missing keys keep their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(&path)?;
    let config: PipelineConfig = serde_json::from_str(&content).map_err(|e| {
        CallzoneError::Config(format!("{}: {}", path.as_ref().display(), e))
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_parses_scale_and_numbers() {
        assert_eq!("scale".parse::<Gamma>().unwrap(), Gamma::SCALE);
        assert_eq!(" Scale ".parse::<Gamma>().unwrap(), Gamma::SCALE);
        assert_eq!("2.5".parse::<Gamma>().unwrap(), Gamma::Value(2.5));
        assert!("-1".parse::<Gamma>().is_err());
        assert!("auto".parse::<Gamma>().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"baseline": {"gamma": 3.0}, "split": {"seed": 7}}"#).unwrap();
        assert_eq!(config.baseline.gamma, Gamma::Value(3.0));
        assert_eq!(config.baseline.c, 1.0);
        assert_eq!(config.split.seed, 7);
        assert_eq!(config.split.validation_fraction, 0.25);
        assert_eq!(config.overfit, SvmConfig::overfit());
        assert_eq!(config.grid.n_trials(), 81);
    }

    #[test]
    fn scale_gamma_round_trips_as_string() {
        let json = serde_json::to_string(&SvmConfig::default()).unwrap();
        assert!(json.contains(r#""gamma":"scale""#), "{}", json);
        let back: SvmConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.gamma, Gamma::SCALE);
    }

    #[test]
    fn validate_rejects_inverted_dates() {
        let mut config = PipelineConfig::default();
        config.end_date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert!(matches!(config.validate(), Err(CallzoneError::Config(_))));
    }
}
