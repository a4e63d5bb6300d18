use std::error::Error;
use std::fmt;

use chrono::NaiveDate;

pub type Result<T> = std::result::Result<T, CallzoneError>;

/// Fatal conditions raised while running the ball/strike pipeline.
#[derive(Debug)]
pub enum CallzoneError {
    /// The name could not be split into a first and last name.
    InvalidPlayerName(String),
    /// No register row carries an MLBAM id for this name.
    PlayerNotFound { first: String, last: String },
    /// The provider answered but returned no pitches for the range.
    NoDataInRange {
        player_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Transport failure or non-success status from an external provider.
    ProviderUnreachable { url: String, reason: String },
    /// The provider body could not be parsed.
    ProviderResponse(String),
    /// Not enough rows left to build both a training and a validation set.
    InsufficientData { rows: usize },
    /// The training labels contain a single class (true = strike).
    SingleClass(bool),
    NotFitted,
    ShapeMismatch { expected: usize, found: usize },
    /// The SVM solver rejected its parameters or failed to converge.
    Fit(String),
    Io(std::io::Error),
    Config(String),
}

impl fmt::Display for CallzoneError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CallzoneError::InvalidPlayerName(name) => {
                write!(f, "Player name '{}' must look like 'First Last'", name)
            }
            CallzoneError::PlayerNotFound { first, last } => {
                write!(f, "No player named '{} {}' found in the register", first, last)
            }
            CallzoneError::NoDataInRange { player_id, start, end } => write!(
                f,
                "No pitches for player {} between {} and {}",
                player_id, start, end
            ),
            CallzoneError::ProviderUnreachable { url, reason } => {
                write!(f, "Provider unreachable ({}): {}", url, reason)
            }
            CallzoneError::ProviderResponse(msg) => write!(f, "Malformed provider response: {}", msg),
            CallzoneError::InsufficientData { rows } => write!(
                f,
                "Need at least 2 labelled pitches to split into training and validation sets, found {}",
                rows
            ),
            CallzoneError::SingleClass(strike) => write!(
                f,
                "Training set contains only {} calls; a classifier needs both balls and strikes",
                if *strike { "strike" } else { "ball" }
            ),
            CallzoneError::NotFitted => write!(f, "Classifier used before it was fitted"),
            CallzoneError::ShapeMismatch { expected, found } => write!(
                f,
                "Expected {} feature columns, found {}",
                expected, found
            ),
            CallzoneError::Fit(msg) => write!(f, "SVM fit failed: {}", msg),
            CallzoneError::Io(e) => write!(f, "I/O error: {}", e),
            CallzoneError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl Error for CallzoneError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CallzoneError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CallzoneError {
    fn from(e: std::io::Error) -> Self {
        CallzoneError::Io(e)
    }
}

impl From<csv::Error> for CallzoneError {
    fn from(e: csv::Error) -> Self {
        CallzoneError::ProviderResponse(e.to_string())
    }
}

impl From<serde_json::Error> for CallzoneError {
    fn from(e: serde_json::Error) -> Self {
        CallzoneError::Config(e.to_string())
    }
}

impl From<linfa_svm::SvmError> for CallzoneError {
    fn from(e: linfa_svm::SvmError) -> Self {
        CallzoneError::Fit(e.to_string())
    }
}
