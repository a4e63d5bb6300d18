//! Clients for the external providers: the Chadwick person register and
//! Baseball Savant's Statcast search.
pub mod http;
pub mod registry;
pub mod statcast;

pub use registry::{ChadwickRegister, PlayerRecord, PlayerRegistry};
pub use statcast::{CsvPitchSource, PitchSource, SavantClient};
