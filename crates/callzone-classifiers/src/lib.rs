//! callzone-classifiers: ball/strike call classification from pitch locations.
//!
//! This crate resolves a player through the Chadwick register, pulls their
//! Statcast pitches, fits RBF support vector classifiers on plate location
//! and strike count, grid-searches (gamma, C) on a fixed validation split,
//! and plots the pitches.
//!
//! The providers and the plot destination sit behind small traits so the
//! preprocessing, split, fitting and search can be driven with in-memory data.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod report;
pub mod search;
pub mod stats;

pub use error::{CallzoneError, Result};
