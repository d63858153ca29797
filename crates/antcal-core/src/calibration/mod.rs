//! Calibration module - antenna gain calibration methods

pub mod three_antenna;

pub use three_antenna::{GainResult, PairId, SolveError, solve};
