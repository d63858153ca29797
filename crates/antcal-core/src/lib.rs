//! antcal-core: Three-antenna absolute gain calibration
//!
//! Computes absolute antenna gains from the three pairwise two-port
//! S-parameter measurements the three-antenna method requires.
//!
//! ## Modules
//!
//! - `frequency` - Frequency units and unit normalization
//! - `math` - dB conversions and clamped linear interpolation
//! - `touchstone` - Two-port measurement (.s2p) file reading
//! - `calibration` - The three-antenna gain solve
//! - `session` - Request assembly and the solve lifecycle

pub mod calibration;
pub mod constants;
pub mod frequency;
pub mod math;
pub mod session;
pub mod touchstone;

pub use calibration::three_antenna::{GainResult, PairId, SolveError, solve};
pub use session::{GainRequest, SessionState};
pub use touchstone::{MeasurementTable, TouchstoneError};
