//! Touchstone file I/O module
//!
//! Provides reading of two-port measurement (.s2p) files.

pub mod parser;

pub use parser::{MeasurementTable, TouchstoneError};
