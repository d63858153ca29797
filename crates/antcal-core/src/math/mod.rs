//! Mathematical functions module
//!
//! Provides the dB conversions and the clamped linear interpolation used
//! by the gain solver.

pub mod conversions;
pub mod interp;

pub use conversions::*;
pub use interp::interp_at;
