//! Numerical constants for the gain pipeline
//!
//! Provides the fixed thresholds and file-layout facts shared by the
//! measurement reader and the gain solver.

/// Mean raw-frequency threshold used to detect a hertz-valued column.
/// A column whose arithmetic mean is strictly greater than this value is
/// rescaled to megahertz; a mean of exactly this value is left as-is.
pub const HZ_MEAN_THRESHOLD: f64 = 1e6;

/// Number of whitespace-separated numeric fields in a two-port data row:
/// frequency followed by magnitude/angle pairs for S11, S21, S12 and S22.
pub const S2P_FIELDS_PER_ROW: usize = 9;
