//! Unit conversion functions
//!
//! Provides the dB/linear conversions used by the reflection correction.
//! Magnitudes in measurement files are stored in dB; only the mismatch
//! term needs them back on a linear scale.

/// Convert dB to magnitude (10^(dB/20))
pub fn db_2_magnitude(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert magnitude to dB (20*log10(mag))
pub fn magnitude_2_db(mag: f64) -> f64 {
    20.0 * mag.log10()
}

/// Convert magnitude to dB10 (10*log10(mag))
pub fn mag_2_db10(mag: f64) -> f64 {
    10.0 * mag.log10()
}

/// Mismatch correction in dB for a two-port path whose ports see the
/// reflection magnitudes `gamma_in` and `gamma_out`:
///
/// 10*log10((1 - gamma_in^2) * (1 - gamma_out^2))
///
/// Both magnitudes must be below unity; at or above it the logarithm
/// argument is non-positive and the caller has to reject the measurement.
pub fn mismatch_correction_db(gamma_in: f64, gamma_out: f64) -> f64 {
    mag_2_db10((1.0 - gamma_in * gamma_in) * (1.0 - gamma_out * gamma_out))
}
