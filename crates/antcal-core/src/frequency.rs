//! Frequency module - units and unit normalization
//!
//! Measurement files declare a unit on their option line, but exports from
//! different instruments are inconsistent about honoring it. The pipeline
//! therefore infers the actual unit of the frequency column from its
//! magnitude and re-expresses the column in megahertz.

use ndarray::Array1;

use crate::constants::HZ_MEAN_THRESHOLD;

/// Frequency unit enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyUnit {
    Hz,
    KHz,
    #[default]
    MHz,
    GHz,
    THz,
}

impl FrequencyUnit {
    /// Get the multiplier to convert to Hz
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
            FrequencyUnit::THz => 1e12,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hz" => Some(FrequencyUnit::Hz),
            "khz" => Some(FrequencyUnit::KHz),
            "mhz" => Some(FrequencyUnit::MHz),
            "ghz" => Some(FrequencyUnit::GHz),
            "thz" => Some(FrequencyUnit::THz),
            _ => None,
        }
    }

    /// Short display label
    pub fn label(&self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
            FrequencyUnit::THz => "THz",
        }
    }
}

/// Infer the unit of a raw frequency column from its arithmetic mean.
///
/// A mean strictly above [`HZ_MEAN_THRESHOLD`] marks the column as hertz;
/// anything else is taken to already be megahertz. The option line's
/// declared unit does not participate in the decision.
pub fn heuristic_unit(mean_raw: f64) -> FrequencyUnit {
    if mean_raw > HZ_MEAN_THRESHOLD {
        FrequencyUnit::Hz
    } else {
        FrequencyUnit::MHz
    }
}

/// Re-express a raw frequency column in megahertz using the mean heuristic.
///
/// Columns detected as hertz are divided by 1e6; columns already in
/// megahertz are returned unchanged.
pub fn normalize_to_mhz(raw: &Array1<f64>) -> Array1<f64> {
    match heuristic_unit(raw.mean().unwrap_or(0.0)) {
        FrequencyUnit::Hz => raw / 1e6,
        _ => raw.clone(),
    }
}
