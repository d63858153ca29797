//! Three-antenna absolute gain calibration
//!
//! Solves for the individual gains of three antennas from the three
//! pairwise transmission measurements between them. Each transmission is
//! first corrected for the impedance mismatch seen at both ports, then the
//! three corrected pairwise sums close over the individual gains:
//!
//! S21(1-2) = G1 + G2
//! S21(1-3) = G1 + G3
//! S21(2-3) = G2 + G3

use std::fmt;

use thiserror::Error;

use crate::math::conversions::{db_2_magnitude, mismatch_correction_db};
use crate::math::interp::interp_at;
use crate::touchstone::MeasurementTable;

/// Identifies one of the three pairwise measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairId {
    /// Antenna 1 to antenna 2
    Ab,
    /// Antenna 1 to antenna 3
    Ac,
    /// Antenna 2 to antenna 3
    Bc,
}

impl PairId {
    /// Display label naming the two antennas
    pub fn label(&self) -> &'static str {
        match self {
            PairId::Ab => "1-2",
            PairId::Ac => "1-3",
            PairId::Bc => "2-3",
        }
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Gain solver failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// No usable target frequency was supplied (zero or negative)
    #[error("no target frequency supplied")]
    MissingFrequency,

    /// A reflection magnitude at or above unity makes the mismatch
    /// correction undefined for this pair
    #[error(
        "non-physical reflection on pair {pair}: {parameter} gives |gamma| = {gamma} at the target frequency"
    )]
    NonPhysicalReflection {
        pair: PairId,
        parameter: &'static str,
        gamma: f64,
    },
}

/// Result of one three-antenna solve at a single target frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct GainResult {
    /// Target frequency (MHz)
    pub frequency_mhz: f64,
    /// Mismatch-corrected transmission for pair 1-2 (dB)
    pub s21_ab_db: f64,
    /// Mismatch-corrected transmission for pair 1-3 (dB)
    pub s21_ac_db: f64,
    /// Mismatch-corrected transmission for pair 2-3 (dB)
    pub s21_bc_db: f64,
    /// Gain of antenna 1, the antenna under test (dBi)
    pub gain1_dbi: f64,
    /// Gain of antenna 2 (dBi)
    pub gain2_dbi: f64,
    /// Gain of antenna 3 (dBi)
    pub gain3_dbi: f64,
}

impl GainResult {
    /// Bar-chart-ready (label, value) pairs for the three gains
    pub fn bar_chart(&self) -> [(&'static str, f64); 3] {
        [
            ("Antenna 1", self.gain1_dbi),
            ("Antenna 2", self.gain2_dbi),
            ("Antenna 3", self.gain3_dbi),
        ]
    }
}

/// Solve for the three individual antenna gains at `target_mhz`.
///
/// Each table is interpolated at the target frequency (piecewise-linear,
/// clamped to the sweep edges), the transmission is corrected for the
/// reflections seen at both ports, and the gains follow in closed form:
///
/// G1 = (AB + AC - BC) / 2
/// G2 = (AB + BC - AC) / 2
/// G3 = (AC + BC - AB) / 2
///
/// The solve is a pure function of its arguments; nothing is retained
/// between calls.
pub fn solve(
    ab: &MeasurementTable,
    ac: &MeasurementTable,
    bc: &MeasurementTable,
    target_mhz: f64,
) -> Result<GainResult, SolveError> {
    if target_mhz <= 0.0 {
        return Err(SolveError::MissingFrequency);
    }

    let s21_ab = corrected_s21(ab, PairId::Ab, target_mhz)?;
    let s21_ac = corrected_s21(ac, PairId::Ac, target_mhz)?;
    let s21_bc = corrected_s21(bc, PairId::Bc, target_mhz)?;

    tracing::debug!(
        "corrected transmissions at {} MHz: 1-2 = {:.3} dB, 1-3 = {:.3} dB, 2-3 = {:.3} dB",
        target_mhz,
        s21_ab,
        s21_ac,
        s21_bc
    );

    Ok(GainResult {
        frequency_mhz: target_mhz,
        s21_ab_db: s21_ab,
        s21_ac_db: s21_ac,
        s21_bc_db: s21_bc,
        gain1_dbi: (s21_ab + s21_ac - s21_bc) / 2.0,
        gain2_dbi: (s21_ab + s21_bc - s21_ac) / 2.0,
        gain3_dbi: (s21_ac + s21_bc - s21_ab) / 2.0,
    })
}

/// Interpolate one pair's S-parameters at the target frequency and apply
/// the mismatch correction to its transmission.
fn corrected_s21(
    table: &MeasurementTable,
    pair: PairId,
    target_mhz: f64,
) -> Result<f64, SolveError> {
    let freq = table.freq_mhz();
    let s21_db = interp_at(freq, table.s21_db(), target_mhz);
    let s11_db = interp_at(freq, table.s11_db(), target_mhz);
    let s22_db = interp_at(freq, table.s22_db(), target_mhz);

    let gamma_in = db_2_magnitude(s11_db);
    let gamma_out = db_2_magnitude(s22_db);

    if gamma_in >= 1.0 {
        return Err(SolveError::NonPhysicalReflection {
            pair,
            parameter: "S11",
            gamma: gamma_in,
        });
    }
    if gamma_out >= 1.0 {
        return Err(SolveError::NonPhysicalReflection {
            pair,
            parameter: "S22",
            gamma: gamma_out,
        });
    }

    Ok(s21_db + mismatch_correction_db(gamma_in, gamma_out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NEG_INF: f64 = f64::NEG_INFINITY;

    /// Flat two-row table with the given S21 level and perfectly matched
    /// ports, spanning 1 to 1000 MHz
    fn matched_table(s21_db: f64) -> MeasurementTable {
        MeasurementTable::from_rows(&[
            [1.0, NEG_INF, 0.0, s21_db, 0.0, s21_db, 0.0, NEG_INF, 0.0],
            [1000.0, NEG_INF, 0.0, s21_db, 0.0, s21_db, 0.0, NEG_INF, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_solve_closed_form() {
        let ab = matched_table(-40.0);
        let ac = matched_table(-42.0);
        let bc = matched_table(-44.0);

        let result = solve(&ab, &ac, &bc, 500.0).unwrap();
        assert_relative_eq!(result.s21_ab_db, -40.0, epsilon = 1e-12);
        assert_relative_eq!(result.s21_ac_db, -42.0, epsilon = 1e-12);
        assert_relative_eq!(result.s21_bc_db, -44.0, epsilon = 1e-12);
        assert_relative_eq!(result.gain1_dbi, -19.0, epsilon = 1e-12);
        assert_relative_eq!(result.gain2_dbi, -21.0, epsilon = 1e-12);
        assert_relative_eq!(result.gain3_dbi, -23.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_rejects_missing_frequency() {
        let t = matched_table(-40.0);
        assert_eq!(solve(&t, &t, &t, 0.0), Err(SolveError::MissingFrequency));
        assert_eq!(solve(&t, &t, &t, -5.0), Err(SolveError::MissingFrequency));
    }

    #[test]
    fn test_solve_rejects_unity_reflection() {
        let bad = MeasurementTable::from_rows(&[
            [1.0, 0.0, 0.0, -40.0, 0.0, -40.0, 0.0, NEG_INF, 0.0],
            [1000.0, 0.0, 0.0, -40.0, 0.0, -40.0, 0.0, NEG_INF, 0.0],
        ])
        .unwrap();
        let good = matched_table(-40.0);

        let err = solve(&good, &bad, &good, 500.0).unwrap_err();
        assert_eq!(
            err,
            SolveError::NonPhysicalReflection {
                pair: PairId::Ac,
                parameter: "S11",
                gamma: 1.0,
            }
        );
    }

    #[test]
    fn test_solve_rejects_positive_output_reflection() {
        let bad = MeasurementTable::from_rows(&[
            [1.0, NEG_INF, 0.0, -40.0, 0.0, -40.0, 0.0, 2.0, 0.0],
            [1000.0, NEG_INF, 0.0, -40.0, 0.0, -40.0, 0.0, 2.0, 0.0],
        ])
        .unwrap();
        let good = matched_table(-40.0);

        let err = solve(&good, &good, &bad, 500.0).unwrap_err();
        match err {
            SolveError::NonPhysicalReflection {
                pair,
                parameter,
                gamma,
            } => {
                assert_eq!(pair, PairId::Bc);
                assert_eq!(parameter, "S22");
                assert!(gamma > 1.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mismatch_correction_applied() {
        // gamma = 0.5 on both ports of every pair shifts each corrected
        // transmission by 20*log10(0.75)
        let s11_db = 20.0 * 0.5_f64.log10();
        let rows = [
            [1.0, s11_db, 0.0, -40.0, 0.0, -40.0, 0.0, s11_db, 0.0],
            [1000.0, s11_db, 0.0, -40.0, 0.0, -40.0, 0.0, s11_db, 0.0],
        ];
        let t = MeasurementTable::from_rows(&rows).unwrap();

        let result = solve(&t, &t, &t, 500.0).unwrap();
        let expected = -40.0 + 20.0 * 0.75_f64.log10();
        assert_relative_eq!(result.s21_ab_db, expected, epsilon = 1e-12);
        // Identical pairs mean identical gains, each half a corrected sum
        assert_relative_eq!(result.gain1_dbi, expected / 2.0, epsilon = 1e-12);
        assert_relative_eq!(result.gain2_dbi, expected / 2.0, epsilon = 1e-12);
        assert_relative_eq!(result.gain3_dbi, expected / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pairwise_sums_recover_corrected_transmissions() {
        let ab = matched_table(-31.2);
        let ac = matched_table(-33.8);
        let bc = matched_table(-30.4);

        let result = solve(&ab, &ac, &bc, 433.0).unwrap();
        assert_relative_eq!(
            result.gain1_dbi + result.gain2_dbi,
            result.s21_ab_db,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            result.gain1_dbi + result.gain3_dbi,
            result.s21_ac_db,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            result.gain2_dbi + result.gain3_dbi,
            result.s21_bc_db,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_bar_chart_labels() {
        let ab = matched_table(-40.0);
        let result = solve(&ab, &ab, &ab, 500.0).unwrap();
        let chart = result.bar_chart();
        assert_eq!(chart[0].0, "Antenna 1");
        assert_eq!(chart[1].0, "Antenna 2");
        assert_eq!(chart[2].0, "Antenna 3");
        assert_relative_eq!(chart[0].1, -20.0, epsilon = 1e-12);
    }
}
