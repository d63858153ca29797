//! Request assembly and the solve lifecycle
//!
//! A solve request is one immutable value holding whatever inputs have
//! been supplied so far. Evaluating it yields an explicit lifecycle state,
//! so callers render "still waiting" and "failed" outcomes from the same
//! place they render results.

use crate::calibration::three_antenna::{GainResult, PairId, SolveError, solve};
use crate::touchstone::MeasurementTable;

/// One gain solve request: the three pairwise tables and the target
/// frequency.
///
/// A `target_mhz` of zero or below means "not yet provided". Tables stay
/// `None` until their measurement has been supplied and parsed; a file
/// without data rows also leaves its table `None`.
#[derive(Debug, Clone, Default)]
pub struct GainRequest {
    /// Antenna 1 to antenna 2 measurement
    pub ab: Option<MeasurementTable>,
    /// Antenna 1 to antenna 3 measurement
    pub ac: Option<MeasurementTable>,
    /// Antenna 2 to antenna 3 measurement
    pub bc: Option<MeasurementTable>,
    /// Target frequency (MHz)
    pub target_mhz: f64,
}

/// The lifecycle of one request, in the order a user walks through it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// One or more measurements are still missing
    AwaitingFiles { missing: Vec<PairId> },
    /// All measurements supplied, target frequency not yet provided
    AwaitingFrequency,
    /// Solve completed
    Ready(GainResult),
    /// Solve failed; terminal until the inputs change
    Failed(SolveError),
}

impl GainRequest {
    /// Evaluate the request into its current state.
    ///
    /// Missing measurements take precedence over a missing frequency, and
    /// only a fully supplied request reaches the solver. Evaluation is
    /// pure: the same request always yields the same state, and nothing
    /// carries over between calls.
    pub fn evaluate(&self) -> SessionState {
        if let (Some(ab), Some(ac), Some(bc)) = (&self.ab, &self.ac, &self.bc) {
            if self.target_mhz <= 0.0 {
                return SessionState::AwaitingFrequency;
            }
            match solve(ab, ac, bc, self.target_mhz) {
                Ok(result) => SessionState::Ready(result),
                Err(err) => SessionState::Failed(err),
            }
        } else {
            let mut missing = Vec::new();
            if self.ab.is_none() {
                missing.push(PairId::Ab);
            }
            if self.ac.is_none() {
                missing.push(PairId::Ac);
            }
            if self.bc.is_none() {
                missing.push(PairId::Bc);
            }
            SessionState::AwaitingFiles { missing }
        }
    }
}
