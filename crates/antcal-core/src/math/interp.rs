//! Piecewise-linear interpolation over a sampled column
//!
//! Lookup is linear between bracketing samples and clamps to the edge
//! values outside the sampled span, so a query never extrapolates.

use ndarray::Array1;

/// Interpolate `y` at position `xq` against ascending sample positions `x`.
///
/// Between samples the result is piecewise-linear; at or beyond either
/// edge the nearest edge value is returned unchanged. `x` and `y` must
/// have the same non-zero length, with `x` ascending in file order.
pub fn interp_at(x: &Array1<f64>, y: &Array1<f64>, xq: f64) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    debug_assert!(!x.is_empty());

    let n = x.len();
    if n == 1 || xq <= x[0] {
        return y[0];
    }
    if xq >= x[n - 1] {
        return y[n - 1];
    }

    // Find bracketing indices; the loop keeps x[lower] <= xq < x[upper],
    // so the interval below is never degenerate
    let mut lower = 0;
    let mut upper = n - 1;
    while upper - lower > 1 {
        let mid = (lower + upper) / 2;
        if x[mid] <= xq {
            lower = mid;
        } else {
            upper = mid;
        }
    }

    let frac = (xq - x[lower]) / (x[upper] - x[lower]);
    y[lower] * (1.0 - frac) + y[upper] * frac
}
