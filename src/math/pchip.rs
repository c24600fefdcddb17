//! Shape-preserving piecewise cubic Hermite interpolation (PCHIP).
//!
//! Knot slopes follow Fritsch–Butland:
//!
//! - interior slope is `0` where the adjacent secants `δ_{k-1}`, `δ_k` differ in
//!   sign or either is zero (the knot is a local extremum or sits on a flat run)
//! - otherwise it is the weighted harmonic mean
//!   `(w1 + w2) / (w1 / δ_{k-1} + w2 / δ_k)` with `w1 = 2h_k + h_{k-1}`,
//!   `w2 = h_k + 2h_{k-1}`
//! - end slopes use a one-sided three-point estimate, clipped so it never has
//!   the wrong sign and never exceeds `3δ` where the data changes direction
//!
//! With those slopes each cubic segment stays within the range of its two end
//! knots whenever the data is monotone on that segment, so no overshoot is
//! introduced between knots.

use crate::error::CurveError;

use super::{find_segment, validate_knots};

#[derive(Debug, Clone)]
pub struct PchipInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
}

impl PchipInterpolator {
    /// Build from strictly increasing `xs` and matching `ys` (at least 2 knots).
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, CurveError> {
        validate_knots(xs, ys)?;
        let slopes = pchip_slopes(xs, ys);
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            slopes,
        })
    }

    /// Interpolated value at `x`, or `None` outside the knot range.
    pub fn interpolate(&self, x: f64) -> Option<f64> {
        let n = self.xs.len();
        if !(x >= self.xs[0] && x <= self.xs[n - 1]) {
            return None;
        }

        let k = find_segment(&self.xs, x);
        let h = self.xs[k + 1] - self.xs[k];
        let t = (x - self.xs[k]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        // Cubic Hermite basis on [0, 1].
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        Some(
            h00 * self.ys[k]
                + h10 * h * self.slopes[k]
                + h01 * self.ys[k + 1]
                + h11 * h * self.slopes[k + 1],
        )
    }

    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }
}

fn pchip_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = (0..n - 1).map(|k| (ys[k + 1] - ys[k]) / h[k]).collect();

    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        let (a, b) = (delta[k - 1], delta[k]);
        if a == 0.0 || b == 0.0 || a.signum() != b.signum() {
            continue;
        }
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        d[k] = (w1 + w2) / (w1 / a + w2 / b);
    }

    d[0] = end_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

/// One-sided three-point end slope with shape-preserving clipping.
///
/// `h0`/`m0` belong to the end interval, `h1`/`m1` to its neighbour.
fn end_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}
