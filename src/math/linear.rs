//! Piecewise linear interpolation.

use crate::error::CurveError;

use super::{find_segment, validate_knots};

/// Straight lines between consecutive knots.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, CurveError> {
        validate_knots(xs, ys)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Interpolated value at `x`, or `None` outside the knot range.
    pub fn interpolate(&self, x: f64) -> Option<f64> {
        let n = self.xs.len();
        if !(x >= self.xs[0] && x <= self.xs[n - 1]) {
            return None;
        }
        let k = find_segment(&self.xs, x);
        let (x0, x1) = (self.xs[k], self.xs[k + 1]);
        let (y0, y1) = (self.ys[k], self.ys[k + 1]);
        Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_knots_are_a_straight_line() {
        let interp = LinearInterpolator::new(&[2.0, 10.0], &[4.0, 6.0]).unwrap();
        for &x in &[2.0, 3.0, 6.0, 9.5, 10.0] {
            let expected = 4.0 + (x - 2.0) * 0.25;
            let y = interp.interpolate(x).unwrap();
            assert!((y - expected).abs() < 1e-12, "x={x}: {y} vs {expected}");
        }
    }

    #[test]
    fn no_extrapolation() {
        let interp = LinearInterpolator::new(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        assert!(interp.interpolate(0.5).is_none());
        assert!(interp.interpolate(2.5).is_none());
        assert!(interp.interpolate(f64::NAN).is_none());
    }

    #[test]
    fn single_knot_is_a_contract_violation() {
        let err = LinearInterpolator::new(&[1.0], &[4.0]).unwrap_err();
        assert!(err.is_internal());
    }
}
