//! Interpolation kernels: shape-preserving cubic (PCHIP) and piecewise linear.
//!
//! Both kernels are strict about their inputs and never extrapolate:
//! `interpolate` returns `None` outside `[x_min, x_max]`. Boundary behaviour is
//! the caller's policy (see `curve::YieldCurve`).

pub mod linear;
pub mod pchip;

pub use linear::*;
pub use pchip::*;

use crate::error::CurveError;

/// Check the knot arrays shared by every kernel.
///
/// Requires equal lengths, at least two knots, finite values and strictly
/// increasing abscissae.
fn validate_knots(xs: &[f64], ys: &[f64]) -> Result<(), CurveError> {
    if xs.len() != ys.len() {
        return Err(CurveError::Interpolation(format!(
            "knot arrays differ in length: {} maturities vs {} yields",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(CurveError::Interpolation(format!(
            "need at least 2 knots, got {}",
            xs.len()
        )));
    }
    if let Some(i) = xs.iter().chain(ys).position(|v| !v.is_finite()) {
        return Err(CurveError::Interpolation(format!("non-finite knot value at position {i}")));
    }
    if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
        return Err(CurveError::Interpolation(format!(
            "maturities must be strictly increasing (index {})",
            i + 1
        )));
    }
    Ok(())
}

/// Index `k` of the segment `[xs[k], xs[k + 1]]` containing `x`.
///
/// Assumes `xs[0] <= x <= xs[n - 1]`.
fn find_segment(xs: &[f64], x: f64) -> usize {
    let pos = xs.partition_point(|&xi| xi <= x);
    pos.saturating_sub(1).min(xs.len() - 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_bad_knots() {
        assert!(validate_knots(&[1.0], &[2.0]).is_err());
        assert!(validate_knots(&[1.0, 2.0], &[2.0]).is_err());
        assert!(validate_knots(&[1.0, 1.0], &[2.0, 3.0]).is_err());
        assert!(validate_knots(&[2.0, 1.0], &[2.0, 3.0]).is_err());
        assert!(validate_knots(&[1.0, 2.0], &[f64::NAN, 3.0]).is_err());
        assert!(validate_knots(&[1.0, 2.0], &[2.0, 3.0]).is_ok());
    }

    #[test]
    fn find_segment_handles_knots_and_ends() {
        let xs = [1.0, 2.0, 5.0, 10.0];
        assert_eq!(find_segment(&xs, 1.0), 0);
        assert_eq!(find_segment(&xs, 1.5), 0);
        assert_eq!(find_segment(&xs, 2.0), 1);
        assert_eq!(find_segment(&xs, 7.0), 2);
        assert_eq!(find_segment(&xs, 10.0), 2);
    }
}
