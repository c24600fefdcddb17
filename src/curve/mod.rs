//! Yield curve construction.
//!
//! A curve is built from the observations of one `(country, date)`:
//!
//! 1) project the store rows to `(maturity, yield)` pairs
//! 2) sort by maturity and keep the first row for each distinct maturity
//! 3) pick the kernel: PCHIP for 3+ knots, linear for exactly 2
//! 4) wrap it with flat extrapolation beyond the outermost knots

pub mod cache;

pub use cache::CurveCache;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Country, CurvePoint};
use crate::error::CurveError;
use crate::math::{LinearInterpolator, PchipInterpolator};
use crate::store::ObservationStore;

/// Smallest knot count for which the monotone cubic kernel is used.
pub const MIN_PCHIP_KNOTS: usize = 3;

/// Which kernel a curve evaluates with between its knots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    MonotoneCubic,
    Linear,
}

#[derive(Debug, Clone)]
enum Interpolant {
    MonotoneCubic(PchipInterpolator),
    Linear(LinearInterpolator),
}

/// A yield curve bound to one immutable knot set.
///
/// Maps maturity (years) to yield (percent). Defined for every maturity: below
/// the shortest knot it returns the shortest knot's yield, above the longest it
/// returns the longest knot's yield.
#[derive(Debug, Clone)]
pub struct YieldCurve {
    country: Country,
    date: NaiveDate,
    maturities: Vec<f64>,
    yields: Vec<f64>,
    interpolant: Interpolant,
}

impl YieldCurve {
    /// Build a curve from already-projected points for `(country, date)`.
    ///
    /// Points may arrive in any order and may repeat a maturity; the first
    /// occurrence in input order wins.
    pub fn from_points(country: Country, date: NaiveDate, points: &[CurvePoint]) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::NoData {
                country,
                date: Some(date),
            });
        }

        let knots = clean_points(points);
        if knots.is_empty() {
            return Err(CurveError::NoData {
                country,
                date: Some(date),
            });
        }
        if knots.len() < 2 {
            return Err(CurveError::InsufficientData {
                country,
                date,
                distinct: knots.len(),
            });
        }

        let maturities: Vec<f64> = knots.iter().map(|p| p.maturity).collect();
        let yields: Vec<f64> = knots.iter().map(|p| p.yield_pct).collect();

        let interpolant = if knots.len() >= MIN_PCHIP_KNOTS {
            Interpolant::MonotoneCubic(PchipInterpolator::new(&maturities, &yields)?)
        } else {
            Interpolant::Linear(LinearInterpolator::new(&maturities, &yields)?)
        };

        let curve = Self {
            country,
            date,
            maturities,
            yields,
            interpolant,
        };
        debug!(
            %country,
            %date,
            knots = curve.maturities.len(),
            kind = ?curve.kind(),
            "built yield curve"
        );
        Ok(curve)
    }

    /// Yield (percent) at `maturity` years.
    pub fn value(&self, maturity: f64) -> f64 {
        let n = self.maturities.len();
        if maturity <= self.maturities[0] {
            return self.yields[0];
        }
        if maturity >= self.maturities[n - 1] {
            return self.yields[n - 1];
        }
        let inner = match &self.interpolant {
            Interpolant::MonotoneCubic(p) => p.interpolate(maturity),
            Interpolant::Linear(l) => l.interpolate(maturity),
        };
        // Only `None` for NaN input, which fails both range checks above.
        inner.unwrap_or(f64::NAN)
    }

    pub fn kind(&self) -> CurveKind {
        match self.interpolant {
            Interpolant::MonotoneCubic(_) => CurveKind::MonotoneCubic,
            Interpolant::Linear(_) => CurveKind::Linear,
        }
    }

    pub fn country(&self) -> Country {
        self.country
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Sorted, deduplicated knot maturities.
    pub fn maturities(&self) -> &[f64] {
        &self.maturities
    }

    /// Knot yields aligned with `maturities()`.
    pub fn yields(&self) -> &[f64] {
        &self.yields
    }
}

/// Build the curve for `(country, date)` from the store.
pub fn build_curve(store: &dyn ObservationStore, country: Country, date: NaiveDate) -> Result<YieldCurve, CurveError> {
    let points = store.rows_for(country, date);
    YieldCurve::from_points(country, date, &points)
}

/// Drop non-finite pairs, sort by maturity and keep one point per maturity.
///
/// The sort is stable, so among equal maturities the first in input order is kept.
fn clean_points(points: &[CurvePoint]) -> Vec<CurvePoint> {
    let mut knots: Vec<CurvePoint> = points
        .iter()
        .copied()
        .filter(|p| p.maturity.is_finite() && p.yield_pct.is_finite())
        .collect();
    if knots.len() < points.len() {
        debug!(dropped = points.len() - knots.len(), "dropped non-finite curve points");
    }
    knots.sort_by(|a, b| a.maturity.total_cmp(&b.maturity));
    knots.dedup_by(|later, earlier| later.maturity == earlier.maturity);
    knots
}
