//! Optional per-`(country, date)` curve cache.
//!
//! The store never changes while the process runs, so a curve built once for a
//! date stays valid. Entries are insert-once: if two threads race to build the
//! same curve, the first insert wins and both get that `Arc`. Failures are not
//! cached.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;

use crate::curve::YieldCurve;
use crate::domain::Country;
use crate::error::CurveError;

#[derive(Debug, Default)]
pub struct CurveCache {
    curves: DashMap<(Country, NaiveDate), Arc<YieldCurve>>,
}

impl CurveCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached curve for the key, building it with `build` on a miss.
    pub fn get_or_build<F>(&self, country: Country, date: NaiveDate, build: F) -> Result<Arc<YieldCurve>, CurveError>
    where
        F: FnOnce() -> Result<YieldCurve, CurveError>,
    {
        let key = (country, date);
        if let Some(curve) = self.curves.get(&key) {
            return Ok(Arc::clone(curve.value()));
        }
        let built = Arc::new(build()?);
        Ok(Arc::clone(self.curves.entry(key).or_insert(built).value()))
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}
