//! Query layer: latest-date resolution, point queries and date-range queries.
//!
//! Every query validates its parameters before touching the store, then builds
//! one curve per date it needs. Yields leave this layer as fractions.

pub mod params;

pub use params::*;

use std::sync::Arc;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{error, warn};

use crate::curve::{CurveCache, YieldCurve, build_curve};
use crate::domain::{Country, PointYield, SeriesEntry, YieldSeries};
use crate::error::CurveError;
use crate::store::ObservationStore;

/// Answers yield queries against a shared, read-only observation store.
pub struct QueryEngine {
    store: Arc<dyn ObservationStore>,
    floor_date: NaiveDate,
    cache: Option<CurveCache>,
}

impl QueryEngine {
    /// `floor_date` is the range-query start used when the caller gives none.
    pub fn new(store: Arc<dyn ObservationStore>, floor_date: NaiveDate) -> Self {
        Self {
            store,
            floor_date,
            cache: None,
        }
    }

    /// Keep built curves for reuse across queries.
    pub fn with_curve_cache(mut self) -> Self {
        self.cache = Some(CurveCache::new());
        self
    }

    pub fn floor_date(&self) -> NaiveDate {
        self.floor_date
    }

    pub fn store(&self) -> &dyn ObservationStore {
        self.store.as_ref()
    }

    /// Most recent date with observations for `country`.
    pub fn latest_date(&self, country: Country) -> Result<NaiveDate, CurveError> {
        self.store
            .latest_date(country)
            .ok_or(CurveError::NoData { country, date: None })
    }

    /// Curve for `(country, date)`, from the cache when enabled.
    pub fn curve(&self, country: Country, date: NaiveDate) -> Result<Arc<YieldCurve>, CurveError> {
        let build = || build_curve(self.store.as_ref(), country, date);
        match &self.cache {
            Some(cache) => cache.get_or_build(country, date, build),
            None => build().map(Arc::new),
        }
    }

    /// Yield at `maturity` on `date`, or on the latest date when `date` is `None`.
    pub fn point_query(&self, request: &PointRequest) -> Result<PointYield, CurveError> {
        let country = request.country;
        let date = match request.date {
            Some(d) => d,
            None => self.latest_date(country)?,
        };

        let curve = self.curve(country, date).inspect_err(|e| log_internal(e, country, date))?;
        Ok(PointYield {
            date,
            country,
            maturity: request.maturity,
            yield_: to_fraction(curve.value(request.maturity)),
        })
    }

    /// Yield at `maturity` on every stored date in `[start, end]`.
    ///
    /// Only dates present in the store are evaluated. A date whose curve cannot
    /// be built stays in the series as a failure entry; the rest still resolve.
    pub fn range_query(&self, request: &RangeRequest) -> YieldSeries {
        let country = request.country;
        let start = request.start.unwrap_or(self.floor_date);
        let end = request.end.unwrap_or_else(today);
        let dates = self.store.dates_between(country, start, end);

        let mut data: Vec<SeriesEntry> = dates
            .par_iter()
            .map(|&date| match self.curve(country, date) {
                Ok(curve) => SeriesEntry::ok(date, to_fraction(curve.value(request.maturity))),
                Err(e) => {
                    log_internal(&e, country, date);
                    if !e.is_internal() {
                        warn!(%country, %date, error = %e, "no yield for date in range");
                    }
                    SeriesEntry::failed(date, e.public_message())
                }
            })
            .collect();
        data.sort_by_key(|e| e.date);

        YieldSeries {
            country,
            maturity: request.maturity,
            data,
        }
    }
}

/// Percent to fraction.
fn to_fraction(yield_pct: f64) -> f64 {
    yield_pct / 100.0
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn log_internal(err: &CurveError, country: Country, date: NaiveDate) {
    if err.is_internal() {
        error!(%country, %date, error = %err, "curve construction fault");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurvePoint, Observation};
    use crate::store::InMemoryStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn engine(observations: Vec<Observation>) -> QueryEngine {
        QueryEngine::new(Arc::new(InMemoryStore::from_observations(observations)), d(2024, 1, 1))
    }

    fn us_day(date: NaiveDate, yields: [f64; 5]) -> Vec<Observation> {
        [1.0, 2.0, 5.0, 10.0, 30.0]
            .into_iter()
            .zip(yields)
            .map(|(m, y)| Observation::new(date, Country::Us, m, y))
            .collect()
    }

    #[test]
    fn point_query_defaults_to_latest_date() {
        let mut obs = us_day(d(2024, 6, 3), [4.5, 4.3, 4.1, 4.2, 4.5]);
        obs.extend(us_day(d(2024, 5, 31), [5.0, 5.0, 5.0, 5.0, 5.0]));
        let engine = engine(obs);

        let req = PointRequest {
            country: Country::Us,
            maturity: 2.0,
            date: None,
        };
        let out = engine.point_query(&req).unwrap();
        assert_eq!(out.date, d(2024, 6, 3));
        assert!((out.yield_ - 0.043).abs() < 1e-12);

        let req = PointRequest {
            date: Some(d(2024, 5, 31)),
            ..req
        };
        assert!((engine.point_query(&req).unwrap().yield_ - 0.05).abs() < 1e-12);
    }

    #[test]
    fn point_query_without_data_is_not_found() {
        let engine = engine(us_day(d(2024, 6, 3), [4.5, 4.3, 4.1, 4.2, 4.5]));
        let req = PointRequest {
            country: Country::Uk,
            maturity: 10.0,
            date: None,
        };
        assert_eq!(
            engine.point_query(&req).unwrap_err(),
            CurveError::NoData {
                country: Country::Uk,
                date: None
            }
        );

        let req = PointRequest {
            country: Country::Us,
            maturity: 10.0,
            date: Some(d(2024, 6, 4)),
        };
        assert!(engine.point_query(&req).unwrap_err().is_not_found());
    }

    #[test]
    fn range_query_marks_failed_dates_and_continues() {
        let mut obs = us_day(d(2024, 1, 2), [4.8, 4.3, 4.0, 4.0, 4.2]);
        // Only one distinct maturity on the 3rd.
        obs.push(Observation::new(d(2024, 1, 3), Country::Us, 10.0, 4.1));
        obs.push(Observation::new(d(2024, 1, 3), Country::Us, 10.0, 4.2));
        obs.extend(us_day(d(2024, 1, 4), [4.8, 4.3, 4.0, 4.1, 4.2]));
        let engine = engine(obs);

        let series = engine.range_query(&RangeRequest {
            country: Country::Us,
            maturity: 10.0,
            start: Some(d(2024, 1, 1)),
            end: Some(d(2024, 1, 31)),
        });
        let dates: Vec<NaiveDate> = series.data.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)]);
        assert_eq!(series.failures(), 1);
        assert!(series.data[1].yield_.is_none());
        assert!(series.data[1].error.as_deref().unwrap().contains("Insufficient data"));
        assert!((series.data[2].yield_.unwrap() - 0.041).abs() < 1e-12);
    }

    #[test]
    fn range_query_uses_floor_and_today_defaults() {
        let mut obs = us_day(d(2023, 12, 29), [4.8, 4.3, 4.0, 4.0, 4.2]);
        obs.extend(us_day(d(2024, 1, 2), [4.8, 4.3, 4.0, 3.9, 4.2]));
        let engine = engine(obs);

        let series = engine.range_query(&RangeRequest {
            country: Country::Us,
            maturity: 10.0,
            start: None,
            end: None,
        });
        assert_eq!(series.data.len(), 1);
        assert_eq!(series.data[0].date, d(2024, 1, 2));
    }

    #[test]
    fn range_query_with_reversed_bounds_is_empty() {
        let engine = engine(us_day(d(2024, 1, 2), [4.8, 4.3, 4.0, 4.0, 4.2]));
        let series = engine.range_query(&RangeRequest {
            country: Country::Us,
            maturity: 10.0,
            start: Some(d(2024, 2, 1)),
            end: Some(d(2024, 1, 1)),
        });
        assert!(series.data.is_empty());
    }

    #[test]
    fn cached_engine_returns_same_answers() {
        let obs = us_day(d(2024, 6, 3), [4.5, 4.3, 4.1, 4.2, 4.5]);
        let plain = engine(obs.clone());
        let cached = engine(obs).with_curve_cache();

        for m in [0.5, 2.0, 3.3, 7.0, 40.0] {
            let req = PointRequest {
                country: Country::Us,
                maturity: m,
                date: None,
            };
            let a = plain.point_query(&req).unwrap();
            let b = cached.point_query(&req).unwrap();
            let c = cached.point_query(&req).unwrap();
            assert_eq!(a, b);
            assert_eq!(b, c);
        }
    }

    #[test]
    fn store_duplicates_are_collapsed_before_the_curve() {
        struct Dupes;
        impl ObservationStore for Dupes {
            fn rows_for(&self, _: Country, _: NaiveDate) -> Vec<CurvePoint> {
                vec![
                    CurvePoint::new(10.0, 4.0),
                    CurvePoint::new(2.0, 4.5),
                    CurvePoint::new(10.0, 7.0),
                ]
            }
            fn all_dates(&self, _: Country) -> Vec<NaiveDate> {
                vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(); 3]
            }
        }

        let engine = QueryEngine::new(Arc::new(Dupes), d(2024, 1, 1));
        let series = engine.range_query(&RangeRequest {
            country: Country::Us,
            maturity: 10.0,
            start: None,
            end: Some(d(2024, 1, 2)),
        });
        assert_eq!(series.data.len(), 1);
        assert!((series.data[0].yield_.unwrap() - 0.04).abs() < 1e-12);
    }
}
