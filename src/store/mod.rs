//! Observation store: the read-only table every query runs against.
//!
//! - `ObservationStore` is the query capability the curve and query layers use
//! - `InMemoryStore` is the resident snapshot loaded once at startup
//! - `table` reads and writes the flat CSV hand-off format

pub mod table;

pub use table::*;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{Country, CurvePoint, Observation};

/// Read access to historical observations.
///
/// Implementations are not required to deduplicate rows or return them in any
/// particular order; callers clean what they read.
pub trait ObservationStore: Send + Sync {
    /// `(maturity, yield)` pairs recorded for `country` on exactly `date`.
    fn rows_for(&self, country: Country, date: NaiveDate) -> Vec<CurvePoint>;

    /// Every date with at least one observation for `country`.
    fn all_dates(&self, country: Country) -> Vec<NaiveDate>;

    /// Distinct dates for `country` within `[start, end]`, ascending.
    fn dates_between(&self, country: Country, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .all_dates(country)
            .into_iter()
            .filter(|d| *d >= start && *d <= end)
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Most recent date for `country`, if it has any observations.
    fn latest_date(&self, country: Country) -> Option<NaiveDate> {
        self.all_dates(country).into_iter().max()
    }
}

/// Observations held in memory, indexed by `(country, date)`.
///
/// Rows for a key keep their ingestion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    rows: BTreeMap<(Country, NaiveDate), Vec<Observation>>,
    len: usize,
}

impl InMemoryStore {
    pub fn from_observations(observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut store = Self::default();
        for obs in observations {
            store.rows.entry((obs.country, obs.date)).or_default().push(obs);
            store.len += 1;
        }
        store
    }

    /// Total number of observations.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All observations ordered by country, then date, then ingestion order.
    pub fn observations(&self) -> impl Iterator<Item = &Observation> {
        self.rows.values().flatten()
    }

    /// First and last date held for `country`.
    pub fn coverage(&self, country: Country) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.rows.keys().filter(|(c, _)| *c == country).map(|(_, d)| *d);
        let first = dates.next()?;
        let last = dates.last().unwrap_or(first);
        Some((first, last))
    }
}

impl ObservationStore for InMemoryStore {
    fn rows_for(&self, country: Country, date: NaiveDate) -> Vec<CurvePoint> {
        self.rows
            .get(&(country, date))
            .map(|obs| obs.iter().map(Observation::point).collect())
            .unwrap_or_default()
    }

    fn all_dates(&self, country: Country) -> Vec<NaiveDate> {
        self.rows
            .keys()
            .filter(|(c, _)| *c == country)
            .map(|(_, d)| *d)
            .collect()
    }

    fn dates_between(&self, country: Country, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        if start > end {
            return Vec::new();
        }
        self.rows
            .range((country, start)..=(country, end))
            .map(|((_, d), _)| *d)
            .collect()
    }
}
