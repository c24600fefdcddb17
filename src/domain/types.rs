//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - held in the in-memory observation store
//! - written to / read from the flat CSV table
//! - returned as JSON by the HTTP layer

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Sovereign curve the observations belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Country {
    #[serde(rename = "US")]
    #[value(name = "US", alias = "us")]
    Us,
    #[serde(rename = "UK")]
    #[value(name = "UK", alias = "uk")]
    Uk,
}

impl Country {
    pub const ALL: [Country; 2] = [Country::Us, Country::Uk];

    pub fn code(self) -> &'static str {
        match self {
            Country::Us => "US",
            Country::Uk => "UK",
        }
    }

    /// Instrument label recorded for this country's observations.
    pub fn instrument(self) -> &'static str {
        match self {
            Country::Us => "Treasury",
            Country::Uk => "Gilt",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = String;

    /// Parse a country code, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(Country::Us),
            "UK" => Ok(Country::Uk),
            other => Err(format!("unsupported country '{other}' (expected US or UK)")),
        }
    }
}

/// One ingested observation: a single yield quote on a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub country: Country,
    pub instrument: String,
    /// Time to maturity in years.
    pub maturity: f64,
    /// Yield in percent.
    pub yield_pct: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, country: Country, maturity: f64, yield_pct: f64) -> Self {
        Self {
            date,
            country,
            instrument: country.instrument().to_string(),
            maturity,
            yield_pct,
        }
    }

    pub fn point(&self) -> CurvePoint {
        CurvePoint {
            maturity: self.maturity,
            yield_pct: self.yield_pct,
        }
    }
}

/// A `(maturity, yield)` pair as projected out of the store for one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub maturity: f64,
    pub yield_pct: f64,
}

impl CurvePoint {
    pub fn new(maturity: f64, yield_pct: f64) -> Self {
        Self { maturity, yield_pct }
    }
}

/// Answer to a point-in-time query.
///
/// `yield_` is a fraction (percent / 100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointYield {
    pub date: NaiveDate,
    pub country: Country,
    pub maturity: f64,
    #[serde(rename = "yield")]
    pub yield_: f64,
}

/// One date of a time-series answer.
///
/// Exactly one of `yield_` / `error` is set: a date whose curve could not be
/// built is kept in the series with its error rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub date: NaiveDate,
    #[serde(rename = "yield")]
    pub yield_: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SeriesEntry {
    pub fn ok(date: NaiveDate, yield_: f64) -> Self {
        Self {
            date,
            yield_: Some(yield_),
            error: None,
        }
    }

    pub fn failed(date: NaiveDate, error: impl Into<String>) -> Self {
        Self {
            date,
            yield_: None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Answer to a date-range query, ordered by ascending date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldSeries {
    pub country: Country,
    pub maturity: f64,
    pub data: Vec<SeriesEntry>,
}

impl YieldSeries {
    /// Number of dates that failed to produce a yield.
    pub fn failures(&self) -> usize {
        self.data.iter().filter(|e| !e.is_ok()).count()
    }
}
