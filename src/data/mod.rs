//! Ingestion: pull source series from the statistical agencies and turn them
//! into observations.
//!
//! - `fred`: US Treasury constant-maturity yields
//! - `boe`: UK nominal gilt par yields

pub mod boe;
pub mod fred;

pub use boe::BoeClient;
pub use fred::FredClient;

use chrono::NaiveDate;

use crate::domain::{Country, Observation};
use crate::error::AppError;

/// Fetch observations for `countries` from `start` onwards.
pub fn fetch_observations(countries: &[Country], start: NaiveDate) -> Result<Vec<Observation>, AppError> {
    let mut out = Vec::new();
    for country in countries {
        match country {
            Country::Us => out.extend(FredClient::from_env()?.fetch_treasuries(start)?),
            Country::Uk => out.extend(BoeClient::new().fetch_gilts(start)?),
        }
    }
    Ok(out)
}
