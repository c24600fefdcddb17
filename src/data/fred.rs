//! FRED API integration for US Treasury constant-maturity yields.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{Country, Observation};
use crate::error::{AppError, EXIT_INTERNAL, EXIT_USAGE};

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 100000;

/// Treasury constant-maturity series and their maturities in years.
pub const TREASURY_SERIES: [(&str, f64); 8] = [
    ("DGS1MO", 1.0 / 12.0),
    ("DGS3MO", 3.0 / 12.0),
    ("DGS6MO", 6.0 / 12.0),
    ("DGS1", 1.0),
    ("DGS2", 2.0),
    ("DGS5", 5.0),
    ("DGS10", 10.0),
    ("DGS30", 30.0),
];

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::new(EXIT_USAGE, "Missing FRED_API_KEY in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Fetch every Treasury series from `start` onwards as US observations.
    pub fn fetch_treasuries(&self, start: NaiveDate) -> Result<Vec<Observation>, AppError> {
        let mut out = Vec::new();
        for (series_id, maturity) in TREASURY_SERIES {
            let series = self.fetch_series(series_id, start)?;
            debug!(series_id, points = series.len(), "fetched FRED series");
            out.extend(
                series
                    .into_iter()
                    .map(|(date, value)| Observation::new(date, Country::Us, maturity, value)),
            );
        }
        info!(observations = out.len(), "fetched US Treasury yields from FRED");
        Ok(out)
    }

    fn fetch_series(&self, series_id: &str, start: NaiveDate) -> Result<Vec<(NaiveDate, f64)>, AppError> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", series_id),
                ("api_key", &self.api_key),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("observation_start", &start.to_string()),
                ("limit", &OBS_LIMIT.to_string()),
            ])
            .send()
            .map_err(|e| AppError::new(EXIT_INTERNAL, format!("FRED request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                EXIT_INTERNAL,
                format!("FRED request for {series_id} failed with status {}.", resp.status()),
            ));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to parse FRED response: {e}")))?;
        parse_observations(body)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<FredObservation>,
}

#[derive(Debug, Deserialize)]
struct FredObservation {
    date: String,
    value: String,
}

/// Convert a FRED response into `(date, percent)` pairs, dropping missing values.
fn parse_observations(body: ObservationsResponse) -> Result<Vec<(NaiveDate, f64)>, AppError> {
    let mut out = Vec::with_capacity(body.observations.len());
    for obs in body.observations {
        let value = match parse_value(&obs.value) {
            Some(v) => v,
            None => continue,
        };
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Invalid FRED date '{}': {e}", obs.date)))?;
        out.push((date, value));
    }
    Ok(out)
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
