//! Bank of England interactive database (IADB) integration for nominal gilt
//! par yields.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use tracing::info;

use crate::domain::{Country, Observation};
use crate::error::{AppError, EXIT_INTERNAL};

const BASE_URL: &str = "https://www.bankofengland.co.uk/boeapps/iadb/fromshowcolumns.asp";

// The IADB rejects requests without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0";

/// Nominal par yield series (5y, 10y, 20y) and their maturities in years.
pub const GILT_SERIES: [(&str, f64); 3] = [("IUDSNPY", 5.0), ("IUDMNPY", 10.0), ("IUDLNPY", 20.0)];

pub struct BoeClient {
    client: Client,
}

impl BoeClient {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    /// Fetch every gilt series from `start` onwards as UK observations.
    pub fn fetch_gilts(&self, start: NaiveDate) -> Result<Vec<Observation>, AppError> {
        let codes: Vec<&str> = GILT_SERIES.iter().map(|(code, _)| *code).collect();
        let resp = self
            .client
            .get(BASE_URL)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[
                ("csv.x", "yes"),
                ("Datefrom", &start.format("%d/%b/%Y").to_string()),
                ("Dateto", "now"),
                ("SeriesCodes", &codes.join(",")),
                ("CSVF", "TN"),
                ("UsingCodes", "Y"),
            ])
            .send()
            .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Bank of England request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                EXIT_INTERNAL,
                format!("Bank of England request failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to read Bank of England response: {e}")))?;
        let out = parse_gilt_csv(&body)?;
        info!(observations = out.len(), "fetched UK gilt yields from the Bank of England");
        Ok(out)
    }
}

impl Default for BoeClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the wide IADB CSV (`DATE` plus one column per series code) into
/// one observation per non-blank cell.
pub fn parse_gilt_csv(body: &str) -> Result<Vec<Observation>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Invalid Bank of England CSV: {e}")))?
        .clone();
    let date_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("date"))
        .ok_or_else(|| AppError::new(EXIT_INTERNAL, "Bank of England CSV has no DATE column."))?;
    let columns: Vec<(usize, f64)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| {
            GILT_SERIES
                .iter()
                .find(|(code, _)| h.eq_ignore_ascii_case(code))
                .map(|(_, maturity)| (idx, *maturity))
        })
        .collect();

    let mut out = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| AppError::new(EXIT_INTERNAL, format!("Invalid Bank of England CSV: {e}")))?;
        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, "%d %b %Y")
            .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Invalid Bank of England date '{raw_date}': {e}")))?;
        for &(idx, maturity) in &columns {
            let value = record.get(idx).and_then(|s| s.parse::<f64>().ok()).filter(|v| v.is_finite());
            if let Some(value) = value {
                out.push(Observation::new(date, Country::Uk, maturity, value));
            }
        }
    }
    Ok(out)
}
