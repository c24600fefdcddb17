//! Request parameters and their validation.
//!
//! Raw parameters arrive as optional strings (HTTP query strings, CLI input).
//! Country and maturity are strict; range bounds are lenient and fall back to
//! defaults when missing or unparsable.

use chrono::NaiveDate;

use crate::domain::Country;
use crate::error::CurveError;
use crate::store::parse_date;

/// A validated point-in-time query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRequest {
    pub country: Country,
    /// Years, finite and non-negative.
    pub maturity: f64,
    /// `None` means the latest stored date for the country.
    pub date: Option<NaiveDate>,
}

impl PointRequest {
    pub fn parse(country: Option<&str>, maturity: Option<&str>, date: Option<&str>) -> Result<Self, CurveError> {
        let maturity = parse_maturity(maturity)?;
        let country = parse_country(country)?;
        let date = match date.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_date(raw).map_err(|e| CurveError::validation("date", e))?),
            None => None,
        };
        Ok(Self { country, maturity, date })
    }
}

/// A validated date-range query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRequest {
    pub country: Country,
    pub maturity: f64,
    /// `None` means the configured floor date.
    pub start: Option<NaiveDate>,
    /// `None` means today.
    pub end: Option<NaiveDate>,
}

impl RangeRequest {
    pub fn parse(
        country: Option<&str>,
        maturity: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, CurveError> {
        let maturity = parse_maturity(maturity)?;
        let country = parse_country(country)?;
        Ok(Self {
            country,
            maturity,
            start: parse_bound(start),
            end: parse_bound(end),
        })
    }
}

pub fn parse_country(raw: Option<&str>) -> Result<Country, CurveError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CurveError::validation("country", "missing (expected US or UK)"))?;
    raw.parse().map_err(|e: String| CurveError::validation("country", e))
}

pub fn parse_maturity(raw: Option<&str>) -> Result<f64, CurveError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CurveError::validation("maturity", "missing (expected years as a number)"))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| CurveError::validation("maturity", format!("'{raw}' is not a number")))?;
    check_maturity(value)
}

/// Reject maturities no curve can be evaluated at.
pub fn check_maturity(value: f64) -> Result<f64, CurveError> {
    if !value.is_finite() {
        return Err(CurveError::validation("maturity", format!("{value} is not finite")));
    }
    if value < 0.0 {
        return Err(CurveError::validation("maturity", format!("{value} is negative")));
    }
    Ok(value)
}

/// Range bound: `None` when missing or unparsable, so the caller's default applies.
pub fn parse_bound(raw: Option<&str>) -> Option<NaiveDate> {
    raw.map(str::trim).and_then(|s| parse_date(s).ok())
}
