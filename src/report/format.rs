//! Plain-text rendering of query results for the terminal.

use crate::domain::{Country, PointYield, YieldSeries};
use crate::store::{InMemoryStore, LoadedTable};

/// One-line answer to a point query, yield shown in percent and as a fraction.
pub fn format_point(p: &PointYield) -> String {
    format!(
        "{} {} {}y: {:.4}% ({:.6})",
        p.country,
        p.date,
        format_maturity(p.maturity),
        p.yield_ * 100.0,
        p.yield_
    )
}

/// Table of a time series, one row per date; failed dates show their error.
pub fn format_series(s: &YieldSeries) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== {} {}y yield ({} dates) ===\n",
        s.country,
        format_maturity(s.maturity),
        s.data.len()
    ));
    if s.data.is_empty() {
        out.push_str("(no observations in range)\n");
        return out;
    }

    out.push_str(&format!("{:<12} {:>10}\n", "date", "yield"));
    for e in &s.data {
        match (e.yield_, &e.error) {
            (Some(y), _) => out.push_str(&format!("{:<12} {:>10.6}\n", e.date.to_string(), y)),
            (None, Some(err)) => out.push_str(&format!("{:<12} {:>10}  {err}\n", e.date.to_string(), "-")),
            (None, None) => out.push_str(&format!("{:<12} {:>10}\n", e.date.to_string(), "-")),
        }
    }

    let failures = s.failures();
    if failures > 0 {
        out.push_str(&format!("{failures} date(s) could not be evaluated\n"));
    }
    out
}

/// Summary of a freshly loaded table: row counts and per-country coverage.
pub fn format_load_summary(table: &LoadedTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Rows: {} read, {} used, {} skipped\n",
        table.rows_read,
        table.rows_used,
        table.row_errors.len()
    ));
    out.push_str(&format_coverage(&table.store));
    out
}

pub fn format_coverage(store: &InMemoryStore) -> String {
    let mut out = String::new();
    for country in Country::ALL {
        match store.coverage(country) {
            Some((first, last)) => out.push_str(&format!("{country}: {first} .. {last}\n")),
            None => out.push_str(&format!("{country}: no data\n")),
        }
    }
    out
}

/// Trim trailing zeros so `10.0` prints as `10` and `0.5` as `0.5`.
fn format_maturity(m: f64) -> String {
    let s = format!("{m:.4}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
