//! Flat observation table (CSV) load and write.
//!
//! The table has one row per observation with the named columns
//! `Date, Maturity, Yield, Country, Instrument`. Columns are matched by name
//! (case-insensitive, any order); unknown columns such as an exported row
//! index are ignored.
//!
//! Loading is row-tolerant: malformed rows are skipped and reported, and only
//! a broken header or an empty result fails the whole load.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{Country, Observation};
use crate::error::{AppError, EXIT_INTERNAL, EXIT_USAGE};
use crate::store::InMemoryStore;

const REQUIRED_COLUMNS: [&str; 4] = ["date", "maturity", "yield", "country"];

/// A row-level problem encountered while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Load output: the store plus what was skipped on the way.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub store: InMemoryStore,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load the observation table from `path`.
pub fn load_observations_csv(path: &Path) -> Result<LoadedTable, AppError> {
    let file = std::fs::File::open(path).map_err(|e| {
        AppError::new(
            EXIT_USAGE,
            format!("Failed to open observation table '{}': {e}", path.display()),
        )
    })?;
    let table = read_observations(file)?;
    info!(
        path = %path.display(),
        rows_read = table.rows_read,
        rows_used = table.rows_used,
        skipped = table.row_errors.len(),
        "loaded observation table"
    );
    Ok(table)
}

/// Parse an observation table from any reader.
pub fn read_observations<R: Read>(reader: R) -> Result<LoadedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to read table headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for col in REQUIRED_COLUMNS {
        if !header_map.contains_key(col) {
            return Err(AppError::new(
                EXIT_USAGE,
                format!("Missing required column: `{col}`"),
            ));
        }
    }

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, &header_map));
        match parsed {
            Ok(obs) => observations.push(obs),
            Err(message) => {
                warn!(line, %message, "skipping observation row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    let rows_used = observations.len();
    if rows_used == 0 {
        return Err(AppError::new(
            EXIT_USAGE,
            "No valid observations in table.",
        ));
    }

    Ok(LoadedTable {
        store: InMemoryStore::from_observations(observations),
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Write observations to `path` in (country, date, maturity) order.
pub fn write_observations_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::new(
                EXIT_INTERNAL,
                format!("Failed to create directory '{}': {e}", parent.display()),
            )
        })?;
    }
    let file = std::fs::File::create(path).map_err(|e| {
        AppError::new(
            EXIT_INTERNAL,
            format!("Failed to create observation table '{}': {e}", path.display()),
        )
    })?;
    write_observations(file, observations)?;
    info!(path = %path.display(), rows = observations.len(), "wrote observation table");
    Ok(())
}

pub fn write_observations<W: Write>(writer: W, observations: &[Observation]) -> Result<(), AppError> {
    let mut sorted: Vec<&Observation> = observations.iter().collect();
    sorted.sort_by(|a, b| {
        (a.country, a.date)
            .cmp(&(b.country, b.date))
            .then(a.maturity.total_cmp(&b.maturity))
    });

    let mut out = csv::Writer::from_writer(writer);
    let write_err = |e: csv::Error| AppError::new(EXIT_INTERNAL, format!("Failed to write observation table: {e}"));

    out.write_record(["Date", "Maturity", "Yield", "Country", "Instrument"])
        .map_err(write_err)?;
    for obs in sorted {
        out.write_record([
            obs.date.format("%Y-%m-%d").to_string(),
            obs.maturity.to_string(),
            obs.yield_pct.to_string(),
            obs.country.code().to_string(),
            obs.instrument.clone(),
        ])
        .map_err(write_err)?;
    }
    out.flush()
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to flush observation table: {e}")))?;
    Ok(())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Observation, String> {
    let date = parse_date(get_required(record, header_map, "date")?)?;
    let maturity = parse_f64(get_required(record, header_map, "maturity")?, "Maturity")?;
    if maturity <= 0.0 {
        return Err(format!("Maturity must be positive, got {maturity}."));
    }
    let yield_pct = parse_f64(get_required(record, header_map, "yield")?, "Yield")?;
    let country: Country = get_required(record, header_map, "country")?.parse()?;
    let instrument = get_optional(record, header_map, "instrument")
        .map(str::to_string)
        .unwrap_or_else(|| country.instrument().to_string());

    Ok(Observation {
        date,
        country,
        instrument,
        maturity,
        yield_pct,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(s: &str, column: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid {column} '{s}'.")),
    }
}

/// Parse a table date. ISO dates are canonical; a few common export formats
/// (including pandas' datetime rendering) are accepted too.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY-MM-DD HH:MM:SS, DD/MM/YYYY, YYYY/MM/DD."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CurvePoint;
    use crate::store::ObservationStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn reads_columns_by_name_in_any_order() {
        let csv = "\u{feff},Country,Yield,Date,Instrument,Maturity\n\
                   0,US,4.5,2024-06-03,Treasury,1.0\n\
                   1,us,4.3,2024-06-03 00:00:00,Treasury,2\n\
                   2,UK,3.9,03/06/2024,Gilt,5\n";
        let table = read_observations(csv.as_bytes()).unwrap();
        assert_eq!(table.rows_read, 3);
        assert_eq!(table.rows_used, 3);
        assert!(table.row_errors.is_empty());

        let rows = table.store.rows_for(Country::Us, d(2024, 6, 3));
        assert_eq!(rows, vec![CurvePoint::new(1.0, 4.5), CurvePoint::new(2.0, 4.3)]);
        assert_eq!(table.store.rows_for(Country::Uk, d(2024, 6, 3)).len(), 1);
    }

    #[test]
    fn bad_rows_are_skipped_with_line_numbers() {
        let csv = "Date,Maturity,Yield,Country,Instrument\n\
                   2024-01-02,1,4.8,US,Treasury\n\
                   2024-01-02,2,,US,Treasury\n\
                   2024-01-02,abc,4.1,US,Treasury\n\
                   2024-01-02,5,4.0,DE,Bund\n\
                   not-a-date,5,4.0,US,Treasury\n\
                   2024-01-02,0,4.0,US,Treasury\n";
        let table = read_observations(csv.as_bytes()).unwrap();
        assert_eq!(table.rows_read, 6);
        assert_eq!(table.rows_used, 1);
        let lines: Vec<usize> = table.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn missing_column_fails() {
        let csv = "Date,Maturity,Country\n2024-01-02,1,US\n";
        let err = read_observations(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert!(err.to_string().contains("`yield`"));
    }

    #[test]
    fn missing_instrument_defaults_from_country() {
        let csv = "Date,Maturity,Yield,Country\n2024-01-02,10,4.0,UK\n";
        let table = read_observations(csv.as_bytes()).unwrap();
        let obs: Vec<_> = table.store.observations().collect();
        assert_eq!(obs[0].instrument, "Gilt");
    }

    #[test]
    fn written_table_reads_back() {
        let observations = vec![
            Observation::new(d(2024, 1, 3), Country::Us, 10.0, 4.05),
            Observation::new(d(2024, 1, 2), Country::Uk, 20.0, 4.4),
            Observation::new(d(2024, 1, 2), Country::Us, 1.0 / 12.0, 5.55),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("yields.csv");
        write_observations_csv(&path, &observations).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.starts_with("2024-01-02,0.08333"), "{first_row}");

        let table = load_observations_csv(&path).unwrap();
        assert_eq!(table.rows_used, 3);
        assert_eq!(
            table.store.rows_for(Country::Us, d(2024, 1, 2)),
            vec![CurvePoint::new(1.0 / 12.0, 5.55)]
        );
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        let err = load_observations_csv(Path::new("/nonexistent/yields.csv")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }
}
