//! Shared setup used by every command: config resolution, table loading and
//! table refresh.
//!
//! Keeping this in one place means the CLI queries and the HTTP server answer
//! from an identically prepared engine.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::cli::CommonArgs;
use crate::config::AppConfig;
use crate::domain::Country;
use crate::error::AppError;
use crate::query::QueryEngine;
use crate::store::{LoadedTable, load_observations_csv, read_observations, write_observations_csv};

/// Config file (or defaults) with CLI overrides applied.
pub fn resolve_config(common: &CommonArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load_or_default(&common.config)?;
    if let Some(path) = &common.data {
        config.data_path = path.clone();
    }
    Ok(config)
}

/// Load the observation table and wrap it in a query engine.
pub fn load_engine(config: &AppConfig) -> Result<QueryEngine, AppError> {
    let table = load_observations_csv(&config.data_path)?;
    Ok(engine_from_table(table, config))
}

pub fn engine_from_table(table: LoadedTable, config: &AppConfig) -> QueryEngine {
    let engine = QueryEngine::new(Arc::new(table.store), config.floor_date);
    if config.cache_curves {
        info!("curve cache enabled");
        engine.with_curve_cache()
    } else {
        engine
    }
}

/// Fetch fresh observations, write them to the configured table and read the
/// result back so the caller sees exactly what a server would load.
pub fn refresh_table(config: &AppConfig, countries: &[Country], start: NaiveDate) -> Result<LoadedTable, AppError> {
    info!(?countries, %start, "fetching source series");
    let observations = crate::data::fetch_observations(countries, start)?;
    write_observations_csv(&config.data_path, &observations)?;
    load_observations_csv(&config.data_path)
}

/// Build an engine straight from CSV text. Handy for tests and tooling.
pub fn engine_from_csv(csv: &str, config: &AppConfig) -> Result<QueryEngine, AppError> {
    let table = read_observations(csv.as_bytes())?;
    Ok(engine_from_table(table, config))
}
