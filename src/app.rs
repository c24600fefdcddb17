//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments
//! - loads configuration and the observation table
//! - runs the requested query, server or fetch

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FetchArgs, LatestArgs, ServeArgs, TimeseriesArgs};
use crate::domain::Country;
use crate::error::{AppError, CurveError, EXIT_INTERNAL, EXIT_USAGE};
use crate::query::{PointRequest, RangeRequest, check_maturity, parse_bound};
use crate::store::parse_date;

pub mod pipeline;

/// Entry point for the `yc` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Latest(args) => handle_latest(args),
        Command::Timeseries(args) => handle_timeseries(args),
        Command::Fetch(args) => handle_fetch(args),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let mut config = pipeline::resolve_config(&args.common)?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.cache_curves |= args.cache;

    let engine = Arc::new(pipeline::load_engine(&config)?);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(crate::server::serve(engine, &config.host, config.port))
}

fn handle_latest(args: LatestArgs) -> Result<(), AppError> {
    let config = pipeline::resolve_config(&args.common)?;
    let engine = pipeline::load_engine(&config)?;

    let date = match args.date.as_deref() {
        Some(raw) => Some(parse_date(raw).map_err(|e| CurveError::validation("date", e))?),
        None => None,
    };
    let request = PointRequest {
        country: args.country,
        maturity: check_maturity(args.maturity)?,
        date,
    };
    let result = engine.point_query(&request)?;

    if args.json {
        println!("{}", to_json(&result)?);
    } else {
        println!("{}", crate::report::format_point(&result));
    }
    Ok(())
}

fn handle_timeseries(args: TimeseriesArgs) -> Result<(), AppError> {
    let config = pipeline::resolve_config(&args.common)?;
    let engine = pipeline::load_engine(&config)?;

    let request = RangeRequest {
        country: args.country,
        maturity: check_maturity(args.maturity)?,
        start: parse_bound(args.start.as_deref()),
        end: parse_bound(args.end.as_deref()),
    };
    let series = engine.range_query(&request);

    if args.json {
        println!("{}", to_json(&series)?);
    } else {
        print!("{}", crate::report::format_series(&series));
    }
    Ok(())
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let config = pipeline::resolve_config(&args.common)?;
    let start = match args.start.as_deref() {
        Some(raw) => parse_date(raw).map_err(|e| AppError::new(EXIT_USAGE, e))?,
        None => config.floor_date,
    };
    let countries = if args.countries.is_empty() {
        Country::ALL.to_vec()
    } else {
        args.countries.clone()
    };

    let table = pipeline::refresh_table(&config, &countries, start)?;
    info!(rows = table.rows_used, "fetch complete");
    print!("{}", crate::report::format_load_summary(&table));
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to serialize result: {e}")))
}
