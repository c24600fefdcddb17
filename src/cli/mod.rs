//! Command-line parsing for the yield curve service.
//!
//! Argument parsing and command dispatch stay separate from the curve and
//! query code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Country;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "yc", version, about = "Sovereign yield curves from FRED and Bank of England data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve `/latest` and `/timeseries` over HTTP.
    Serve(ServeArgs),
    /// Print the yield at one maturity on the latest (or a given) date.
    Latest(LatestArgs),
    /// Print the yield at one maturity over a date range.
    Timeseries(TimeseriesArgs),
    /// Download source series and write the observation table.
    Fetch(FetchArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// TOML configuration file (defaults apply when it does not exist).
    #[arg(long, default_value = "yc.toml")]
    pub config: PathBuf,

    /// Observation table (overrides `data_path` from the config).
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Host to bind (overrides config).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides config).
    #[arg(long)]
    pub port: Option<u16>,

    /// Cache built curves across requests.
    #[arg(long)]
    pub cache: bool,
}

#[derive(Debug, Args, Clone)]
pub struct LatestArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Country code.
    #[arg(short = 'c', long, value_enum, ignore_case = true)]
    pub country: Country,

    /// Maturity in years.
    #[arg(short = 'm', long)]
    pub maturity: f64,

    /// Evaluate on this date (YYYY-MM-DD) instead of the latest.
    #[arg(long)]
    pub date: Option<String>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TimeseriesArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Country code.
    #[arg(short = 'c', long, value_enum, ignore_case = true)]
    pub country: Country,

    /// Maturity in years.
    #[arg(short = 'm', long)]
    pub maturity: f64,

    /// First date (YYYY-MM-DD); defaults to the configured floor date.
    #[arg(long)]
    pub start: Option<String>,

    /// Last date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub end: Option<String>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Countries to fetch (repeatable); all when omitted.
    #[arg(short = 'c', long = "country", value_enum, ignore_case = true)]
    pub countries: Vec<Country>,

    /// First date to request (overrides the configured floor date).
    #[arg(long)]
    pub start: Option<String>,
}
