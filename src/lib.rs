//! `yield-curves` library crate.
//!
//! The binary (`yc`) is a thin wrapper around this library so that:
//!
//! - curve construction and queries are testable without spawning processes
//! - the HTTP server and the CLI share one query engine
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod curve;
pub mod data;
pub mod domain;
pub mod error;
pub mod math;
pub mod query;
pub mod report;
pub mod server;
pub mod store;
