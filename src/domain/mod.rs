//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the supported curves (`Country`)
//! - stored observations and their projection onto a curve (`Observation`, `CurvePoint`)
//! - query answers (`PointYield`, `YieldSeries`, `SeriesEntry`)

pub mod types;

pub use types::*;
