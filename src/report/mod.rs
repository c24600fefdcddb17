//! Reporting utilities: formatted terminal output for query results.
//!
//! Formatting lives here so query code returns plain data and output changes
//! stay localized.

pub mod format;

pub use format::*;
