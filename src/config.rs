//! Application configuration (TOML).
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! CLI flags are applied on top by `app`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, EXIT_USAGE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Observation table location.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Earliest date the table is expected to cover. Used as the default
    /// range-query start and as the fetch start.
    #[serde(default = "default_floor_date")]
    pub floor_date: NaiveDate,

    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Keep built curves in memory across requests.
    #[serde(default)]
    pub cache_curves: bool,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/yields.csv")
}

fn default_floor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            floor_date: default_floor_date(),
            host: default_host(),
            port: default_port(),
            cache_curves: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                EXIT_USAGE,
                format!("Failed to read config '{}': {e}", path.display()),
            )
        })?;
        Self::from_toml(&content)
            .map_err(|e| AppError::new(EXIT_USAGE, format!("Invalid config '{}': {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, AppError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
