//! Application configuration loaded from environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Where events are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "file" => Ok(StoreBackend::File),
            other => Err(AppError::Config(format!(
                "STORE_BACKEND must be 'memory' or 'file', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::File => write!(f, "file"),
        }
    }
}

/// Service configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `STORE_BACKEND`: `memory` or `file` (default: `memory`)
/// - `DATA_DIR`: journal directory for the file backend (default: `./data`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            store_backend: match lookup("STORE_BACKEND") {
                Some(value) => value.parse()?,
                None => defaults.store_backend,
            },
            data_dir: lookup("DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
        }
    }
}
