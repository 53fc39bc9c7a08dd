//! Report configuration file.
//!
//! The configuration is a JSON document. Every field is optional:
//!
//! ```json
//! {
//!   "epsilon": "0.0001",
//!   "zero_cost_policy": "drop",
//!   "currencies": { "origin": "USD", "first": "COP", "second": "USDT", "settlement": "USD" },
//!   "number_format": { "fraction_digits": 2, "decimal_separator": ",", "group_separator": "." },
//!   "workbook": "chain.json",
//!   "format": "text"
//! }
//! ```
//!
//! Relative input paths are resolved against the directory of the file.
//! When no file is named on the command line, `fifochain/config.json` under
//! the user configuration directory is read if it exists.

use crate::report::OutputFormat;
use fifochain_core::{EngineConfig, NumberFormat, StageCurrencies};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the file.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid configuration document.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A negative epsilon was configured.
    #[error("epsilon must not be negative, got {0}")]
    NegativeEpsilon(Decimal),
}

/// One CSV file per stage table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePaths {
    /// The A → B table.
    pub origin: PathBuf,
    /// The B → C table.
    pub intermediate: PathBuf,
    /// The C → D table.
    pub settlement: PathBuf,
}

/// Settings of a report run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine tunables.
    #[serde(flatten)]
    pub engine: EngineConfig,
    /// Stage currency codes.
    pub currencies: StageCurrencies,
    /// Number display format.
    pub number_format: NumberFormat,
    /// JSON workbook holding all three tables.
    pub workbook: Option<PathBuf>,
    /// CSV files, one per table.
    pub tables: Option<TablePaths>,
    /// Output format.
    pub format: Option<OutputFormat>,
}

impl Config {
    /// The per-user configuration file, `fifochain/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fifochain").join("config.json"))
    }

    /// Load the configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given, else the per-user file if it exists, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.epsilon < Decimal::ZERO {
            return Err(ConfigError::NegativeEpsilon(self.engine.epsilon));
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        if let Some(workbook) = &mut self.workbook {
            resolve(workbook);
        }
        if let Some(tables) = &mut self.tables {
            resolve(&mut tables.origin);
            resolve(&mut tables.intermediate);
            resolve(&mut tables.settlement);
        }
    }
}
