//! Stage table import for fifochain.
//!
//! This crate reads the three stage tables of a conversion chain into a
//! [`ChainInput`]. Tables come either from three CSV files or from one JSON
//! workbook keyed by stage label.
//!
//! Import is lenient the way a spreadsheet is: blank rows are dropped, number
//! cells that do not parse read as zero and dates are kept as entered. The
//! engine later skips any row that is still incomplete. Only unreadable files
//! and malformed documents are errors.
//!
//! # Example
//!
//! ```rust,no_run
//! use fifochain_core::StageCurrencies;
//! use fifochain_import::InputSource;
//! use std::path::PathBuf;
//!
//! let source = InputSource::Workbook(PathBuf::from("chain.json"));
//! let imported = source.load(&StageCurrencies::default())?;
//! for warning in &imported.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! # Ok::<(), fifochain_import::ImportError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod csv_importer;
pub mod row;
pub mod source;
pub mod workbook;

use fifochain_core::{Stage, TransactionRecord};
use fifochain_engine::ChainInput;
use std::path::PathBuf;
use thiserror::Error;

pub use config::{ColumnSpec, StageCsvConfig};
pub use row::parse_money_string;
pub use source::InputSource;
pub use workbook::{load_workbook, parse_workbook};

/// Errors that can occur during import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// IO error reading a file.
    #[error("failed to read file {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed before any row was read.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A named column is missing from the header.
    #[error("column '{0}' not found in header")]
    MissingColumn(String),

    /// The workbook is not valid JSON.
    #[error("invalid workbook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The workbook lacks a stage table.
    #[error("workbook has no '{0}' table")]
    MissingTable(String),

    /// The workbook is valid JSON but not shaped like a workbook.
    #[error("invalid workbook: {0}")]
    Workbook(String),
}

/// Rows of one imported stage table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableImport {
    /// The normalised rows, in file order.
    pub records: Vec<TransactionRecord>,
    /// Warnings encountered during import.
    pub warnings: Vec<String>,
}

/// Result of importing all three stage tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// The stage tables, ready for the chain runner.
    pub input: ChainInput,
    /// Warnings from every table, prefixed with the table label.
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Store `table` as the rows of `stage`.
    pub fn add_table(&mut self, stage: Stage, label: &str, table: TableImport) {
        *self.input.stage_mut(stage) = table.records;
        self.warnings
            .extend(table.warnings.into_iter().map(|w| format!("[{label}] {w}")));
    }

    /// Add a warning to the result.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_import_result_add_table() {
        let table = TableImport {
            records: vec![TransactionRecord::new("2024-01-01", dec!(1), dec!(2))],
            warnings: vec!["Row 2: bad".to_string()],
        };

        let mut result = ImportResult::default();
        result.add_table(Stage::Intermediate, "cop-usdt", table);

        assert_eq!(result.input.intermediate.len(), 1);
        assert!(result.input.origin.is_empty());
        assert_eq!(result.warnings, vec!["[cop-usdt] Row 2: bad"]);
    }

    #[test]
    fn test_import_result_with_warning() {
        let result = ImportResult::default().with_warning("Test warning");
        assert_eq!(result.warnings, vec!["Test warning"]);
    }

    #[test]
    fn test_error_display() {
        let err = ImportError::MissingTable("usd-cop".to_string());
        assert_eq!(err.to_string(), "workbook has no 'usd-cop' table");
    }
}
