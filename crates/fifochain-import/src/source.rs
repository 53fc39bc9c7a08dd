//! Where the stage tables of a run come from.

use crate::config::StageCsvConfig;
use crate::workbook::load_workbook;
use crate::{ImportError, ImportResult};
use fifochain_core::{Stage, StageCurrencies};
use std::path::{Path, PathBuf};

/// Source of the three stage tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// One JSON workbook holding all three tables.
    Workbook(PathBuf),
    /// One CSV file per stage.
    CsvTables {
        /// The A → B table.
        origin: PathBuf,
        /// The B → C table.
        intermediate: PathBuf,
        /// The C → D table.
        settlement: PathBuf,
    },
}

impl InputSource {
    /// Load the tables, reading CSV files with the default layout.
    pub fn load(&self, currencies: &StageCurrencies) -> Result<ImportResult, ImportError> {
        self.load_with(currencies, &StageCsvConfig::default())
    }

    /// Load the tables, reading CSV files with `csv_config`.
    pub fn load_with(
        &self,
        currencies: &StageCurrencies,
        csv_config: &StageCsvConfig,
    ) -> Result<ImportResult, ImportError> {
        match self {
            Self::Workbook(path) => load_workbook(path, currencies),
            Self::CsvTables { .. } => {
                let mut result = ImportResult::default();
                for stage in Stage::ALL {
                    let table = csv_config.extract(self.table_path(stage))?;
                    result.add_table(stage, &currencies.label(stage), table);
                }
                Ok(result)
            }
        }
    }

    /// The file holding the rows of `stage`.
    pub fn table_path(&self, stage: Stage) -> &Path {
        match self {
            Self::Workbook(path) => path,
            Self::CsvTables {
                origin,
                intermediate,
                settlement,
            } => match stage {
                Stage::Origin => origin,
                Stage::Intermediate => intermediate,
                Stage::Settlement => settlement,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_path() {
        let source = InputSource::CsvTables {
            origin: PathBuf::from("a.csv"),
            intermediate: PathBuf::from("b.csv"),
            settlement: PathBuf::from("c.csv"),
        };
        assert_eq!(source.table_path(Stage::Intermediate), Path::new("b.csv"));

        let workbook = InputSource::Workbook(PathBuf::from("chain.json"));
        assert_eq!(workbook.table_path(Stage::Settlement), Path::new("chain.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = InputSource::Workbook(PathBuf::from("/nonexistent/fifochain/chain.json"));
        let err = source.load(&StageCurrencies::default()).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }
}
