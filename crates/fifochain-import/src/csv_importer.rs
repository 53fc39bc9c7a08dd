//! CSV stage table importer.

use crate::config::{ColumnSpec, StageCsvConfig};
use crate::row::normalize_row;
use crate::{ImportError, TableImport};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads one stage table from CSV.
pub struct StageCsvImporter {
    config: StageCsvConfig,
}

/// Column indices resolved against the header.
struct Columns {
    date: usize,
    input: usize,
    output: usize,
}

impl StageCsvImporter {
    /// Create a new importer with the given configuration.
    pub const fn new(config: StageCsvConfig) -> Self {
        Self { config }
    }

    /// Import the table stored in `path`.
    pub fn extract_file(&self, path: &Path) -> Result<TableImport, ImportError> {
        let content = fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = self.extract_string(&content)?;
        debug!(
            path = %path.display(),
            rows = table.records.len(),
            warnings = table.warnings.len(),
            "imported stage table"
        );
        Ok(table)
    }

    /// Import a table from string content.
    pub fn extract_string(&self, content: &str) -> Result<TableImport, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.config.has_header)
            .delimiter(self.config.delimiter)
            .flexible(true)
            .from_reader(content.as_bytes());

        // Build column name to index map from headers
        let header_map: HashMap<String, usize> = if self.config.has_header {
            reader
                .headers()?
                .iter()
                .enumerate()
                .map(|(i, h)| (h.trim().to_string(), i))
                .collect()
        } else {
            HashMap::new()
        };

        let columns = Columns {
            date: resolve(&self.config.date_column, &header_map)?,
            input: resolve(&self.config.input_column, &header_map)?,
            output: resolve(&self.config.output_column, &header_map)?,
        };

        let mut table = TableImport::default();
        let mut row_num = self.config.skip_rows;

        for result in reader.records().skip(self.config.skip_rows) {
            row_num += 1;
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    table.warnings.push(format!("Row {row_num}: parse error: {e}"));
                    continue;
                }
            };

            let cell = |index: usize| record.get(index).unwrap_or("");
            if let Some(row) = normalize_row(
                row_num,
                cell(columns.date),
                cell(columns.input),
                cell(columns.output),
                &mut table.warnings,
            ) {
                table.records.push(row);
            }
        }

        Ok(table)
    }
}

fn resolve(spec: &ColumnSpec, header_map: &HashMap<String, usize>) -> Result<usize, ImportError> {
    match spec {
        ColumnSpec::Index(i) => Ok(*i),
        ColumnSpec::Name(name) => header_map
            .get(name)
            .copied()
            .ok_or_else(|| ImportError::MissingColumn(name.clone())),
    }
}
