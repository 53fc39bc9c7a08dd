//! Configuration for stage table imports.

use crate::csv_importer::StageCsvImporter;
use crate::{ImportError, TableImport};
use std::path::Path;

/// Layout of a stage table CSV file.
///
/// The default layout is a header row followed by `date,<in>,<out>` rows,
/// with columns read by position so the header text is free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCsvConfig {
    /// The column holding the row date.
    pub date_column: ColumnSpec,
    /// The column holding the amount given up.
    pub input_column: ColumnSpec,
    /// The column holding the amount received.
    pub output_column: ColumnSpec,
    /// Whether the CSV has a header row.
    pub has_header: bool,
    /// The field delimiter byte.
    pub delimiter: u8,
    /// Number of rows to skip at the beginning.
    pub skip_rows: usize,
}

impl Default for StageCsvConfig {
    fn default() -> Self {
        Self {
            date_column: ColumnSpec::Index(0),
            input_column: ColumnSpec::Index(1),
            output_column: ColumnSpec::Index(2),
            has_header: true,
            delimiter: b',',
            skip_rows: 0,
        }
    }
}

/// Specification for a column in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// Column specified by name (from header).
    Name(String),
    /// Column specified by zero-based index.
    Index(usize),
}

impl StageCsvConfig {
    /// Start building a configuration from the default layout.
    pub fn builder() -> StageCsvConfigBuilder {
        StageCsvConfigBuilder::new()
    }

    /// Import the table stored in `path`.
    pub fn extract(&self, path: &Path) -> Result<TableImport, ImportError> {
        StageCsvImporter::new(self.clone()).extract_file(path)
    }

    /// Import a table from string content.
    pub fn extract_from_string(&self, content: &str) -> Result<TableImport, ImportError> {
        StageCsvImporter::new(self.clone()).extract_string(content)
    }
}

/// Builder for [`StageCsvConfig`].
#[derive(Debug, Default)]
pub struct StageCsvConfigBuilder {
    config: StageCsvConfig,
}

impl StageCsvConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the date column by name.
    pub fn date_column(mut self, name: impl Into<String>) -> Self {
        self.config.date_column = ColumnSpec::Name(name.into());
        self
    }

    /// Set the date column by index.
    pub fn date_column_index(mut self, index: usize) -> Self {
        self.config.date_column = ColumnSpec::Index(index);
        self
    }

    /// Set the input amount column by name.
    pub fn input_column(mut self, name: impl Into<String>) -> Self {
        self.config.input_column = ColumnSpec::Name(name.into());
        self
    }

    /// Set the input amount column by index.
    pub fn input_column_index(mut self, index: usize) -> Self {
        self.config.input_column = ColumnSpec::Index(index);
        self
    }

    /// Set the output amount column by name.
    pub fn output_column(mut self, name: impl Into<String>) -> Self {
        self.config.output_column = ColumnSpec::Name(name.into());
        self
    }

    /// Set the output amount column by index.
    pub fn output_column_index(mut self, index: usize) -> Self {
        self.config.output_column = ColumnSpec::Index(index);
        self
    }

    /// Set whether the CSV has a header row.
    pub const fn has_header(mut self, has_header: bool) -> Self {
        self.config.has_header = has_header;
        self
    }

    /// Set the field delimiter byte.
    pub const fn delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Set the number of rows to skip.
    pub const fn skip_rows(mut self, count: usize) -> Self {
        self.config.skip_rows = count;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> StageCsvConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_positional() {
        let config = StageCsvConfig::default();
        assert_eq!(config.date_column, ColumnSpec::Index(0));
        assert_eq!(config.input_column, ColumnSpec::Index(1));
        assert_eq!(config.output_column, ColumnSpec::Index(2));
        assert!(config.has_header);
        assert_eq!(config.delimiter, b',');
    }

    #[test]
    fn test_builder_column_indexes() {
        let config = StageCsvConfig::builder()
            .date_column_index(2)
            .input_column_index(0)
            .output_column_index(1)
            .build();

        assert_eq!(config.date_column, ColumnSpec::Index(2));
        assert_eq!(config.input_column, ColumnSpec::Index(0));
        assert_eq!(config.output_column, ColumnSpec::Index(1));

        let table = config
            .extract_from_string("usd,cop,date\n100,400000,2024-01-01\n")
            .unwrap();
        assert_eq!(table.records[0].date, "2024-01-01");
        assert_eq!(table.records[0].output_amount, rust_decimal_macros::dec!(400000));
    }

    #[test]
    fn test_builder() {
        let config = StageCsvConfig::builder()
            .date_column("Fecha")
            .input_column_index(3)
            .output_column("Recibido")
            .delimiter(b';')
            .skip_rows(1)
            .build();

        assert_eq!(config.date_column, ColumnSpec::Name("Fecha".to_string()));
        assert_eq!(config.input_column, ColumnSpec::Index(3));
        assert_eq!(config.output_column, ColumnSpec::Name("Recibido".to_string()));
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.skip_rows, 1);
    }
}
