//! JSON workbook importer.
//!
//! A workbook holds the three stage tables in one document, keyed by stage
//! label:
//!
//! ```json
//! {
//!   "usd-cop":  [["2024-01-01", 100, 400000]],
//!   "cop-usdt": [["2024-01-05", "400000", "100"]],
//!   "usdt-usd": [{ "date": "2024-02-01", "input_amount": 50, "output_amount": 55 }]
//! }
//! ```
//!
//! A row is either a `[date, input, output]` array or an object with the
//! same fields by name. Cells may be strings or numbers and go through the
//! same lenient normalisation as CSV cells.

use crate::row::normalize_row;
use crate::{ImportError, ImportResult, TableImport};
use fifochain_core::{Stage, StageCurrencies};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Import a workbook file.
pub fn load_workbook(path: &Path, currencies: &StageCurrencies) -> Result<ImportResult, ImportError> {
    let content = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_workbook(&content, currencies)
}

/// Import a workbook from string content.
pub fn parse_workbook(content: &str, currencies: &StageCurrencies) -> Result<ImportResult, ImportError> {
    let document: Value = serde_json::from_str(content)?;
    let Value::Object(tables) = document else {
        return Err(ImportError::Workbook(
            "top level must be an object keyed by table label".to_string(),
        ));
    };

    let mut result = ImportResult::default();
    for stage in Stage::ALL {
        let label = currencies.label(stage);
        let rows = tables
            .get(&label)
            .ok_or_else(|| ImportError::MissingTable(label.clone()))?;
        let table = parse_table(&label, rows)?;

        debug!(table = %label, rows = table.records.len(), "imported workbook table");
        result.add_table(stage, &label, table);
    }

    Ok(result)
}

fn parse_table(label: &str, rows: &Value) -> Result<TableImport, ImportError> {
    let Value::Array(rows) = rows else {
        return Err(ImportError::Workbook(format!(
            "table '{label}' must be an array of rows"
        )));
    };

    let mut table = TableImport::default();
    for (index, row) in rows.iter().enumerate() {
        let row_num = index + 1;
        let cells = match row {
            Value::Array(cells) => [cells.first(), cells.get(1), cells.get(2)].map(cell_text),
            Value::Object(fields) => ["date", "input_amount", "output_amount"]
                .map(|key| cell_text(fields.get(key))),
            Value::Null => continue,
            other => {
                table.warnings.push(format!(
                    "Row {row_num}: expected an array or object, found {other}"
                ));
                continue;
            }
        };

        if let Some(record) =
            normalize_row(row_num, &cells[0], &cells[1], &cells[2], &mut table.warnings)
        {
            table.records.push(record);
        }
    }

    Ok(table)
}

fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
