//! Normalisation of raw table cells into [`TransactionRecord`]s.

use fifochain_core::{parse_calendar_date, TransactionRecord};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a money string, handling currency symbols, grouping commas and
/// parentheses for negatives.
///
/// Returns `None` for blank or non-numeric text.
pub fn parse_money_string(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(value) = Decimal::from_str(s) {
        return Some(value);
    }
    if s.contains(['e', 'E']) {
        // Exponent notation is never symbol-stripped
        return Decimal::from_scientific(s).ok();
    }

    let (is_negative, s) = if s.starts_with('(') && s.ends_with(')') {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };

    // Drop currency symbols and grouping commas
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if is_negative { -value } else { value })
}

/// Turn the three raw cells of a row into a record.
///
/// Blank amount cells read as zero. Text that is not a number also reads as
/// zero, with a warning, so the engine skips the row later. A row whose
/// cells are all blank or zero is dropped and yields `None`.
pub fn normalize_row(
    row_num: usize,
    date: &str,
    input: &str,
    output: &str,
    warnings: &mut Vec<String>,
) -> Option<TransactionRecord> {
    let date = date.trim();
    let input_amount = lenient_amount(row_num, "input", input, warnings);
    let output_amount = lenient_amount(row_num, "output", output, warnings);

    let record = TransactionRecord::new(date, input_amount, output_amount);
    if record.is_blank() {
        return None;
    }

    if !date.is_empty() && parse_calendar_date(date).is_none() {
        warnings.push(format!(
            "Row {row_num}: date '{date}' is not a YYYY-MM-DD calendar date"
        ));
    }

    Some(record)
}

fn lenient_amount(row_num: usize, field: &str, cell: &str, warnings: &mut Vec<String>) -> Decimal {
    if cell.trim().is_empty() {
        return Decimal::ZERO;
    }
    parse_money_string(cell).unwrap_or_else(|| {
        warnings.push(format!(
            "Row {row_num}: {field} amount '{}' is not a number, read as 0",
            cell.trim()
        ));
        Decimal::ZERO
    })
}
