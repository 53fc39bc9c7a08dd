//! Stage transaction records and stage naming.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::holding::parse_calendar_date;

/// One row of a stage table.
///
/// The meaning of the two amounts depends on the [`Stage`]: the first is
/// what was given up, the second what was received. For the default chain,
/// a [`Stage::Origin`] row is "USD spent, COP received".
///
/// The date is kept as entered; [`TransactionRecord::calendar_date`] decides
/// whether it is usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// ISO calendar date (`YYYY-MM-DD`) as entered.
    pub date: String,
    /// Amount given up.
    pub input_amount: Decimal,
    /// Amount received.
    pub output_amount: Decimal,
}

impl TransactionRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(date: impl Into<String>, input_amount: Decimal, output_amount: Decimal) -> Self {
        Self {
            date: date.into(),
            input_amount,
            output_amount,
        }
    }

    /// The parsed date, or `None` when blank or not a valid calendar date.
    #[must_use]
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// The parsed date when the row is complete enough to process.
    ///
    /// A row is processed only when both amounts are positive and the date
    /// parses. Anything else is treated as not yet entered.
    #[must_use]
    pub fn processable_date(&self) -> Option<NaiveDate> {
        if self.input_amount <= Decimal::ZERO || self.output_amount <= Decimal::ZERO {
            return None;
        }
        self.calendar_date()
    }

    /// Check if every field is blank or zero.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.date.trim().is_empty() && self.input_amount.is_zero() && self.output_amount.is_zero()
    }
}

/// A stage of the conversion chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// A → B: origin currency converted into the first intermediate.
    Origin,
    /// B → C: first intermediate converted into the second.
    Intermediate,
    /// C → D: second intermediate sold for the settlement currency.
    Settlement,
}

impl Stage {
    /// All stages in chain order.
    pub const ALL: [Self; 3] = [Self::Origin, Self::Intermediate, Self::Settlement];
}

/// Currency codes of the four points of the chain.
///
/// # Examples
///
/// ```
/// use fifochain_core::{Stage, StageCurrencies};
///
/// let currencies = StageCurrencies::default();
/// assert_eq!(currencies.label(Stage::Intermediate), "cop-usdt");
/// assert_eq!(currencies.consumed(Stage::Settlement), "USDT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct StageCurrencies {
    /// Currency A, spent in the first stage.
    pub origin: String,
    /// Currency B, held between the first and second stage.
    pub first: String,
    /// Currency C, held between the second and third stage.
    pub second: String,
    /// Currency D, received when C is sold.
    pub settlement: String,
}

impl Default for StageCurrencies {
    fn default() -> Self {
        Self {
            origin: "USD".to_string(),
            first: "COP".to_string(),
            second: "USDT".to_string(),
            settlement: "USD".to_string(),
        }
    }
}

impl StageCurrencies {
    /// Currency given up in `stage`.
    #[must_use]
    pub fn consumed(&self, stage: Stage) -> &str {
        match stage {
            Stage::Origin => &self.origin,
            Stage::Intermediate => &self.first,
            Stage::Settlement => &self.second,
        }
    }

    /// Currency received in `stage`.
    #[must_use]
    pub fn produced(&self, stage: Stage) -> &str {
        match stage {
            Stage::Origin => &self.first,
            Stage::Intermediate => &self.second,
            Stage::Settlement => &self.settlement,
        }
    }

    /// Table label of `stage`, e.g. `usd-cop`.
    #[must_use]
    pub fn label(&self, stage: Stage) -> String {
        format!("{}-{}", self.consumed(stage), self.produced(stage)).to_lowercase()
    }
}

impl fmt::Display for StageCurrencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} -> {} -> {}",
            self.origin, self.first, self.second, self.settlement
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_processable_date() {
        let record = TransactionRecord::new("2024-01-01", dec!(100), dec!(400000));
        assert_eq!(
            record.processable_date(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn test_incomplete_rows_are_not_processable() {
        let cases = [
            TransactionRecord::new("", dec!(1), dec!(1)),
            TransactionRecord::new("2024-02-30", dec!(1), dec!(1)),
            TransactionRecord::new("yesterday", dec!(1), dec!(1)),
            TransactionRecord::new("2024-01-01", Decimal::ZERO, dec!(1)),
            TransactionRecord::new("2024-01-01", dec!(1), dec!(-1)),
        ];
        for record in cases {
            assert_eq!(record.processable_date(), None, "{record:?}");
        }
    }

    #[test]
    fn test_is_blank() {
        assert!(TransactionRecord::default().is_blank());
        assert!(TransactionRecord::new("  ", Decimal::ZERO, Decimal::ZERO).is_blank());
        assert!(!TransactionRecord::new("", dec!(1), Decimal::ZERO).is_blank());
    }

    #[test]
    fn test_stage_labels() {
        let currencies = StageCurrencies::default();
        let labels: Vec<String> = Stage::ALL.iter().map(|s| currencies.label(*s)).collect();
        assert_eq!(labels, vec!["usd-cop", "cop-usdt", "usdt-usd"]);
    }

    #[test]
    fn test_display_currencies() {
        assert_eq!(
            StageCurrencies::default().to_string(),
            "USD -> COP -> USDT -> USD"
        );
    }
}
