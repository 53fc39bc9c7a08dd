//! Three-stage FIFO conversion chain.
//!
//! This crate threads three [`Matcher`](fifochain_core::Matcher) passes
//! through a chain of conversions A → B → C → D:
//!
//! - Origin rows (A → B) open lots of B valued at the A spent
//! - Intermediate rows (B → C) consume B lots and open a C lot carrying their cost
//! - Settlement rows (C → D) consume C lots and realize gains per matched lot
//!
//! The result holds the matched-lot detail rows, totals, remaining lots of B
//! and C, and an alert for every row the lots could not cover. Nothing in a
//! run fails: incomplete rows are skipped and shortfalls are reported.
//!
//! ```
//! use fifochain_core::{EngineConfig, TransactionRecord};
//! use fifochain_engine::{run_chain, ChainInput};
//! use rust_decimal_macros::dec;
//!
//! let input = ChainInput {
//!     origin: vec![TransactionRecord::new("2024-01-01", dec!(100), dec!(400000))],
//!     intermediate: vec![TransactionRecord::new("2024-01-05", dec!(400000), dec!(100))],
//!     settlement: vec![TransactionRecord::new("2024-02-01", dec!(50), dec!(55))],
//! };
//!
//! let result = run_chain(&input, &EngineConfig::default());
//!
//! assert_eq!(result.totals.gain, dec!(5));
//! assert_eq!(result.consumptions[0].holding_days, Some(27));
//! assert_eq!(result.remaining_second.amount, dec!(50));
//! assert!(result.alerts.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod result;

pub use chain::{run_chain, ChainInput, ChainRunner};
pub use result::{
    ConsumptionRecord, DroppedAcquisition, GainReconciliation, Holdings, RunResult,
    ShortfallAlert, Totals,
};
