//! Core types for fifochain
//!
//! This crate provides the FIFO lot-matching primitive used by the
//! conversion-chain engine:
//!
//! - [`Lot`] - Units of a currency still held, with their cost basis
//! - [`LotQueue`] - Open lots of one currency, oldest first
//! - [`Matcher`] - Consumes a requested amount from a queue with proportional cost splitting
//! - [`TransactionRecord`] - One row of a stage table
//! - [`EngineConfig`] - Epsilon and zero-cost policy
//! - [`NumberFormat`] - Display rounding and grouping
//!
//! # Example
//!
//! ```
//! use fifochain_core::{Lot, LotQueue, Matcher};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let mut queue = LotQueue::new();
//! queue
//!     .enqueue(Lot::new(dec!(100), dec!(100)).with_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()))
//!     .unwrap();
//!
//! // Sell 50 units oldest-first
//! let outcome = Matcher::default().consume(&mut queue, dec!(50));
//!
//! assert_eq!(outcome.total_cost, dec!(50));
//! assert_eq!(queue.total_amount(), dec!(50));
//! assert!(outcome.shortfall(dec!(0.0001)).is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod format;
pub mod holding;
pub mod lot;
pub mod matcher;
pub mod queue;
pub mod record;

pub use config::{EngineConfig, ZeroCostPolicy, DEFAULT_EPSILON};
pub use format::{format_days, NumberFormat};
pub use holding::{holding_days, parse_calendar_date};
pub use lot::Lot;
pub use matcher::{LotFill, MatchOutcome, Matcher};
pub use queue::{LotQueue, QueueError};
pub use record::{Stage, StageCurrencies, TransactionRecord};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
