//! FIFO cost-basis reporting for a conversion chain.
//!
//! This crate provides the `fifochain-report` command. It reads the three
//! stage tables of a USD -> COP -> USDT -> USD chain, runs the FIFO engine
//! and prints realized gains, remaining lots and shortfall alerts.
//!
//! # Example Usage
//!
//! ```bash
//! fifochain-report --workbook chain.json
//! fifochain-report --usd-cop a.csv --cop-usdt b.csv --usdt-usd c.csv --format json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod config;
pub mod report;
