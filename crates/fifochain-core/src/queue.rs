//! FIFO queue of open lots for a single currency.
//!
//! A [`LotQueue`] holds the unconsumed [`Lot`]s of one intermediate or final
//! currency in acquisition order. New lots are appended to the tail; the
//! [`Matcher`](crate::Matcher) always works on the head.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

use crate::Lot;

/// Error returned when a lot cannot be enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The lot has no units.
    #[error("lot amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    /// The lot has a negative cost basis.
    #[error("lot cost must not be negative, got {0}")]
    NegativeCost(Decimal),
}

/// An ordered collection of open lots, oldest first.
///
/// # Examples
///
/// ```
/// use fifochain_core::{Lot, LotQueue};
/// use rust_decimal_macros::dec;
///
/// let mut queue = LotQueue::new();
/// queue.enqueue(Lot::new(dec!(100), dec!(10))).unwrap();
/// queue.enqueue(Lot::new(dec!(200), dec!(30))).unwrap();
///
/// assert_eq!(queue.len(), 2);
/// assert_eq!(queue.total_amount(), dec!(300));
/// assert_eq!(queue.peek_oldest().unwrap().remaining_cost, dec!(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotQueue {
    lots: VecDeque<Lot>,
}

impl LotQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lot to the tail of the queue.
    ///
    /// Only the amount and cost signs are checked; callers filter invalid
    /// rows before they become lots.
    pub fn enqueue(&mut self, lot: Lot) -> Result<(), QueueError> {
        if lot.remaining_amount <= Decimal::ZERO {
            return Err(QueueError::NonPositiveAmount(lot.remaining_amount));
        }
        if lot.remaining_cost < Decimal::ZERO {
            return Err(QueueError::NegativeCost(lot.remaining_cost));
        }
        self.lots.push_back(lot);
        Ok(())
    }

    /// The oldest lot, if any.
    #[must_use]
    pub fn peek_oldest(&self) -> Option<&Lot> {
        self.lots.front()
    }

    pub(crate) fn peek_oldest_mut(&mut self) -> Option<&mut Lot> {
        self.lots.front_mut()
    }

    /// Pop the oldest lot if its remaining amount is at or below `epsilon`.
    ///
    /// Returns the removed lot, or `None` when the head still holds units
    /// (or the queue is empty).
    pub fn remove_oldest_if_exhausted(&mut self, epsilon: Decimal) -> Option<Lot> {
        if self.lots.front()?.is_exhausted(epsilon) {
            self.lots.pop_front()
        } else {
            None
        }
    }

    /// Check if the queue holds no lots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Number of lots in the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lots.len()
    }

    /// Iterate over the lots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter()
    }

    /// Sum of the remaining amounts of all lots, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.lots
            .iter()
            .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.remaining_amount))
    }

    /// Sum of the remaining cost of all lots, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.lots
            .iter()
            .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.remaining_cost))
    }

    /// Consume the queue, returning its lots oldest first.
    #[must_use]
    pub fn into_lots(self) -> Vec<Lot> {
        self.lots.into()
    }
}

impl fmt::Display for LotQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }

        for (i, lot) in self.lots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{lot}")?;
        }
        Ok(())
    }
}
