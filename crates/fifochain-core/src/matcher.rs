//! FIFO matching of a requested amount against a [`LotQueue`].
//!
//! The [`Matcher`] consumes lots from the head of a queue until the request is
//! covered or the queue runs dry. Each lot it touches gives up a linear share
//! of its cost basis; nothing is averaged across the queue.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_EPSILON;
use crate::LotQueue;

/// The part of one lot consumed by a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotFill {
    /// Acquisition date of the lot the units came from.
    pub acquired_date: Option<NaiveDate>,
    /// Units taken from the lot.
    pub amount: Decimal,
    /// Cost basis taken with those units.
    pub cost: Decimal,
}

/// Result of matching one request against a queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// The amount that was requested.
    pub requested: Decimal,
    /// Lot fills, in consumption order.
    pub fills: Vec<LotFill>,
    /// Sum of the cost of all fills.
    pub total_cost: Decimal,
    /// Requested units no lot could cover.
    pub uncovered: Decimal,
}

impl MatchOutcome {
    /// Units actually matched across all fills.
    #[must_use]
    pub fn matched_amount(&self) -> Decimal {
        self.fills.iter().map(|f| f.amount).sum()
    }

    /// The uncovered amount when it exceeds `epsilon`.
    #[must_use]
    pub fn shortfall(&self, epsilon: Decimal) -> Option<Decimal> {
        (self.uncovered > epsilon).then_some(self.uncovered)
    }
}

/// Consumes lots oldest-first with proportional cost splitting.
///
/// # Examples
///
/// ```
/// use fifochain_core::{Lot, LotQueue, Matcher};
/// use rust_decimal_macros::dec;
///
/// let mut queue = LotQueue::new();
/// queue.enqueue(Lot::new(dec!(100), dec!(10))).unwrap();
/// queue.enqueue(Lot::new(dec!(200), dec!(30))).unwrap();
///
/// let outcome = Matcher::default().consume(&mut queue, dec!(150));
///
/// assert_eq!(outcome.total_cost, dec!(17.5));
/// assert_eq!(queue.len(), 1);
/// assert_eq!(queue.peek_oldest().unwrap().remaining_cost, dec!(22.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    epsilon: Decimal,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl Matcher {
    /// Create a matcher with the given exhaustion threshold.
    ///
    /// A negative threshold is clamped to zero.
    #[must_use]
    pub fn new(epsilon: Decimal) -> Self {
        Self {
            epsilon: epsilon.max(Decimal::ZERO),
        }
    }

    /// The exhaustion threshold.
    #[must_use]
    pub const fn epsilon(&self) -> Decimal {
        self.epsilon
    }

    /// Consume `requested` units from `queue`.
    ///
    /// Lots are taken from the head until nothing remains to match or the
    /// queue is empty. A lot whose remaining amount drops to the epsilon or
    /// below is removed right after the step that drained it.
    pub fn consume(&self, queue: &mut LotQueue, requested: Decimal) -> MatchOutcome {
        let mut remaining = requested;
        let mut fills = Vec::new();
        let mut total_cost = Decimal::ZERO;

        while remaining > Decimal::ZERO {
            let Some(lot) = queue.peek_oldest_mut() else {
                break;
            };

            let used = remaining.min(lot.remaining_amount);
            if used <= Decimal::ZERO {
                break;
            }
            let acquired_date = lot.acquired_date;
            let cost = lot.take(used);

            remaining -= used;
            total_cost = total_cost.saturating_add(cost);
            fills.push(LotFill {
                acquired_date,
                amount: used,
                cost,
            });

            queue.remove_oldest_if_exhausted(self.epsilon);
        }

        MatchOutcome {
            requested,
            fills,
            total_cost,
            uncovered: remaining.max(Decimal::ZERO),
        }
    }
}
