//! Lot type representing one batch of acquired currency.
//!
//! A [`Lot`] carries the quantity of a currency that is still held and the
//! cost basis attributed to that quantity. Lots only ever shrink: the
//! [`Matcher`](crate::Matcher) reduces them proportionally as disposals
//! consume them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An open inventory lot.
///
/// # Examples
///
/// ```
/// use fifochain_core::Lot;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let lot = Lot::new(dec!(400000), dec!(100))
///     .with_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
///
/// assert_eq!(lot.remaining_amount, dec!(400000));
/// assert_eq!(lot.unit_cost(), Some(dec!(0.00025)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lot {
    /// Date the lot was acquired, if known.
    pub acquired_date: Option<NaiveDate>,
    /// Units of the currency still held.
    pub remaining_amount: Decimal,
    /// Cost basis attributed to the remaining units.
    pub remaining_cost: Decimal,
}

impl Lot {
    /// Create a new lot without an acquisition date.
    #[must_use]
    pub const fn new(amount: Decimal, cost: Decimal) -> Self {
        Self {
            acquired_date: None,
            remaining_amount: amount,
            remaining_cost: cost,
        }
    }

    /// Set the acquisition date.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.acquired_date = Some(date);
        self
    }

    /// Check whether the lot is exhausted under the given epsilon.
    #[must_use]
    pub fn is_exhausted(&self, epsilon: Decimal) -> bool {
        self.remaining_amount <= epsilon
    }

    /// Cost per unit, or `None` for an empty lot.
    #[must_use]
    pub fn unit_cost(&self) -> Option<Decimal> {
        if self.remaining_amount.is_zero() {
            None
        } else {
            self.remaining_cost.checked_div(self.remaining_amount)
        }
    }

    /// Take `used` units out of this lot, returning the cost attributed to them.
    ///
    /// The cost is the lot's linear share `used / remaining_amount` of its
    /// remaining cost. Taking the whole lot moves the whole remaining cost, so
    /// the lot never ends with a negative or residual cost.
    pub(crate) fn take(&mut self, used: Decimal) -> Decimal {
        let cost_used = if used >= self.remaining_amount {
            self.remaining_cost
        } else {
            (used / self.remaining_amount * self.remaining_cost).min(self.remaining_cost)
        };

        self.remaining_amount = (self.remaining_amount - used).max(Decimal::ZERO);
        self.remaining_cost = (self.remaining_cost - cost_used).max(Decimal::ZERO);
        cost_used
    }
}

impl fmt::Display for Lot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.remaining_amount, self.remaining_cost)?;
        if let Some(date) = self.acquired_date {
            write!(f, " ({date})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_take_partial() {
        let mut lot = Lot::new(dec!(200), dec!(30));
        let cost = lot.take(dec!(50));

        assert_eq!(cost, dec!(7.5));
        assert_eq!(lot.remaining_amount, dec!(150));
        assert_eq!(lot.remaining_cost, dec!(22.5));
    }

    #[test]
    fn test_take_whole_lot_moves_all_cost() {
        let mut lot = Lot::new(dec!(3), dec!(10));
        lot.take(dec!(1));
        lot.take(dec!(1));
        let last = lot.take(dec!(1));

        assert_eq!(lot.remaining_amount, Decimal::ZERO);
        assert_eq!(lot.remaining_cost, Decimal::ZERO);
        assert!(last > Decimal::ZERO);
    }

    #[test]
    fn test_is_exhausted_at_epsilon() {
        let lot = Lot::new(dec!(0.0001), dec!(1));
        assert!(lot.is_exhausted(dec!(0.0001)));
        assert!(!lot.is_exhausted(dec!(0.00001)));
    }

    #[test]
    fn test_unit_cost_empty() {
        assert_eq!(Lot::new(Decimal::ZERO, dec!(5)).unit_cost(), None);
    }

    #[test]
    fn test_display() {
        let lot = Lot::new(dec!(10), dec!(2))
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(format!("{lot}"), "10 @ 2 (2024-03-01)");
    }
}
