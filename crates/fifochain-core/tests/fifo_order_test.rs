//! Queue order is acquisition order.
//!
//! Lots are appended in the order their stage rows are processed, and the
//! matcher always consumes the head. A row entered with an earlier date
//! after a later one does not jump the queue.

use chrono::NaiveDate;
use fifochain_core::{holding_days, Lot, LotQueue, Matcher};
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// 1. Enqueue lot dated 2024-01-02
/// 2. Enqueue lot dated 2024-01-01 (older date, entered second)
/// 3. Consuming takes the first-entered lot
#[test]
fn fifo_follows_entry_order_not_date() {
    let mut queue = LotQueue::new();

    queue
        .enqueue(Lot::new(dec!(10), dec!(150)).with_date(date(2024, 1, 2)))
        .unwrap();
    queue
        .enqueue(Lot::new(dec!(10), dec!(100)).with_date(date(2024, 1, 1)))
        .unwrap();

    let outcome = Matcher::default().consume(&mut queue, dec!(5));

    assert_eq!(outcome.fills.len(), 1);
    assert_eq!(
        outcome.total_cost,
        dec!(75),
        "expected 5 units at 15 from the first-entered lot, got {}",
        outcome.total_cost
    );
    assert_eq!(outcome.fills[0].acquired_date, Some(date(2024, 1, 2)));
}

/// A disposal dated before the lot it consumes counts as zero days held.
#[test]
fn out_of_order_disposal_holds_zero_days() {
    let mut queue = LotQueue::new();
    queue
        .enqueue(Lot::new(dec!(10), dec!(10)).with_date(date(2024, 3, 1)))
        .unwrap();

    let outcome = Matcher::default().consume(&mut queue, dec!(10));
    let days = holding_days(outcome.fills[0].acquired_date, Some(date(2024, 2, 1)));

    assert_eq!(days, Some(0));
}

/// A newer lot is untouched while the head still has units above epsilon.
#[test]
fn newer_lot_untouched_while_head_has_units() {
    let mut queue = LotQueue::new();
    queue.enqueue(Lot::new(dec!(100), dec!(10))).unwrap();
    queue.enqueue(Lot::new(dec!(100), dec!(20))).unwrap();

    let matcher = Matcher::default();
    for _ in 0..9 {
        matcher.consume(&mut queue, dec!(10));
    }

    let lots: Vec<&Lot> = queue.iter().collect();
    assert_eq!(lots.len(), 2);
    assert_eq!(lots[0].remaining_amount, dec!(10));
    assert_eq!(lots[1].remaining_amount, dec!(100));
    assert_eq!(lots[1].remaining_cost, dec!(20));
}
