//! Property-based tests for fifochain-core.
//!
//! These tests verify the lot and matcher invariants hold for arbitrary
//! queues and requests using proptest.
//!
//! Run with: cargo test -p fifochain-core --test `property_tests`

use fifochain_core::{Lot, LotQueue, Matcher, DEFAULT_EPSILON};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_positive_decimal() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

fn arb_cost() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_lot() -> impl Strategy<Value = Lot> {
    (arb_positive_decimal(), arb_cost()).prop_map(|(amount, cost)| Lot::new(amount, cost))
}

fn arb_queue() -> impl Strategy<Value = LotQueue> {
    prop::collection::vec(arb_lot(), 0..12).prop_map(|lots| {
        let mut queue = LotQueue::new();
        for lot in lots {
            queue.enqueue(lot).expect("generated lots are valid");
        }
        queue
    })
}

// ============================================================================
// Matcher Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Lots never hold negative amounts or costs after a match
    #[test]
    fn prop_lots_stay_non_negative(
        mut queue in arb_queue(),
        requests in prop::collection::vec(arb_positive_decimal(), 1..6)
    ) {
        let matcher = Matcher::default();
        for requested in requests {
            let outcome = matcher.consume(&mut queue, requested);
            for fill in &outcome.fills {
                prop_assert!(fill.amount > Decimal::ZERO);
                prop_assert!(fill.cost >= Decimal::ZERO);
            }
            for lot in queue.iter() {
                prop_assert!(lot.remaining_amount >= Decimal::ZERO, "{:?}", lot);
                prop_assert!(lot.remaining_cost >= Decimal::ZERO, "{:?}", lot);
            }
        }
    }

    /// Matched units plus the uncovered remainder equal the request
    #[test]
    fn prop_matched_plus_uncovered_is_requested(
        mut queue in arb_queue(),
        requested in arb_positive_decimal()
    ) {
        let outcome = Matcher::default().consume(&mut queue, requested);
        prop_assert_eq!(outcome.matched_amount() + outcome.uncovered, requested);
        prop_assert!(outcome.matched_amount() <= requested);
    }

    /// Units leave the queue only through fills or exhausted-lot removal
    #[test]
    fn prop_units_are_conserved(
        mut queue in arb_queue(),
        requested in arb_positive_decimal()
    ) {
        let before = queue.total_amount();
        let outcome = Matcher::default().consume(&mut queue, requested);
        let dropped = before - outcome.matched_amount() - queue.total_amount();

        // Only residues at or below the epsilon can disappear
        prop_assert!(dropped >= Decimal::ZERO);
        prop_assert!(dropped <= DEFAULT_EPSILON * Decimal::from(outcome.fills.len().max(1)));
    }

    /// Fill cost never exceeds the cost the queue held
    #[test]
    fn prop_cost_is_never_created(
        mut queue in arb_queue(),
        requested in arb_positive_decimal()
    ) {
        let before = queue.total_cost();
        let outcome = Matcher::default().consume(&mut queue, requested);
        // Allow for rounding in the last of the 28 significant digits
        let tolerance = Decimal::new(1, 18);
        prop_assert!(outcome.total_cost + queue.total_cost() <= before + tolerance);
    }

    /// A later lot is only touched once every earlier lot is gone
    #[test]
    fn prop_fifo_order(
        lots in prop::collection::vec(arb_lot(), 1..10),
        requested in arb_positive_decimal()
    ) {
        let mut queue = LotQueue::new();
        for lot in &lots {
            queue.enqueue(lot.clone()).expect("generated lots are valid");
        }

        let outcome = Matcher::default().consume(&mut queue, requested);

        // Every fill but the last drains its lot completely, in queue order
        let last = outcome.fills.len().saturating_sub(1);
        for (i, fill) in outcome.fills.iter().enumerate() {
            if i < last {
                prop_assert_eq!(fill.amount, lots[i].remaining_amount);
            } else {
                prop_assert!(fill.amount <= lots[i].remaining_amount);
            }
        }

        // Remaining lots are the untouched tail, possibly with a reduced head
        let consumed = outcome.fills.len();
        let remaining: Vec<&Lot> = queue.iter().collect();
        let skip = lots.len() - remaining.len();
        prop_assert!(skip == consumed || skip + 1 == consumed);
        for (lot, original) in remaining.iter().skip(1).zip(lots.iter().skip(skip + 1)) {
            prop_assert_eq!(*lot, original);
        }
    }

    /// A fully drained queue hands over all of its cost
    #[test]
    fn prop_draining_moves_all_cost(queue in arb_queue()) {
        let mut queue = queue;
        let total_amount = queue.total_amount();
        let total_cost = queue.total_cost();
        let outcome = Matcher::default().consume(&mut queue, total_amount);

        prop_assert!(queue.is_empty());
        prop_assert_eq!(outcome.total_cost, total_cost);
    }
}
