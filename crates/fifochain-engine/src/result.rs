//! Output of a chain run.

use chrono::NaiveDate;
use fifochain_core::{Lot, LotQueue, Stage};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// One disposal matched against one lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    /// Index of the disposal row in the settlement table.
    pub event: usize,
    /// Date of the disposal.
    pub disposal_date: NaiveDate,
    /// Acquisition date of the consumed lot.
    pub acquired_date: Option<NaiveDate>,
    /// Units taken from the lot.
    pub matched_amount: Decimal,
    /// Cost basis of those units.
    pub matched_cost: Decimal,
    /// Share of the disposal's proceeds attributed to those units.
    pub proceeds: Decimal,
    /// `proceeds - matched_cost`.
    pub gain: Decimal,
    /// Days between acquisition and disposal, if both dates are known.
    pub holding_days: Option<i64>,
}

/// A conversion or sale that the available lots could not fully cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortfallAlert {
    /// Stage whose row triggered the alert.
    pub stage: Stage,
    /// Table label of that stage, e.g. `cop-usdt`.
    pub stage_label: String,
    /// Index of the triggering row in its stage table.
    pub row: usize,
    /// Date of the triggering row.
    pub date: NaiveDate,
    /// Currency that ran out.
    pub currency: String,
    /// Units that were not covered.
    pub missing_amount: Decimal,
    /// Human-readable description, amounts in display format.
    pub message: String,
}

impl fmt::Display for ShortfallAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage_label, self.message)
    }
}

/// A conversion whose output lot was not created because it carried no cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedAcquisition {
    /// Date of the conversion row.
    pub date: NaiveDate,
    /// Currency the conversion produced.
    pub currency: String,
    /// Units the conversion produced.
    pub amount: Decimal,
}

/// Proceeds, cost basis and gain accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Total proceeds in the settlement currency.
    pub proceeds: Decimal,
    /// Total cost basis in the origin currency.
    pub cost_basis: Decimal,
    /// Total realized gain.
    pub gain: Decimal,
}

impl Totals {
    /// Record one realization.
    ///
    /// Each sum saturates at the `Decimal` bounds instead of overflowing.
    pub fn record(&mut self, proceeds: Decimal, cost_basis: Decimal, gain: Decimal) {
        self.proceeds = self.proceeds.saturating_add(proceeds);
        self.cost_basis = self.cost_basis.saturating_add(cost_basis);
        self.gain = self.gain.saturating_add(gain);
    }

    /// Check if any sum reached a `Decimal` bound.
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        [self.proceeds, self.cost_basis, self.gain]
            .iter()
            .any(|v| *v == Decimal::MAX || *v == Decimal::MIN)
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Self) {
        self.record(rhs.proceeds, rhs.cost_basis, rhs.gain);
    }
}

/// Open inventory of one currency left after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holdings {
    /// Currency code.
    pub currency: String,
    /// Units still held.
    pub amount: Decimal,
    /// Cost basis of those units.
    pub cost: Decimal,
    /// The open lots, oldest first.
    pub lots: Vec<Lot>,
}

impl Holdings {
    /// Snapshot the open lots of `queue`.
    #[must_use]
    pub fn from_queue(currency: impl Into<String>, queue: LotQueue) -> Self {
        Self {
            currency: currency.into(),
            amount: queue.total_amount(),
            cost: queue.total_cost(),
            lots: queue.into_lots(),
        }
    }
}

/// Comparison of the two independent gain aggregations.
///
/// The per-match total sums the gain of every [`ConsumptionRecord`]. The
/// per-event total takes each sale's full proceeds minus the cost basis it
/// consumed. The two agree whenever every sale is fully covered by lots; a
/// shortfall leaves the uncovered part's proceeds only in the per-event total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GainReconciliation {
    /// Sum of per-match gains.
    pub per_match_gain: Decimal,
    /// Sum of per-event gains.
    pub per_event_gain: Decimal,
}

impl GainReconciliation {
    /// `per_event_gain - per_match_gain`.
    #[must_use]
    pub fn divergence(&self) -> Decimal {
        self.per_event_gain.saturating_sub(self.per_match_gain)
    }

    /// Check the two totals agree within `tolerance`.
    #[must_use]
    pub fn is_reconciled(&self, tolerance: Decimal) -> bool {
        self.divergence().abs() <= tolerance
    }
}

/// Everything a chain run produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Totals over all matched lots of the settlement stage.
    pub totals: Totals,
    /// Totals over settlement rows, each row counted with its full proceeds.
    pub event_totals: Totals,
    /// Open lots of the first intermediate currency (B).
    pub remaining_first: Holdings,
    /// Open lots of the second intermediate currency (C).
    pub remaining_second: Holdings,
    /// Matched-lot detail rows, in processing order.
    pub consumptions: Vec<ConsumptionRecord>,
    /// Shortfall alerts, in processing order.
    pub alerts: Vec<ShortfallAlert>,
    /// Conversions dropped for carrying no cost basis.
    pub dropped: Vec<DroppedAcquisition>,
    /// Rows skipped as incomplete, across all stages.
    pub skipped_rows: usize,
}

impl RunResult {
    /// Compare the per-match and per-event gain totals.
    #[must_use]
    pub const fn reconciliation(&self) -> GainReconciliation {
        GainReconciliation {
            per_match_gain: self.totals.gain,
            per_event_gain: self.event_totals.gain,
        }
    }

    /// Consumption records belonging to the settlement row `event`.
    pub fn consumptions_for(&self, event: usize) -> impl Iterator<Item = &ConsumptionRecord> {
        self.consumptions.iter().filter(move |c| c.event == event)
    }

    /// Check if the run produced any alert.
    #[must_use]
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }
}
