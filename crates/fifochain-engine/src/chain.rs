//! The three-stage chain runner.

use chrono::NaiveDate;
use fifochain_core::{
    holding_days, EngineConfig, Lot, LotQueue, MatchOutcome, Matcher, NumberFormat, Stage,
    StageCurrencies, TransactionRecord, ZeroCostPolicy,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::result::{
    ConsumptionRecord, DroppedAcquisition, Holdings, RunResult, ShortfallAlert, Totals,
};

/// The three stage tables of one run, each in entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainInput {
    /// A → B rows: A spent, B received.
    pub origin: Vec<TransactionRecord>,
    /// B → C rows: B spent, C received.
    pub intermediate: Vec<TransactionRecord>,
    /// C → D rows: C sold, D received.
    pub settlement: Vec<TransactionRecord>,
}

impl ChainInput {
    /// Rows of `stage`.
    #[must_use]
    pub fn stage(&self, stage: Stage) -> &[TransactionRecord] {
        match stage {
            Stage::Origin => &self.origin,
            Stage::Intermediate => &self.intermediate,
            Stage::Settlement => &self.settlement,
        }
    }

    /// Mutable rows of `stage`.
    pub fn stage_mut(&mut self, stage: Stage) -> &mut Vec<TransactionRecord> {
        match stage {
            Stage::Origin => &mut self.origin,
            Stage::Intermediate => &mut self.intermediate,
            Stage::Settlement => &mut self.settlement,
        }
    }
}

/// Runs the A → B → C → D chain.
///
/// Each call to [`ChainRunner::run`] builds fresh lot queues from its input,
/// so a runner can be reused and repeated runs over the same input give the
/// same result.
#[derive(Debug, Clone, Default)]
pub struct ChainRunner {
    config: EngineConfig,
    currencies: StageCurrencies,
    number_format: NumberFormat,
}

/// Mutable state threaded through the three stages of one run.
struct RunState {
    first: LotQueue,
    second: LotQueue,
    result: RunResult,
}

impl ChainRunner {
    /// Create a runner with the given configuration.
    ///
    /// A negative epsilon is clamped to zero.
    #[must_use]
    pub fn new(mut config: EngineConfig) -> Self {
        if config.epsilon < Decimal::ZERO {
            warn!(epsilon = %config.epsilon, "negative epsilon clamped to zero");
            config.epsilon = Decimal::ZERO;
        }
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the currency codes used for labels and alert messages.
    #[must_use]
    pub fn with_currencies(mut self, currencies: StageCurrencies) -> Self {
        self.currencies = currencies;
        self
    }

    /// Set the number format used in alert messages.
    #[must_use]
    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The stage currencies.
    #[must_use]
    pub const fn currencies(&self) -> &StageCurrencies {
        &self.currencies
    }

    /// Run the chain over `input`.
    pub fn run(&self, input: &ChainInput) -> RunResult {
        let matcher = Matcher::new(self.config.epsilon);
        let mut state = RunState {
            first: LotQueue::new(),
            second: LotQueue::new(),
            result: RunResult::default(),
        };

        self.run_origin(input.stage(Stage::Origin), &mut state);
        self.run_intermediate(input.stage(Stage::Intermediate), &matcher, &mut state);
        self.run_settlement(input.stage(Stage::Settlement), &matcher, &mut state);

        let RunState {
            first,
            second,
            mut result,
        } = state;
        result.remaining_first = Holdings::from_queue(self.currencies.first.clone(), first);
        result.remaining_second = Holdings::from_queue(self.currencies.second.clone(), second);

        if result.totals.is_saturated() || result.event_totals.is_saturated() {
            warn!("gain totals reached the decimal range limit and are saturated");
        }

        let reconciliation = result.reconciliation();
        if !reconciliation.is_reconciled(self.config.epsilon) {
            warn!(
                per_match = %reconciliation.per_match_gain,
                per_event = %reconciliation.per_event_gain,
                divergence = %reconciliation.divergence(),
                "per-match and per-event gain totals diverge"
            );
        }

        debug!(
            consumptions = result.consumptions.len(),
            alerts = result.alerts.len(),
            dropped = result.dropped.len(),
            skipped = result.skipped_rows,
            "chain run complete"
        );
        result
    }

    /// Stage A → B: every row opens a B lot valued at the A spent.
    fn run_origin(&self, records: &[TransactionRecord], state: &mut RunState) {
        for (index, record) in records.iter().enumerate() {
            let Some(date) = self.processable(Stage::Origin, index, record, state) else {
                continue;
            };

            let lot = Lot::new(record.output_amount, record.input_amount).with_date(date);
            if let Err(err) = state.first.enqueue(lot) {
                warn!(stage = "origin", index, %err, "lot rejected");
            }
        }

        debug!(lots = state.first.len(), "origin stage complete");
    }

    /// Stage B → C: consume B lots, open a C lot carrying their cost.
    fn run_intermediate(
        &self,
        records: &[TransactionRecord],
        matcher: &Matcher,
        state: &mut RunState,
    ) {
        for (index, record) in records.iter().enumerate() {
            let Some(date) = self.processable(Stage::Intermediate, index, record, state) else {
                continue;
            };

            let outcome = matcher.consume(&mut state.first, record.input_amount);
            self.check_shortfall(Stage::Intermediate, index, date, &outcome, state);

            let lot_cost = if outcome.total_cost > Decimal::ZERO {
                outcome.total_cost
            } else {
                match self.config.zero_cost_policy {
                    ZeroCostPolicy::CreateZeroCostLot => Decimal::ZERO,
                    ZeroCostPolicy::Drop => {
                        warn!(
                            %date,
                            amount = %record.output_amount,
                            currency = %self.currencies.second,
                            "conversion consumed no cost basis, output lot dropped"
                        );
                        state.result.dropped.push(DroppedAcquisition {
                            date,
                            currency: self.currencies.second.clone(),
                            amount: record.output_amount,
                        });
                        continue;
                    }
                }
            };

            let lot = Lot::new(record.output_amount, lot_cost).with_date(date);
            if let Err(err) = state.second.enqueue(lot) {
                warn!(stage = "intermediate", index, %err, "lot rejected");
            }
        }

        debug!(
            open_first = state.first.len(),
            open_second = state.second.len(),
            "intermediate stage complete"
        );
    }

    /// Stage C → D: sell C lots, realizing gains per matched lot.
    fn run_settlement(
        &self,
        records: &[TransactionRecord],
        matcher: &Matcher,
        state: &mut RunState,
    ) {
        for (index, record) in records.iter().enumerate() {
            let Some(date) = self.processable(Stage::Settlement, index, record, state) else {
                continue;
            };

            let outcome = matcher.consume(&mut state.second, record.input_amount);
            self.check_shortfall(Stage::Settlement, index, date, &outcome, state);

            let mut event = Totals::default();
            for fill in &outcome.fills {
                let proceeds = fill.amount / record.input_amount * record.output_amount;
                let gain = proceeds - fill.cost;

                state.result.totals.record(proceeds, fill.cost, gain);
                state.result.consumptions.push(ConsumptionRecord {
                    event: index,
                    disposal_date: date,
                    acquired_date: fill.acquired_date,
                    matched_amount: fill.amount,
                    matched_cost: fill.cost,
                    proceeds,
                    gain,
                    holding_days: holding_days(fill.acquired_date, Some(date)),
                });
            }

            event.record(
                record.output_amount,
                outcome.total_cost,
                record.output_amount - outcome.total_cost,
            );
            state.result.event_totals += event;
        }

        debug!(
            consumptions = state.result.consumptions.len(),
            open_second = state.second.len(),
            "settlement stage complete"
        );
    }

    /// The row date when the row should be processed; counts it as skipped otherwise.
    fn processable(
        &self,
        stage: Stage,
        index: usize,
        record: &TransactionRecord,
        state: &mut RunState,
    ) -> Option<NaiveDate> {
        let date = record.processable_date();
        if date.is_none() {
            debug!(stage = %self.currencies.label(stage), index, "skipping incomplete row");
            state.result.skipped_rows += 1;
        }
        date
    }

    fn check_shortfall(
        &self,
        stage: Stage,
        row: usize,
        date: NaiveDate,
        outcome: &MatchOutcome,
        state: &mut RunState,
    ) {
        let Some(missing) = outcome.shortfall(self.config.epsilon) else {
            return;
        };

        let currency = self.currencies.consumed(stage).to_string();
        let amount = self.number_format.format(missing);
        let message = match stage {
            Stage::Settlement => {
                format!("Missing {amount} {currency} to cover the sale of {date}.")
            }
            _ => format!(
                "Missing {amount} {currency} to cover the {} purchase of {date}.",
                self.currencies.produced(stage)
            ),
        };

        warn!(%date, row, %missing, %currency, "shortfall");
        state.result.alerts.push(ShortfallAlert {
            stage,
            stage_label: self.currencies.label(stage),
            row,
            date,
            currency,
            missing_amount: missing,
            message,
        });
    }
}

/// Run the chain with the default currencies and number format.
pub fn run_chain(input: &ChainInput, config: &EngineConfig) -> RunResult {
    ChainRunner::new(*config).run(input)
}
