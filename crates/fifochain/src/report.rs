//! Rendering of a chain run as a text or JSON report.

use clap::ValueEnum;
use fifochain_core::{format_days, NumberFormat, StageCurrencies};
use fifochain_engine::{GainReconciliation, Holdings, RunResult, Totals};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Output format of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling
    Json,
}

/// Everything the report shows besides the run itself.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    /// Stage currency codes.
    pub currencies: &'a StageCurrencies,
    /// Number display format.
    pub number_format: &'a NumberFormat,
    /// Tolerance for the gain reconciliation.
    pub epsilon: Decimal,
    /// Import warnings.
    pub warnings: &'a [String],
}

/// JSON form of the report.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Stage currency codes.
    pub currencies: &'a StageCurrencies,
    /// Per-match against per-event gain.
    pub reconciliation: GainReconciliation,
    /// Import warnings.
    pub warnings: &'a [String],
    /// The run.
    #[serde(flatten)]
    pub result: &'a RunResult,
}

/// Write the report in `format`.
pub fn write_report<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    result: &RunResult,
    ctx: &ReportContext<'_>,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_text(writer, result, ctx),
        OutputFormat::Json => write_json(writer, result, ctx),
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_json<W: Write>(
    writer: &mut W,
    result: &RunResult,
    ctx: &ReportContext<'_>,
) -> io::Result<()> {
    let report = JsonReport {
        currencies: ctx.currencies,
        reconciliation: result.reconciliation(),
        warnings: ctx.warnings,
        result,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}

/// Write the report as text.
pub fn write_text<W: Write>(
    writer: &mut W,
    result: &RunResult,
    ctx: &ReportContext<'_>,
) -> io::Result<()> {
    let fmt = ctx.number_format;
    let cur = ctx.currencies;

    writeln!(writer, "FIFO report: {cur}")?;
    writeln!(writer, "{}", "=".repeat(60))?;
    writeln!(writer)?;

    write_totals(writer, "Totals per matched lot", &result.totals, cur, fmt)?;
    writeln!(writer)?;
    write_totals(writer, "Totals per sale", &result.event_totals, cur, fmt)?;
    let reconciliation = result.reconciliation();
    if !reconciliation.is_reconciled(ctx.epsilon) {
        writeln!(
            writer,
            "  Unmatched proceeds: {} {}",
            fmt.format(reconciliation.divergence()),
            cur.settlement
        )?;
    }
    writeln!(writer)?;

    write_holdings(writer, &result.remaining_first, cur, fmt)?;
    write_holdings(writer, &result.remaining_second, cur, fmt)?;
    writeln!(writer)?;

    writeln!(writer, "FIFO detail")?;
    writeln!(writer, "{}", "-".repeat(60))?;
    if result.consumptions.is_empty() {
        writeln!(writer, "  (no sales matched)")?;
    } else {
        writeln!(
            writer,
            "{:<10}  {:<10}  {:>14}  {:>14}  {:>14}  {:>14}  {:>9}",
            "Sold", "Acquired", cur.second, "Cost", "Proceeds", "Gain", "Held"
        )?;
        for row in &result.consumptions {
            let acquired = row
                .acquired_date
                .map_or_else(|| "-".to_string(), |d| d.to_string());
            writeln!(
                writer,
                "{:<10}  {:<10}  {:>14}  {:>14}  {:>14}  {:>14}  {:>9}",
                row.disposal_date,
                acquired,
                fmt.format(row.matched_amount),
                fmt.format(row.matched_cost),
                fmt.format(row.proceeds),
                fmt.format(row.gain),
                format_days(row.holding_days),
            )?;
        }
    }

    if result.has_alerts() {
        writeln!(writer)?;
        writeln!(writer, "Alerts ({})", result.alerts.len())?;
        for alert in &result.alerts {
            writeln!(writer, "  {alert}")?;
        }
    }

    if !result.dropped.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Dropped acquisitions (no cost basis)")?;
        for dropped in &result.dropped {
            writeln!(
                writer,
                "  {}  {} {}",
                dropped.date,
                fmt.format(dropped.amount),
                dropped.currency
            )?;
        }
    }

    if !ctx.warnings.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Import warnings ({})", ctx.warnings.len())?;
        for warning in ctx.warnings {
            writeln!(writer, "  {warning}")?;
        }
    }

    if result.skipped_rows > 0 {
        writeln!(writer)?;
        writeln!(writer, "Skipped {} incomplete row(s)", result.skipped_rows)?;
    }

    Ok(())
}

fn write_totals<W: Write>(
    writer: &mut W,
    title: &str,
    totals: &Totals,
    cur: &StageCurrencies,
    fmt: &NumberFormat,
) -> io::Result<()> {
    writeln!(writer, "{title}")?;
    writeln!(
        writer,
        "  Proceeds:   {:>16} {}",
        fmt.format(totals.proceeds),
        cur.settlement
    )?;
    writeln!(
        writer,
        "  Cost basis: {:>16} {}",
        fmt.format(totals.cost_basis),
        cur.origin
    )?;
    writeln!(writer, "  Gain:       {:>16}", fmt.format(totals.gain))
}

fn write_holdings<W: Write>(
    writer: &mut W,
    holdings: &Holdings,
    cur: &StageCurrencies,
    fmt: &NumberFormat,
) -> io::Result<()> {
    let count = holdings.lots.len();
    writeln!(
        writer,
        "Remaining {}: {} (cost {} {}, {count} lot{})",
        holdings.currency,
        fmt.format(holdings.amount),
        fmt.format(holdings.cost),
        cur.origin,
        if count == 1 { "" } else { "s" }
    )?;
    for lot in &holdings.lots {
        let acquired = lot
            .acquired_date
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        writeln!(
            writer,
            "  {acquired:<10}  {:>16}  cost {:>14}",
            fmt.format(lot.remaining_amount),
            fmt.format(lot.remaining_cost)
        )?;
    }
    Ok(())
}
