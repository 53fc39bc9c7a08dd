//! fifochain-report - FIFO cost-basis report for a conversion chain.
//!
//! # Usage
//!
//! ```bash
//! fifochain-report --workbook chain.json
//! fifochain-report --usd-cop usd-cop.csv --cop-usdt cop-usdt.csv --usdt-usd usdt-usd.csv
//! fifochain-report --workbook chain.json --format json --zero-cost keep
//! ```
//!
//! Shortfalls are reported but do not fail the run; the exit code is
//! non-zero only when the inputs cannot be read.

use crate::cmd::completions::ShellType;
use crate::config::{Config, TablePaths};
use crate::report::{write_report, OutputFormat, ReportContext};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fifochain_core::ZeroCostPolicy;
use fifochain_engine::ChainRunner;
use fifochain_import::InputSource;
use rust_decimal::Decimal;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Handling of conversions that consumed no cost basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ZeroCostArg {
    /// Drop the output lot and list it in the report
    Drop,
    /// Keep the output lot with a cost of zero
    Keep,
}

impl From<ZeroCostArg> for ZeroCostPolicy {
    fn from(arg: ZeroCostArg) -> Self {
        match arg {
            ZeroCostArg::Drop => Self::Drop,
            ZeroCostArg::Keep => Self::CreateZeroCostLot,
        }
    }
}

/// Compute realized gains, remaining lots and shortfalls of a
/// USD -> COP -> USDT -> USD conversion chain with FIFO matching.
#[derive(Parser, Debug)]
#[command(name = "fifochain-report")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (default: fifochain/config.json in the user config directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON workbook holding all three stage tables
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["usd_cop", "cop_usdt", "usdt_usd"])]
    pub workbook: Option<PathBuf>,

    /// CSV table of origin conversions (date, spent, received)
    #[arg(long, value_name = "FILE", requires_all = ["cop_usdt", "usdt_usd"])]
    pub usd_cop: Option<PathBuf>,

    /// CSV table of intermediate conversions (date, spent, received)
    #[arg(long, value_name = "FILE", requires_all = ["usd_cop", "usdt_usd"])]
    pub cop_usdt: Option<PathBuf>,

    /// CSV table of sales (date, sold, received)
    #[arg(long, value_name = "FILE", requires_all = ["usd_cop", "cop_usdt"])]
    pub usdt_usd: Option<PathBuf>,

    /// Remaining amount at or below which a lot counts as exhausted
    #[arg(long, value_name = "N")]
    pub epsilon: Option<Decimal>,

    /// Handling of conversions that consumed no cost basis
    #[arg(long, value_enum, value_name = "POLICY")]
    pub zero_cost: Option<ZeroCostArg>,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<OutputFormat>,

    /// Show debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,
}

impl Args {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(epsilon) = self.epsilon {
            config.engine.epsilon = epsilon;
        }
        if let Some(policy) = self.zero_cost {
            config.engine.zero_cost_policy = policy.into();
        }
        if let Some(format) = self.format {
            config.format = Some(format);
        }
        if let Some(workbook) = &self.workbook {
            config.workbook = Some(workbook.clone());
            config.tables = None;
        }
        if let (Some(origin), Some(intermediate), Some(settlement)) =
            (&self.usd_cop, &self.cop_usdt, &self.usdt_usd)
        {
            config.workbook = None;
            config.tables = Some(TablePaths {
                origin: origin.clone(),
                intermediate: intermediate.clone(),
                settlement: settlement.clone(),
            });
        }
        config
    }
}

/// Pick the input source named by `config`.
pub fn input_source(config: &Config) -> Result<InputSource> {
    if let Some(workbook) = &config.workbook {
        return Ok(InputSource::Workbook(workbook.clone()));
    }
    if let Some(tables) = &config.tables {
        return Ok(InputSource::CsvTables {
            origin: tables.origin.clone(),
            intermediate: tables.intermediate.clone(),
            settlement: tables.settlement.clone(),
        });
    }
    anyhow::bail!("no input given: pass --workbook FILE or the three table files")
}

/// Run the report, writing it to `writer`.
pub fn run<W: Write>(args: &Args, writer: &mut W) -> Result<()> {
    let config = Config::discover(args.config.as_deref()).context("failed to load configuration")?;
    let config = args.apply(config);
    config.validate()?;

    let source = input_source(&config)?;
    let imported = source
        .load(&config.currencies)
        .context("failed to import stage tables")?;
    debug!(
        origin = imported.input.origin.len(),
        intermediate = imported.input.intermediate.len(),
        settlement = imported.input.settlement.len(),
        warnings = imported.warnings.len(),
        "imported stage tables"
    );

    let runner = ChainRunner::new(config.engine)
        .with_currencies(config.currencies.clone())
        .with_number_format(config.number_format.clone());
    let result = runner.run(&imported.input);

    let ctx = ReportContext {
        currencies: &config.currencies,
        number_format: &config.number_format,
        epsilon: config.engine.epsilon,
        warnings: &imported.warnings,
    };
    write_report(writer, config.format.unwrap_or_default(), &result, &ctx)
        .context("failed to write report")?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(Level::DEBUG.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Main entry point for the report command.
pub fn main() -> ExitCode {
    main_with_name("fifochain-report")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    // Handle shell completion generation
    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    init_logging(args.verbose);

    let mut stdout = io::stdout().lock();
    match run(&args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "fifochain-report",
            "--workbook",
            "chain.json",
            "--epsilon",
            "0.01",
            "--zero-cost",
            "keep",
            "--format",
            "json",
        ])
        .unwrap();

        let config = Config {
            tables: Some(TablePaths {
                origin: "a.csv".into(),
                intermediate: "b.csv".into(),
                settlement: "c.csv".into(),
            }),
            ..Config::default()
        };
        let config = args.apply(config);

        assert_eq!(config.engine.epsilon, dec!(0.01));
        assert_eq!(config.engine.zero_cost_policy, ZeroCostPolicy::CreateZeroCostLot);
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(config.workbook, Some(PathBuf::from("chain.json")));
        assert_eq!(config.tables, None);
    }

    #[test]
    fn test_table_flags_go_together() {
        let err = Args::try_parse_from(["fifochain-report", "--usd-cop", "a.csv"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_workbook_conflicts_with_tables() {
        let err = Args::try_parse_from([
            "fifochain-report",
            "--workbook",
            "chain.json",
            "--usd-cop",
            "a.csv",
            "--cop-usdt",
            "b.csv",
            "--usdt-usd",
            "c.csv",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_no_input_is_an_error() {
        let err = input_source(&Config::default()).unwrap_err();
        assert!(err.to_string().starts_with("no input given"));
    }
}
