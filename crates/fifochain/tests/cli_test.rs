//! End-to-end tests of the `fifochain-report` binary.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Run the binary with an isolated user config directory.
fn report(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fifochain-report"))
        .args(args)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run fifochain-report")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn workbook(dir: &Path) -> PathBuf {
    write(
        dir,
        "chain.json",
        r#"{
            "usd-cop": [["2024-01-01", 100, 400000]],
            "cop-usdt": [["2024-01-05", 400000, 100]],
            "usdt-usd": [["2024-02-01", 50, 55]]
        }"#,
    )
}

#[test]
fn test_text_report_from_workbook() {
    let dir = TempDir::new().unwrap();
    let path = workbook(dir.path());

    let output = report(dir.path(), &["--workbook", path.to_str().unwrap()]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("FIFO report: USD -> COP -> USDT -> USD"));
    assert!(text.contains("Remaining USDT: 50,00"));
    assert!(text.contains("27 days"));
}

#[test]
fn test_json_report_from_csv_tables() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.csv", "date,usd,cop\n2024-01-01,100,400000\n");
    let b = write(dir.path(), "b.csv", "date,cop,usdt\n2024-01-05,400000,100\n");
    let c = write(dir.path(), "c.csv", "date,usdt,usd\n2024-02-01,50,55\n");

    let output = report(
        dir.path(),
        &[
            "--usd-cop",
            a.to_str().unwrap(),
            "--cop-usdt",
            b.to_str().unwrap(),
            "--usdt-usd",
            c.to_str().unwrap(),
            "--format",
            "json",
        ],
    );

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["consumptions"].as_array().unwrap().len(), 1);
    let gain: Decimal = value["totals"]["gain"].as_str().unwrap().parse().unwrap();
    assert_eq!(gain, dec!(5));
}

#[test]
fn test_shortfalls_do_not_fail_the_run() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "chain.json",
        r#"{ "usd-cop": [], "cop-usdt": [["2024-01-05", 100, 25]], "usdt-usd": [] }"#,
    );

    let output = report(dir.path(), &["--workbook", path.to_str().unwrap()]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Alerts (1)"));
    assert!(text.contains("Missing 100,00 COP to cover the USDT purchase of 2024-01-05."));
    assert!(text.contains("Dropped acquisitions"));
}

#[test]
fn test_config_file_supplies_inputs() {
    let dir = TempDir::new().unwrap();
    workbook(dir.path());
    let config = write(
        dir.path(),
        "config.json",
        r#"{ "workbook": "chain.json", "number_format": { "decimal_separator": ".", "group_separator": "," } }"#,
    );

    let output = report(dir.path(), &["--config", config.to_str().unwrap()]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("Remaining USDT: 50.00"));
}

#[test]
fn test_missing_input_file_exits_with_error() {
    let dir = TempDir::new().unwrap();

    let output = report(dir.path(), &["--workbook", "/nonexistent/chain.json"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: failed to import stage tables"));
}

#[test]
fn test_no_input_exits_with_error() {
    let dir = TempDir::new().unwrap();

    let output = report(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no input given"));
}

#[test]
fn test_generate_completions() {
    let dir = TempDir::new().unwrap();

    let output = report(dir.path(), &["--generate-completions", "bash"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("fifochain-report"));
}
