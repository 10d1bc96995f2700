//! `unitrun.config.yaml` tests.

use super::{TestResult, unitrun_in};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn config_dir(content: &str) -> Result<TempDir, std::io::Error> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("unitrun.config.yaml"), content)?;
    Ok(dir)
}

#[test]
fn test_config_format_json() -> TestResult {
    let dir = config_dir("format: json\n")?;
    let output = unitrun_in(&dir).arg("CounterTest").output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["summary"]["tests_run"], 4);
    Ok(())
}

#[test]
fn test_cli_overrides_config_format() -> TestResult {
    let dir = config_dir("format: json\n")?;
    unitrun_in(&dir)
        .args(["CounterTest", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tests run: 4"));
    Ok(())
}

#[test]
fn test_config_filter() -> TestResult {
    let dir = config_dir("filter: ExampleTest::a\n")?;
    unitrun_in(&dir)
        .arg("ExampleTest")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Tests run: 1\nFailures: 1\nErrors: 0"));
    Ok(())
}

#[test]
fn test_config_unknown_field() -> TestResult {
    let dir = config_dir("parallel: 4\n")?;
    unitrun_in(&dir)
        .arg("ExampleTest")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load config"));
    Ok(())
}

#[test]
fn test_config_missing_file_uses_defaults() -> TestResult {
    let dir = TempDir::new()?;
    unitrun_in(&dir)
        .arg("CounterTest")
        .assert()
        .success()
        .stdout(predicate::str::contains("running 4 tests"));
    Ok(())
}
