//! Output format tests: listing, verbose table, and JSON.

use super::{TestResult, unitrun};
use predicates::prelude::*;

#[test]
fn test_list_units() {
    unitrun()
        .arg("--list-units")
        .assert()
        .success()
        .stdout(predicate::str::contains("unitrun::example::BrokenFixture"))
        .stdout(predicate::str::contains("unitrun::example::ClashingNames"))
        .stdout(predicate::str::contains("unitrun::example::DirtyTeardown"))
        .stdout(predicate::str::contains("unitrun::example::CounterTest"))
        .stdout(predicate::str::contains("unitrun::example::ExampleTest"));
}

#[test]
fn test_list_discovery_trace() {
    unitrun()
        .args(["ExampleTest", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unitrun::example::ExampleTest::a\n"))
        .stdout(predicate::str::contains("unitrun::example::ExampleTest::c (expects "))
        .stdout(predicate::str::contains("Error)\n"))
        .stdout(predicate::str::contains("Tests run").not());
}

#[test]
fn test_list_shows_ignored() {
    unitrun()
        .args(["CounterTest", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "unitrun::example::CounterTest::overflow (ignored)",
        ));
}

#[test]
fn test_list_does_not_construct_units() {
    unitrun()
        .args(["BrokenFixture", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BrokenFixture::never_runs"));
}

#[test]
fn test_verbose_table() {
    unitrun()
        .args(["ExampleTest", "--verbose"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("starting: a"))
        .stdout(predicate::str::contains("expected_condition_not_raised"))
        .stdout(predicate::str::contains("raised expected "))
        .stdout(predicate::str::contains("An I/O exception occurred"));
}

#[test]
fn test_json_output() -> TestResult {
    let output = unitrun()
        .args(["ExampleTest", "--format", "json"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["summary"]["tests_run"], 5);
    assert_eq!(report["summary"]["failures"], 2);
    assert_eq!(report["summary"]["errors"], 1);
    assert!(report["aborted"].is_null());

    let tests = report["units"][0]["tests"]
        .as_array()
        .ok_or("tests should be an array")?;
    let statuses: Vec<&str> = tests.iter().filter_map(|t| t["status"].as_str()).collect();
    assert_eq!(
        statuses,
        [
            "assertion_failure",
            "success",
            "expected_condition_not_raised",
            "expected_condition_satisfied",
            "unexpected_error",
        ]
    );
    assert_eq!(tests[0]["message"], "This always happens");
    Ok(())
}

#[test]
fn test_json_output_aborted() -> TestResult {
    let output = unitrun()
        .args(["BrokenFixture", "--format", "json"])
        .output()?;
    assert_eq!(output.status.code(), Some(3));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let aborted = report["aborted"].as_str().ok_or("aborted should be set")?;
    assert!(aborted.contains("fixture file missing"));
    assert_eq!(report["summary"]["tests_run"], 0);
    Ok(())
}
