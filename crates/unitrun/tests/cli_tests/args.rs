//! CLI argument tests.

use super::unitrun;
use predicates::prelude::*;

#[test]
fn test_arg_help() {
    unitrun()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Test runner for registered unit types",
        ));
}

#[test]
fn test_arg_version() {
    unitrun()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unitrun"));
}

#[test]
fn test_arg_unit_required() {
    unitrun().assert().code(2);
}

#[test]
fn test_arg_invalid_format() {
    unitrun()
        .args(["ExampleTest", "--format", "table"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_arg_unknown_unit() {
    unitrun()
        .arg("NoSuchUnit")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no registered unit matches 'NoSuchUnit'"))
        .stdout(predicate::str::contains("Tests run").not());
}

#[test]
fn test_arg_full_unit_path() {
    unitrun()
        .arg("unitrun::example::CounterTest")
        .assert()
        .success()
        .stdout(predicate::str::contains("running 4 tests for unitrun::example::CounterTest"));
}

#[test]
fn test_arg_repeated_unit_runs_once() {
    unitrun()
        .args(["CounterTest", "example::CounterTest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tests run: 4"));
}

#[test]
fn test_arg_empty_filter() {
    unitrun()
        .args(["ExampleTest", "--filter", ""])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("filter must not be empty"));
}
