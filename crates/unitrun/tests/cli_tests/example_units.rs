//! End-to-end runs of the bundled example units.

use super::unitrun;
use predicates::prelude::*;

#[test]
fn test_example_unit_tally() {
    unitrun()
        .arg("ExampleTest")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("running 5 tests for unitrun::example::ExampleTest"))
        .stdout(predicate::str::contains("Tests run: 5\nFailures: 2\nErrors: 1\n"));
}

#[test]
fn test_example_unit_classifications() {
    unitrun()
        .arg("ExampleTest")
        .assert()
        .stdout(predicate::str::contains("test unitrun::example::ExampleTest::a ... FAILED"))
        .stdout(predicate::str::contains("test unitrun::example::ExampleTest::b ... ok"))
        .stdout(predicate::str::contains("test unitrun::example::ExampleTest::c ... FAILED"))
        .stdout(predicate::str::contains("test unitrun::example::ExampleTest::d ... ok"))
        .stdout(predicate::str::contains("test unitrun::example::ExampleTest::e ... ERROR"));
}

#[test]
fn test_example_unit_diagnostics() {
    unitrun()
        .arg("ExampleTest")
        .assert()
        .stdout(predicate::str::contains(
            "unitrun_core::assertion::AssertionFailure: This always happens",
        ))
        .stdout(predicate::str::contains("was not raised"))
        .stdout(predicate::str::contains("RuntimeFault: Oops!"))
        .stdout(predicate::str::contains("This should never happen").not());
}

#[test]
fn test_example_unit_unmarked_method_not_run() {
    unitrun()
        .arg("ExampleTest")
        .assert()
        .stdout(predicate::str::contains("ExampleTest::f").not());
}

#[test]
fn test_counter_unit_is_clean() {
    unitrun()
        .arg("CounterTest")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tests run: 4\nFailures: 0\nErrors: 0"));
}

#[test]
fn test_counter_unit_ignored_test() {
    unitrun()
        .arg("CounterTest")
        .assert()
        .stdout(predicate::str::contains(
            "test unitrun::example::CounterTest::overflow ... ignored, depends on overflow checks",
        ));
}

#[test]
fn test_expected_panic_is_silent() {
    unitrun()
        .arg("CounterTest")
        .assert()
        .success()
        .stdout(predicate::str::contains("CounterTest::out_of_bounds ... ok"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_broken_fixture_aborts() {
    unitrun()
        .arg("BrokenFixture")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error: run aborted"))
        .stderr(predicate::str::contains("fixture file missing"))
        .stdout(predicate::str::contains("Tests run: 0"));
}

#[test]
fn test_abort_keeps_earlier_results() {
    unitrun()
        .args(["ExampleTest", "BrokenFixture", "CounterTest"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Tests run: 5\nFailures: 2\nErrors: 1"))
        .stdout(predicate::str::contains("CounterTest").not());
}

#[test]
fn test_multiple_units_sum() {
    unitrun()
        .args(["ExampleTest", "CounterTest"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Tests run: 9\nFailures: 2\nErrors: 1"));
}

#[test]
fn test_filter_selects_tests() {
    unitrun()
        .args(["ExampleTest", "--filter", "ExampleTest::d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("running 1 tests"))
        .stdout(predicate::str::contains("Tests run: 1\nFailures: 0\nErrors: 0"));
}

#[test]
fn test_teardown_panic_aborts() {
    unitrun()
        .args(["ExampleTest", "DirtyTeardown", "CounterTest"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error: run aborted"))
        .stderr(predicate::str::contains("temporary directory still in use"))
        .stdout(predicate::str::contains("Tests run: 5\nFailures: 2\nErrors: 1"))
        .stdout(predicate::str::contains("CounterTest").not());
}

#[test]
fn test_discovery_error_exits_with_config_error() {
    unitrun()
        .args(["ExampleTest", "ClashingNames", "CounterTest"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot introspect unit"))
        .stderr(predicate::str::contains("declared more than once"))
        .stdout(predicate::str::contains("Tests run: 5\nFailures: 2\nErrors: 1"))
        .stdout(predicate::str::contains("CounterTest").not());
}

#[test]
fn test_list_reports_discovery_error() {
    unitrun()
        .args(["ClashingNames", "--list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("declared more than once"));
}
