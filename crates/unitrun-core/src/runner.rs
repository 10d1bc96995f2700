//! Test runner for executing discovered tests.
//!
//! Tests run one at a time in discovery order. Each test gets a freshly
//! constructed unit instance that is dropped as soon as the body returns.
//! Conditions raised by test bodies are classified; failures of the harness
//! itself abort the run.

use crate::condition::Condition;
use crate::discovery::{
    DiscoveredTest, DiscoveryError, InvocationError, MethodHandle, UnitType, discover_ignored,
    discover_tests,
};
use crate::judge::{Invocation, judge};
use crate::types::{IgnoredTest, Outcome, Tally, TestRecord, UnitRun};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Progress events emitted during a run.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// Discovery for a unit finished and its tests are about to run.
    UnitStarted { unit: &'a str, test_count: usize },
    /// A test method marked ignored was skipped.
    TestIgnored { method: &'a MethodHandle },
    /// A test is about to be instantiated and invoked.
    TestStarted { test: &'a DiscoveredTest },
    /// A test has been classified.
    TestCompleted {
        test: &'a DiscoveredTest,
        outcome: &'a Outcome,
    },
    /// Every test of a unit has been classified.
    UnitCompleted { run: &'a UnitRun },
    /// A fatal error stopped the unit. `partial` holds what was tallied.
    UnitAborted {
        error: &'a RunnerError,
        partial: &'a UnitRun,
    },
}

/// Receiver of progress events.
pub trait ProgressSink {
    fn on_event(&mut self, event: &ProgressEvent<'_>);
}

impl<F: FnMut(&ProgressEvent<'_>)> ProgressSink for F {
    fn on_event(&mut self, event: &ProgressEvent<'_>) {
        self(event);
    }
}

/// Fatal errors that stop a run.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("cannot instantiate unit '{unit}' for test '{test}': {condition}")]
    Instantiation {
        unit: &'static str,
        test: &'static str,
        condition: Condition,
    },
    #[error("cannot invoke '{unit}::{test}': {source}")]
    Invocation {
        unit: &'static str,
        test: &'static str,
        #[source]
        source: InvocationError,
    },
    #[error("dropping unit '{unit}' after test '{test}' panicked: {condition}")]
    Teardown {
        unit: &'static str,
        test: &'static str,
        condition: Condition,
    },
}

/// A unit run stopped by a fatal error, with the results tallied so far.
#[derive(Error, Debug)]
#[error("run of '{}' aborted after {} test(s): {error}", .partial.unit, .partial.tally.tests_run)]
pub struct Aborted {
    pub partial: UnitRun,
    #[source]
    pub error: RunnerError,
}

/// Configuration for the test runner.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Only run tests whose `unit::method` name contains this substring.
    pub filter: Option<String>,
}

impl RunnerConfig {
    fn selects(&self, qualified_name: &str) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|filter| qualified_name.contains(filter))
    }
}

/// Results of a whole run across units.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Completed units, plus the partial unit if the run was aborted.
    pub units: Vec<UnitRun>,
    /// The fatal error that stopped the run, if any.
    pub aborted: Option<RunnerError>,
}

impl RunReport {
    /// Totals across all units.
    #[must_use]
    pub fn tally(&self) -> Tally {
        let mut total = Tally::default();
        for unit in &self.units {
            total += unit.tally;
        }
        total
    }
}

/// Instantiate the unit, invoke one test on it, and classify the result.
///
/// # Errors
/// Returns `RunnerError::Instantiation` if the unit cannot be constructed and
/// `RunnerError::Invocation` if the method cannot be called on it, and
/// `RunnerError::Teardown` if dropping the instance panics. Conditions
/// raised by the test body, panics included, are never errors here.
pub fn run_test(unit: &UnitType, test: &DiscoveredTest) -> Result<Outcome, RunnerError> {
    let instantiation_error = |condition| RunnerError::Instantiation {
        unit: unit.name(),
        test: test.name(),
        condition,
    };

    let mut instance = match panic::catch_unwind(AssertUnwindSafe(|| unit.instantiate())) {
        Ok(Ok(instance)) => instance,
        Ok(Err(condition)) => return Err(instantiation_error(condition)),
        Err(payload) => return Err(instantiation_error(Condition::from_panic(payload))),
    };

    let invoked = panic::catch_unwind(AssertUnwindSafe(|| test.method.invoke(instance.as_mut())));
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(move || drop(instance))) {
        return Err(RunnerError::Teardown {
            unit: unit.name(),
            test: test.name(),
            condition: Condition::from_panic(payload),
        });
    }

    let invocation = match invoked {
        Ok(Ok(result)) => Invocation::from(result),
        Ok(Err(source)) => {
            return Err(RunnerError::Invocation {
                unit: unit.name(),
                test: test.name(),
                source,
            });
        }
        Err(payload) => Invocation::Raised(Condition::from_panic(payload)),
    };

    let outcome = judge(&test.declaration, invocation);
    tracing::debug!(test = %test.qualified_name(), status = %outcome.status(), "classified");
    Ok(outcome)
}

/// Discover and run every selected test of one unit.
///
/// # Errors
/// Returns `Aborted` with the partial results if discovery fails or a test
/// hits a fatal error. Remaining tests are not run.
pub fn run_unit(
    unit: &UnitType,
    config: &RunnerConfig,
    sink: &mut dyn ProgressSink,
) -> Result<UnitRun, Aborted> {
    let mut run = UnitRun::new(unit.name());

    let discovered = discover_tests(unit).and_then(|tests| {
        let ignored = discover_ignored(unit)?;
        Ok((tests, ignored))
    });
    let (tests, ignored) = match discovered {
        Ok(found) => found,
        Err(e) => return Err(abort(sink, run, e.into())),
    };

    let tests: Vec<DiscoveredTest> = tests
        .into_iter()
        .filter(|t| config.selects(&t.qualified_name()))
        .collect();

    sink.on_event(&ProgressEvent::UnitStarted {
        unit: unit.name(),
        test_count: tests.len(),
    });

    for method in ignored
        .iter()
        .filter(|m| config.selects(&m.qualified_name()))
    {
        run.ignored.push(IgnoredTest::from(method));
        sink.on_event(&ProgressEvent::TestIgnored { method });
    }

    for test in &tests {
        sink.on_event(&ProgressEvent::TestStarted { test });
        let outcome = match run_test(unit, test) {
            Ok(outcome) => outcome,
            Err(error) => return Err(abort(sink, run, error)),
        };
        run.tally.record(outcome.bucket());
        run.tests.push(TestRecord::new(test, &outcome));
        sink.on_event(&ProgressEvent::TestCompleted {
            test,
            outcome: &outcome,
        });
    }

    sink.on_event(&ProgressEvent::UnitCompleted { run: &run });
    Ok(run)
}

/// Run units in order, stopping at the first fatal error.
///
/// Results tallied before the error are kept in the report.
pub fn run_all(units: &[UnitType], config: &RunnerConfig, sink: &mut dyn ProgressSink) -> RunReport {
    let mut report = RunReport::default();
    for unit in units {
        match run_unit(unit, config, sink) {
            Ok(run) => report.units.push(run),
            Err(Aborted { partial, error }) => {
                report.units.push(partial);
                report.aborted = Some(error);
                break;
            }
        }
    }
    report
}

fn abort(sink: &mut dyn ProgressSink, partial: UnitRun, error: RunnerError) -> Aborted {
    tracing::warn!(unit = %partial.unit, %error, "run aborted");
    sink.on_event(&ProgressEvent::UnitAborted {
        error: &error,
        partial: &partial,
    });
    Aborted { partial, error }
}
