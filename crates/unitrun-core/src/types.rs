//! Core data types for unitrun.

use crate::condition::{Condition, FailureKind};
use crate::discovery::{DiscoveredTest, MethodHandle};
use serde::Serialize;
use std::ops::AddAssign;

/// Classified result of one test invocation.
#[derive(Debug)]
pub enum Outcome {
    /// Returned normally, nothing expected.
    Success,
    /// Raised an assertion failure.
    AssertionFailure(Condition),
    /// Raised a condition that was not expected, or not the expected kind.
    UnexpectedError(Condition),
    /// Raised exactly the expected kind.
    ExpectedConditionSatisfied(Condition),
    /// Returned normally although a condition was expected.
    ExpectedConditionNotRaised { expected: FailureKind },
}

impl Outcome {
    #[must_use]
    pub const fn bucket(&self) -> Bucket {
        match self {
            Self::Success | Self::ExpectedConditionSatisfied(_) => Bucket::Clean,
            Self::AssertionFailure(_) | Self::ExpectedConditionNotRaised { .. } => Bucket::Failure,
            Self::UnexpectedError(_) => Bucket::Error,
        }
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::Success => Status::Success,
            Self::AssertionFailure(_) => Status::AssertionFailure,
            Self::UnexpectedError(_) => Status::UnexpectedError,
            Self::ExpectedConditionSatisfied(_) => Status::ExpectedConditionSatisfied,
            Self::ExpectedConditionNotRaised { .. } => Status::ExpectedConditionNotRaised,
        }
    }

    /// The raised condition, if any.
    #[must_use]
    pub const fn condition(&self) -> Option<&Condition> {
        match self {
            Self::AssertionFailure(c)
            | Self::UnexpectedError(c)
            | Self::ExpectedConditionSatisfied(c) => Some(c),
            Self::Success | Self::ExpectedConditionNotRaised { .. } => None,
        }
    }

    /// Diagnostic line for failures and errors.
    #[must_use]
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::AssertionFailure(c) | Self::UnexpectedError(c) => Some(c.to_string()),
            Self::ExpectedConditionNotRaised { expected } => {
                Some(format!("{expected} was not raised"))
            }
            Self::Success | Self::ExpectedConditionSatisfied(_) => None,
        }
    }
}

/// Tally bucket an outcome counts towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Clean,
    Failure,
    Error,
}

/// Serializable name of an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    AssertionFailure,
    UnexpectedError,
    ExpectedConditionSatisfied,
    ExpectedConditionNotRaised,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AssertionFailure => "assertion_failure",
            Self::UnexpectedError => "unexpected_error",
            Self::ExpectedConditionSatisfied => "expected_condition_satisfied",
            Self::ExpectedConditionNotRaised => "expected_condition_not_raised",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub tests_run: usize,
    pub failures: usize,
    pub errors: usize,
}

impl Tally {
    /// Count one classified test.
    pub const fn record(&mut self, bucket: Bucket) {
        self.tests_run += 1;
        match bucket {
            Bucket::Clean => {}
            Bucket::Failure => self.failures += 1,
            Bucket::Error => self.errors += 1,
        }
    }

    #[must_use]
    pub const fn successes(&self) -> usize {
        self.tests_run
            .saturating_sub(self.failures)
            .saturating_sub(self.errors)
    }

    /// No failures and no errors.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Self) {
        self.tests_run += other.tests_run;
        self.failures += other.failures;
        self.errors += other.errors;
    }
}

/// Serializable record of one classified test.
#[derive(Debug, Clone, Serialize)]
pub struct TestRecord {
    pub name: String,
    pub status: Status,
    pub bucket: Bucket,
    /// Kind of the raised condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Message of the raised condition, or the unmet expectation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Declared expected kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl TestRecord {
    #[must_use]
    pub fn new(test: &DiscoveredTest, outcome: &Outcome) -> Self {
        let condition = outcome.condition();
        let message = match outcome {
            Outcome::ExpectedConditionNotRaised { .. } => outcome.diagnostic(),
            _ => condition.map(Condition::message),
        };
        Self {
            name: test.name().to_string(),
            status: outcome.status(),
            bucket: outcome.bucket(),
            kind: condition.map(|c| c.kind().name().to_string()),
            message,
            expected: test
                .declaration
                .expected()
                .map(|k| k.name().to_string()),
        }
    }
}

/// A test skipped because it is marked ignored.
#[derive(Debug, Clone, Serialize)]
pub struct IgnoredTest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&MethodHandle> for IgnoredTest {
    fn from(method: &MethodHandle) -> Self {
        Self {
            name: method.name().to_string(),
            reason: method.ignore_reason().map(ToString::to_string),
        }
    }
}

/// Results for one unit type.
#[derive(Debug, Clone, Serialize)]
pub struct UnitRun {
    pub unit: String,
    pub tally: Tally,
    pub tests: Vec<TestRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<IgnoredTest>,
}

impl UnitRun {
    #[must_use]
    pub fn new(unit: &str) -> Self {
        Self {
            unit: unit.to_string(),
            tally: Tally::default(),
            tests: Vec::new(),
            ignored: Vec::new(),
        }
    }
}

/// Machine-readable report of a whole run (`--format json`).
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    /// ISO 8601 timestamp of the execution.
    pub timestamp: String,

    /// Results per unit type, in run order.
    pub units: Vec<UnitRun>,

    /// Totals across all units.
    pub summary: Tally,

    /// Fatal error that stopped the run early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}
