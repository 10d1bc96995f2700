//! Outcome classification based on truth table.

use crate::condition::Condition;
use crate::declaration::{TestDeclaration, TestResult};
use crate::types::Outcome;

/// What the test body did when invoked.
#[derive(Debug)]
pub enum Invocation {
    Returned,
    Raised(Condition),
}

impl From<TestResult> for Invocation {
    fn from(result: TestResult) -> Self {
        match result {
            Ok(()) => Self::Returned,
            Err(condition) => Self::Raised(condition),
        }
    }
}

/// Classify an invocation against the test's declaration.
///
/// # Truth Table
/// | invocation       | expected | kind(C) == K | → Outcome                    |
/// |------------------|----------|--------------|------------------------------|
/// | returned         | none     | -            | Success                      |
/// | returned         | K        | -            | ExpectedConditionNotRaised   |
/// | raised assertion | *        | *            | AssertionFailure             |
/// | raised C         | none     | -            | UnexpectedError              |
/// | raised C         | K        | true         | ExpectedConditionSatisfied   |
/// | raised C         | K        | false        | UnexpectedError              |
///
/// Kinds match by exact type identity only.
#[must_use]
pub fn judge(declaration: &TestDeclaration, invocation: Invocation) -> Outcome {
    match (invocation, declaration.expected()) {
        (Invocation::Returned, None) => Outcome::Success,
        (Invocation::Returned, Some(expected)) => Outcome::ExpectedConditionNotRaised { expected },
        (Invocation::Raised(condition), _) if condition.is_assertion() => {
            Outcome::AssertionFailure(condition)
        }
        (Invocation::Raised(condition), None) => Outcome::UnexpectedError(condition),
        (Invocation::Raised(condition), Some(expected)) if condition.kind() == expected => {
            Outcome::ExpectedConditionSatisfied(condition)
        }
        (Invocation::Raised(condition), Some(_)) => Outcome::UnexpectedError(condition),
    }
}
