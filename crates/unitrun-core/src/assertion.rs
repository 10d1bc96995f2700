//! Assertion primitives for test bodies.
//!
//! Every helper fails with [`AssertionFailure`], the one condition kind the
//! judge counts as a failure rather than an error.

use std::fmt::Debug;
use thiserror::Error;

/// Condition raised by a violated assertion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Fail with `message` unless `condition` holds.
///
/// # Errors
/// Returns `AssertionFailure` carrying `message` when `condition` is false.
pub fn assert_true(condition: bool, message: impl Into<String>) -> Result<(), AssertionFailure> {
    if condition {
        Ok(())
    } else {
        Err(AssertionFailure::new(message))
    }
}

/// Fail with `message` if `condition` holds.
///
/// # Errors
/// Returns `AssertionFailure` carrying `message` when `condition` is true.
pub fn assert_false(condition: bool, message: impl Into<String>) -> Result<(), AssertionFailure> {
    assert_true(!condition, message)
}

/// Fail unless `expected == actual`.
///
/// # Errors
/// Returns `AssertionFailure` with `message` and both values when they differ.
pub fn assert_equals<T: PartialEq + Debug + ?Sized>(
    expected: &T,
    actual: &T,
    message: &str,
) -> Result<(), AssertionFailure> {
    if expected == actual {
        return Ok(());
    }
    Err(AssertionFailure::new(format!(
        "{message}: expected {expected:?}, got {actual:?}"
    )))
}

/// Unconditional failure.
///
/// # Errors
/// Always returns `AssertionFailure` carrying `message`.
pub fn fail<T>(message: impl Into<String>) -> Result<T, AssertionFailure> {
    Err(AssertionFailure::new(message))
}
