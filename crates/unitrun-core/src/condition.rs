//! Raised conditions and their kinds.

use crate::assertion::AssertionFailure;
use serde::{Serialize, Serializer};
use std::any::{Any, TypeId, type_name};
use std::error::Error as StdError;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Error value carried by a [`Condition`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Identity of a condition kind: the concrete type of the raised error.
///
/// Two kinds are equal only when they name the same type. There is no
/// subtype relation between kinds.
#[derive(Clone, Copy)]
pub struct FailureKind {
    id: TypeId,
    name: &'static str,
}

impl FailureKind {
    /// The kind of conditions raised from errors of type `E`.
    #[must_use]
    pub fn of<E: StdError + 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
        }
    }

    /// Fully qualified type name of the kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for FailureKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FailureKind {}

impl Hash for FailureKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FailureKind").field(&self.name).finish()
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for FailureKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// A condition raised by a test body.
///
/// Any `std::error::Error + Send + Sync + 'static` converts into a condition
/// with `?`. The kind is fixed at conversion time from the concrete type.
pub struct Condition {
    kind: FailureKind,
    error: BoxError,
}

impl Condition {
    pub fn new<E: StdError + Send + Sync + 'static>(error: E) -> Self {
        Self {
            kind: FailureKind::of::<E>(),
            error: Box::new(error),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Whether this condition is an assertion failure.
    #[must_use]
    pub fn is_assertion(&self) -> bool {
        self.error.is::<AssertionFailure>()
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.error.downcast_ref::<E>()
    }

    #[must_use]
    pub fn into_inner(self) -> BoxError {
        self.error
    }

    /// Convert an unwinding payload into a condition.
    ///
    /// An `AssertionFailure` payload keeps its kind; string payloads become
    /// [`Panicked`].
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<AssertionFailure>() {
            Ok(failure) => return Self::new(*failure),
            Err(other) => other,
        };
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with a non-string payload".to_string()
        };
        Self::new(Panicked { message })
    }
}

impl<E: StdError + Send + Sync + 'static> From<E> for Condition {
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("kind", &self.kind.name)
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.error)
    }
}

/// Condition raised when a test body panics.
///
/// Declare `expecting::<Panicked>()` on a test that must panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Panicked {
    message: String,
}

impl Panicked {
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
