//! Test declarations: how a unit type marks its methods.

use crate::condition::{Condition, FailureKind};
use serde::Serialize;
use std::error::Error as StdError;

/// Result of a test body.
pub type TestResult = Result<(), Condition>;

/// Signature of a method declared on unit type `U`.
pub type TestFn<U> = fn(&mut U) -> TestResult;

/// Discriminant of a [`Marker`], used to query discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Test,
    Ignore,
}

/// What a test method expects its body to raise.
///
/// `expected == None` means no condition is expected; anything raised is an
/// error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestDeclaration {
    expected: Option<FailureKind>,
}

impl TestDeclaration {
    #[must_use]
    pub const fn none() -> Self {
        Self { expected: None }
    }

    /// Expect the body to raise exactly an `E`.
    #[must_use]
    pub fn expecting<E: StdError + 'static>() -> Self {
        Self {
            expected: Some(FailureKind::of::<E>()),
        }
    }

    #[must_use]
    pub const fn expected(&self) -> Option<FailureKind> {
        self.expected
    }
}

/// Metadata attached to a declared method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Test(TestDeclaration),
    Ignore { reason: Option<String> },
}

impl Marker {
    #[must_use]
    pub const fn kind(&self) -> MarkerKind {
        match self {
            Self::Test(_) => MarkerKind::Test,
            Self::Ignore { .. } => MarkerKind::Ignore,
        }
    }
}

/// A method declared on unit type `U`, with its markers.
pub struct Method<U> {
    pub(crate) name: &'static str,
    pub(crate) markers: Vec<Marker>,
    pub(crate) body: TestFn<U>,
}

impl<U> Method<U> {
    /// A method with no markers. Discovery never selects it as a test.
    #[must_use]
    pub const fn plain(name: &'static str, body: TestFn<U>) -> Self {
        Self {
            name,
            markers: Vec::new(),
            body,
        }
    }

    /// A test method that expects no condition.
    #[must_use]
    pub fn test(name: &'static str, body: TestFn<U>) -> Self {
        Self {
            name,
            markers: vec![Marker::Test(TestDeclaration::none())],
            body,
        }
    }

    /// Declare that the body must raise exactly an `E`.
    ///
    /// Marks the method as a test if it was not one already.
    #[must_use]
    pub fn expecting<E: StdError + 'static>(mut self) -> Self {
        let declaration = TestDeclaration::expecting::<E>();
        let existing = self
            .markers
            .iter_mut()
            .find(|m| m.kind() == MarkerKind::Test);
        match existing {
            Some(marker) => *marker = Marker::Test(declaration),
            None => self.markers.push(Marker::Test(declaration)),
        }
        self
    }

    /// Skip the method at run time; it is still listed.
    #[must_use]
    pub fn ignore(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        self.markers.push(Marker::Ignore {
            reason: (!reason.is_empty()).then_some(reason),
        });
        self
    }

    /// Attach an arbitrary marker.
    #[must_use]
    pub fn marked(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

/// A unit of code whose marked methods can be run as tests.
///
/// Register an implementing type with [`register_unit!`](crate::register_unit).
pub trait TestUnit: Sized + 'static {
    /// Build a fresh instance. Called once before every test.
    ///
    /// # Errors
    /// A failed construction aborts the whole run.
    fn construct() -> Result<Self, Condition>;

    /// Declared methods, in declaration order.
    fn methods() -> Vec<Method<Self>>;
}
