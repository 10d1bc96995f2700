//! Method discovery on registered unit types.

use crate::condition::Condition;
use crate::declaration::{Marker, MarkerKind, TestDeclaration, TestResult, TestUnit};
use std::any::{Any, type_name};
use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// A freshly constructed, type-erased unit instance.
pub type Instance = Box<dyn Any>;

type Invoker = Arc<dyn Fn(&mut dyn Any) -> Result<TestResult, InvocationError> + Send + Sync>;

/// Errors that can occur during discovery and unit resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("cannot introspect unit '{unit}': {reason}")]
    Unavailable { unit: String, reason: String },
    #[error("no registered unit matches '{0}'")]
    UnknownUnit(String),
    #[error("unit name '{name}' is ambiguous: {}", .candidates.join(", "))]
    AmbiguousUnit {
        name: String,
        candidates: Vec<String>,
    },
}

/// Failure of the invocation mechanism itself, unrelated to the test body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("receiver is not a `{expected}`")]
    ReceiverMismatch { expected: &'static str },
}

/// Type-erased description of a unit type.
#[derive(Clone, Copy)]
pub struct UnitType {
    name: &'static str,
    construct: fn() -> Result<Instance, Condition>,
    declare: fn(&'static str) -> Vec<MethodHandle>,
}

impl UnitType {
    #[must_use]
    pub const fn of<U: TestUnit>(name: &'static str) -> Self {
        Self {
            name,
            construct: construct_erased::<U>,
            declare: declare_erased::<U>,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Build a fresh instance of the unit.
    ///
    /// # Errors
    /// Returns the condition raised by the unit's constructor.
    pub fn instantiate(&self) -> Result<Instance, Condition> {
        (self.construct)()
    }

    /// Every declared method, marked or not, in declaration order.
    #[must_use]
    pub fn declared_methods(&self) -> Vec<MethodHandle> {
        (self.declare)(self.name)
    }
}

impl fmt::Debug for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitType").field("name", &self.name).finish()
    }
}

fn construct_erased<U: TestUnit>() -> Result<Instance, Condition> {
    U::construct().map(|unit| Box::new(unit) as Instance)
}

fn declare_erased<U: TestUnit>(unit: &'static str) -> Vec<MethodHandle> {
    U::methods()
        .into_iter()
        .map(|method| {
            let body = method.body;
            let invoke: Invoker = Arc::new(move |receiver: &mut dyn Any| {
                receiver
                    .downcast_mut::<U>()
                    .map(body)
                    .ok_or(InvocationError::ReceiverMismatch {
                        expected: type_name::<U>(),
                    })
            });
            MethodHandle {
                unit,
                name: method.name,
                markers: method.markers.into(),
                invoke,
            }
        })
        .collect()
}

/// A declared method, detached from its unit type.
#[derive(Clone)]
pub struct MethodHandle {
    unit: &'static str,
    name: &'static str,
    markers: Arc<[Marker]>,
    invoke: Invoker,
}

impl MethodHandle {
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        self.unit
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// `unit::method`, the name used for filtering and reporting.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.unit, self.name)
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        self.markers.iter().any(|m| m.kind() == kind)
    }

    /// The test declaration, if the method is marked as a test.
    #[must_use]
    pub fn declaration(&self) -> Option<TestDeclaration> {
        self.markers.iter().find_map(|m| match m {
            Marker::Test(declaration) => Some(*declaration),
            Marker::Ignore { .. } => None,
        })
    }

    /// The reason given for ignoring the method, if any.
    #[must_use]
    pub fn ignore_reason(&self) -> Option<&str> {
        self.markers.iter().find_map(|m| match m {
            Marker::Ignore { reason } => reason.as_deref(),
            Marker::Test(_) => None,
        })
    }

    /// Call the method on `receiver`.
    ///
    /// The outer `Result` is the invocation mechanism; the inner one is the
    /// test body.
    ///
    /// # Errors
    /// Returns `InvocationError` if `receiver` is not an instance of the
    /// method's unit type.
    pub fn invoke(&self, receiver: &mut dyn Any) -> Result<TestResult, InvocationError> {
        (self.invoke)(receiver)
    }
}

impl fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandle")
            .field("unit", &self.unit)
            .field("name", &self.name)
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

/// A test selected for a run.
#[derive(Debug, Clone)]
pub struct DiscoveredTest {
    pub unit: &'static str,
    pub method: MethodHandle,
    pub declaration: TestDeclaration,
}

impl DiscoveredTest {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.method.name()
    }

    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.method.qualified_name()
    }
}

/// Methods of `unit` carrying a marker of `kind`, in declaration order.
///
/// # Errors
/// Returns `DiscoveryError::Unavailable` if the unit's declarations cannot be
/// read: the declaring function panics, a method name repeats, or a method
/// carries more than one test marker.
pub fn discover(unit: &UnitType, kind: MarkerKind) -> Result<Vec<MethodHandle>, DiscoveryError> {
    let methods = introspect(unit)?;
    Ok(methods.into_iter().filter(|m| m.has_marker(kind)).collect())
}

/// Tests to run: test-marked methods that are not ignored.
///
/// # Errors
/// See [`discover`].
pub fn discover_tests(unit: &UnitType) -> Result<Vec<DiscoveredTest>, DiscoveryError> {
    let tests: Vec<DiscoveredTest> = discover(unit, MarkerKind::Test)?
        .into_iter()
        .filter(|m| !m.has_marker(MarkerKind::Ignore))
        .filter_map(|method| {
            method.declaration().map(|declaration| DiscoveredTest {
                unit: unit.name(),
                method,
                declaration,
            })
        })
        .collect();
    tracing::debug!(unit = unit.name(), count = tests.len(), "discovered tests");
    Ok(tests)
}

/// Test methods that are also marked ignored. Listed, never run.
///
/// # Errors
/// See [`discover`].
pub fn discover_ignored(unit: &UnitType) -> Result<Vec<MethodHandle>, DiscoveryError> {
    Ok(discover(unit, MarkerKind::Ignore)?
        .into_iter()
        .filter(|m| m.has_marker(MarkerKind::Test))
        .collect())
}

fn introspect(unit: &UnitType) -> Result<Vec<MethodHandle>, DiscoveryError> {
    let unavailable = |reason: String| DiscoveryError::Unavailable {
        unit: unit.name().to_string(),
        reason,
    };

    let methods = panic::catch_unwind(AssertUnwindSafe(|| unit.declared_methods()))
        .map_err(|_| unavailable("method declarations panicked".to_string()))?;

    let mut seen = HashSet::new();
    for method in &methods {
        if !seen.insert(method.name()) {
            return Err(unavailable(format!(
                "method '{}' is declared more than once",
                method.name()
            )));
        }
        let test_markers = method
            .markers()
            .iter()
            .filter(|m| m.kind() == MarkerKind::Test)
            .count();
        if test_markers > 1 {
            return Err(unavailable(format!(
                "method '{}' carries {test_markers} test markers",
                method.name()
            )));
        }
    }
    Ok(methods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Method;
    use std::io;

    struct Sample {
        hits: u32,
    }

    impl Sample {
        fn bump(&mut self) -> TestResult {
            self.hits += 1;
            Ok(())
        }

        fn raise(&mut self) -> TestResult {
            Err(io::Error::other("raised").into())
        }
    }

    impl TestUnit for Sample {
        fn construct() -> Result<Self, Condition> {
            Ok(Self { hits: 0 })
        }

        fn methods() -> Vec<Method<Self>> {
            vec![
                Method::test("bump", Self::bump),
                Method::test("raise", Self::raise).expecting::<io::Error>(),
                Method::test("skipped", Self::bump).ignore("not today"),
                Method::plain("helper", Self::bump),
                Method::plain("scratch", Self::bump).ignore("not a test"),
            ]
        }
    }

    struct Duplicated;

    impl TestUnit for Duplicated {
        fn construct() -> Result<Self, Condition> {
            Ok(Self)
        }

        fn methods() -> Vec<Method<Self>> {
            vec![
                Method::test("same", |_| Ok(())),
                Method::test("same", |_| Ok(())),
            ]
        }
    }

    struct DoubleMarked;

    impl TestUnit for DoubleMarked {
        fn construct() -> Result<Self, Condition> {
            Ok(Self)
        }

        fn methods() -> Vec<Method<Self>> {
            vec![Method::test("twice", |_| Ok(())).marked(Marker::Test(TestDeclaration::none()))]
        }
    }

    struct Unreadable;

    impl TestUnit for Unreadable {
        fn construct() -> Result<Self, Condition> {
            Ok(Self)
        }

        #[allow(clippy::panic)]
        fn methods() -> Vec<Method<Self>> {
            panic!("declarations unavailable");
        }
    }

    const SAMPLE: UnitType = UnitType::of::<Sample>("discovery::Sample");

    fn names(methods: &[MethodHandle]) -> Vec<&'static str> {
        methods.iter().map(MethodHandle::name).collect()
    }

    #[test]
    fn test_discover_by_marker_kind() -> Result<(), DiscoveryError> {
        assert_eq!(
            names(&discover(&SAMPLE, MarkerKind::Test)?),
            vec!["bump", "raise", "skipped"]
        );
        assert_eq!(
            names(&discover(&SAMPLE, MarkerKind::Ignore)?),
            vec!["skipped", "scratch"]
        );
        Ok(())
    }

    #[test]
    fn test_discover_tests_excludes_ignored_and_plain() -> Result<(), DiscoveryError> {
        let tests = discover_tests(&SAMPLE)?;
        let found: Vec<&str> = tests.iter().map(DiscoveredTest::name).collect();
        assert_eq!(found, vec!["bump", "raise"]);
        assert_eq!(tests[0].declaration, TestDeclaration::none());
        assert_eq!(
            tests[1].declaration,
            TestDeclaration::expecting::<io::Error>()
        );
        assert_eq!(tests[1].qualified_name(), "discovery::Sample::raise");
        Ok(())
    }

    #[test]
    fn test_discovery_is_idempotent() -> Result<(), DiscoveryError> {
        let first: HashSet<&str> = names(&discover(&SAMPLE, MarkerKind::Test)?)
            .into_iter()
            .collect();
        let second: HashSet<&str> = names(&discover(&SAMPLE, MarkerKind::Test)?)
            .into_iter()
            .collect();
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_ignore_reason() -> Result<(), DiscoveryError> {
        let ignored = discover(&SAMPLE, MarkerKind::Ignore)?;
        assert_eq!(ignored[0].ignore_reason(), Some("not today"));
        Ok(())
    }

    #[test]
    fn test_invoke_on_fresh_instance() -> Result<(), Box<dyn std::error::Error>> {
        let tests = discover_tests(&SAMPLE)?;
        let mut instance = SAMPLE
            .instantiate()
            .map_err(|c| c.to_string())?;
        let result = tests[0].method.invoke(instance.as_mut())?;
        assert!(result.is_ok());
        let hits = instance.downcast_ref::<Sample>().map(|s| s.hits);
        assert_eq!(hits, Some(1));
        Ok(())
    }

    #[test]
    fn test_invoke_wrong_receiver() -> Result<(), DiscoveryError> {
        let tests = discover_tests(&SAMPLE)?;
        let mut wrong: Instance = Box::new(Duplicated);
        let result = tests[0].method.invoke(wrong.as_mut());
        assert!(matches!(
            result,
            Err(InvocationError::ReceiverMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_duplicate_method_is_unavailable() {
        let unit = UnitType::of::<Duplicated>("discovery::Duplicated");
        let err = discover(&unit, MarkerKind::Test).err();
        assert!(matches!(err, Some(DiscoveryError::Unavailable { .. })));
        assert!(
            err.map(|e| e.to_string())
                .unwrap_or_default()
                .contains("declared more than once")
        );
    }

    #[test]
    fn test_double_test_marker_is_unavailable() {
        let unit = UnitType::of::<DoubleMarked>("discovery::DoubleMarked");
        assert!(matches!(
            discover_tests(&unit),
            Err(DiscoveryError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_ignored_requires_test_marker() -> Result<(), DiscoveryError> {
        assert_eq!(names(&discover_ignored(&SAMPLE)?), vec!["skipped"]);
        Ok(())
    }

    #[test]
    fn test_panicking_declarations_are_unavailable() {
        let unit = UnitType::of::<Unreadable>("discovery::Unreadable");
        let err = discover_tests(&unit).err();
        assert!(matches!(err, Some(DiscoveryError::Unavailable { .. })));
        assert!(
            err.map(|e| e.to_string())
                .unwrap_or_default()
                .contains("method declarations panicked")
        );
    }
}
