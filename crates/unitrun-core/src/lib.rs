//! Core library for the unitrun test harness.
//!
//! Test units are plain Rust types implementing [`TestUnit`]. This crate
//! provides:
//! - Assertion helpers raising [`AssertionFailure`]
//! - Method declarations with test and ignore markers
//! - Link-time unit registration ([`register_unit!`]) and discovery
//! - Outcome classification based on truth table
//! - A sequential runner with a fresh instance per test
//! - Text and JSON reporting

pub mod assertion;
pub mod condition;
pub mod config;
pub mod declaration;
pub mod discovery;
pub mod judge;
pub mod registry;
pub mod report;
pub mod reporter;
pub mod runner;
pub mod types;

#[doc(hidden)]
pub use inventory;

pub use assertion::{AssertionFailure, assert_equals, assert_false, assert_true, fail};
pub use condition::{BoxError, Condition, FailureKind, Panicked};
pub use config::{
    CONFIG_FILE, ConfigError, ConfigOverrides, UnitrunConfig, apply_overrides, load_config,
};
pub use declaration::{
    Marker, MarkerKind, Method, TestDeclaration, TestFn, TestResult, TestUnit,
};
pub use discovery::{
    DiscoveredTest, DiscoveryError, InvocationError, MethodHandle, UnitType, discover,
    discover_ignored, discover_tests,
};
pub use judge::{Invocation, judge};
pub use registry::{registered_units, resolve_unit};
pub use report::{
    ReportFormat, build_execution_report, format_results_json, format_summary, timestamp_now,
};
pub use reporter::{Reporter, ReporterConfig};
pub use runner::{
    Aborted, ProgressEvent, ProgressSink, RunReport, RunnerConfig, RunnerError, run_all,
    run_test, run_unit,
};
pub use types::{
    Bucket, ExecutionReport, IgnoredTest, Outcome, Status, Tally, TestRecord, UnitRun,
};
