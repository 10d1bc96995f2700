//! Example units bundled with the CLI.
//!
//! `ExampleTest` exercises every classification once; run it with
//! `unitrun ExampleTest`.

use std::io;
use thiserror::Error;
use unitrun_core::{
    Condition, Method, Panicked, TestResult, TestUnit, assert_equals, assert_true, register_unit,
};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct RuntimeFault(pub &'static str);

/// One test per outcome, plus a method that is not a test.
pub struct ExampleTest;

#[allow(clippy::unused_self, clippy::unnecessary_wraps)]
impl ExampleTest {
    fn a(&mut self) -> TestResult {
        let sides = 4;
        assert_true(sides != 4, "This always happens")?;
        Ok(())
    }

    fn b(&mut self) -> TestResult {
        let sides = 4;
        assert_true(sides == 4, "This should never happen")?;
        Ok(())
    }

    fn c(&mut self) -> TestResult {
        Ok(())
    }

    fn d(&mut self) -> TestResult {
        Err(io::Error::other("An I/O exception occurred").into())
    }

    fn e(&mut self) -> TestResult {
        Err(RuntimeFault("Oops!").into())
    }

    fn f(&mut self) -> TestResult {
        Ok(())
    }
}

impl TestUnit for ExampleTest {
    fn construct() -> Result<Self, Condition> {
        Ok(Self)
    }

    fn methods() -> Vec<Method<Self>> {
        vec![
            Method::test("a", Self::a),
            Method::test("b", Self::b),
            Method::test("c", Self::c).expecting::<io::Error>(),
            Method::test("d", Self::d).expecting::<io::Error>(),
            Method::test("e", Self::e).expecting::<io::Error>(),
            Method::plain("f", Self::f),
        ]
    }
}

register_unit!(ExampleTest);

/// Every test sees a counter that starts at zero.
pub struct CounterTest {
    count: usize,
    values: Vec<u32>,
}

#[allow(clippy::unnecessary_wraps)]
impl CounterTest {
    fn bump(&mut self) -> usize {
        self.count += 1;
        self.count
    }

    fn first_bump(&mut self) -> TestResult {
        let count = self.bump();
        assert_equals(&1, &count, "fresh instance")?;
        Ok(())
    }

    fn second_bump(&mut self) -> TestResult {
        self.bump();
        let count = self.bump();
        assert_equals(&2, &count, "fresh instance")?;
        Ok(())
    }

    fn third_bump(&mut self) -> TestResult {
        let count = self.bump();
        assert_equals(&1, &count, "fresh instance")?;
        Ok(())
    }

    fn out_of_bounds(&mut self) -> TestResult {
        let value = self.values[self.count];
        assert_equals(&0, &value, "unreachable")?;
        Ok(())
    }

    fn overflow(&mut self) -> TestResult {
        self.count = usize::MAX;
        self.bump();
        Ok(())
    }
}

impl TestUnit for CounterTest {
    fn construct() -> Result<Self, Condition> {
        Ok(Self {
            count: 0,
            values: Vec::new(),
        })
    }

    fn methods() -> Vec<Method<Self>> {
        vec![
            Method::test("first_bump", Self::first_bump),
            Method::test("second_bump", Self::second_bump),
            Method::test("third_bump", Self::third_bump),
            Method::test("out_of_bounds", Self::out_of_bounds).expecting::<Panicked>(),
            Method::test("overflow", Self::overflow).ignore("depends on overflow checks"),
        ]
    }
}

register_unit!(CounterTest);

/// A unit whose constructor always fails.
pub struct BrokenFixture;

#[allow(clippy::unused_self, clippy::unnecessary_wraps)]
impl BrokenFixture {
    fn never_runs(&mut self) -> TestResult {
        Ok(())
    }
}

impl TestUnit for BrokenFixture {
    fn construct() -> Result<Self, Condition> {
        Err(io::Error::new(io::ErrorKind::NotFound, "fixture file missing").into())
    }

    fn methods() -> Vec<Method<Self>> {
        vec![Method::test("never_runs", Self::never_runs)]
    }
}

register_unit!(BrokenFixture);

/// Two methods share a name, so the unit cannot be discovered.
pub struct ClashingNames;

impl TestUnit for ClashingNames {
    fn construct() -> Result<Self, Condition> {
        Ok(Self)
    }

    fn methods() -> Vec<Method<Self>> {
        vec![
            Method::test("check", |_| Ok(())),
            Method::test("check", |_| Ok(())),
        ]
    }
}

register_unit!(ClashingNames);

/// A unit whose instances panic when dropped.
pub struct DirtyTeardown;

impl Drop for DirtyTeardown {
    #[allow(clippy::panic)]
    fn drop(&mut self) {
        panic!("temporary directory still in use");
    }
}

impl TestUnit for DirtyTeardown {
    fn construct() -> Result<Self, Condition> {
        Ok(Self)
    }

    fn methods() -> Vec<Method<Self>> {
        vec![Method::test("passes_before_teardown", |_| Ok(()))]
    }
}

register_unit!(DirtyTeardown);
