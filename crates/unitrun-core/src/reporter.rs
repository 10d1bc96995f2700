//! Test output reporter with cargo test-like formatting.

use crate::discovery::{DiscoveredTest, MethodHandle};
use crate::report::{bucket_label, format_summary, format_test_line};
use crate::runner::{ProgressEvent, ProgressSink, RunnerError};
use crate::types::{Bucket, Outcome, Tally};
use std::io::{self, Write};

/// Reporter configuration.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Show verbose output (declarations and satisfied expectations).
    pub verbose: bool,
    /// Use colors in output.
    pub color: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: true,
        }
    }
}

const GREEN: &str = "32";
const RED: &str = "31";
const YELLOW: &str = "33";

/// Test reporter with cargo test-like output.
#[derive(Clone)]
pub struct Reporter {
    config: ReporterConfig,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub const fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.config.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    /// Print the start of a unit run.
    pub fn unit_start(&self, unit: &str, test_count: usize) {
        println!();
        println!("running {test_count} tests for {unit}");
    }

    /// Print the declaration of a test about to run (only in verbose mode).
    pub fn test_start(&self, test: &DiscoveredTest) {
        if !self.config.verbose {
            return;
        }
        match test.declaration.expected() {
            Some(kind) => println!("  starting: {} (expects {kind})", test.name()),
            None => println!("  starting: {}", test.name()),
        }
    }

    /// Print a classified test line, with its diagnostic for failures and
    /// errors.
    pub fn test_result(&self, test: &DiscoveredTest, outcome: &Outcome) {
        let bucket = outcome.bucket();
        let code = match bucket {
            Bucket::Clean => GREEN,
            Bucket::Failure => RED,
            Bucket::Error => YELLOW,
        };
        let status = self.paint(bucket_label(bucket), code);
        println!("{}", format_test_line(&test.qualified_name(), &status));

        if let Some(diagnostic) = outcome.diagnostic() {
            println!("    {diagnostic}");
        } else if self.config.verbose {
            if let Outcome::ExpectedConditionSatisfied(condition) = outcome {
                println!("    raised expected {condition}");
            }
        }
    }

    /// Print an ignored test line.
    pub fn ignored(&self, method: &MethodHandle) {
        let status = self.paint("ignored", YELLOW);
        let line = format_test_line(&method.qualified_name(), &status);
        match method.ignore_reason() {
            Some(reason) => println!("{line}, {reason}"),
            None => println!("{line}"),
        }
    }

    /// Print the final summary.
    pub fn summary(&self, tally: &Tally) {
        println!();
        println!("{}", format_summary(tally));
    }

    /// Print a fatal run error.
    pub fn aborted(&self, error: &RunnerError) {
        self.error(&format!("run aborted: {error}"));
    }

    /// Print a warning message.
    pub fn warn(&self, message: &str) {
        eprintln!("{}: {message}", self.paint("warning", YELLOW));
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        eprintln!("{}: {message}", self.paint("error", RED));
    }

    /// Flush stdout.
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

impl ProgressSink for Reporter {
    fn on_event(&mut self, event: &ProgressEvent<'_>) {
        match event {
            ProgressEvent::UnitStarted { unit, test_count } => self.unit_start(unit, *test_count),
            ProgressEvent::TestIgnored { method } => self.ignored(method),
            ProgressEvent::TestStarted { test } => self.test_start(test),
            ProgressEvent::TestCompleted { test, outcome } => self.test_result(test, outcome),
            ProgressEvent::UnitCompleted { .. } => {}
            ProgressEvent::UnitAborted { error, .. } => self.aborted(error),
        }
        self.flush();
    }
}
