//! Report generation for run results.

use crate::runner::RunReport;
use crate::types::{Bucket, ExecutionReport, Tally};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

/// Format for report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown format: {s}. Valid formats: text, json")),
        }
    }
}

/// The three summary lines.
#[must_use]
pub fn format_summary(tally: &Tally) -> String {
    format!(
        "Tests run: {}\nFailures: {}\nErrors: {}",
        tally.tests_run, tally.failures, tally.errors
    )
}

/// Short status word for a test line.
#[must_use]
pub const fn bucket_label(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Clean => "ok",
        Bucket::Failure => "FAILED",
        Bucket::Error => "ERROR",
    }
}

/// `test <name> ... <status>`
#[must_use]
pub fn format_test_line(qualified_name: &str, status: &str) -> String {
    format!("test {qualified_name} ... {status}")
}

/// ISO 8601 UTC timestamp with millisecond precision.
#[must_use]
pub fn timestamp_now() -> String {
    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Build the JSON report for a finished (or aborted) run.
#[must_use]
pub fn build_execution_report(timestamp: &str, report: &RunReport) -> ExecutionReport {
    ExecutionReport {
        timestamp: timestamp.to_string(),
        units: report.units.clone(),
        summary: report.tally(),
        aborted: report.aborted.as_ref().map(ToString::to_string),
    }
}

/// Pretty-printed JSON for an execution report.
#[must_use]
pub fn format_results_json(report: &ExecutionReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
