use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::coverage::read_clover_coverage;
use crate::{ReportInput, ReportParser, TestResult, TestStatus};

static DATA_SET_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s\(.*\)$").unwrap());

/// Parses the runner's JSON event log (`--log-json`) and its clover coverage report.
///
/// The log is a stream of concatenated JSON objects. Only `testStart` and `test` events are
/// of interest, everything else is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReportParser;

impl ReportParser for JsonReportParser {
    fn parse(&self, input: &ReportInput<'_>) -> Vec<TestResult> {
        let mut results = parse_events(input.report, input.stderr);

        if results.is_empty() {
            results.push(missing_report_result(input));
        }

        let coverage = input.coverage_file.and_then(|coverage_file| {
            read_clover_coverage(coverage_file, input.project_root, input.affected)
        });

        if coverage.is_none() {
            return results;
        }

        results
            .into_iter()
            .map(|result| result.with_coverage(coverage.clone()))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum Event {
    TestStart {
        test: String,
    },
    Test(TestEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TestEvent {
    test: String,

    #[serde(default)]
    status: String,

    #[serde(default)]
    time: Option<f64>,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    trace: Vec<TraceFrame>,
}

#[derive(Debug, Deserialize)]
struct TraceFrame {
    #[serde(default)]
    file: Option<String>,

    #[serde(default)]
    line: Option<u64>,
}

impl TestEvent {
    fn into_result(self) -> TestResult {
        let message = self.message.unwrap_or_default();

        let status = match self.status.as_str() {
            "pass" => TestStatus::Pass,
            "fail" => TestStatus::Fail,
            "error"
                if message.starts_with("Skipped Test")
                    || message.starts_with("Incomplete Test") =>
            {
                TestStatus::Skip
            }
            _ => TestStatus::Broken,
        };

        let duration = self
            .time
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok());

        TestResult::new(test_name(&self.test), status)
            .with_duration(duration)
            .with_message(Some(format_message(&message, &self.trace)))
    }
}

fn parse_events(report: &str, stderr: &str) -> Vec<TestResult> {
    let mut results = Vec::new();
    let mut running: Option<String> = None;

    for value in serde_json::Deserializer::from_str(report).into_iter::<serde_json::Value>() {
        // Past a syntax error the stream position is lost.
        let value = match value {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Stopped reading malformed test report: {err}");
                break;
            }
        };

        let event = match Event::deserialize(value) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!("Skipping unexpected test report event: {err}");
                continue;
            }
        };

        match event {
            Event::TestStart { test } => {
                if let Some(unfinished) = running.replace(test) {
                    results.push(unfinished_result(&unfinished, stderr));
                }
            }
            Event::Test(event) => {
                if running.as_deref() == Some(event.test.as_str()) {
                    running = None;
                }
                results.push(event.into_result());
            }
            Event::Other => {}
        }
    }

    // The runner died while this test was running.
    if let Some(unfinished) = running {
        results.push(unfinished_result(&unfinished, stderr));
    }

    results
}

fn unfinished_result(test: &str, stderr: &str) -> TestResult {
    let message = if stderr.trim().is_empty() {
        "Test runner exited before the test finished".to_string()
    } else {
        stderr.trim().to_string()
    };

    TestResult::new(test_name(test), TestStatus::Broken).with_message(Some(message))
}

fn missing_report_result(input: &ReportInput<'_>) -> TestResult {
    let name = input
        .test_file
        .strip_prefix(input.project_root)
        .unwrap_or(input.test_file);

    let message = if !input.stderr.trim().is_empty() {
        input.stderr.trim().to_string()
    } else {
        match input.exit_code {
            Some(code) => format!("Test runner exited with code {code} without writing a report"),
            None => "Test runner did not complete".to_string(),
        }
    };

    TestResult::new(name.as_str(), TestStatus::Broken).with_message(Some(message))
}

/// Strips the ` (...)` data set description from a test name.
fn test_name(test: &str) -> String {
    DATA_SET_SUFFIX.replace(test, "").into_owned()
}

fn format_message(message: &str, trace: &[TraceFrame]) -> String {
    let mut text = message.trim_end().to_string();

    for frame in trace {
        let Some(file) = &frame.file else {
            continue;
        };

        if !text.is_empty() {
            text.push('\n');
        }

        match frame.line {
            Some(line) => text.push_str(&format!("{file}:{line}")),
            None => text.push_str(file),
        }
    }

    text
}
