use camino::{Utf8Path, Utf8PathBuf};

use crate::TestResult;

/// Everything one runner process left behind.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    /// The test file the process ran.
    pub test_file: &'a Utf8Path,

    /// Contents of the structured report, empty if the runner never wrote one.
    pub report: &'a str,

    /// Captured standard error of the process.
    pub stderr: &'a str,

    /// `None` when the process could not be started or was killed by a signal.
    pub exit_code: Option<i32>,

    /// The coverage artifact, if coverage was requested.
    pub coverage_file: Option<&'a Utf8Path>,

    pub project_root: &'a Utf8Path,

    /// Absolute paths of the source files coverage is reported for.
    pub affected: &'a [Utf8PathBuf],
}

/// Converts the output of a single runner process into test results.
pub trait ReportParser: Send + Sync {
    fn parse(&self, input: &ReportInput<'_>) -> Vec<TestResult>;
}
