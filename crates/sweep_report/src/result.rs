use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Per-line coverage of one source file, keyed by its path relative to the project root.
///
/// Each character describes one line: `N` not executable, `C` covered, `U` uncovered.
pub type CoverageMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    Broken,
}

impl TestStatus {
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Fail | Self::Broken)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Broken => "broken",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a single test as reported by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    name: String,
    status: TestStatus,
    duration: Option<Duration>,
    message: Option<String>,
    coverage: Option<CoverageMap>,
}

impl TestResult {
    pub fn new(name: impl Into<String>, status: TestStatus) -> Self {
        Self {
            name: name.into(),
            status,
            duration: None,
            message: None,
            coverage: None,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message.filter(|message| !message.is_empty());
        self
    }

    #[must_use]
    pub fn with_coverage(mut self, coverage: Option<CoverageMap>) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn status(&self) -> TestStatus {
        self.status
    }

    pub const fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub const fn coverage(&self) -> Option<&CoverageMap> {
        self.coverage.as_ref()
    }
}
