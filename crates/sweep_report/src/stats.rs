use std::collections::HashMap;
use std::time::Duration;

use colored::Colorize;
use sweep_logging::time::format_duration;

use crate::{TestResult, TestStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestResultStats {
    inner: HashMap<TestStatus, usize>,
}

impl TestResultStats {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a TestResult>) -> Self {
        let mut stats = Self::default();
        for result in results {
            stats.add(result.status());
        }
        stats
    }

    /// A run succeeds when nothing failed and nothing broke.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.broken() == 0
    }

    fn get(&self, status: TestStatus) -> usize {
        self.inner.get(&status).copied().unwrap_or(0)
    }

    pub fn passed(&self) -> usize {
        self.get(TestStatus::Pass)
    }

    pub fn failed(&self) -> usize {
        self.get(TestStatus::Fail)
    }

    pub fn skipped(&self) -> usize {
        self.get(TestStatus::Skip)
    }

    pub fn broken(&self) -> usize {
        self.get(TestStatus::Broken)
    }

    pub fn add(&mut self, status: TestStatus) {
        self.inner
            .entry(status)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    pub const fn display(&self, elapsed: Duration) -> DisplayTestResultStats<'_> {
        DisplayTestResultStats {
            stats: self,
            elapsed,
        }
    }
}

pub struct DisplayTestResultStats<'a> {
    stats: &'a TestResultStats,
    elapsed: Duration,
}

impl std::fmt::Display for DisplayTestResultStats<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "test result: ")?;

        if self.stats.is_success() {
            write!(f, "{}", "ok".green())?;
        } else {
            write!(f, "{}", "FAILED".red())?;
        }

        writeln!(
            f,
            ". {} passed; {} failed; {} skipped; {} broken; finished in {}",
            self.stats.passed(),
            self.stats.failed(),
            self.stats.skipped(),
            self.stats.broken(),
            format_duration(self.elapsed)
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn counts_results_by_status() {
        let results = [
            TestResult::new("a", TestStatus::Pass),
            TestResult::new("b", TestStatus::Pass),
            TestResult::new("c", TestStatus::Skip),
        ];

        let stats = TestResultStats::from_results(&results);

        assert_eq!(stats.failed(), 0);
        assert_eq!(stats.passed(), 2);
        assert_eq!(stats.skipped(), 1);
        assert!(stats.is_success());
    }

    #[test]
    fn broken_results_fail_the_run() {
        let mut stats = TestResultStats::default();
        stats.add(TestStatus::Pass);
        stats.add(TestStatus::Broken);

        assert!(!stats.is_success());
    }

    #[test]
    fn display_summary() {
        colored::control::set_override(false);

        let mut stats = TestResultStats::default();
        stats.add(TestStatus::Pass);
        stats.add(TestStatus::Fail);

        assert_eq!(
            stats.display(Duration::from_millis(12)).to_string(),
            "test result: FAILED. 1 passed; 1 failed; 0 skipped; 0 broken; finished in 12ms\n"
        );
    }
}
