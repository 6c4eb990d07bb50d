mod coverage;
mod json;
mod parser;
mod result;
mod stats;

pub use coverage::{merge_coverage, read_clover_coverage};
pub use json::JsonReportParser;
pub use parser::{ReportInput, ReportParser};
pub use result::{CoverageMap, TestResult, TestStatus};
pub use stats::{DisplayTestResultStats, TestResultStats};
