use camino::Utf8Path;
use sweep_collector::FileSet;
use sweep_report::{ReportInput, ReportParser, TestResult};

use crate::RunOutcome;

/// Parses every outcome and concatenates the results.
///
/// Results stay in the order of `outcomes`, and in report order within one outcome.
pub fn aggregate<P: ReportParser + ?Sized>(
    outcomes: &[RunOutcome],
    parser: &P,
    project_root: &Utf8Path,
    affected: &FileSet,
) -> Vec<TestResult> {
    outcomes
        .iter()
        .flat_map(|outcome| {
            let report = read_report(outcome);

            parser.parse(&ReportInput {
                test_file: outcome.test_file(),
                report: &report,
                stderr: outcome.stderr(),
                exit_code: outcome.exit_code(),
                coverage_file: outcome.coverage_path().and_then(Utf8Path::from_path),
                project_root,
                affected: affected.as_slice(),
            })
        })
        .collect()
}

fn read_report(outcome: &RunOutcome) -> String {
    match std::fs::read_to_string(outcome.report_path()) {
        Ok(report) => report,
        Err(err) => {
            tracing::warn!(
                "Failed to read the report for `{}`: {err}",
                outcome.test_file()
            );
            String::new()
        }
    }
}
