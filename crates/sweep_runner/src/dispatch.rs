use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Instant;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use sweep_logging::time::format_duration;
use tempfile::NamedTempFile;

/// How to launch the test runner, shared by every test file of a run.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub binary: &'a Utf8Path,

    /// The runner's own configuration file, passed with `-c`.
    pub options_file: Option<&'a Utf8Path>,

    /// Working directory of every runner process.
    pub project_root: &'a Utf8Path,
}

/// One test file together with the artifacts its runner process writes.
///
/// The artifacts are temporary files owned by this unit and removed when it is dropped.
#[derive(Debug)]
pub struct TestUnit {
    test_file: Utf8PathBuf,
    report: NamedTempFile,
    coverage: Option<NamedTempFile>,
}

impl TestUnit {
    fn new_in(test_file: Utf8PathBuf, coverage: bool, dir: &Path) -> std::io::Result<Self> {
        let report = tempfile::Builder::new()
            .prefix("sweep-report-")
            .suffix(".json")
            .tempfile_in(dir)?;

        let coverage = if coverage {
            Some(
                tempfile::Builder::new()
                    .prefix("sweep-coverage-")
                    .suffix(".xml")
                    .tempfile_in(dir)?,
            )
        } else {
            None
        };

        Ok(Self {
            test_file,
            report,
            coverage,
        })
    }

    pub fn test_file(&self) -> &Utf8Path {
        &self.test_file
    }

    pub fn report_path(&self) -> &Path {
        self.report.path()
    }

    pub fn coverage_path(&self) -> Option<&Path> {
        self.coverage.as_ref().map(NamedTempFile::path)
    }
}

/// What a finished runner process left behind.
#[derive(Debug)]
pub struct RunOutcome {
    unit: TestUnit,
    exit_code: Option<i32>,
    stderr: String,
}

impl RunOutcome {
    pub fn test_file(&self) -> &Utf8Path {
        self.unit.test_file()
    }

    pub fn report_path(&self) -> &Path {
        self.unit.report_path()
    }

    pub fn coverage_path(&self) -> Option<&Path> {
        self.unit.coverage_path()
    }

    /// `None` if the process could not be started or was terminated by a signal.
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}

#[derive(Debug)]
struct Worker {
    index: usize,
    unit: TestUnit,
    child: Result<Child, String>,
    start_time: Instant,
}

impl Worker {
    fn wait(self) -> RunOutcome {
        let child = match self.child {
            Ok(child) => child,
            Err(stderr) => {
                return RunOutcome {
                    unit: self.unit,
                    exit_code: None,
                    stderr,
                };
            }
        };

        match child.wait_with_output() {
            Ok(output) => {
                let duration = self.start_time.elapsed();

                if output.status.success() {
                    tracing::info!(
                        "Runner for `{}` completed successfully in {}",
                        self.unit.test_file(),
                        format_duration(duration),
                    );
                } else {
                    tracing::info!(
                        "Runner for `{}` exited with code {} in {}",
                        self.unit.test_file(),
                        output.status.code().unwrap_or(-1),
                        format_duration(duration),
                    );
                }

                RunOutcome {
                    unit: self.unit,
                    exit_code: output.status.code(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }
            }
            Err(err) => {
                tracing::error!("Error waiting on runner for `{}`: {err}", self.unit.test_file());

                RunOutcome {
                    unit: self.unit,
                    exit_code: None,
                    stderr: format!("Failed to wait for the test runner: {err}"),
                }
            }
        }
    }
}

/// Runs every test file in its own runner process and collects what each one left behind.
///
/// Every artifact is created before the first process starts, and all processes are started
/// before any is waited on. The returned outcomes are in the order of `test_files`, whatever
/// order the processes finish in. A runner that cannot be started only affects its own
/// outcome.
pub fn dispatch(
    test_files: &[Utf8PathBuf],
    invocation: &Invocation<'_>,
    coverage: bool,
) -> Result<Vec<RunOutcome>> {
    let units = prepare_units(test_files, coverage, &std::env::temp_dir())?;
    let workers = spawn_workers(units, invocation);

    tracing::info!("Waiting for {} runners to complete", workers.len());

    let (sender, receiver) = crossbeam_channel::unbounded();

    std::thread::scope(|scope| {
        for worker in workers {
            let sender = sender.clone();
            scope.spawn(move || {
                let index = worker.index;
                let outcome = worker.wait();
                let _ = sender.send((index, outcome));
            });
        }
    });

    drop(sender);

    let mut slots: Vec<Option<RunOutcome>> = test_files.iter().map(|_| None).collect();
    for (index, outcome) in receiver {
        slots[index] = Some(outcome);
    }

    Ok(slots.into_iter().flatten().collect())
}

fn prepare_units(
    test_files: &[Utf8PathBuf],
    coverage: bool,
    artifact_dir: &Path,
) -> Result<Vec<TestUnit>> {
    test_files
        .iter()
        .map(|test_file| {
            TestUnit::new_in(test_file.clone(), coverage, artifact_dir)
                .with_context(|| format!("Failed to create report files for `{test_file}`"))
        })
        .collect()
}

fn spawn_workers(units: Vec<TestUnit>, invocation: &Invocation<'_>) -> Vec<Worker> {
    let mut workers = Vec::with_capacity(units.len());

    for (index, unit) in units.into_iter().enumerate() {
        let test_file = unit.test_file();

        let start_time = Instant::now();
        let child = runner_command(invocation, &unit).spawn().map_err(|err| {
            tracing::error!("Failed to spawn runner for `{test_file}`: {err}");
            format!("Failed to spawn test runner `{}`: {err}", invocation.binary)
        });

        if child.is_ok() {
            tracing::info!("Runner {index} spawned for `{test_file}`");
        }

        workers.push(Worker {
            index,
            unit,
            child,
            start_time,
        });
    }

    workers
}

fn runner_command(invocation: &Invocation<'_>, unit: &TestUnit) -> Command {
    let mut cmd = Command::new(invocation.binary);

    if let Some(options_file) = invocation.options_file {
        cmd.arg("-c").arg(options_file);
    }

    cmd.arg("-d")
        .arg("display_errors=stderr")
        .arg("--log-json")
        .arg(unit.report_path());

    if let Some(coverage) = unit.coverage_path() {
        cmd.arg("--coverage-clover").arg(coverage);
    }

    cmd.arg(unit.test_file())
        .current_dir(invocation.project_root)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    cmd
}
