use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{ExitCode, Termination};
use std::time::Instant;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use colored::Colorize;
use sweep_cli::{Args, Command, LocateCommand, TestCommand};
use sweep_collector::search_locations_for_tests;
use sweep_logging::{set_colored_override, setup_tracing};
use sweep_metadata::ProjectConfiguration;
use sweep_report::{JsonReportParser, TestResult, TestResultStats, TestStatus, merge_coverage};
use sweep_runner::{EngineOutcome, RunContext, SuiteEngine, TestEngine};
use sweep_system::{OsSystem, path::absolute};

pub fn sweep_main(f: impl FnOnce(Vec<OsString>) -> Vec<OsString>) -> ExitStatus {
    run(f).unwrap_or_else(|error| {
        let mut stderr = io::stderr().lock();

        writeln!(stderr, "{}", "sweep failed".red().bold()).ok();
        for cause in error.chain() {
            if let Some(ioerr) = cause.downcast_ref::<io::Error>() {
                if ioerr.kind() == io::ErrorKind::BrokenPipe {
                    return ExitStatus::Success;
                }
            }

            writeln!(stderr, "  {} {cause}", "Cause:".bold()).ok();
        }

        ExitStatus::Error
    })
}

fn run(f: impl FnOnce(Vec<OsString>) -> Vec<OsString>) -> Result<ExitStatus> {
    let args = wild::args_os();

    let args = f(
        argfile::expand_args_from(args, argfile::parse_fromfile, argfile::PREFIX)
            .context("Failed to read CLI arguments from file")?,
    );

    let args = Args::parse_from(args);

    match args.command {
        Command::Test(test_args) => test(&test_args),
        Command::Locate(locate_args) => locate(&locate_args).map(|()| ExitStatus::Success),
        Command::Version => version().map(|()| ExitStatus::Success),
    }
}

pub(crate) fn version() -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "sweep {}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

pub(crate) fn locate(args: &LocateCommand) -> Result<()> {
    let mut stdout = io::stdout().lock();

    for path in &args.paths {
        for candidate in search_locations_for_tests(path) {
            writeln!(stdout, "{candidate}")?;
        }
    }

    Ok(())
}

pub(crate) fn test(args: &TestCommand) -> Result<ExitStatus> {
    let verbosity = args.verbosity.level();

    set_colored_override(args.color);

    setup_tracing(verbosity).context("Failed to set up logging")?;

    let cwd = {
        let cwd = std::env::current_dir().context("Failed to get the current working directory")?;
        Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
            anyhow::anyhow!(
                "The current working directory `{}` contains non-Unicode characters. sweep only supports Unicode paths.",
                path.display()
            )
        })?
    };

    tracing::debug!(cwd = %cwd, "Working directory");

    let project_root = args
        .project_root
        .as_ref()
        .map_or_else(|| cwd.clone(), |root| absolute(root, &cwd));

    let system = OsSystem::new(&cwd);

    let config_file = args.config_file.as_ref().map(|path| absolute(path, &cwd));

    let configuration =
        ProjectConfiguration::discover(&project_root, &system, config_file, args.options())?;

    let context = RunContext::resolve(
        &system,
        project_root,
        args.changed_paths.clone(),
        &configuration,
        args.coverage,
    )?;

    // An interrupted run is never a passing run.
    ctrlc::set_handler(move || {
        std::process::exit(ExitStatus::Error.to_i32());
    })?;

    let start_time = Instant::now();
    let engine = SuiteEngine::new(system, context, JsonReportParser);

    let mut stdout = io::stdout().lock();

    let results = match engine.run()? {
        EngineOutcome::NoTests => {
            writeln!(stdout, "No tests to run.")?;
            return Ok(ExitStatus::Success);
        }
        EngineOutcome::Completed(results) => results,
    };

    write_results(&mut stdout, &results)?;

    if args.coverage {
        write_coverage(&mut stdout, &results)?;
    }

    let stats = TestResultStats::from_results(&results);
    writeln!(stdout)?;
    write!(stdout, "{}", stats.display(start_time.elapsed()))?;

    if stats.is_success() {
        Ok(ExitStatus::Success)
    } else {
        Ok(ExitStatus::Failure)
    }
}

fn write_results(stdout: &mut impl Write, results: &[TestResult]) -> io::Result<()> {
    for result in results {
        let status = match result.status() {
            TestStatus::Pass => "ok".green(),
            TestStatus::Fail => "FAILED".red(),
            TestStatus::Skip => "skipped".yellow(),
            TestStatus::Broken => "BROKEN".red().bold(),
        };

        writeln!(stdout, "test {} ... {status}", result.name())?;
    }

    let failures: Vec<&TestResult> = results
        .iter()
        .filter(|result| result.status().is_failure())
        .collect();

    if failures.is_empty() {
        return Ok(());
    }

    writeln!(stdout)?;
    writeln!(stdout, "failures:")?;

    for failure in failures {
        writeln!(stdout)?;
        writeln!(stdout, "---- {} ----", failure.name())?;

        if let Some(message) = failure.message() {
            for line in message.lines() {
                writeln!(stdout, "    {line}")?;
            }
        }
    }

    Ok(())
}

fn write_coverage(stdout: &mut impl Write, results: &[TestResult]) -> io::Result<()> {
    let coverage = merge_coverage(results.iter().filter_map(TestResult::coverage));

    if coverage.is_empty() {
        return Ok(());
    }

    writeln!(stdout)?;
    writeln!(stdout, "coverage:")?;

    for (file, lines) in &coverage {
        let covered = lines.chars().filter(|line| *line == 'C').count();
        let executable = covered + lines.chars().filter(|line| *line == 'U').count();

        writeln!(stdout, "    {file}: {covered}/{executable} lines")?;
    }

    Ok(())
}

#[derive(Copy, Clone)]
pub enum ExitStatus {
    /// Every test passed or was skipped.
    Success = 0,

    /// The run completed but a test failed or a runner process broke.
    Failure = 1,

    /// The run could not be performed.
    Error = 2,
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl ExitStatus {
    pub const fn to_i32(self) -> i32 {
        self as i32
    }
}
