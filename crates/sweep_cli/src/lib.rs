use camino::Utf8PathBuf;
use clap::Parser;
use sweep_logging::{TerminalColor, VerbosityLevel};
use sweep_metadata::{Options, RunnerOptions};

#[derive(Debug, Parser)]
#[command(
    author,
    name = "sweep",
    about = "Run the test files of a suite description, one runner process per file."
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Run every test file the suite description selects.
    Test(TestCommand),

    /// Print the directories where tests for a source file are likely to live.
    Locate(LocateCommand),

    /// Display sweep's version
    Version,
}

#[derive(Debug, Parser)]
pub struct TestCommand {
    /// Changed files, relative to the project root.
    ///
    /// Narrows the files coverage is reported for. Every whitelisted file counts when none
    /// of them are whitelisted.
    #[arg(value_name = "CHANGED")]
    pub changed_paths: Vec<Utf8PathBuf>,

    /// The project root [default: the current directory].
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<Utf8PathBuf>,

    /// Ask the runner for a coverage report and attach per-line coverage to each result.
    #[arg(long)]
    pub coverage: bool,

    /// Path of the suite description, relative to the project root or absolute.
    #[arg(long, value_name = "PATH")]
    pub runner_config: Option<String>,

    /// Name or path of the test-runner binary.
    #[arg(long, value_name = "PATH")]
    pub runner_binary: Option<String>,

    /// The test runner's own configuration file, passed to it with `-c`.
    #[arg(long, value_name = "PATH")]
    pub runner_options_file: Option<String>,

    /// Use this configuration file instead of `<project root>/sweep.toml`.
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<Utf8PathBuf>,

    #[clap(flatten)]
    pub verbosity: Verbosity,

    /// Control when colored output is used.
    #[arg(long, value_name = "WHEN")]
    pub color: Option<TerminalColor>,
}

impl TestCommand {
    /// The options given on the command line, to be layered over every configuration file.
    pub fn options(&self) -> Options {
        if self.runner_config.is_none()
            && self.runner_binary.is_none()
            && self.runner_options_file.is_none()
        {
            return Options::default();
        }

        Options {
            runner: Some(RunnerOptions {
                config: self.runner_config.clone(),
                binary: self.runner_binary.clone(),
                options_file: self.runner_options_file.clone(),
            }),
        }
    }
}

#[derive(Debug, Parser)]
pub struct LocateCommand {
    /// Source files to find test directories for.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct Verbosity {
    /// Use verbose output (or `-vv` and `-vvv` for more verbose output).
    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        overrides_with = "quiet"
    )]
    verbose: u8,

    /// Only print errors.
    #[arg(long, short, global = true, overrides_with = "verbose")]
    quiet: bool,
}

impl Verbosity {
    pub const fn level(self) -> VerbosityLevel {
        if self.quiet {
            return VerbosityLevel::Quiet;
        }

        match self.verbose {
            0 => VerbosityLevel::Default,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::ExtraVerbose,
            _ => VerbosityLevel::Trace,
        }
    }
}
