use sweep_system::EnvVars;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};
use tracing_tree::HierarchicalLayer;

pub use verbosity::VerbosityLevel;

pub mod time;
mod verbosity;

/// Install the global `tracing` subscriber for the given verbosity.
///
/// `SWEEP_LOG` takes precedence over the verbosity level when set, using the usual
/// `EnvFilter` directive syntax (`sweep_runner=trace,info`).
pub fn setup_tracing(level: VerbosityLevel) -> Result<(), TryInitError> {
    let filter = match std::env::var(EnvVars::SWEEP_LOG) {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::default().add_directive(level.level_filter().into()),
    };

    let registry = tracing_subscriber::registry().with(filter);

    if level.is_trace() {
        registry
            .with(
                HierarchicalLayer::default()
                    .with_indent_lines(true)
                    .with_indent_amount(2)
                    .with_bracketed_fields(true)
                    .with_thread_ids(true)
                    .with_targets(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(level.is_extra_verbose())
                    .without_time(),
            )
            .try_init()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TerminalColor {
    /// Display colors if the output goes to an interactive terminal.
    #[default]
    Auto,

    /// Always display colors.
    Always,

    /// Never display colors.
    Never,
}

pub fn set_colored_override(color: Option<TerminalColor>) {
    let Some(color) = color else {
        return;
    };

    match color {
        TerminalColor::Auto => {
            colored::control::unset_override();
        }
        TerminalColor::Always => {
            colored::control::set_override(true);
        }
        TerminalColor::Never => {
            colored::control::set_override(false);
        }
    }
}
