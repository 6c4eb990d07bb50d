mod configuration_file;
mod lookup;
mod options;
mod suite;

pub use configuration_file::{ConfigurationFile, ConfigurationFileError};
pub use lookup::{
    ConfigLookup, ProjectConfiguration, RUNNER_BINARY_KEY, RUNNER_CONFIG_KEY,
    RUNNER_OPTIONS_FILE_KEY,
};
pub use options::{Options, RunnerOptions, SweepTomlError};
pub use suite::{
    DEFAULT_SUITE_FILE_NAME, DirectoryEntry, SuiteConfig, SuiteConfigError, TestSuiteEntry,
};

pub const SWEEP_CONFIG_FILE_NAME: &str = "sweep.toml";
