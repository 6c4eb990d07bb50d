use std::collections::{BTreeMap, HashMap};

use camino::{Utf8Path, Utf8PathBuf};
use sweep_system::{EnvVars, System};

use crate::configuration_file::{ConfigurationFile, ConfigurationFileError};
use crate::options::{Options, RunnerOptions};

/// Key of the suite description path.
pub const RUNNER_CONFIG_KEY: &str = "runner.config";

/// Key of the test-runner binary override.
pub const RUNNER_BINARY_KEY: &str = "runner.binary";

/// Key of the runner's own configuration file, handed to it with `-c`.
pub const RUNNER_OPTIONS_FILE_KEY: &str = "runner.options-file";

/// Key/value access to configuration, however it was assembled.
pub trait ConfigLookup {
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigLookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigLookup for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

/// Configuration layered from every source, highest precedence first:
///
/// 1. Command line overrides.
/// 1. `SWEEP_RUNNER_*` environment variables.
/// 1. The project `sweep.toml` (or an explicitly passed configuration file).
/// 1. The user-level `sweep.toml`.
#[derive(Debug, Default, Clone)]
pub struct ProjectConfiguration {
    options: Options,
}

impl ProjectConfiguration {
    pub fn discover(
        project_root: &Utf8Path,
        system: &dyn System,
        config_file: Option<Utf8PathBuf>,
        overrides: Options,
    ) -> Result<Self, ConfigurationFileError> {
        let mut options = overrides.combine(env_options(|name| std::env::var(name).ok()));

        let project_file = match config_file {
            Some(path) => {
                tracing::debug!("Using overridden configuration file at '{path}'");
                Some(ConfigurationFile::from_path(path, system)?)
            }
            None => ConfigurationFile::project(project_root, system)?,
        };

        if let Some(file) = project_file {
            tracing::debug!("Loaded project configuration from '{}'", file.path());
            options = options.combine(file.into_options());
        }

        if let Some(file) = ConfigurationFile::user(system)? {
            tracing::debug!("Loaded user configuration from '{}'", file.path());
            options = options.combine(file.into_options());
        }

        Ok(Self { options })
    }

    pub const fn from_options(options: Options) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &Options {
        &self.options
    }
}

impl ConfigLookup for ProjectConfiguration {
    fn get(&self, key: &str) -> Option<String> {
        let runner = self.options.runner()?;

        match key {
            RUNNER_CONFIG_KEY => runner.config.clone(),
            RUNNER_BINARY_KEY => runner.binary.clone(),
            RUNNER_OPTIONS_FILE_KEY => runner.options_file.clone(),
            _ => None,
        }
    }
}

fn env_options(var: impl Fn(&str) -> Option<String>) -> Options {
    let config = var(EnvVars::SWEEP_RUNNER_CONFIG).filter(|value| !value.is_empty());
    let binary = var(EnvVars::SWEEP_RUNNER_BINARY).filter(|value| !value.is_empty());
    let options_file =
        var(EnvVars::SWEEP_RUNNER_OPTIONS_FILE).filter(|value| !value.is_empty());

    if config.is_none() && binary.is_none() && options_file.is_none() {
        return Options::default();
    }

    Options {
        runner: Some(RunnerOptions {
            config,
            binary,
            options_file,
        }),
    }
}
