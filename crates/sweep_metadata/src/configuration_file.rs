use camino::{Utf8Path, Utf8PathBuf};
use sweep_system::System;
use thiserror::Error;

use crate::SWEEP_CONFIG_FILE_NAME;
use crate::options::{Options, SweepTomlError};

/// A `sweep.toml` configuration file with the options it contains.
pub struct ConfigurationFile {
    path: Utf8PathBuf,
    options: Options,
}

impl ConfigurationFile {
    pub fn from_path(
        path: Utf8PathBuf,
        system: &dyn System,
    ) -> Result<Self, ConfigurationFileError> {
        let sweep_toml_str = system.read_to_string(&path).map_err(|source| {
            ConfigurationFileError::FileReadError {
                source,
                path: path.clone(),
            }
        })?;

        Self::parse(path, &sweep_toml_str)
    }

    /// Loads the `sweep.toml` at the project root if it exists.
    pub fn project(
        project_root: &Utf8Path,
        system: &dyn System,
    ) -> Result<Option<Self>, ConfigurationFileError> {
        let sweep_toml_path = project_root.join(SWEEP_CONFIG_FILE_NAME);

        tracing::debug!(
            "Searching for a project configuration at `{path}`",
            path = &sweep_toml_path
        );

        let Ok(sweep_toml_str) = system.read_to_string(&sweep_toml_path) else {
            return Ok(None);
        };

        Self::parse(sweep_toml_path, &sweep_toml_str).map(Some)
    }

    /// Loads the user-level configuration file if it exists.
    ///
    /// Returns `None` if the file does not exist or if the concept of user-level configurations
    /// doesn't exist on `system`.
    pub fn user(system: &dyn System) -> Result<Option<Self>, ConfigurationFileError> {
        let Some(configuration_directory) = system.user_config_directory() else {
            return Ok(None);
        };

        let sweep_toml_path = configuration_directory
            .join("sweep")
            .join(SWEEP_CONFIG_FILE_NAME);

        tracing::debug!(
            "Searching for a user-level configuration at `{path}`",
            path = &sweep_toml_path
        );

        let Ok(sweep_toml_str) = system.read_to_string(&sweep_toml_path) else {
            return Ok(None);
        };

        Self::parse(sweep_toml_path, &sweep_toml_str).map(Some)
    }

    fn parse(path: Utf8PathBuf, content: &str) -> Result<Self, ConfigurationFileError> {
        match Options::from_toml_str(content) {
            Ok(options) => Ok(Self { path, options }),
            Err(error) => Err(ConfigurationFileError::InvalidSweepToml {
                source: Box::new(error),
                path,
            }),
        }
    }

    /// Returns the path to the configuration file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn into_options(self) -> Options {
        self.options
    }
}

#[derive(Debug, Error)]
pub enum ConfigurationFileError {
    #[error("{path} is not a valid `sweep.toml`: {source}")]
    InvalidSweepToml {
        source: Box<SweepTomlError>,
        path: Utf8PathBuf,
    },
    #[error("Failed to read `{path}`: {source}")]
    FileReadError {
        #[source]
        source: std::io::Error,
        path: Utf8PathBuf,
    },
}
