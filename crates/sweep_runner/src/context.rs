use camino::{Utf8Path, Utf8PathBuf};
use sweep_metadata::{
    ConfigLookup, DEFAULT_SUITE_FILE_NAME, RUNNER_BINARY_KEY, RUNNER_CONFIG_KEY,
    RUNNER_OPTIONS_FILE_KEY,
};
use sweep_system::path::absolute;
use sweep_system::{System, find_binary};
use thiserror::Error;

/// Runner binary used when `runner.binary` is not configured.
pub const DEFAULT_RUNNER_BINARY: &str = "phpunit";

/// Everything a run needs, resolved against the project root up front.
#[derive(Debug, Clone)]
pub struct RunContext {
    project_root: Utf8PathBuf,
    changed_paths: Vec<Utf8PathBuf>,
    suite_file: Option<Utf8PathBuf>,
    runner_options_file: Option<Utf8PathBuf>,
    runner_binary: Utf8PathBuf,
    coverage: bool,
}

impl RunContext {
    /// Resolves the suite description, the runner's own configuration file and the runner
    /// binary from `lookup`.
    ///
    /// All of them must exist before anything is spawned, so a misconfigured project fails
    /// here rather than once per test file. Configured paths are absolute afterwards, as
    /// runner processes start in the project root rather than in the current directory.
    pub fn resolve(
        system: &dyn System,
        project_root: Utf8PathBuf,
        changed_paths: Vec<Utf8PathBuf>,
        lookup: &dyn ConfigLookup,
        coverage: bool,
    ) -> Result<Self, ConfigurationError> {
        let suite_file = resolve_suite_file(system, &project_root, lookup)?;

        let runner_options_file = match lookup.get(RUNNER_OPTIONS_FILE_KEY) {
            Some(configured) => Some(
                resolve_configured_file(system, &project_root, &configured)
                    .ok_or(ConfigurationError::OptionsFileNotFound { path: configured })?,
            ),
            None => None,
        };

        let binary = lookup
            .get(RUNNER_BINARY_KEY)
            .unwrap_or_else(|| DEFAULT_RUNNER_BINARY.to_string());
        let runner_binary = find_binary(&binary, &project_root)
            .ok_or(ConfigurationError::BinaryNotFound { binary })?;

        tracing::debug!(
            suite_file = suite_file.as_deref().map(Utf8Path::as_str),
            runner_options_file = runner_options_file.as_deref().map(Utf8Path::as_str),
            runner = %runner_binary,
            coverage,
            "Resolved run context"
        );

        Ok(Self {
            project_root,
            changed_paths,
            suite_file,
            runner_options_file,
            runner_binary,
            coverage,
        })
    }

    pub fn project_root(&self) -> &Utf8Path {
        &self.project_root
    }

    pub fn changed_paths(&self) -> &[Utf8PathBuf] {
        &self.changed_paths
    }

    /// The suite description, or `None` when the project has none.
    pub fn suite_file(&self) -> Option<&Utf8Path> {
        self.suite_file.as_deref()
    }

    /// The file handed to the runner with `-c`, or `None` to let the runner discover its own.
    pub fn runner_options_file(&self) -> Option<&Utf8Path> {
        self.runner_options_file.as_deref()
    }

    pub fn runner_binary(&self) -> &Utf8Path {
        &self.runner_binary
    }

    pub const fn coverage(&self) -> bool {
        self.coverage
    }
}

fn resolve_suite_file(
    system: &dyn System,
    project_root: &Utf8Path,
    lookup: &dyn ConfigLookup,
) -> Result<Option<Utf8PathBuf>, ConfigurationError> {
    let Some(configured) = lookup.get(RUNNER_CONFIG_KEY) else {
        let default = project_root.join(DEFAULT_SUITE_FILE_NAME);
        if system.is_file(&default) {
            return Ok(Some(default));
        }

        tracing::debug!("No suite description configured and `{default}` does not exist");
        return Ok(None);
    };

    resolve_configured_file(system, project_root, &configured)
        .map(Some)
        .ok_or(ConfigurationError::SuiteFileNotFound { path: configured })
}

/// Looks for `configured` relative to the project root, then relative to the current directory.
fn resolve_configured_file(
    system: &dyn System,
    project_root: &Utf8Path,
    configured: &str,
) -> Option<Utf8PathBuf> {
    let project_relative = absolute(configured, project_root);
    if system.path_exists(&project_relative) {
        return Some(project_relative);
    }

    let as_given = absolute(configured, system.current_directory());
    if system.path_exists(&as_given) {
        return Some(as_given);
    }

    None
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Suite description `{path}` does not exist")]
    SuiteFileNotFound { path: String },

    #[error("Test runner configuration `{path}` does not exist")]
    OptionsFileNotFound { path: String },

    #[error(
        "Test runner `{binary}` was not found on `PATH`, relative to the project root, or in `vendor/bin`"
    )]
    BinaryNotFound { binary: String },
}
