use serde::Deserialize;

/// The options that can be set in a `sweep.toml` file, or on the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Options {
    #[serde(default)]
    pub runner: Option<RunnerOptions>,
}

impl Options {
    pub fn from_toml_str(content: &str) -> Result<Self, SweepTomlError> {
        let options = toml::from_str(content)?;
        Ok(options)
    }

    /// Fills every option that is unset in `self` from `other`.
    ///
    /// Options already set in `self` take precedence.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        let runner = match (self.runner, other.runner) {
            (Some(runner), Some(other)) => Some(runner.combine(other)),
            (runner, other) => runner.or(other),
        };

        Self { runner }
    }

    pub fn runner(&self) -> Option<&RunnerOptions> {
        self.runner.as_ref()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunnerOptions {
    /// Path of the suite description, relative to the project root or absolute.
    #[serde(default)]
    pub config: Option<String>,

    /// Name or path of the test-runner binary.
    #[serde(default)]
    pub binary: Option<String>,

    /// The test runner's own configuration file, handed to it with `-c`.
    ///
    /// When unset the runner is started without `-c` and discovers its configuration in
    /// the project root itself.
    #[serde(default)]
    pub options_file: Option<String>,
}

impl RunnerOptions {
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            config: self.config.or(other.config),
            binary: self.binary.or(other.binary),
            options_file: self.options_file.or(other.options_file),
        }
    }
}

pub type SweepTomlError = toml::de::Error;
