use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use sweep_system::System;
use thiserror::Error;

/// File name of the suite description looked up at the project root when none is configured.
pub const DEFAULT_SUITE_FILE_NAME: &str = "sweep.suite.toml";

/// The declarative description of which files are tests and which files count for coverage.
///
/// ```toml
/// [[whitelist]]
/// directory = "src"
/// suffix = ".php"
///
/// [[testsuites]]
/// name = "unit"
///
/// [[testsuites.directory]]
/// directory = "tests"
/// suffix = "Test.php"
/// ```
///
/// Both sections are optional; a missing section behaves like an empty one.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct SuiteConfig {
    #[serde(default)]
    whitelist: Vec<DirectoryEntry>,

    #[serde(default)]
    testsuites: Vec<TestSuiteEntry>,
}

impl SuiteConfig {
    pub fn new(whitelist: Vec<DirectoryEntry>, testsuites: Vec<TestSuiteEntry>) -> Self {
        Self {
            whitelist,
            testsuites,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_path(path: &Utf8Path, system: &dyn System) -> Result<Self, SuiteConfigError> {
        tracing::debug!("Reading suite description at `{path}`");

        let content =
            system
                .read_to_string(path)
                .map_err(|source| SuiteConfigError::FileReadError {
                    source,
                    path: path.to_path_buf(),
                })?;

        Self::from_toml_str(&content).map_err(|source| SuiteConfigError::InvalidSuiteFile {
            source: Box::new(source),
            path: path.to_path_buf(),
        })
    }

    pub fn whitelist(&self) -> &[DirectoryEntry] {
        &self.whitelist
    }

    pub fn testsuites(&self) -> &[TestSuiteEntry] {
        &self.testsuites
    }
}

/// A configured directory together with the file-name suffix that selects files in it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    directory: String,

    #[serde(default)]
    suffix: Option<String>,
}

impl DirectoryEntry {
    pub fn new(directory: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            suffix: Some(suffix.into()),
        }
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// The suffix to match, or `None` when it is missing or empty.
    ///
    /// Entries without a suffix select no files at all.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref().filter(|suffix| !suffix.is_empty())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct TestSuiteEntry {
    #[serde(default)]
    name: Option<String>,

    #[serde(default, rename = "directory")]
    directories: Vec<DirectoryEntry>,
}

impl TestSuiteEntry {
    pub fn new(name: impl Into<String>, directories: Vec<DirectoryEntry>) -> Self {
        Self {
            name: Some(name.into()),
            directories,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn directories(&self) -> &[DirectoryEntry] {
        &self.directories
    }
}

#[derive(Debug, Error)]
pub enum SuiteConfigError {
    #[error("{path} is not a valid suite description: {source}")]
    InvalidSuiteFile {
        source: Box<toml::de::Error>,
        path: Utf8PathBuf,
    },
    #[error("Failed to read `{path}`: {source}")]
    FileReadError {
        #[source]
        source: std::io::Error,
        path: Utf8PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whitelist_and_testsuites() {
        let config = SuiteConfig::from_toml_str(
            r#"
[[whitelist]]
directory = "./src"
suffix = ".php"

[[testsuites]]
name = "unit"

[[testsuites.directory]]
directory = "tests/unit"
suffix = "Test.php"

[[testsuites.directory]]
directory = "tests/legacy"
"#,
        )
        .unwrap();

        assert_eq!(config.whitelist(), &[DirectoryEntry::new("./src", ".php")]);

        let [suite] = config.testsuites() else {
            panic!("expected exactly one suite");
        };
        assert_eq!(suite.name(), Some("unit"));
        assert_eq!(suite.directories().len(), 2);
        assert_eq!(suite.directories()[0].suffix(), Some("Test.php"));
        assert_eq!(suite.directories()[1].suffix(), None);
    }

    #[test]
    fn missing_sections_are_empty() {
        let config = SuiteConfig::from_toml_str("").unwrap();

        assert!(config.whitelist().is_empty());
        assert!(config.testsuites().is_empty());
    }

    #[test]
    fn empty_suffix_is_treated_as_missing() {
        let entry: DirectoryEntry =
            toml::from_str("directory = \"src\"\nsuffix = \"\"").unwrap();

        assert_eq!(entry.suffix(), None);
    }

    #[test]
    fn malformed_structure_is_an_error() {
        assert!(SuiteConfig::from_toml_str("whitelist = \"src\"").is_err());
        assert!(SuiteConfig::from_toml_str("[[testsuites]]\ndirectory = 3").is_err());
    }
}
