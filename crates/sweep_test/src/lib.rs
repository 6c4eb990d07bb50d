//! Fixtures for tests that run `sweep` against a throwaway project.

use std::fs;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use insta::Settings;
use insta::internals::SettingsBindDropGuard;
use tempfile::TempDir;

/// Path of the fake runner inside a test project.
pub const RUNNER_PATH: &str = "bin/runner";

/// File, relative to the project root, that the fake runner appends each test file it runs to.
pub const RUNNER_LOG: &str = "runner.log";

/// A shell script that accepts the same flags as the real test runner.
///
/// It exports `REPORT`, `COVERAGE`, `CONFIG` and `TEST_FILE` and then sources the test file,
/// so each test file is a shell fragment that decides what its "run" reports, prints to
/// stderr, how long it takes and how it exits.
const RUNNER_SCRIPT: &str = r#"#!/bin/sh
REPORT=""
COVERAGE=""
CONFIG=""
while [ "$#" -gt 1 ]; do
    case "$1" in
        -c) CONFIG="$2"; shift 2 ;;
        -d) shift 2 ;;
        --log-json) REPORT="$2"; shift 2 ;;
        --coverage-clover) COVERAGE="$2"; shift 2 ;;
        *) break ;;
    esac
done
TEST_FILE="$1"
export REPORT COVERAGE CONFIG TEST_FILE
echo "$TEST_FILE" >> runner.log
. "$TEST_FILE"
"#;

pub struct TestContext {
    _temp_dir: TempDir,
    project_dir_path: Utf8PathBuf,
    _settings_scope: SettingsBindDropGuard,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        // Canonicalize the tempdir path because macos uses symlinks for tempdirs
        // and that doesn't play well with our snapshot filtering.
        let project_path = Utf8PathBuf::from_path_buf(
            dunce::simplified(
                &temp_dir
                    .path()
                    .canonicalize()
                    .context("Failed to canonicalize project path")
                    .unwrap(),
            )
            .to_path_buf(),
        )
        .expect("Path is not valid UTF-8");

        let mut settings = Settings::clone_current();

        settings.add_filter(&tempdir_filter(&project_path), "<temp_dir>/");
        settings.add_filter(r#"\\(\w\w|\s|\.|")"#, "/$1");
        settings.add_filter(r"\x1b\[[0-9;]*m", "");
        settings.add_filter(r"(\s|\()(\d+m )?(\d+\.)?\d+(us|ms|s)", "$1[TIME]");

        let settings_scope = settings.bind_to_scope();

        Self {
            project_dir_path: project_path,
            _temp_dir: temp_dir,
            _settings_scope: settings_scope,
        }
    }

    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let case = Self::default();
        case.write_files(files);
        case
    }

    pub fn root(&self) -> &Utf8Path {
        &self.project_dir_path
    }

    pub fn write_files<'a>(&self, files: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (path, content) in files {
            self.write_file(path, content);
        }
    }

    pub fn write_file(&self, path: impl AsRef<Utf8Path>, content: &str) -> Utf8PathBuf {
        let path = self.project_dir_path.join(path.as_ref());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory `{parent}`"))
                .unwrap();
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write file `{path}`"))
            .unwrap();

        path
    }

    /// Installs the fake runner at [`RUNNER_PATH`] and returns its absolute path.
    #[cfg(unix)]
    pub fn write_runner(&self) -> Utf8PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write_file(RUNNER_PATH, RUNNER_SCRIPT);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to make `{path}` executable"))
            .unwrap();

        path
    }

    /// The test files the fake runner was started for, in start order.
    pub fn runner_invocations(&self) -> Vec<Utf8PathBuf> {
        let Ok(log) = fs::read_to_string(self.project_dir_path.join(RUNNER_LOG)) else {
            return Vec::new();
        };

        log.lines().map(Utf8PathBuf::from).collect()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A shell fragment for a test file that reports `events` and exits with `exit_code`.
pub fn report_fragment(events: &[String], exit_code: i32) -> String {
    format!(
        "cat > \"$REPORT\" <<'EOF'\n{}\nEOF\nexit {exit_code}\n",
        events.join("\n")
    )
}

/// A `test` event as the runner writes it to its JSON log.
pub fn test_event(test: &str, status: &str) -> String {
    format!(r#"{{"event":"test","suite":"","test":"{test}","status":"{status}","time":0.01,"trace":[],"message":""}}"#)
}

pub fn tempdir_filter(path: &Utf8Path) -> String {
    format!(r"{}\\?/?", regex::escape(path.as_str()))
}
