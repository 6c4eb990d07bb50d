use std::fmt::Debug;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

pub use binary::{VENDOR_BIN_DIR, find_binary, vendor_binary};
pub use walk::walk;

mod binary;
pub mod path;
mod walk;

pub struct EnvVars;

impl EnvVars {
    /// Overrides the suite description path (`runner.config`).
    pub const SWEEP_RUNNER_CONFIG: &'static str = "SWEEP_RUNNER_CONFIG";

    /// Overrides the test-runner binary (`runner.binary`).
    pub const SWEEP_RUNNER_BINARY: &'static str = "SWEEP_RUNNER_BINARY";

    /// Overrides the runner's own configuration file (`runner.options-file`).
    pub const SWEEP_RUNNER_OPTIONS_FILE: &'static str = "SWEEP_RUNNER_OPTIONS_FILE";

    /// Overrides the `tracing` filter derived from the verbosity flags.
    pub const SWEEP_LOG: &'static str = "SWEEP_LOG";
}

type Result<T> = std::io::Result<T>;

pub trait System: Debug + Sync + Send {
    /// Reads the metadata of the file or directory at `path`.
    ///
    /// This function will traverse symbolic links to query information about the destination file.
    fn path_metadata(&self, path: &Utf8Path) -> Result<Metadata>;

    fn read_to_string(&self, path: &Utf8Path) -> Result<String>;

    /// Returns the directory path where user configurations are stored.
    ///
    /// Returns `None` if no such convention exists for the system.
    fn user_config_directory(&self) -> Option<Utf8PathBuf>;

    fn current_directory(&self) -> &Utf8Path;

    /// Returns `true` if `path` exists.
    fn path_exists(&self, path: &Utf8Path) -> bool {
        self.path_metadata(path).is_ok()
    }

    /// Returns `true` if `path` exists and is a file.
    fn is_file(&self, path: &Utf8Path) -> bool {
        self.path_metadata(path)
            .is_ok_and(|metadata| metadata.file_type().is_file())
    }
}

/// A system implementation that uses the OS file system.
#[derive(Debug, Clone)]
pub struct OsSystem {
    inner: Arc<OsSystemInner>,
}

#[derive(Default, Debug)]
struct OsSystemInner {
    cwd: Utf8PathBuf,
}

impl OsSystem {
    pub fn new(cwd: impl AsRef<Utf8Path>) -> Self {
        let cwd = cwd.as_ref();
        assert!(cwd.is_absolute());

        tracing::debug!(
            "Architecture: {}, OS: {}",
            std::env::consts::ARCH,
            std::env::consts::OS,
        );

        Self {
            inner: Arc::new(OsSystemInner {
                cwd: cwd.to_path_buf(),
            }),
        }
    }
}

impl System for OsSystem {
    fn path_metadata(&self, path: &Utf8Path) -> Result<Metadata> {
        let metadata = path.as_std_path().metadata()?;

        let file_type = if metadata.file_type().is_file() {
            FileType::File
        } else if metadata.file_type().is_dir() {
            FileType::Directory
        } else {
            FileType::Other
        };

        Ok(Metadata::new(file_type))
    }

    fn read_to_string(&self, path: &Utf8Path) -> Result<String> {
        std::fs::read_to_string(path)
    }

    fn user_config_directory(&self) -> Option<Utf8PathBuf> {
        use etcetera::BaseStrategy as _;

        let strategy = etcetera::base_strategy::choose_base_strategy().ok()?;
        strategy.config_dir().try_into().ok()
    }

    fn current_directory(&self) -> &Utf8Path {
        &self.inner.cwd
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Metadata {
    file_type: FileType,
}

impl Metadata {
    pub fn new(file_type: FileType) -> Self {
        Self { file_type }
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum FileType {
    File,
    Directory,
    /// Anything else, such as a socket or a device.
    Other,
}

impl FileType {
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }
}
