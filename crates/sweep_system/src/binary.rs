use camino::{Utf8Path, Utf8PathBuf};

/// Directory, relative to the project root, where project-local tool binaries are installed.
pub const VENDOR_BIN_DIR: &str = "vendor/bin";

/// Find a binary by name or path.
///
/// Looks in `PATH` first (which also accepts absolute and working-directory relative paths),
/// then relative to `project_root`, then in the project's [`VENDOR_BIN_DIR`].
pub fn find_binary(binary: &str, project_root: &Utf8Path) -> Option<Utf8PathBuf> {
    if let Ok(path) = which::which(binary) {
        if let Ok(utf8_path) = Utf8PathBuf::try_from(path) {
            tracing::debug!(path = %utf8_path, "Found binary in PATH");
            return Some(utf8_path);
        }
    }

    let project_relative = project_root.join(binary);
    if project_relative.is_file() {
        tracing::debug!(path = %project_relative, "Found binary relative to the project root");
        return Some(project_relative);
    }

    vendor_binary(binary, project_root)
}

pub fn vendor_binary(binary_name: &str, project_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let binary_dir = project_root.join(VENDOR_BIN_DIR);

    let binary_path = if cfg!(target_os = "windows") {
        binary_dir.join(format!("{binary_name}.bat"))
    } else {
        binary_dir.join(binary_name)
    };

    if binary_path.exists() {
        tracing::debug!(path = %binary_path, "Found binary in vendor directory");
        Some(binary_path)
    } else {
        None
    }
}
