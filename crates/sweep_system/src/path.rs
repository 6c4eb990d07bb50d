use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Resolves `path` against `cwd` and normalizes `.` and `..` components lexically.
///
/// The file system is never consulted, so symlinks are not resolved.
pub fn absolute(path: impl AsRef<Utf8Path>, cwd: impl AsRef<Utf8Path>) -> Utf8PathBuf {
    let path = path.as_ref();

    let mut components = path.components().peekable();
    let mut normalized = if let Some(c @ (Utf8Component::Prefix(..) | Utf8Component::RootDir)) =
        components.peek().copied()
    {
        components.next();
        Utf8PathBuf::from(c.as_str())
    } else {
        cwd.as_ref().to_path_buf()
    };

    for component in components {
        match component {
            Utf8Component::Prefix(..) => unreachable!("prefix only appears first"),
            Utf8Component::RootDir => {
                normalized.push(component);
            }
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                normalized.pop();
            }
            Utf8Component::Normal(name) => {
                normalized.push(name);
            }
        }
    }

    normalized
}
