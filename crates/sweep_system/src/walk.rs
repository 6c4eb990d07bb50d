use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;

/// Recursively collects every file below `root` whose file name ends with `suffix`.
///
/// The comparison is a case-sensitive match on the trailing bytes of the file name, so a
/// suffix longer than the name never matches. Siblings are visited in file-name order and
/// directories are descended into as they are met, which keeps the returned order stable
/// between runs.
///
/// A `root` that is not a directory yields an empty list. Entries that vanish or cannot be
/// read while walking (including symlink loops) are skipped, and so are paths that are not
/// valid UTF-8.
pub fn walk(root: &Utf8Path, suffix: &str) -> Vec<Utf8PathBuf> {
    if !root.is_dir() {
        tracing::debug!(root = %root, "Directory does not exist, nothing to walk");
        return Vec::new();
    }

    // Every file counts, so none of the ignore-file filters apply here.
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("Skipping unreadable entry: {err}");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
            continue;
        }

        let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => path,
            Err(path) => {
                tracing::debug!(path = %path.display(), "Skipping non-Unicode path");
                continue;
            }
        };

        if path
            .file_name()
            .is_some_and(|file_name| file_name.ends_with(suffix))
        {
            files.push(path);
        }
    }

    tracing::trace!(root = %root, suffix, count = files.len(), "Walked directory");

    files
}

#[cfg(test)]
mod tests {
    use std::fs;

    use camino::{Utf8Path, Utf8PathBuf};
    use rstest::rstest;

    use super::walk;

    fn tree(files: &[&str]) -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();

        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
        }

        (tmp, root)
    }

    fn relative(root: &Utf8Path, files: Vec<Utf8PathBuf>) -> Vec<String> {
        files
            .into_iter()
            .map(|file| file.strip_prefix(root).unwrap().to_string())
            .collect()
    }

    #[test]
    fn walks_nested_directories_in_name_order() {
        let (_tmp, root) = tree(&[
            "b/BTest.php",
            "a/nested/deep/CTest.php",
            "a/ATest.php",
            "ZTest.php",
        ]);

        let files = walk(&root, "Test.php");

        assert_eq!(
            relative(&root, files),
            vec![
                "ZTest.php",
                "a/ATest.php",
                "a/nested/deep/CTest.php",
                "b/BTest.php",
            ]
        );
    }

    #[rstest]
    #[case::exact_suffix("Test.php", &["FooTest.php"])]
    #[case::extension_only(".php", &["Foo.php", "FooTest.php"])]
    #[case::case_sensitive("test.php", &[])]
    #[case::whole_name("Foo.php", &["Foo.php"])]
    #[case::longer_than_name("LongerThanAnyNameTest.php", &[])]
    fn filters_by_suffix(#[case] suffix: &str, #[case] expected: &[&str]) {
        let (_tmp, root) = tree(&["Foo.php", "FooTest.php", "FooTest.php.bak", "notes.txt"]);

        let files = walk(&root, suffix);

        assert_eq!(relative(&root, files), expected);
    }

    #[test]
    fn directories_are_never_returned() {
        let (_tmp, root) = tree(&["src/Test.php/inner.txt", "src/RealTest.php"]);

        let files = walk(&root, "Test.php");

        assert_eq!(relative(&root, files), vec!["src/RealTest.php"]);
    }

    #[test]
    fn missing_root_is_empty() {
        let (_tmp, root) = tree(&[]);

        assert!(walk(&root.join("does-not-exist"), ".php").is_empty());
    }

    #[test]
    fn file_root_is_empty() {
        let (_tmp, root) = tree(&["single.php"]);

        assert!(walk(&root.join("single.php"), ".php").is_empty());
    }

    #[test]
    fn hidden_and_ignored_files_are_included() {
        let (_tmp, root) = tree(&[".hidden/ATest.php", "vendor/BTest.php", ".gitignore"]);
        fs::write(root.join(".gitignore"), "vendor/\n").unwrap();

        let files = walk(&root, "Test.php");

        assert_eq!(
            relative(&root, files),
            vec![".hidden/ATest.php", "vendor/BTest.php"]
        );
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn non_unicode_file_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_tmp, root) = tree(&["GoodTest.php"]);
        fs::write(
            root.as_std_path().join(OsStr::from_bytes(b"Bad\xffTest.php")),
            "",
        )
        .unwrap();

        let files = walk(&root, "Test.php");

        assert_eq!(relative(&root, files), vec!["GoodTest.php"]);
    }
}
