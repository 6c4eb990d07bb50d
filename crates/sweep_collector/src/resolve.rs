use camino::{Utf8Path, Utf8PathBuf};
use sweep_metadata::{DirectoryEntry, SuiteConfig};

use crate::FileSet;

/// The concrete files a suite description selects.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolvedSuite {
    /// Source files that count towards coverage and "affected" matching.
    pub whitelist: FileSet,

    /// Test files, in discovery order.
    pub tests: FileSet,
}

/// Expands every whitelist and test-suite directory entry into the files it matches.
///
/// Entries without a suffix, and directories that do not exist, contribute nothing.
pub fn resolve_suite(config: &SuiteConfig, project_root: &Utf8Path) -> ResolvedSuite {
    let whitelist = config
        .whitelist()
        .iter()
        .flat_map(|entry| entry_files(entry, project_root))
        .collect();

    let tests = config
        .testsuites()
        .iter()
        .flat_map(|suite| {
            tracing::debug!(suite = suite.name().unwrap_or("<unnamed>"), "Resolving test suite");
            suite.directories()
        })
        .flat_map(|entry| entry_files(entry, project_root))
        .collect();

    let resolved = ResolvedSuite { whitelist, tests };

    tracing::debug!(
        whitelist = resolved.whitelist.len(),
        tests = resolved.tests.len(),
        "Resolved suite description"
    );

    resolved
}

/// Maps a configured directory string onto a directory under the project root.
///
/// Only the final path component is kept, so `module/tests` and `/somewhere/tests` both map
/// to `<root>/tests`. Surrounding whitespace and a single leading `.` are dropped first.
/// A value with no final component (such as `.` or `./`) maps to the root itself.
pub fn resolve_directory(project_root: &Utf8Path, directory: &str) -> Utf8PathBuf {
    let trimmed = directory.trim();
    let trimmed = trimmed.strip_prefix('.').unwrap_or(trimmed);

    match Utf8Path::new(trimmed).file_name() {
        Some(name) => project_root.join(name),
        None => project_root.to_path_buf(),
    }
}

fn entry_files(entry: &DirectoryEntry, project_root: &Utf8Path) -> Vec<Utf8PathBuf> {
    let Some(suffix) = entry.suffix() else {
        tracing::debug!(
            directory = entry.directory(),
            "Skipping directory entry without a suffix"
        );
        return Vec::new();
    };

    let directory = resolve_directory(project_root, entry.directory());
    sweep_system::walk(&directory, suffix)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use camino::{Utf8Path, Utf8PathBuf};
    use rstest::rstest;
    use sweep_metadata::{DirectoryEntry, SuiteConfig, TestSuiteEntry};

    use super::*;

    fn project() -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        (tmp, root)
    }

    fn touch(root: &Utf8Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[rstest]
    #[case::plain("src", "/p/src")]
    #[case::dot_prefixed("./src", "/p/src")]
    #[case::nested_keeps_last_component("module/tests", "/p/tests")]
    #[case::absolute_keeps_last_component("/abs/path/tests", "/p/tests")]
    #[case::whitespace_and_trailing_slash(" ./lib/ ", "/p/lib")]
    #[case::dot_is_root(".", "/p")]
    #[case::dot_slash_is_root("./", "/p")]
    #[case::empty_is_root("", "/p")]
    fn resolves_directory(#[case] directory: &str, #[case] expected: &str) {
        assert_eq!(resolve_directory(Utf8Path::new("/p"), directory), expected);
    }

    #[test]
    fn resolves_whitelist_and_tests() {
        let (_tmp, root) = project();
        touch(&root, "src/A.php");
        touch(&root, "src/nested/B.php");
        touch(&root, "src/notes.txt");
        touch(&root, "tests/ATest.php");
        touch(&root, "tests/helpers.php");

        let config = SuiteConfig::new(
            vec![DirectoryEntry::new("./src", ".php")],
            vec![TestSuiteEntry::new(
                "unit",
                vec![DirectoryEntry::new("tests", "Test.php")],
            )],
        );

        let resolved = resolve_suite(&config, &root);

        assert_eq!(
            resolved.whitelist.as_slice(),
            [root.join("src/A.php"), root.join("src/nested/B.php")]
        );
        assert_eq!(resolved.tests.as_slice(), [root.join("tests/ATest.php")]);
    }

    #[test]
    fn overlapping_entries_are_deduplicated_in_first_seen_order() {
        let (_tmp, root) = project();
        touch(&root, "tests/ATest.php");
        touch(&root, "tests/BTest.php");

        let config = SuiteConfig::new(
            Vec::new(),
            vec![
                TestSuiteEntry::new("first", vec![DirectoryEntry::new("tests", "BTest.php")]),
                TestSuiteEntry::new("second", vec![DirectoryEntry::new("./tests", "Test.php")]),
            ],
        );

        let resolved = resolve_suite(&config, &root);

        assert_eq!(
            resolved.tests.as_slice(),
            [root.join("tests/BTest.php"), root.join("tests/ATest.php")]
        );
    }

    #[test]
    fn missing_suffix_and_missing_directory_contribute_nothing() {
        let (_tmp, root) = project();
        touch(&root, "src/A.php");

        let config = SuiteConfig::from_toml_str(
            r#"
[[whitelist]]
directory = "src"

[[testsuites]]
name = "unit"

[[testsuites.directory]]
directory = "does-not-exist"
suffix = "Test.php"
"#,
        )
        .unwrap();

        let resolved = resolve_suite(&config, &root);

        assert!(resolved.whitelist.is_empty());
        assert!(resolved.tests.is_empty());
    }
}
