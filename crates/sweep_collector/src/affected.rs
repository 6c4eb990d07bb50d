use camino::{Utf8Path, Utf8PathBuf};

use crate::FileSet;

/// Narrows the whitelist to the files named by `changed_paths`.
///
/// Changed paths are relative to the project root. Paths outside the whitelist are ignored
/// and the result keeps the order of `changed_paths`. If no changed path is whitelisted,
/// including when there are none at all, the whole whitelist is affected.
pub fn match_affected(
    whitelist: &FileSet,
    changed_paths: &[Utf8PathBuf],
    project_root: &Utf8Path,
) -> FileSet {
    let matched: FileSet = changed_paths
        .iter()
        .map(|path| project_root.join(path))
        .filter(|path| {
            let whitelisted = whitelist.contains(path);
            if !whitelisted {
                tracing::debug!(path = %path, "Changed path is not whitelisted");
            }
            whitelisted
        })
        .collect();

    if matched.is_empty() {
        tracing::debug!("No changed path is whitelisted, every whitelisted file is affected");
        return whitelist.clone();
    }

    matched
}

#[cfg(test)]
mod tests {
    use camino::{Utf8Path, Utf8PathBuf};

    use super::*;

    fn whitelist() -> FileSet {
        ["/p/src/A.php", "/p/src/B.php"]
            .into_iter()
            .map(Utf8PathBuf::from)
            .collect()
    }

    #[test]
    fn no_changes_means_everything_is_affected() {
        let affected = match_affected(&whitelist(), &[], Utf8Path::new("/p"));

        assert_eq!(affected, whitelist());
    }

    #[test]
    fn keeps_only_whitelisted_changes_in_given_order() {
        let changed = [
            Utf8PathBuf::from("src/B.php"),
            Utf8PathBuf::from("README.md"),
            Utf8PathBuf::from("src/A.php"),
            Utf8PathBuf::from("src/B.php"),
        ];

        let affected = match_affected(&whitelist(), &changed, Utf8Path::new("/p"));

        assert_eq!(affected.as_slice(), ["/p/src/B.php", "/p/src/A.php"]);
    }

    #[test]
    fn unrelated_changes_fall_back_to_whole_whitelist() {
        let changed = [Utf8PathBuf::from("docs/index.md")];

        let affected = match_affected(&whitelist(), &changed, Utf8Path::new("/p"));

        assert_eq!(affected, whitelist());
    }

    #[test]
    fn empty_whitelist_stays_empty() {
        let changed = [Utf8PathBuf::from("src/A.php")];

        let affected = match_affected(&FileSet::new(), &changed, Utf8Path::new("/p"));

        assert!(affected.is_empty());
    }
}
