use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};

/// A deduplicating set of absolute file paths.
///
/// Membership is what matters for matching, but iteration yields paths in the order they
/// were first inserted so that discovered test files run and report in a stable order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileSet {
    paths: Vec<Utf8PathBuf>,
    index: HashSet<Utf8PathBuf>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `path`, returning `false` if it was already present.
    pub fn insert(&mut self, path: Utf8PathBuf) -> bool {
        if self.index.contains(&path) {
            return false;
        }

        self.index.insert(path.clone());
        self.paths.push(path);
        true
    }

    pub fn contains(&self, path: &Utf8Path) -> bool {
        self.index.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Utf8PathBuf> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[Utf8PathBuf] {
        &self.paths
    }
}

impl Extend<Utf8PathBuf> for FileSet {
    fn extend<T: IntoIterator<Item = Utf8PathBuf>>(&mut self, iter: T) {
        for path in iter {
            self.insert(path);
        }
    }
}

impl FromIterator<Utf8PathBuf> for FileSet {
    fn from_iter<T: IntoIterator<Item = Utf8PathBuf>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a Utf8PathBuf;
    type IntoIter = std::slice::Iter<'a, Utf8PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use camino::{Utf8Path, Utf8PathBuf};

    use super::FileSet;

    #[test]
    fn keeps_first_insertion_order_and_drops_duplicates() {
        let set: FileSet = ["/p/b.php", "/p/a.php", "/p/b.php"]
            .into_iter()
            .map(Utf8PathBuf::from)
            .collect();

        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), ["/p/b.php", "/p/a.php"]);
        assert!(set.contains(Utf8Path::new("/p/a.php")));
        assert!(!set.contains(Utf8Path::new("/p/c.php")));
    }
}
