use itertools::Itertools;

/// Directory names that conventionally hold tests.
pub const TEST_DIRECTORY_NAMES: [&str; 2] = ["tests", "Tests"];

/// Guesses where the tests for `path` might live.
///
/// Candidates are directory paths ending in `/`, most likely first:
///
/// 1. The directory containing `path`.
/// 1. `tests/` and `Tests/` in that directory and in each ancestor, walking outwards.
/// 1. The directory with one component swapped for a test directory name, innermost first.
/// 1. The directory with a test directory name inserted above one component, innermost first.
///
/// Absolute inputs give absolute candidates and relative inputs give relative ones. No
/// candidate is checked against the file system, and duplicates are dropped keeping the
/// first occurrence.
pub fn search_locations_for_tests(path: &str) -> Vec<String> {
    let directory = parent_directory(path);
    let absolute = directory.starts_with('/');
    let parts: Vec<&str> = directory
        .split('/')
        .filter(|part| !part.is_empty())
        .collect();

    let mut candidates = Vec::new();

    if directory.ends_with('/') {
        candidates.push(directory.to_string());
    } else {
        candidates.push(format!("{directory}/"));
    }

    for depth in (0..=parts.len()).rev() {
        for name in TEST_DIRECTORY_NAMES {
            let mut attempt = parts[..depth].to_vec();
            attempt.push(name);
            candidates.push(join(absolute, &attempt));
        }
    }

    for key in (0..parts.len()).rev() {
        for name in TEST_DIRECTORY_NAMES {
            let mut attempt = parts.clone();
            attempt[key] = name;
            candidates.push(join(absolute, &attempt));
        }
    }

    for key in (0..parts.len()).rev() {
        for name in TEST_DIRECTORY_NAMES {
            let mut attempt = parts.clone();
            attempt.insert(key, name);
            candidates.push(join(absolute, &attempt));
        }
    }

    candidates.into_iter().unique().collect()
}

fn parent_directory(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(index) => &path[..index],
        None => ".",
    }
}

fn join(absolute: bool, parts: &[&str]) -> String {
    let joined = parts.join("/");

    if absolute {
        format!("/{joined}/")
    } else {
        format!("{joined}/")
    }
}
