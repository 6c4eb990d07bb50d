use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;

use crate::CoverageMap;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<(file|line)\b([^>]*)>").unwrap());

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"([\w-]+)="([^"]*)""#).unwrap());

/// Execution counts per line number, per absolute file path.
type LineCounts = HashMap<Utf8PathBuf, BTreeMap<usize, u64>>;

/// Reads a clover coverage report and renders per-line coverage for the `affected` files.
///
/// Files that the report does not mention, or that can no longer be read, are left out.
/// Returns `None` if the report is unreadable or describes no files.
pub fn read_clover_coverage(
    coverage_file: &Utf8Path,
    project_root: &Utf8Path,
    affected: &[Utf8PathBuf],
) -> Option<CoverageMap> {
    let content = match std::fs::read_to_string(coverage_file) {
        Ok(content) => content,
        Err(err) => {
            tracing::debug!("Failed to read coverage report `{coverage_file}`: {err}");
            return None;
        }
    };

    let counts = parse_clover(&content);
    if counts.is_empty() {
        return None;
    }

    let mut coverage = CoverageMap::new();

    for path in affected {
        let Some(lines) = counts.get(path) else {
            continue;
        };

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                tracing::debug!("Failed to read covered file `{path}`: {err}");
                continue;
            }
        };

        let relative = path.strip_prefix(project_root).unwrap_or(path.as_path());
        coverage.insert(
            relative.to_string(),
            render_lines(source.lines().count(), lines),
        );
    }

    Some(coverage)
}

/// Combines the coverage reported by several runner processes.
///
/// A line is covered if any process covered it, uncovered if any process saw it as
/// executable, and not executable otherwise.
pub fn merge_coverage<'a>(coverages: impl IntoIterator<Item = &'a CoverageMap>) -> CoverageMap {
    let mut merged = CoverageMap::new();

    for coverage in coverages {
        for (file, lines) in coverage {
            let entry = merged.entry(file.clone()).or_default();
            *entry = merge_lines(entry, lines);
        }
    }

    merged
}

fn merge_lines(left: &str, right: &str) -> String {
    let mut left = left.chars();
    let mut right = right.chars();
    let mut merged = String::new();

    loop {
        let line = match (left.next(), right.next()) {
            (None, None) => break,
            (Some('C'), _) | (_, Some('C')) => 'C',
            (Some('U'), _) | (_, Some('U')) => 'U',
            _ => 'N',
        };
        merged.push(line);
    }

    merged
}

fn parse_clover(content: &str) -> LineCounts {
    let mut counts = LineCounts::new();
    let mut current: Option<Utf8PathBuf> = None;

    for tag in TAG.captures_iter(content) {
        let attributes: HashMap<&str, &str> = ATTRIBUTE
            .captures_iter(&tag[2])
            .filter_map(|attribute| {
                Some((attribute.get(1)?.as_str(), attribute.get(2)?.as_str()))
            })
            .collect();

        match &tag[1] {
            "file" => {
                current = attributes.get("name").map(|name| {
                    let path = Utf8PathBuf::from(*name);
                    counts.entry(path.clone()).or_default();
                    path
                });
            }
            _ => {
                let Some(file) = &current else {
                    continue;
                };

                let num: Option<usize> = attributes.get("num").and_then(|num| num.parse().ok());
                let count: Option<u64> = attributes.get("count").and_then(|count| count.parse().ok());

                if let (Some(num), Some(count)) = (num, count) {
                    counts.entry(file.clone()).or_default().insert(num, count);
                }
            }
        }
    }

    counts
}

fn render_lines(line_count: usize, counts: &BTreeMap<usize, u64>) -> String {
    (1..=line_count)
        .map(|line| match counts.get(&line) {
            None => 'N',
            Some(0) => 'U',
            Some(_) => 'C',
        })
        .collect()
}
