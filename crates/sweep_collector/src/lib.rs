//! Turns a suite description and a change list into the files a run has to care about.

mod affected;
mod file_set;
mod locate;
mod resolve;

pub use affected::match_affected;
pub use file_set::FileSet;
pub use locate::{TEST_DIRECTORY_NAMES, search_locations_for_tests};
pub use resolve::{ResolvedSuite, resolve_directory, resolve_suite};
