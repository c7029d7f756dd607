//! Report generation for dirdupe.
//!
//! Turns the retained best-match set into a deterministic, diff-friendly
//! report. Each matched pair becomes one block:
//!
//! - `parent` rows naming the pair (one row when a directory was
//!   compared against itself, two rows tagged `left`/`right` otherwise);
//! - `summary` rows totalling every non-empty bucket;
//! - `files` group headers followed by indented detail rows classifying
//!   each file as `same`, `different`, `changed`, `left-only` or
//!   `right-only`;
//! - an empty separator row.
//!
//! ```rust,ignore
//! use dirdupe_analyze::FolderMatcher;
//! use dirdupe_core::ingest;
//! use dirdupe_report::write_report;
//!
//! let tree = ingest(std::fs::File::open("hashes.txt")?)?;
//! let matches = FolderMatcher::new().find_matches(&tree);
//! write_report(&tree, &matches, std::io::stdout())?;
//! ```

mod classify;
mod render;

pub use classify::{
    BucketTotal, FileClass, FileGroup, FileRow, PairReport, ParentDir, Presence, classify_pair,
};
pub use render::{ordered_reports, write_report};
