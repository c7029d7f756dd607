//! Duplicate-folder analysis for dirdupe.
//!
//! Given a directory tree built from a hash inventory, this crate finds
//! directory pairs that share a substantial amount of content:
//!
//! 1. Walk the tree depth-first, children in lexicographic name order.
//! 2. For every file, use the global hash index to discover the
//!    directories holding identical content — including the file's own
//!    directory, which surfaces duplicates inside a single folder.
//! 3. Score each directory pair once, reject incidental overlaps below
//!    the half-of-either-side threshold, and keep only the single
//!    best-scoring partner per directory.
//!
//! ```rust,ignore
//! use dirdupe_analyze::FolderMatcher;
//! use dirdupe_core::ingest;
//!
//! let tree = ingest(std::fs::File::open("hashes.txt")?)?;
//! let matches = FolderMatcher::new().find_matches(&tree);
//!
//! for stat in matches.unique() {
//!     println!("{} bytes shared", stat.matched_bytes);
//! }
//! ```

mod matching;

pub use matching::{BestMatches, DirPair, FolderMatcher, PairMatch};

// Re-export core types
pub use dirdupe_core::{DirTree, MatchConfig};
