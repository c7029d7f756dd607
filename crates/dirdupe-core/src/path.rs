//! Raw path splitting.
//!
//! Inventory paths may come from either platform, so both separator
//! styles are accepted. An optional drive prefix is peeled off and kept
//! aside: it plays no part in matching, but the outermost directory
//! remembers it so reported paths round-trip.

use thiserror::Error;

/// Why a raw path could not be split into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    /// No segments at all (empty string, or only drive/separators).
    #[error("the path has no segments")]
    Empty,

    /// The path names a directory, not a file.
    #[error("the path ends in a separator")]
    TrailingSeparator,
}

/// A raw path split into its matching-relevant parts.
///
/// Segments borrow from the input and are ordered leaf-first, ready for
/// incremental tree insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPath<'a> {
    /// Drive/volume prefix (`C:`), empty when absent.
    pub drive: &'a str,
    /// Leading separators, empty for relative paths.
    pub leading: &'a str,
    /// Path segments in leaf-first order; never empty.
    pub segments: Vec<&'a str>,
}

impl SplitPath<'_> {
    /// The file name segment.
    pub fn file_name(&self) -> &str {
        self.segments[0]
    }

    /// Rendered prefix for the outermost directory: the drive, if any,
    /// followed by a single normalized separator.
    pub fn prefix(&self) -> String {
        format!("{}/", self.drive)
    }
}

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Split a raw path into drive, leading separators and leaf-first
/// segments. Runs of separators collapse; a trailing separator or a
/// path with no segments is an error.
pub fn split_path(raw: &str) -> Result<SplitPath<'_>, PathError> {
    let (drive, rest) = split_drive(raw);
    let trimmed = rest.trim_start_matches(SEPARATORS);
    let leading = &rest[..rest.len() - trimmed.len()];

    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }
    if trimmed.ends_with(SEPARATORS) {
        return Err(PathError::TrailingSeparator);
    }

    let mut segments: Vec<&str> = trimmed
        .split(SEPARATORS)
        .filter(|s| !s.is_empty())
        .collect();
    segments.reverse();

    Ok(SplitPath {
        drive,
        leading,
        segments,
    })
}

fn split_drive(raw: &str) -> (&str, &str) {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        raw.split_at(2)
    } else {
        ("", raw)
    }
}
