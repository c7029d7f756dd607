//! Error types for inventory ingestion.

use thiserror::Error;

/// Errors raised while reading an inventory into memory.
///
/// Every variant is fatal for the run: a broken record means the
/// inventory cannot be trusted, so no partial report is produced.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A record did not have the expected four fields.
    #[error("record at line {line}: expected 4 fields, found {found}")]
    WrongFieldCount { line: u64, found: usize },

    /// The byte-size field did not parse as an unsigned integer.
    #[error("record at line {line}: invalid byte size {text:?}")]
    InvalidSize { line: u64, text: String },

    /// The path field had no segments.
    #[error("record at line {line}: empty path")]
    EmptyPath { line: u64 },

    /// The path field ended in a separator.
    #[error("record at line {line}: path {path:?} ends in a separator")]
    TrailingSeparator { line: u64, path: String },

    /// The same path appeared in two records.
    #[error("record at line {line}: duplicate path {path:?}")]
    DuplicatePath { line: u64, path: String },

    /// Two records agreed on a hash but not on a size.
    ///
    /// This means the digest is not behaving as content-addressed,
    /// which invalidates every downstream match.
    #[error(
        "hash collision: {hash} reported {found} bytes at {path:?} \
         but was first seen with {expected} bytes"
    )]
    HashCollision {
        hash: String,
        expected: u64,
        found: u64,
        path: String,
    },

    /// A legacy record line could not be split into its four fields.
    #[error("legacy record at line {line}: {text:?} is not `hash humanSize size path`")]
    MalformedLegacy { line: u64, text: String },

    /// The underlying record stream could not be read.
    #[error(transparent)]
    Record(#[from] csv::Error),

    /// I/O failure on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
