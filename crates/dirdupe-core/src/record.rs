//! Inventory record schema and ingestion.
//!
//! Records are space-delimited CSV rows of
//! `(hash, byteSize, humanSize, path)`. The human-readable size is
//! carried for people reading the raw file and ignored on the way in.

use std::io;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::debug;

use crate::error::IngestError;
use crate::path::{PathError, split_path};
use crate::tree::{DirTree, InsertError};
use crate::units::human_size;

/// Field delimiter shared by inventory and report streams.
pub const DELIMITER: u8 = b' ';

/// Build a CSV reader over an inventory stream.
pub fn record_reader<R: io::Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

/// Build a CSV writer producing inventory or report rows.
pub fn record_writer<W: io::Write>(output: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_writer(output)
}

/// Write one inventory record, deriving the human-readable size field.
pub fn write_record<W: io::Write>(
    out: &mut csv::Writer<W>,
    hash: &str,
    size: u64,
    path: &str,
) -> csv::Result<()> {
    let bytes = size.to_string();
    let human = human_size(size);
    out.write_record([hash, bytes.as_str(), human.as_str(), path])
}

/// Read an entire inventory stream into a directory tree.
///
/// Any malformed record, hash collision or duplicate path aborts the
/// read: a broken inventory invalidates every downstream match.
pub fn ingest<R: io::Read>(input: R) -> Result<DirTree, IngestError> {
    let mut reader = record_reader(input);
    let mut tree = DirTree::new();
    let mut row = StringRecord::new();

    while reader.read_record(&mut row)? {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        if row.len() != 4 {
            return Err(IngestError::WrongFieldCount {
                line,
                found: row.len(),
            });
        }

        let hash = &row[0];
        let size: u64 = row[1].parse().map_err(|_| IngestError::InvalidSize {
            line,
            text: row[1].to_string(),
        })?;
        // row[2] is the human-readable size, informational only.
        let path = &row[3];

        let split = split_path(path).map_err(|err| match err {
            PathError::Empty => IngestError::EmptyPath { line },
            PathError::TrailingSeparator => IngestError::TrailingSeparator {
                line,
                path: path.to_string(),
            },
        })?;

        tree.insert(hash, size, &split).map_err(|err| match err {
            InsertError::HashCollision { expected, found } => IngestError::HashCollision {
                hash: hash.to_string(),
                expected,
                found,
                path: path.to_string(),
            },
            InsertError::DuplicatePath => IngestError::DuplicatePath {
                line,
                path: path.to_string(),
            },
        })?;
    }

    debug!(
        files = tree.file_count(),
        dirs = tree.dir_count(),
        "inventory loaded"
    );
    Ok(tree)
}
