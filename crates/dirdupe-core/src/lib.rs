//! Core types for the dirdupe toolkit.
//!
//! This crate holds everything the analysis pipeline shares: the
//! inventory record schema, path splitting and segment interning, the
//! in-memory directory tree with its hash indexes and size aggregates,
//! and the matching configuration.

mod config;
mod error;
mod intern;
mod legacy;
mod path;
mod record;
mod tree;
mod units;

pub use config::{MatchConfig, MatchConfigBuilder};
pub use error::IngestError;
pub use intern::StringPool;
pub use legacy::upgrade_legacy;
pub use path::{PathError, SplitPath, split_path};
pub use record::{DELIMITER, ingest, record_reader, record_writer, write_record};
pub use tree::{DirId, DirNode, DirTree, FileEntry, FileId, InsertError};
pub use units::human_size;
