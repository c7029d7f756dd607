//! Filesystem scanning for dirdupe.
//!
//! Produces the hash inventory the analysis pipeline consumes: one
//! space-delimited record per regular file, carrying the BLAKE3 digest,
//! the exact byte count, a human-readable size and the path.
//!
//! ```rust,ignore
//! use dirdupe_scan::{InventoryScanner, ScanConfig};
//!
//! let scanner = InventoryScanner::new(ScanConfig::new("/backup/2019"));
//! let stats = scanner.scan(std::fs::File::create("hashes.txt")?)?;
//! eprintln!("{} files hashed", stats.files);
//! ```

mod config;
mod scanner;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use scanner::{InventoryScanner, ScanError, ScanStats};
