//! Filesystem scanner producing inventory records.
//!
//! One record per regular file: BLAKE3 digest, exact byte count,
//! human-readable size and the full path. The walk is sorted so
//! rescanning an unchanged tree reproduces the inventory byte for byte.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use jwalk::{Parallelism, WalkDir};
use thiserror::Error;
use tracing::{info, warn};

use dirdupe_core::{record_writer, write_record};

use crate::config::ScanConfig;

/// Errors that abort a scan outright.
///
/// Unreadable entries below the root are logged and skipped instead;
/// losing one file only costs one record.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root could not be resolved.
    #[error("cannot scan {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The scan root is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The output stream failed.
    #[error(transparent)]
    Output(#[from] csv::Error),
}

/// Totals reported after a finished scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStats {
    /// Files hashed and recorded.
    pub files: u64,
    /// Bytes across the recorded files.
    pub bytes: u64,
    /// Entries skipped because they could not be read.
    pub skipped: u64,
}

/// Inventory scanner over a directory tree.
pub struct InventoryScanner {
    config: ScanConfig,
}

impl InventoryScanner {
    /// Create a scanner for the given configuration.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Walk the configured root and write one record per regular file.
    pub fn scan<W: io::Write>(&self, output: W) -> Result<ScanStats, ScanError> {
        let started = Instant::now();
        let root = self
            .config
            .root
            .canonicalize()
            .map_err(|source| ScanError::Root {
                path: self.config.root.clone(),
                source,
            })?;
        if !root.is_dir() {
            return Err(ScanError::NotADirectory { path: root });
        }

        let parallelism = match self.config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };
        let walker = WalkDir::new(&root)
            .parallelism(parallelism)
            .sort(true)
            .skip_hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks);

        let mut out = record_writer(output);
        let mut stats = ScanStats::default();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    stats.skipped += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match self.record_file(&mut out, &entry.path())? {
                Some(size) => {
                    stats.files += 1;
                    stats.bytes += size;
                }
                None => stats.skipped += 1,
            }
        }

        out.flush().map_err(csv::Error::from)?;
        info!(
            files = stats.files,
            bytes = stats.bytes,
            skipped = stats.skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan finished"
        );
        Ok(stats)
    }

    fn record_file<W: io::Write>(
        &self,
        out: &mut csv::Writer<W>,
        path: &Path,
    ) -> Result<Option<u64>, ScanError> {
        let size = match path.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping file without metadata");
                return Ok(None);
            }
        };

        let mut hasher = blake3::Hasher::new();
        if let Err(err) = hasher.update_mmap_rayon(path) {
            warn!(path = %path.display(), error = %err, "skipping unreadable file");
            return Ok(None);
        }
        let hash = hasher.finalize().to_hex();

        write_record(out, hash.as_str(), size, &path.to_string_lossy())?;
        Ok(Some(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirdupe_core::ingest;
    use std::fs;
    use tempfile::TempDir;

    fn scan_to_string(config: ScanConfig) -> (ScanStats, String) {
        let scanner = InventoryScanner::new(config);
        let mut buffer = Vec::new();
        let stats = scanner.scan(&mut buffer).unwrap();
        (stats, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn test_scan_emits_one_record_per_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();
        fs::write(temp.path().join("b.txt"), "beta beta").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/c.txt"), "gamma").unwrap();

        let (stats, text) = scan_to_string(ScanConfig::new(temp.path()));

        assert_eq!(stats.files, 3);
        assert_eq!(stats.bytes, 5 + 9 + 5);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_scan_output_feeds_ingest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("one.bin"), "same bytes").unwrap();
        fs::write(temp.path().join("two.bin"), "same bytes").unwrap();
        fs::write(temp.path().join("odd.bin"), "different").unwrap();

        let (_, text) = scan_to_string(ScanConfig::new(temp.path()));
        let tree = ingest(text.as_bytes()).unwrap();

        assert_eq!(tree.file_count(), 3);
        // The two identical files must land in one hash bucket.
        let buckets: Vec<usize> = (0..tree.file_count() as u32)
            .map(|id| {
                tree.files_with_hash(&tree.file(dirdupe_core::FileId(id)).hash)
                    .len()
            })
            .collect();
        assert!(buckets.contains(&2));
    }

    #[test]
    fn test_scan_is_deterministic() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("x.txt"), "xx").unwrap();
        fs::write(temp.path().join("y.txt"), "yy").unwrap();

        let (_, first) = scan_to_string(ScanConfig::new(temp.path()));
        let (_, second) = scan_to_string(ScanConfig::new(temp.path()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_skips_hidden_when_configured() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("seen.txt"), "seen").unwrap();
        fs::write(temp.path().join(".hidden"), "unseen").unwrap();

        let config = ScanConfig::builder()
            .root(temp.path())
            .include_hidden(false)
            .build()
            .unwrap();
        let (stats, _) = scan_to_string(config);
        assert_eq!(stats.files, 1);
    }

    #[test]
    fn test_scan_rejects_missing_root() {
        let scanner = InventoryScanner::new(ScanConfig::new("/definitely/not/here"));
        let err = scanner.scan(Vec::new()).unwrap_err();
        assert!(matches!(err, ScanError::Root { .. }));
    }
}
