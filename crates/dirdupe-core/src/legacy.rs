//! Upgrade for the oldest inventory layout.
//!
//! Early inventories were plain whitespace-concatenated lines of
//! `hash humanSize sizeb path` — byte count with a trailing `b`, path
//! possibly containing spaces. This rewrites them into the current
//! record schema, keeping the original human-readable text.

use std::io::{self, BufRead};

use crate::error::IngestError;
use crate::record::record_writer;

/// Rewrite a legacy inventory stream into the current record schema.
///
/// Returns the number of records written.
pub fn upgrade_legacy<R: BufRead, W: io::Write>(input: R, output: W) -> Result<u64, IngestError> {
    let mut writer = record_writer(output);
    let mut count = 0u64;

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let number = index as u64 + 1;

        let (hash, human, size, path) =
            split_legacy(&line).ok_or_else(|| IngestError::MalformedLegacy {
                line: number,
                text: line.clone(),
            })?;
        let size = size.strip_suffix('b').unwrap_or(size);
        if size.parse::<u64>().is_err() {
            return Err(IngestError::InvalidSize {
                line: number,
                text: size.to_string(),
            });
        }

        writer.write_record([hash, size, human, path])?;
        count += 1;
    }

    writer.flush()?;
    Ok(count)
}

/// Split a legacy line on its first three whitespace runs; whatever
/// remains is the path.
fn split_legacy(line: &str) -> Option<(&str, &str, &str, &str)> {
    let (hash, rest) = next_token(line)?;
    let (human, rest) = next_token(rest)?;
    let (size, rest) = next_token(rest)?;
    let path = rest.trim_start();
    if path.is_empty() {
        return None;
    }
    Some((hash, human, size, path))
}

fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let end = s.find(char::is_whitespace)?;
    Some((&s[..end], &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_reorders_fields() {
        let old = "aa 900Bytes 900b /pics/cat.jpg\n";
        let mut out = Vec::new();
        let count = upgrade_legacy(old.as_bytes(), &mut out).unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "aa 900 900Bytes /pics/cat.jpg\n"
        );
    }

    #[test]
    fn test_upgrade_keeps_spaces_in_path() {
        let old = "bb 2KB 2048b /pics/two words.jpg\n";
        let mut out = Vec::new();
        upgrade_legacy(old.as_bytes(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "bb 2048 2KB \"/pics/two words.jpg\"\n"
        );
    }

    #[test]
    fn test_upgrade_skips_blank_lines() {
        let old = "aa 1Bytes 1b /a\n\nbb 2Bytes 2b /b\n";
        let mut out = Vec::new();
        let count = upgrade_legacy(old.as_bytes(), &mut out).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_upgrade_rejects_short_line() {
        let old = "aa 900Bytes\n";
        let mut out = Vec::new();
        let err = upgrade_legacy(old.as_bytes(), &mut out).unwrap_err();
        assert!(matches!(err, IngestError::MalformedLegacy { line: 1, .. }));
    }

    #[test]
    fn test_upgrade_rejects_bad_size() {
        let old = "aa 900Bytes lots /a\n";
        let mut out = Vec::new();
        let err = upgrade_legacy(old.as_bytes(), &mut out).unwrap_err();
        assert!(matches!(err, IngestError::InvalidSize { line: 1, .. }));
    }
}
