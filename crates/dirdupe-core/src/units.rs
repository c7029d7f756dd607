//! Human-readable size text for record and report fields.

/// Format a byte count the way inventory records carry it.
///
/// The text is part of the record format, so the rounding here must
/// stay stable across runs and platforms.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 8] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB"];

    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.0} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.0} YB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_range() {
        assert_eq!(human_size(0), "0 Bytes");
        assert_eq!(human_size(900), "900 Bytes");
        assert_eq!(human_size(1023), "1023 Bytes");
    }

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(human_size(1024), "1 KB");
        assert_eq!(human_size(1536), "2 KB");
        assert_eq!(human_size(1800), "2 KB");
        assert_eq!(human_size(1024 * 1024), "1 MB");
        assert_eq!(human_size(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn test_huge_sizes() {
        assert_eq!(human_size(u64::MAX), "16 EB");
    }
}
