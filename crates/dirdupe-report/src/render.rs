//! Deterministic rendering of classified pairs.
//!
//! The row grammar and the empty separator row are load-bearing for
//! downstream diff tooling: identical input and configuration must
//! produce byte-identical output.

use std::cmp::Reverse;
use std::io;

use itertools::Itertools;
use tracing::debug;

use dirdupe_analyze::BestMatches;
use dirdupe_core::{DirTree, human_size, record_writer};

use crate::classify::{PairReport, classify_pair};

/// Classify every retained pair and order it for emission: largest
/// matched byte count first, ties by the lexicographically smaller of
/// the two paths, then the larger.
pub fn ordered_reports(tree: &DirTree, matches: &BestMatches) -> Vec<PairReport> {
    let reports: Vec<PairReport> = matches
        .unique()
        .iter()
        .map(|stat| classify_pair(tree, stat))
        .sorted_by_key(emit_key)
        .collect();
    debug!(blocks = reports.len(), "report blocks ordered");
    reports
}

fn emit_key(report: &PairReport) -> (Reverse<u64>, String, String) {
    let first = report.left.path.clone();
    let second = report
        .right
        .as_ref()
        .map(|p| p.path.clone())
        .unwrap_or_else(|| first.clone());
    let (lo, hi) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };
    (Reverse(report.matched_bytes), lo, hi)
}

/// Render every retained pair to `output` in the delimited report
/// format.
pub fn write_report<W: io::Write>(
    tree: &DirTree,
    matches: &BestMatches,
    output: W,
) -> csv::Result<()> {
    let mut out = record_writer(output);
    for report in ordered_reports(tree, matches) {
        write_block(&mut out, &report)?;
    }
    out.flush()?;
    Ok(())
}

fn write_block<W: io::Write>(out: &mut csv::Writer<W>, report: &PairReport) -> csv::Result<()> {
    let left_size = human_size(report.left.total_size);
    match &report.right {
        None => out.write_record([
            "parent",
            "compared against itself",
            left_size.as_str(),
            report.left.path.as_str(),
        ])?,
        Some(right) => {
            out.write_record([
                "parent",
                "left",
                left_size.as_str(),
                report.left.path.as_str(),
            ])?;
            let right_size = human_size(right.total_size);
            out.write_record(["parent", "right", right_size.as_str(), right.path.as_str()])?;
        }
    }

    for (class, total) in report.totals() {
        if !total.is_empty() {
            let bytes = human_size(total.bytes);
            out.write_record(["summary", class.as_str(), "files", bytes.as_str()])?;
        }
    }

    for group in &report.groups {
        let bytes = human_size(group.bytes);
        out.write_record(["files", group.class.as_str(), bytes.as_str()])?;
        for row in &group.rows {
            let size = human_size(row.size);
            out.write_record(["  ", row.presence.as_str(), size.as_str(), row.name.as_str()])?;
        }
    }

    // Blank separator row between blocks.
    out.write_record(None::<&[u8]>)?;
    Ok(())
}
