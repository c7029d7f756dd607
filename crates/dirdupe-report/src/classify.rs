//! Classification of one matched directory pair.
//!
//! Every file relevant to a pair lands in exactly one bucket: shared
//! content is `same`, a name carried by both sides with differing
//! content is `changed`, and what remains is `left-only`/`right-only`
//! (or, inside a self-pair, `different` for files with no duplicate).

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use dirdupe_analyze::{DirPair, PairMatch};
use dirdupe_core::{DirId, DirNode, DirTree, FileEntry, FileId};

/// Which bucket a group of files falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileClass {
    Same,
    Different,
    Changed,
    LeftOnly,
    RightOnly,
}

impl FileClass {
    /// The report token for this bucket.
    pub fn as_str(self) -> &'static str {
        match self {
            FileClass::Same => "same",
            FileClass::Different => "different",
            FileClass::Changed => "changed",
            FileClass::LeftOnly => "left-only",
            FileClass::RightOnly => "right-only",
        }
    }
}

/// Which side of the pair a detail row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Member of a self-pair.
    File,
    /// The name carries this hash on both sides.
    Both,
    Left,
    Right,
}

impl Presence {
    /// The report token for this side.
    pub fn as_str(self) -> &'static str {
        match self {
            Presence::File => "file",
            Presence::Both => "both",
            Presence::Left => "left",
            Presence::Right => "right",
        }
    }
}

/// One detail row of a report block.
#[derive(Debug, Clone, Serialize)]
pub struct FileRow {
    pub presence: Presence,
    pub size: u64,
    pub name: String,
}

/// A labeled run of detail rows.
#[derive(Debug, Clone, Serialize)]
pub struct FileGroup {
    pub class: FileClass,
    pub bytes: u64,
    pub rows: Vec<FileRow>,
}

/// File count and byte total for one bucket of a block.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BucketTotal {
    pub files: u64,
    pub bytes: u64,
}

impl BucketTotal {
    fn add(&mut self, files: u64, bytes: u64) {
        self.files += files;
        self.bytes += bytes;
    }

    /// Whether the bucket collected no files.
    pub fn is_empty(&self) -> bool {
        self.files == 0
    }
}

/// One side of a matched pair as it appears in the block header.
#[derive(Debug, Clone, Serialize)]
pub struct ParentDir {
    pub path: String,
    pub total_size: u64,
}

/// A fully classified pair, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub left: ParentDir,
    /// `None` when the pair compares a directory against itself.
    pub right: Option<ParentDir>,
    pub matched_files: u64,
    pub matched_bytes: u64,
    pub same: BucketTotal,
    pub different: BucketTotal,
    pub changed: BucketTotal,
    pub left_only: BucketTotal,
    pub right_only: BucketTotal,
    pub groups: Vec<FileGroup>,
}

impl PairReport {
    /// Bucket totals in report order; empty ones are skipped at render
    /// time.
    pub fn totals(&self) -> [(FileClass, BucketTotal); 5] {
        [
            (FileClass::Same, self.same),
            (FileClass::Different, self.different),
            (FileClass::Changed, self.changed),
            (FileClass::LeftOnly, self.left_only),
            (FileClass::RightOnly, self.right_only),
        ]
    }
}

/// Classify every file relevant to a retained pair.
pub fn classify_pair(tree: &DirTree, stat: &PairMatch) -> PairReport {
    let pair = stat.pair;
    let left = parent(tree, pair.left());
    let right = (!pair.is_self()).then(|| parent(tree, pair.right()));

    let mut report = PairReport {
        left,
        right,
        matched_files: stat.matched_files,
        matched_bytes: stat.matched_bytes,
        same: BucketTotal::default(),
        different: BucketTotal::default(),
        changed: BucketTotal::default(),
        left_only: BucketTotal::default(),
        right_only: BucketTotal::default(),
        groups: Vec::new(),
    };

    if pair.is_self() {
        classify_self(tree, pair.left(), &mut report);
    } else {
        classify_distinct(tree, pair, &mut report);
    }
    report
}

fn parent(tree: &DirTree, id: DirId) -> ParentDir {
    ParentDir {
        path: tree.dir_path(id),
        total_size: tree.dir(id).total_size,
    }
}

/// Self-pair: duplicated hashes are `same`, everything held once is
/// `different`.
fn classify_self(tree: &DirTree, dir_id: DirId, report: &mut PairReport) {
    let dir = tree.dir(dir_id);

    let mut duplicated: Vec<(u64, &str, &[FileId])> = dir
        .by_hash
        .iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(hash, ids)| {
            let bytes = tree.file(ids[0]).size * ids.len() as u64;
            (bytes, hash.as_str(), ids.as_slice())
        })
        .collect();
    duplicated.sort_by(|x, y| y.0.cmp(&x.0).then_with(|| x.1.cmp(&y.1)));

    for (bytes, _hash, ids) in duplicated {
        let size = tree.file(ids[0]).size;
        report.same.add(ids.len() as u64, bytes);

        let mut names: Vec<&str> = ids.iter().map(|id| &*tree.file(*id).name).collect();
        names.sort_unstable();
        report.groups.push(FileGroup {
            class: FileClass::Same,
            bytes,
            rows: names
                .into_iter()
                .map(|name| FileRow {
                    presence: Presence::File,
                    size,
                    name: name.to_string(),
                })
                .collect(),
        });
    }

    let mut singles: Vec<&FileEntry> = dir
        .by_hash
        .values()
        .filter(|ids| ids.len() == 1)
        .map(|ids| tree.file(ids[0]))
        .collect();
    if singles.is_empty() {
        return;
    }
    singles.sort_by(|x, y| y.size.cmp(&x.size).then_with(|| x.name.cmp(&y.name)));

    let bytes: u64 = singles.iter().map(|f| f.size).sum();
    report.different.add(singles.len() as u64, bytes);
    report.groups.push(FileGroup {
        class: FileClass::Different,
        bytes,
        rows: singles
            .iter()
            .map(|f| FileRow {
                presence: Presence::File,
                size: f.size,
                name: f.name.to_string(),
            })
            .collect(),
    });
}

/// Distinct pair: shared hashes (either present on both sides or
/// duplicated within one side) are `same`; hashes held exactly once on
/// exactly one side pair up by name into `changed` or fall through to
/// the one-sided buckets.
fn classify_distinct(tree: &DirTree, pair: DirPair, report: &mut PairReport) {
    let left = tree.dir(pair.left());
    let right = tree.dir(pair.right());

    let mut shared: Vec<(u64, &str, &[FileId], &[FileId])> = Vec::new();
    for (hash, lids) in &left.by_hash {
        let rids = right.by_hash.get(hash).map(Vec::as_slice).unwrap_or(&[]);
        if rids.is_empty() && lids.len() < 2 {
            continue;
        }
        let bytes = tree.file(lids[0]).size * (lids.len() + rids.len()) as u64;
        shared.push((bytes, hash.as_str(), lids.as_slice(), rids));
    }
    for (hash, rids) in &right.by_hash {
        if rids.len() > 1 && !left.by_hash.contains_key(hash) {
            let bytes = tree.file(rids[0]).size * rids.len() as u64;
            shared.push((bytes, hash.as_str(), &[], rids.as_slice()));
        }
    }
    shared.sort_by(|x, y| y.0.cmp(&x.0).then_with(|| x.1.cmp(&y.1)));

    for (bytes, _hash, lids, rids) in shared {
        let sample = if lids.is_empty() { rids[0] } else { lids[0] };
        let size = tree.file(sample).size;
        report.same.add((lids.len() + rids.len()) as u64, bytes);

        let lnames: BTreeSet<&str> = lids.iter().map(|id| &*tree.file(*id).name).collect();
        let rnames: BTreeSet<&str> = rids.iter().map(|id| &*tree.file(*id).name).collect();
        let rows = lnames
            .union(&rnames)
            .map(|name| {
                let presence = match (lnames.contains(name), rnames.contains(name)) {
                    (true, true) => Presence::Both,
                    (true, false) => Presence::Left,
                    _ => Presence::Right,
                };
                FileRow {
                    presence,
                    size,
                    name: name.to_string(),
                }
            })
            .collect();
        report.groups.push(FileGroup {
            class: FileClass::Same,
            bytes,
            rows,
        });
    }

    // Hashes held exactly once by exactly one side.
    let mut left_pool = one_sided(tree, left, right);
    let mut right_pool = one_sided(tree, right, left);

    // A name carried by both pools is the same file with new content.
    let right_by_name: HashMap<&str, &FileEntry> =
        right_pool.iter().map(|f| (&*f.name, *f)).collect();
    let mut changed: Vec<(&FileEntry, &FileEntry)> = Vec::new();
    let mut renamed: HashSet<&str> = HashSet::new();
    for lf in &left_pool {
        if let Some(rf) = right_by_name.get(&*lf.name) {
            changed.push((*lf, *rf));
            renamed.insert(&lf.name);
        }
    }
    left_pool.retain(|f| !renamed.contains(&*f.name));
    right_pool.retain(|f| !renamed.contains(&*f.name));

    if !changed.is_empty() {
        changed.sort_by(|x, y| {
            let xs = x.0.size.max(x.1.size);
            let ys = y.0.size.max(y.1.size);
            ys.cmp(&xs).then_with(|| x.0.name.cmp(&y.0.name))
        });

        let bytes: u64 = changed.iter().map(|(l, r)| l.size + r.size).sum();
        report.changed.add(changed.len() as u64 * 2, bytes);

        let mut rows = Vec::with_capacity(changed.len() * 2);
        for (lf, rf) in changed {
            rows.push(FileRow {
                presence: Presence::Left,
                size: lf.size,
                name: lf.name.to_string(),
            });
            rows.push(FileRow {
                presence: Presence::Right,
                size: rf.size,
                name: rf.name.to_string(),
            });
        }
        report.groups.push(FileGroup {
            class: FileClass::Changed,
            bytes,
            rows,
        });
    }

    for (pool, class, presence) in [
        (left_pool, FileClass::LeftOnly, Presence::Left),
        (right_pool, FileClass::RightOnly, Presence::Right),
    ] {
        if pool.is_empty() {
            continue;
        }
        let mut pool = pool;
        pool.sort_by(|x, y| y.size.cmp(&x.size).then_with(|| x.name.cmp(&y.name)));

        let bytes: u64 = pool.iter().map(|f| f.size).sum();
        match class {
            FileClass::LeftOnly => report.left_only.add(pool.len() as u64, bytes),
            _ => report.right_only.add(pool.len() as u64, bytes),
        }
        report.groups.push(FileGroup {
            class,
            bytes,
            rows: pool
                .iter()
                .map(|f| FileRow {
                    presence,
                    size: f.size,
                    name: f.name.to_string(),
                })
                .collect(),
        });
    }
}

/// Files whose hash occurs exactly once in `this` and never in `other`.
fn one_sided<'t>(tree: &'t DirTree, this: &'t DirNode, other: &'t DirNode) -> Vec<&'t FileEntry> {
    this.by_hash
        .iter()
        .filter(|(hash, ids)| ids.len() == 1 && !other.by_hash.contains_key(*hash))
        .map(|(_, ids)| tree.file(ids[0]))
        .collect()
}
