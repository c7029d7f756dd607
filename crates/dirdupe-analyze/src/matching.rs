//! Pairwise directory similarity.
//!
//! Every pair is scored at most once and the score is kept only if it
//! beats what either member already has, so the retained set stays
//! linear in the number of directories even when one folder overlaps
//! with many others.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use dirdupe_core::{DirId, DirTree, MatchConfig};

/// Unordered pair of directories, canonicalized by creation order.
///
/// The degenerate pair of a directory with itself means "look for
/// duplicates inside this directory".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirPair {
    a: DirId,
    b: DirId,
}

impl DirPair {
    /// Build the canonical form of `(x, y)`.
    pub fn new(x: DirId, y: DirId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// The member created first.
    pub fn left(&self) -> DirId {
        self.a
    }

    /// The member created last; equal to `left` for a self-pair.
    pub fn right(&self) -> DirId {
        self.b
    }

    /// Whether this compares a directory against itself.
    pub fn is_self(&self) -> bool {
        self.a == self.b
    }
}

/// How much content two directories share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairMatch {
    /// The canonical directory pair.
    pub pair: DirPair,
    /// Number of matched file instances.
    pub matched_files: u64,
    /// Total bytes across the matched instances.
    pub matched_bytes: u64,
}

impl PairMatch {
    /// Score a pair by intersecting the two directories' hash indexes.
    ///
    /// A self-pair counts every hash held more than once, `count × size`
    /// each; a distinct pair counts every shared hash,
    /// `min(countLeft, countRight) × size` each.
    pub fn measure(tree: &DirTree, pair: DirPair) -> Self {
        let mut matched_files = 0u64;
        let mut matched_bytes = 0u64;

        if pair.is_self() {
            let dir = tree.dir(pair.left());
            for ids in dir.by_hash.values() {
                if ids.len() > 1 {
                    let count = ids.len() as u64;
                    matched_files += count;
                    matched_bytes += tree.file(ids[0]).size * count;
                }
            }
        } else {
            let left = tree.dir(pair.left());
            let right = tree.dir(pair.right());
            for (hash, left_ids) in &left.by_hash {
                if let Some(right_ids) = right.by_hash.get(hash) {
                    let shared = left_ids.len().min(right_ids.len()) as u64;
                    matched_files += shared;
                    matched_bytes += tree.file(left_ids[0]).size * shared;
                }
            }
        }

        Self {
            pair,
            matched_files,
            matched_bytes,
        }
    }
}

/// The best match retained for each directory.
#[derive(Debug, Default)]
pub struct BestMatches {
    by_dir: HashMap<DirId, PairMatch>,
}

impl BestMatches {
    /// The best match recorded for `dir`, if any pair survived.
    pub fn for_dir(&self, dir: DirId) -> Option<&PairMatch> {
        self.by_dir.get(&dir)
    }

    /// Number of directories with a retained match.
    pub fn len(&self) -> usize {
        self.by_dir.len()
    }

    /// Whether no pair survived at all.
    pub fn is_empty(&self) -> bool {
        self.by_dir.is_empty()
    }

    /// The distinct retained stats, ordered by pair key.
    ///
    /// A stat can be the best match of both of its members; each pair
    /// is scored at most once, so the pair key is its identity.
    pub fn unique(&self) -> Vec<PairMatch> {
        let mut seen = HashSet::new();
        let mut stats: Vec<PairMatch> = self
            .by_dir
            .values()
            .filter(|stat| seen.insert(stat.pair))
            .copied()
            .collect();
        stats.sort_by_key(|stat| stat.pair);
        stats
    }

    fn offer(&mut self, dir: DirId, stat: PairMatch) {
        match self.by_dir.get(&dir) {
            // Strict inequality: the first-discovered stat wins ties,
            // which is why traversal order must be deterministic.
            Some(best) if best.matched_bytes >= stat.matched_bytes => {}
            _ => {
                self.by_dir.insert(dir, stat);
            }
        }
    }
}

/// Duplicate-folder matcher.
pub struct FolderMatcher {
    config: MatchConfig,
}

impl FolderMatcher {
    /// Create a matcher with the default configuration.
    pub fn new() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }

    /// Create a matcher with a custom configuration.
    pub fn with_config(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Find, for every directory sharing enough content with a partner,
    /// the single best-matching partner.
    ///
    /// The result is a pure function of the tree and the exclusion set.
    pub fn find_matches(&self, tree: &DirTree) -> BestMatches {
        let mut state = MatchState::default();
        self.visit(tree, tree.root(), &mut state);
        debug!(
            compared = state.compared.len(),
            retained = state.best.len(),
            "similarity pass finished"
        );
        state.best
    }

    fn visit(&self, tree: &DirTree, dir_id: DirId, state: &mut MatchState) {
        let dir = tree.dir(dir_id);
        if self.config.is_excluded(&dir.name) {
            return;
        }
        for &child in dir.children.values() {
            self.visit(tree, child, state);
        }

        for &file_id in dir.files.values() {
            let file = tree.file(file_id);
            for &other_id in tree.files_with_hash(&file.hash) {
                let pair = DirPair::new(dir_id, tree.file(other_id).dir);
                // Score each pair once, whatever the outcome.
                if !state.compared.insert(pair) {
                    continue;
                }

                let stat = PairMatch::measure(tree, pair);
                if stat.matched_files == 0 {
                    continue;
                }
                // Keep the pair only when the overlap dominates at
                // least one side's directly-contained bytes.
                let left_half = tree.dir(pair.left()).immediate_size / 2;
                let right_half = tree.dir(pair.right()).immediate_size / 2;
                if stat.matched_bytes < left_half && stat.matched_bytes < right_half {
                    continue;
                }

                state.best.offer(pair.left(), stat);
                state.best.offer(pair.right(), stat);
            }
        }
    }
}

impl Default for FolderMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable working state for one matching pass.
#[derive(Debug, Default)]
struct MatchState {
    compared: HashSet<DirPair>,
    best: BestMatches,
}
