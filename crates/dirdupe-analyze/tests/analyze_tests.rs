use dirdupe_analyze::{DirPair, FolderMatcher, PairMatch};
use dirdupe_core::{DirId, DirTree, MatchConfig, ingest};

fn tree_of(records: &str) -> DirTree {
    ingest(records.as_bytes()).unwrap()
}

fn dir_named(tree: &DirTree, name: &str) -> DirId {
    tree.dir(tree.root()).children.get(name).copied().unwrap()
}

#[test]
fn test_identical_folders_match() {
    let tree = tree_of(concat!(
        "aa 100 x /left/f.txt\n",
        "bb 200 x /left/g.txt\n",
        "aa 100 x /right/f.txt\n",
        "bb 200 x /right/g.txt\n",
    ));
    let matches = FolderMatcher::new().find_matches(&tree);

    let left = dir_named(&tree, "left");
    let right = dir_named(&tree, "right");
    let stat = matches.for_dir(left).unwrap();

    assert_eq!(stat.pair, DirPair::new(left, right));
    assert_eq!(stat.matched_files, 2);
    assert_eq!(stat.matched_bytes, 300);
    assert_eq!(matches.for_dir(right).unwrap().pair, stat.pair);
    assert_eq!(matches.unique().len(), 1);
}

#[test]
fn test_threshold_suppresses_incidental_overlap() {
    // One shared boilerplate file, 10 bytes against 100-byte sides.
    let tree = tree_of(concat!(
        "tt 10 x /a/common.txt\n",
        "uu 90 x /a/big1.bin\n",
        "tt 10 x /b/common.txt\n",
        "ww 90 x /b/big2.bin\n",
    ));
    let matches = FolderMatcher::new().find_matches(&tree);
    assert!(matches.is_empty());
}

#[test]
fn test_threshold_keeps_match_dominating_one_side() {
    // 900 matched bytes is under half of nothing: 900/2 and 950/2.
    let tree = tree_of(concat!(
        "hh 900 x /a/big.bin\n",
        "hh 900 x /b/big.bin\n",
        "kk 50 x /b/other.bin\n",
    ));
    let matches = FolderMatcher::new().find_matches(&tree);

    let a = dir_named(&tree, "a");
    let stat = matches.for_dir(a).unwrap();
    assert_eq!(stat.matched_bytes, 900);
    assert_eq!(matches.unique().len(), 1);
}

#[test]
fn test_self_duplicates_are_detected() {
    let tree = tree_of(concat!(
        "ss 400 x /d/copy1.txt\n",
        "ss 400 x /d/copy2.txt\n",
        "uu 100 x /d/unique.txt\n",
    ));
    let matches = FolderMatcher::new().find_matches(&tree);

    let d = dir_named(&tree, "d");
    let stat = matches.for_dir(d).unwrap();
    assert!(stat.pair.is_self());
    assert_eq!(stat.matched_files, 2);
    assert_eq!(stat.matched_bytes, 800);
}

#[test]
fn test_no_self_pair_without_duplicate_content() {
    let tree = tree_of(concat!(
        "aa 10 x /d/one.txt\n",
        "bb 20 x /d/two.txt\n",
    ));
    let matches = FolderMatcher::new().find_matches(&tree);
    assert!(matches.is_empty());
}

#[test]
fn test_excluded_directory_is_not_a_subject() {
    let tree = tree_of(concat!(
        "gg 100 x /proj/.git/pack1.bin\n",
        "gg 100 x /proj/.git/pack2.bin\n",
    ));

    // Default config: .git is never visited, so its internal
    // duplication goes unreported.
    let matches = FolderMatcher::new().find_matches(&tree);
    assert!(matches.is_empty());

    // Same tree with exclusions lifted.
    let config = MatchConfig::builder()
        .excluded_dirs(Vec::<String>::new())
        .build()
        .unwrap();
    let matches = FolderMatcher::with_config(config).find_matches(&tree);
    assert_eq!(matches.unique().len(), 1);
}

#[test]
fn test_excluded_directory_still_matches_from_outside() {
    let tree = tree_of(concat!(
        "vv 100 x /vendor/lib.bin\n",
        "vv 100 x /app/lib.bin\n",
    ));
    let config = MatchConfig::builder()
        .excluded_dirs(vec!["vendor".to_string()])
        .build()
        .unwrap();
    let matches = FolderMatcher::with_config(config).find_matches(&tree);

    // The pair is discovered from /app via the global hash index, so
    // /vendor still shows up as a partner.
    let vendor = dir_named(&tree, "vendor");
    let app = dir_named(&tree, "app");
    let stat = matches.for_dir(app).unwrap();
    assert_eq!(stat.pair, DirPair::new(vendor, app));
    assert_eq!(matches.len(), 2);
    assert_eq!(matches.unique().len(), 1);
}

#[test]
fn test_each_directory_keeps_one_best_match() {
    let tree = tree_of(concat!(
        "p1 100 x /a/f.txt\n",
        "p1 100 x /b/f.txt\n",
        "p2 500 x /c/g.txt\n",
        "p2 500 x /d/g.txt\n",
    ));
    let matches = FolderMatcher::new().find_matches(&tree);

    let stats = matches.unique();
    assert_eq!(stats.len(), 2);
    for name in ["a", "b", "c", "d"] {
        let id = dir_named(&tree, name);
        let member_of = stats
            .iter()
            .filter(|s| s.pair.left() == id || s.pair.right() == id)
            .count();
        assert_eq!(member_of, 1, "directory /{name} must appear exactly once");
    }
}

#[test]
fn test_bigger_partner_wins() {
    // /a overlaps /b by one file and /c by two; only the /c pairing
    // must be retained for /a.
    let tree = tree_of(concat!(
        "m1 100 x /a/f.txt\n",
        "m2 100 x /a/g.txt\n",
        "m1 100 x /b/f.txt\n",
        "m1 100 x /c/f.txt\n",
        "m2 100 x /c/g.txt\n",
    ));
    let matches = FolderMatcher::new().find_matches(&tree);

    let a = dir_named(&tree, "a");
    let c = dir_named(&tree, "c");
    let stat = matches.for_dir(a).unwrap();
    assert_eq!(stat.pair, DirPair::new(a, c));
    assert_eq!(stat.matched_bytes, 200);
}

#[test]
fn test_find_matches_is_deterministic() {
    let records = concat!(
        "aa 100 x /a/f.txt\n",
        "aa 100 x /b/f.txt\n",
        "bb 300 x /a/g.txt\n",
        "bb 300 x /c/g.txt\n",
        "cc 40 x /b/h.txt\n",
    );

    let first: Vec<PairMatch> = {
        let tree = tree_of(records);
        FolderMatcher::new().find_matches(&tree).unique()
    };
    let second: Vec<PairMatch> = {
        let tree = tree_of(records);
        FolderMatcher::new().find_matches(&tree).unique()
    };
    assert_eq!(first, second);
}
