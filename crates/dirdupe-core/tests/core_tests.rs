use std::io::BufReader;

use dirdupe_core::{IngestError, human_size, ingest, upgrade_legacy};

#[test]
fn test_ingest_aggregates_and_paths() {
    let records = concat!(
        "aa 10 \"10 Bytes\" /backup/2019/photos/img1.jpg\n",
        "bb 20 \"20 Bytes\" /backup/2019/photos/img2.jpg\n",
        "cc 5 \"5 Bytes\" /backup/2019/notes.txt\n",
        "dd 1 \"1 Bytes\" /backup/readme.txt\n",
    );
    let tree = ingest(records.as_bytes()).unwrap();

    assert_eq!(tree.file_count(), 4);
    assert_eq!(tree.dir_count(), 4); // root, backup, 2019, photos

    let root = tree.root();
    let backup = tree.dir(root).children.get("backup").copied().unwrap();
    let y2019 = tree.dir(backup).children.get("2019").copied().unwrap();
    let photos = tree.dir(y2019).children.get("photos").copied().unwrap();

    assert_eq!(tree.dir_path(photos), "/backup/2019/photos");
    assert_eq!(tree.dir(backup).total_size, 36);
    assert_eq!(tree.dir(backup).immediate_size, 1);
    assert_eq!(tree.dir(y2019).total_size, 35);
    assert_eq!(tree.dir(y2019).immediate_size, 5);
    assert_eq!(tree.dir(photos).immediate_size, 30);
}

#[test]
fn test_ingest_merges_both_separator_styles() {
    let records = concat!(
        "aa 10 x /shared/f1.txt\n",
        "bb 20 x \\shared\\f2.txt\n",
    );
    let tree = ingest(records.as_bytes()).unwrap();

    // Both records land in the same directory node.
    assert_eq!(tree.dir_count(), 2);
    let shared = tree.dir(tree.root()).children.get("shared").copied().unwrap();
    assert_eq!(tree.dir(shared).file_count(), 2);
}

#[test]
fn test_ingest_aborts_without_partial_tree_use() {
    let records = concat!(
        "aa 10 x /a/f.txt\n",
        "aa 999 x /b/g.txt\n",
    );
    let err = ingest(records.as_bytes()).unwrap_err();
    assert!(matches!(err, IngestError::HashCollision { .. }));
}

#[test]
fn test_upgrade_then_ingest_round_trips_drive_paths() {
    let legacy = "aa 900Bytes 900b C:\\old backup\\file one.txt\n";
    let mut upgraded = Vec::new();
    let count = upgrade_legacy(BufReader::new(legacy.as_bytes()), &mut upgraded).unwrap();
    assert_eq!(count, 1);

    let tree = ingest(upgraded.as_slice()).unwrap();
    assert_eq!(tree.file_count(), 1);

    let top = tree
        .dir(tree.root())
        .children
        .get("old backup")
        .copied()
        .unwrap();
    assert_eq!(tree.dir_path(top), "C:/old backup");
    assert_eq!(tree.dir(top).immediate_size, 900);
}

#[test]
fn test_human_size_matches_record_convention() {
    assert_eq!(human_size(900), "900 Bytes");
    assert_eq!(human_size(1800), "2 KB");
    assert_eq!(human_size(3 * 1024 * 1024), "3 MB");
}
