use dupes::duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig};
use dupes::scanner::{FileEntry, Fingerprint, HashError, Hasher, PrimaryDigest, SecondaryDigest, WalkerConfig};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

/// Deterministic pseudo-random bytes (xorshift64).
fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state as u8
        })
        .collect()
}

fn membership(groups: &[DuplicateGroup]) -> BTreeSet<BTreeSet<PathBuf>> {
    groups
        .iter()
        .map(|g| g.paths.iter().cloned().collect())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_single_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "only.txt", b"alone");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
    assert_eq!(summary.secondary_hashes, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"content a");
    write(dir.path(), "b.txt", b"content b");
    write(dir.path(), "c.txt", b"content c");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.primary_hashes, 3);
    assert_eq!(summary.secondary_hashes, 0);
}

#[test]
fn test_five_copies_of_one_mebibyte() {
    let dir = tempdir().unwrap();
    let data = noise(1024 * 1024, 0x5eed);
    let mut expected = BTreeSet::new();
    for (i, sub) in ["", "a/", "a/b/", "c/", "c/d/e/"].iter().enumerate() {
        expected.insert(write(dir.path(), &format!("{sub}copy{i}.bin"), &data));
    }
    write(dir.path(), "other.bin", &noise(1024 * 1024, 0xbeef));

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    let members: BTreeSet<_> = groups[0].paths.iter().cloned().collect();
    assert_eq!(members, expected);
    assert_eq!(summary.duplicate_files, 4);
    assert_eq!(summary.secondary_hashes, 5);
}

#[test]
fn test_scan_multiple_groups() {
    let dir = tempdir().unwrap();
    write(dir.path(), "1a.txt", b"group1");
    write(dir.path(), "1b.txt", b"group1");
    write(dir.path(), "1c.txt", b"group1");
    write(dir.path(), "2a.txt", b"group2");
    write(dir.path(), "2b.txt", b"group2");
    write(dir.path(), "solo.txt", b"solo");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 2);
    let mut sizes: Vec<_> = groups.iter().map(DuplicateGroup::len).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, 3]);
    assert_eq!(summary.duplicate_files, 3);

    for group in &groups {
        assert_eq!(group.hash_hex().len(), 80);
        let unique: BTreeSet<_> = group.paths.iter().collect();
        assert_eq!(unique.len(), group.len());
    }
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    write(dir.path(), "empty1", b"");
    write(dir.path(), "sub/empty2", b"");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x/1", b"aaa");
    write(dir.path(), "y/2", b"aaa");
    write(dir.path(), "z/3", b"bbb");
    write(dir.path(), "4", b"bbb");
    write(dir.path(), "5", b"ccc");

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(membership(&first), membership(&second));
    let keys = |groups: &[DuplicateGroup]| -> BTreeSet<String> {
        groups.iter().map(DuplicateGroup::hash_hex).collect()
    };
    assert_eq!(keys(&first), keys(&second));
}

#[test]
fn test_ignore_patterns_exclude_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep1.txt", b"same");
    write(dir.path(), "keep2.txt", b"same");
    write(dir.path(), "skip.tmp", b"same");
    write(dir.path(), "build/out.txt", b"same");

    let walker_config = WalkerConfig::new(
        false,
        false,
        vec!["*.tmp".to_string(), "build/".to_string()],
    );
    let finder = DuplicateFinder::new(FinderConfig::default().with_walker_config(walker_config));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_skip_hidden() {
    let dir = tempdir().unwrap();
    write(dir.path(), "visible", b"same");
    write(dir.path(), ".hidden", b"same");
    write(dir.path(), ".git/object", b"same");

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::new(false, true, Vec::new())),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 1);
    assert!(groups.is_empty());
}

/// Forces every primary digest to collide.
struct CollidingFingerprinter(Hasher);

impl Fingerprint for CollidingFingerprinter {
    fn primary(&self, path: &Path) -> Result<PrimaryDigest, HashError> {
        self.0.primary(path).map(|_| [0u8; 8])
    }

    fn secondary(&self, path: &Path) -> Result<SecondaryDigest, HashError> {
        self.0.secondary(path)
    }
}

#[test]
fn test_primary_collision_without_secondary_match_is_not_grouped() {
    let dir = tempdir().unwrap();
    let files = vec![
        FileEntry::new(write(dir.path(), "a", b"first"), 5),
        FileEntry::new(write(dir.path(), "b", b"second"), 6),
        FileEntry::new(write(dir.path(), "c", b"third"), 5),
    ];

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_with(files, CollidingFingerprinter(Hasher::new()));

    assert!(groups.is_empty());
    assert_eq!(summary.false_positives, 2);
}

#[test]
fn test_forced_collisions_still_group_true_duplicates() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a", b"same");
    let b = write(dir.path(), "b", b"different");
    let c = write(dir.path(), "c", b"same");
    let files = vec![
        FileEntry::new(a.clone(), 4),
        FileEntry::new(b, 9),
        FileEntry::new(c.clone(), 4),
    ];

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates_with(files, CollidingFingerprinter(Hasher::new()));

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, vec![a, c]);
}
