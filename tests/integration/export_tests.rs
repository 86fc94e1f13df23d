use dupes::duplicates::DuplicateFinder;
use dupes::output::{ConsoleReport, JsonOutput, NO_DUPLICATES_MESSAGE};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn populate(dir: &Path) {
    fs::create_dir_all(dir.join("nested/deeper")).unwrap();
    fs::write(dir.join("a.txt"), b"alpha").unwrap();
    fs::write(dir.join("nested/a_copy.txt"), b"alpha").unwrap();
    fs::write(dir.join("nested/deeper/a_again.txt"), b"alpha").unwrap();
    fs::write(dir.join("b.txt"), b"beta").unwrap();
    fs::write(dir.join("nested/b_copy.txt"), b"beta").unwrap();
    fs::write(dir.join("unique.txt"), b"gamma").unwrap();
}

/// Parse the plain console report back into (hash, paths) pairs.
fn parse_console(report: &str) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for line in report.lines() {
        if let Some(hash) = line.strip_prefix("Hash: ") {
            groups.push((hash.to_string(), Vec::new()));
        } else if let Some(rest) = line.strip_prefix('\t') {
            let (_, path) = rest.split_once(' ').unwrap();
            groups.last_mut().unwrap().1.push(path.to_string());
        }
    }
    groups
}

#[test]
fn test_json_round_trip_matches_console_report() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 2);

    let console = ConsoleReport::new(&groups).render();
    assert!(console.starts_with("3 Files with duplicates found:\n"));

    let target = dir.path().join("report.json");
    JsonOutput::new(&groups).write_to_file(&target).unwrap();
    let parsed = JsonOutput::parse(&fs::read_to_string(&target).unwrap()).unwrap();

    let keys: Vec<_> = parsed.groups.iter().map(|g| g.key().unwrap()).collect();
    let expected_keys: Vec<_> = groups.iter().map(|g| g.key).collect();
    assert_eq!(keys, expected_keys);

    let from_json: Vec<(String, Vec<String>)> = parsed
        .groups
        .into_iter()
        .map(|g| (g.hash, g.files))
        .collect();
    assert_eq!(from_json, parse_console(&console));
}

#[test]
fn test_empty_result_exports_empty_array() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.txt"), b"1").unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(
        ConsoleReport::new(&groups).render(),
        format!("{NO_DUPLICATES_MESSAGE}\n")
    );

    let target = dir.path().join("empty.json");
    JsonOutput::new(&groups).write_to_file(&target).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap().trim(), "[]");
}
