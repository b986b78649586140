use serde_json::json;

use super::*;
use crate::testutil::{report_json, write_report};

#[test]
fn finds_json_recursively_including_hidden() {
    let dir = tempfile::tempdir().unwrap();
    let v = json!({});
    write_report(dir.path(), "b.json", &v);
    write_report(dir.path(), "proj/a.json", &v);
    write_report(dir.path(), ".hidden/c.json", &v);
    write_report(dir.path(), "notes.txt", &v);
    std::fs::write(dir.path().join(".gitignore"), "*.json\n").unwrap();

    let files = find_report_files(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
        .collect();
    assert_eq!(names.len(), 3, "got {names:?}");
    assert!(names.iter().any(|n| n.ends_with("c.json")));
    assert!(!names.iter().any(|n| n.ends_with(".txt")));
}

#[test]
fn missing_folder_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(find_report_files(&dir.path().join("nope")).is_err());
}

#[test]
fn save_overwrites_in_place_and_preserves_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(dir.path(), "r.json", &report_json("demo", "h", json!(1), &["k1"]));

    let store = ReportStore;
    let mut doc = store.load(&path).unwrap();
    doc.set_bug_introducing_commits(5).unwrap();
    store.save(&doc).unwrap();

    let reloaded = store.load(&path).unwrap();
    assert_eq!(reloaded.bug_introducing_commits(), Some(5));
    let keys: Vec<&String> = reloaded.value().as_object().unwrap().keys().collect();
    assert_eq!(keys, ["report_version", "project_info", "report_summary", "data_clumps"]);

    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1, "no temporary files left behind");
}

#[test]
fn load_rejects_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = ReportStore.load(&path).unwrap_err();
    assert!(matches!(err, MiningError::Parse { .. }), "got: {err}");
}

#[test]
fn load_all_skips_broken_files() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), "ok.json", &report_json("demo", "h", json!(1), &[]));
    std::fs::write(dir.path().join("broken.json"), "[").unwrap();

    let docs = ReportStore.load_all(dir.path()).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].project_name(), Some("demo"));
}
