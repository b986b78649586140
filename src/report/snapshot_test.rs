use serde_json::json;

use super::*;
use crate::testutil::report_json;

fn smell(vars: &[(&str, &str)]) -> Value {
    let data: serde_json::Map<String, Value> = vars
        .iter()
        .enumerate()
        .map(|(i, (name, ty))| (format!("v{i}"), json!({ "name": name, "type": ty })))
        .collect();
    json!({ "data_clump_data": data })
}

#[test]
fn report_strategy_uses_detector_key() {
    let s = smell(&[("x", "int")]);
    assert_eq!(SmellKeyStrategy::Report.key("file-a-x", &s), "file-a-x");
}

#[test]
fn variable_strategies_differ_only_in_order() {
    let forward = smell(&[("y", "int"), ("x", "int")]);
    let backward = smell(&[("x", "int"), ("y", "int")]);

    let a = SmellKeyStrategy::Variables.key("k1", &forward);
    let b = SmellKeyStrategy::Variables.key("k2", &backward);
    assert_eq!(a, "(int)y(int)x");
    assert_ne!(a, b, "encounter order is significant");

    let a = SmellKeyStrategy::SortedVariables.key("k1", &forward);
    let b = SmellKeyStrategy::SortedVariables.key("k2", &backward);
    assert_eq!(a, "(int)x(int)y");
    assert_eq!(a, b);
}

#[test]
fn repeated_variable_names_collapse() {
    let s = smell(&[("x", "int"), ("y", "String"), ("x", "long")]);
    assert_eq!(SmellKeyStrategy::Variables.key("k", &s), "(long)x(String)y");
    assert_eq!(SmellKeyStrategy::SortedVariables.key("k", &s), "(String)y(long)x");
}

#[test]
fn variable_strategy_falls_back_without_data() {
    assert_eq!(SmellKeyStrategy::Variables.key("raw", &json!({})), "raw");
}

#[test]
fn from_document_collects_keys() {
    let doc = ReportDocument::new(
        "r.json",
        report_json("demo", "abc", json!("42"), &["k1", "k2"]),
    );
    let snap = Snapshot::from_document(&doc, SmellKeyStrategy::Report).unwrap();
    assert_eq!(snap.project_name, "demo");
    assert_eq!(snap.commit_date, 42);
    assert_eq!(snap.keys, BTreeSet::from(["k1".to_string(), "k2".to_string()]));
    assert_eq!(snap.path.as_deref(), Some(std::path::Path::new("r.json")));
}

#[test]
fn from_document_without_clumps_is_empty() {
    let mut value = report_json("demo", "abc", json!(1), &[]);
    value.as_object_mut().unwrap().remove("data_clumps");
    let snap = Snapshot::from_document(&ReportDocument::new("r.json", value), SmellKeyStrategy::Report)
        .unwrap();
    assert!(snap.keys.is_empty());
}

#[test]
fn from_document_requires_date() {
    let doc = ReportDocument::new("r.json", report_json("demo", "abc", json!(null), &["k"]));
    assert!(Snapshot::from_document(&doc, SmellKeyStrategy::Report).is_err());
}

#[test]
fn history_sorts_by_date_then_hash() {
    let mut late = Snapshot::new(30, ["c"]);
    late.commit_hash = "z".into();
    let mut tie_b = Snapshot::new(10, ["b"]);
    tie_b.commit_hash = "b".into();
    let mut tie_a = Snapshot::new(10, ["a"]);
    tie_a.commit_hash = "a".into();

    let history = SnapshotHistory::new(vec![late, tie_b, tie_a]);
    let order: Vec<&str> = history
        .snapshots()
        .iter()
        .map(|s| s.commit_hash.as_str())
        .collect();
    assert_eq!(order, ["a", "b", "z"]);
    assert_eq!(history.first().unwrap().commit_date, 10);
    assert_eq!(history.last().unwrap().commit_date, 30);
    assert_eq!(history.len(), 3);
}

#[test]
fn empty_history() {
    let history = SnapshotHistory::new(Vec::new());
    assert!(history.is_empty());
    assert!(history.first().is_none());
}
