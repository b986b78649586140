use proptest::prelude::*;
use serde_json::json;

use super::*;
use crate::testutil::{report_json, write_report};

fn history(snapshots: &[&[&str]]) -> SnapshotHistory {
    SnapshotHistory::new(
        snapshots
            .iter()
            .enumerate()
            .map(|(i, keys)| Snapshot::new(i as i64, keys.iter().copied()))
            .collect(),
    )
}

fn keys(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn decision_table() {
    use EvolutionCategory::*;
    assert_eq!(EvolutionCategory::decide(true, true, true), A);
    assert_eq!(EvolutionCategory::decide(true, true, false), E);
    assert_eq!(EvolutionCategory::decide(false, true, false), B);
    assert_eq!(EvolutionCategory::decide(true, false, false), C);
    assert_eq!(EvolutionCategory::decide(false, false, false), D);
}

#[test]
fn present_everywhere_is_a() {
    let out = classify(&history(&[&["k1"], &["k1"], &["k1"]])).unwrap();
    assert_eq!(out.a, keys(&["k1"]));
    assert!(out.b.is_empty() && out.c.is_empty() && out.d.is_empty() && out.e.is_empty());
    assert_eq!(out.total_keys, 1);
}

#[test]
fn removed_before_end_is_c() {
    let out = classify(&history(&[&["k1"], &[], &[], &[]])).unwrap();
    assert_eq!(out.category_of("k1"), Some(EvolutionCategory::C));
}

#[test]
fn gap_in_the_middle_is_e() {
    let out = classify(&history(&[&["k1"], &[], &["k1"], &["k1"]])).unwrap();
    assert_eq!(out.category_of("k1"), Some(EvolutionCategory::E));
}

#[test]
fn all_five_categories() {
    let out = classify(&history(&[
        &["a", "c", "e"],
        &["a", "c", "d"],
        &["a", "b", "e"],
    ]))
    .unwrap();
    assert_eq!(out.a, keys(&["a"]));
    assert_eq!(out.b, keys(&["b"]));
    assert_eq!(out.c, keys(&["c"]));
    assert_eq!(out.d, keys(&["d"]));
    assert_eq!(out.e, keys(&["e"]));
    assert_eq!(out.total_keys, 5);
    assert_eq!(out.category_of("missing"), None);
}

#[test]
fn unsorted_input_is_sorted_before_classification() {
    // Newest first on input; the history puts it back in date order.
    let snapshots = vec![Snapshot::new(30, ["k"]), Snapshot::new(10, Vec::<String>::new())];
    let out = classify(&SnapshotHistory::new(snapshots)).unwrap();
    assert_eq!(out.category_of("k"), Some(EvolutionCategory::B));
}

#[test]
fn single_snapshot_is_all_a() {
    let out = classify(&history(&[&["x", "y"]])).unwrap();
    assert_eq!(out.a.len(), 2);
}

#[test]
fn empty_history_has_no_keys() {
    let out = classify(&SnapshotHistory::default()).unwrap();
    assert_eq!(out.total_keys, 0);
    let d = out.distribution();
    assert_eq!(d, HistoryDistribution::default());
}

#[test]
fn distribution_rounds_to_two_decimals() {
    let out = classify(&history(&[&["a", "b", "c"], &["a"]])).unwrap();
    let d = out.distribution();
    assert_eq!(d.a, 33.33);
    assert_eq!(d.c, 66.67);
    assert_eq!(d.total_keys, 3);
}

#[test]
fn partition_check_rejects_overlap() {
    let h = history(&[&["k"], &["k"]]);
    let broken = EvolutionClassification {
        a: keys(&["k"]),
        e: keys(&["k"]),
        total_keys: 1,
        ..EvolutionClassification::default()
    };
    let err = check_partition(&broken, &h).unwrap_err();
    assert!(matches!(err, MiningError::Consistency { classified: 2, total: 1 }));
    assert!(err.is_fatal());

    let misplaced = EvolutionClassification {
        d: keys(&["k"]),
        total_keys: 1,
        ..EvolutionClassification::default()
    };
    assert!(check_partition(&misplaced, &h).is_err());
}

#[test]
fn category_display() {
    assert_eq!(EvolutionCategory::E.to_string(), "E");
    assert_eq!(EvolutionCategory::ALL.len(), 5);
}

#[test]
fn classify_all_reads_project_folders() {
    let root = tempfile::tempdir().unwrap();
    write_report(root.path(), "alpha/1.json", &report_json("Alpha", "h1", json!(100), &["k1", "k2"]));
    write_report(root.path(), "alpha/2.json", &report_json("Alpha", "h2", json!("200"), &["k1"]));
    write_report(root.path(), "alpha/bad.json", &json!({ "project_info": { "project_name": "Alpha" } }));
    write_report(root.path(), "beta/1.json", &report_json("", "h1", json!(5), &["z"]));
    write_report(root.path(), "loose.json", &json!({}));

    let projects = classify_all(root.path(), &Config::default()).unwrap();
    assert_eq!(projects.len(), 2);

    let alpha = &projects[0];
    assert_eq!(alpha.project, "Alpha");
    assert_eq!(alpha.snapshots, 2);
    assert_eq!(alpha.excluded, 1);
    assert_eq!(alpha.classification.a, keys(&["k1"]));
    assert_eq!(alpha.classification.c, keys(&["k2"]));
    assert_eq!(alpha.distribution.a, 50.0);
}

#[test]
fn project_name_falls_back_to_folder() {
    let root = tempfile::tempdir().unwrap();
    // no usable reports at all
    write_report(root.path(), "gamma/1.json", &json!({}));
    let p = classify_folder(&root.path().join("gamma"), SmellKeyStrategy::Report).unwrap();
    assert_eq!(p.project, "gamma");
    assert_eq!(p.snapshots, 0);
    assert_eq!(p.classification.total_keys, 0);
}

fn snapshot_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..12, 0..8), 2..7)
}

proptest! {
    /// Property: categories are disjoint and cover every key seen.
    #[test]
    fn categories_partition_the_keys(raw in snapshot_strategy()) {
        let snapshots: Vec<Snapshot> = raw
            .iter()
            .enumerate()
            .map(|(i, ks)| Snapshot::new(i as i64, ks.iter().map(|k| format!("k{k}"))))
            .collect();
        let universe: BTreeSet<String> = snapshots.iter().flat_map(|s| s.keys.clone()).collect();

        let out = classify(&SnapshotHistory::new(snapshots)).unwrap();

        let mut union = BTreeSet::new();
        let mut sum = 0;
        for category in EvolutionCategory::ALL {
            sum += out.keys(category).len();
            union.extend(out.keys(category).iter().cloned());
        }
        prop_assert_eq!(sum, universe.len());
        prop_assert_eq!(&union, &universe);
        prop_assert_eq!(out.total_keys, universe.len());
    }
}
