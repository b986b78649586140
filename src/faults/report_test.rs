use super::*;
use crate::szz::SzzSummary;

fn sample() -> FaultRun {
    FaultRun {
        projects: vec![
            FaultRunSummary {
                project: "alpha".into(),
                repository: "/repos/alpha".into(),
                reports: 3,
                annotated: 2,
                missing_ancestry: 1,
                szz: Some(SzzSummary {
                    attributions: 12,
                    ..SzzSummary::default()
                }),
                ..FaultRunSummary::default()
            },
            FaultRunSummary {
                project: "beta".into(),
                reports: 1,
                error: Some("not a git repository".into()),
                ..FaultRunSummary::default()
            },
        ],
        unusable_reports: 2,
    }
}

#[test]
fn print_report_does_not_panic() {
    print_report(&sample());
}

#[test]
fn print_report_empty() {
    print_report(&FaultRun::default());
}

#[test]
fn print_json_does_not_panic() {
    print_json(&sample()).unwrap();
}

#[test]
fn faults_label_without_szz() {
    assert_eq!(faults_label(&FaultRunSummary::default()), "-");
    assert_eq!(faults_label(&sample().projects[0]), "12");
}
