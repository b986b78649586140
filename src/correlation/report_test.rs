use super::*;
use crate::correlation::ProjectCorrelation;

fn sample() -> CorrelationRun {
    CorrelationRun {
        projects: vec![ProjectCorrelation {
            project: "alpha".into(),
            points: 3,
            total: Correlation::between(&[1.0, 2.0, 3.0], &[3.0, 4.0, 5.0]),
            ..ProjectCorrelation::default()
        }],
        global_total: None,
        unannotated_reports: 4,
    }
}

#[test]
fn cell_formats_rho() {
    let c = Correlation::between(&[1.0, 2.0], &[2.0, 1.0]);
    assert_eq!(cell(c.as_ref()), "-1.00");
    assert_eq!(cell(None), "-");
}

#[test]
fn print_report_does_not_panic() {
    print_report(&sample());
    print_report(&CorrelationRun::default());
}

#[test]
fn print_json_does_not_panic() {
    print_json(&sample()).unwrap();
}
