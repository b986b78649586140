use super::*;
use crate::evolution::{EvolutionClassification, HistoryDistribution};

fn sample() -> Vec<ProjectEvolution> {
    vec![ProjectEvolution {
        project: "demo".into(),
        snapshots: 4,
        excluded: 1,
        distribution: HistoryDistribution {
            a: 50.0,
            b: 25.0,
            c: 25.0,
            d: 0.0,
            e: 0.0,
            total_keys: 4,
        },
        classification: EvolutionClassification::default(),
    }]
}

#[test]
fn print_report_does_not_panic() {
    print_report(&sample());
}

#[test]
fn print_report_empty() {
    print_report(&[]);
}

#[test]
fn print_json_does_not_panic() {
    print_json(&sample()).unwrap();
}
