//! Rank correlation between the fault annotation of each report and its
//! data clump counts.

mod report;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::report::{DataClumpCounts, ReportDocument, ReportStore};

/// 1-based ranks; tied values share the mean of the ranks they span.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}

/// Spearman's rho. `None` for fewer than two pairs, mismatched lengths or
/// a series without variation.
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    pearson(&average_ranks(x), &average_ranks(y))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    None,
}

impl Strength {
    pub fn of(rho: f64) -> Self {
        let r = rho.abs();
        if r > 0.7 {
            Self::VeryStrong
        } else if r > 0.5 {
            Self::Strong
        } else if r > 0.3 {
            Self::Moderate
        } else if r > 0.1 {
            Self::Weak
        } else {
            Self::None
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VeryStrong => "very strong",
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
            Self::None => "none",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    pub rho: f64,
    pub strength: Strength,
    pub positive: bool,
}

impl Correlation {
    pub fn between(x: &[f64], y: &[f64]) -> Option<Self> {
        spearman(x, y).map(|rho| Self {
            rho,
            strength: Strength::of(rho),
            positive: rho > 0.0,
        })
    }

    /// e.g. `strong positive`, or `none`.
    pub fn label(&self) -> String {
        match self.strength {
            Strength::None => self.strength.to_string(),
            s if self.positive => format!("{s} positive"),
            s => format!("{s} negative"),
        }
    }
}

/// One annotated report reduced to the numbers being correlated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub commit_date: i64,
    pub bug_introducing_commits: u64,
    pub counts: DataClumpCounts,
}

impl DataPoint {
    /// `None` for reports without a fault annotation or without the
    /// metadata needed to place them in time.
    pub fn from_document(doc: &ReportDocument) -> Option<Self> {
        let bug_introducing_commits = doc.bug_introducing_commits()?;
        let commit_date = match doc.commit_date() {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "annotated report has no usable date; skipped");
                return None;
            }
        };
        Some(Self {
            commit_date,
            bug_introducing_commits,
            counts: doc.counts(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectCorrelation {
    pub project: String,
    pub points: usize,
    pub total: Option<Correlation>,
    pub fields_to_fields: Option<Correlation>,
    pub parameters_to_parameters: Option<Correlation>,
    pub parameters_to_fields: Option<Correlation>,
}

impl ProjectCorrelation {
    /// Correlate the fault counts of `points` against each clump metric.
    pub fn compute(project: &str, points: &mut [DataPoint]) -> Self {
        points.sort_by_key(|p| p.commit_date);
        let bics: Vec<f64> = points.iter().map(|p| p.bug_introducing_commits as f64).collect();
        let metric = |f: fn(&DataClumpCounts) -> u64| -> Option<Correlation> {
            let values: Vec<f64> = points.iter().map(|p| f(&p.counts) as f64).collect();
            Correlation::between(&bics, &values)
        };
        Self {
            project: project.to_string(),
            points: points.len(),
            total: metric(|c| c.total()),
            fields_to_fields: metric(|c| c.fields_to_fields),
            parameters_to_parameters: metric(|c| c.parameters_to_parameters),
            parameters_to_fields: metric(|c| c.parameters_to_fields),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CorrelationRun {
    pub projects: Vec<ProjectCorrelation>,
    /// All projects pooled, total clump count only.
    pub global_total: Option<Correlation>,
    pub unannotated_reports: usize,
}

/// Correlate annotated reports per project. Reports without an annotation
/// are counted, not used.
pub fn correlate_documents(docs: &[ReportDocument]) -> CorrelationRun {
    let mut groups: BTreeMap<String, Vec<DataPoint>> = BTreeMap::new();
    let mut unannotated = 0;
    for doc in docs {
        let Some(project) = doc.project_name() else {
            debug!(path = %doc.path().display(), "report without project name; skipped");
            continue;
        };
        match DataPoint::from_document(doc) {
            Some(point) => groups.entry(project.to_string()).or_default().push(point),
            None => unannotated += 1,
        }
    }

    let all: Vec<DataPoint> = groups.values().flatten().copied().collect();
    let global_total = Correlation::between(
        &all.iter().map(|p| p.bug_introducing_commits as f64).collect::<Vec<_>>(),
        &all.iter().map(|p| p.counts.total() as f64).collect::<Vec<_>>(),
    );

    CorrelationRun {
        projects: groups
            .iter_mut()
            .map(|(project, points)| ProjectCorrelation::compute(project, points))
            .collect(),
        global_total,
        unannotated_reports: unannotated,
    }
}

pub fn run(folder: &Path, _config: &Config, json: bool) -> Result<()> {
    let docs = ReportStore.load_all(folder)?;
    let run = correlate_documents(&docs);
    if json {
        report::print_json(&run)
    } else {
        report::print_report(&run);
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
