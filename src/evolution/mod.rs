//! Temporal evolution of data clumps across a project's snapshot history.
//!
//! Every smell key seen in any snapshot is placed in exactly one category,
//! decided by whether it is present in the oldest snapshot, in the newest
//! one, and in all of them:
//!
//! | first | last | all | category |
//! |-------|------|-----|----------|
//! | yes   | yes  | yes | A        |
//! | yes   | yes  | no  | E        |
//! | no    | yes  |     | B        |
//! | yes   | no   |     | C        |
//! | no    | no   |     | D        |

mod report;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{MiningError, Result};
use crate::report::{ReportStore, SmellKeyStrategy, Snapshot, SnapshotHistory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EvolutionCategory {
    /// Present at every examined point.
    A,
    /// Appeared after the start and survives to the end.
    B,
    /// Present at the start, gone by the end.
    C,
    /// Appears and disappears strictly between start and end.
    D,
    /// Present at both ends but missing somewhere in between.
    E,
}

impl EvolutionCategory {
    pub const ALL: [Self; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    pub fn decide(in_first: bool, in_last: bool, found_in_all: bool) -> Self {
        match (in_first, in_last) {
            (true, true) if found_in_all => Self::A,
            (true, true) => Self::E,
            (false, true) => Self::B,
            (true, false) => Self::C,
            (false, false) => Self::D,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::A => "from start till end",
            Self::B => "after start, till end",
            Self::C => "from start, not till end",
            Self::D => "after start, before end",
            Self::E => "start and end, missing in between",
        }
    }
}

impl fmt::Display for EvolutionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        };
        f.write_str(letter)
    }
}

/// Keys per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvolutionClassification {
    pub a: BTreeSet<String>,
    pub b: BTreeSet<String>,
    pub c: BTreeSet<String>,
    pub d: BTreeSet<String>,
    pub e: BTreeSet<String>,
    pub total_keys: usize,
}

impl EvolutionClassification {
    pub fn keys(&self, category: EvolutionCategory) -> &BTreeSet<String> {
        match category {
            EvolutionCategory::A => &self.a,
            EvolutionCategory::B => &self.b,
            EvolutionCategory::C => &self.c,
            EvolutionCategory::D => &self.d,
            EvolutionCategory::E => &self.e,
        }
    }

    pub fn category_of(&self, key: &str) -> Option<EvolutionCategory> {
        EvolutionCategory::ALL
            .into_iter()
            .find(|c| self.keys(*c).contains(key))
    }

    pub fn distribution(&self) -> HistoryDistribution {
        let pct = |n: usize| {
            if self.total_keys == 0 {
                0.0
            } else {
                round2(n as f64 / self.total_keys as f64 * 100.0)
            }
        };
        HistoryDistribution {
            a: pct(self.a.len()),
            b: pct(self.b.len()),
            c: pct(self.c.len()),
            d: pct(self.d.len()),
            e: pct(self.e.len()),
            total_keys: self.total_keys,
        }
    }
}

/// Percentage of keys per category, two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HistoryDistribution {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub total_keys: usize,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Classify every key of `history`.
///
/// The categories are built with set algebra over the first, last and
/// always-present key sets, then checked against the per-key decision table.
/// Any disagreement is a [`MiningError::Consistency`].
pub fn classify(history: &SnapshotHistory) -> Result<EvolutionClassification> {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return Ok(EvolutionClassification::default());
    };
    let snapshots = history.snapshots();

    let universe: BTreeSet<String> = snapshots.iter().flat_map(|s| s.keys.iter().cloned()).collect();
    let in_all: BTreeSet<String> = snapshots
        .iter()
        .skip(1)
        .fold(first.keys.clone(), |acc, s| &acc & &s.keys);
    let at_both_ends = &first.keys & &last.keys;
    let at_either_end = &first.keys | &last.keys;

    let out = EvolutionClassification {
        e: &at_both_ends - &in_all,
        a: in_all,
        b: &last.keys - &first.keys,
        c: &first.keys - &last.keys,
        d: &universe - &at_either_end,
        total_keys: universe.len(),
    };
    check_partition(&out, history)?;
    Ok(out)
}

fn check_partition(out: &EvolutionClassification, history: &SnapshotHistory) -> Result<()> {
    let classified = out.a.len() + out.b.len() + out.c.len() + out.d.len() + out.e.len();
    let fail = || MiningError::Consistency {
        classified,
        total: out.total_keys,
    };
    if classified != out.total_keys {
        return Err(fail());
    }

    let snapshots = history.snapshots();
    let (Some(first), Some(last)) = (snapshots.first(), snapshots.last()) else {
        return Ok(());
    };
    for category in EvolutionCategory::ALL {
        for key in out.keys(category) {
            let expected = EvolutionCategory::decide(
                first.keys.contains(key),
                last.keys.contains(key),
                snapshots.iter().all(|s| s.keys.contains(key)),
            );
            if expected != category {
                return Err(fail());
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectEvolution {
    pub project: String,
    pub snapshots: usize,
    /// Reports dropped for missing metadata.
    pub excluded: usize,
    pub distribution: HistoryDistribution,
    pub classification: EvolutionClassification,
}

/// Classify the reports of one project folder. The project takes its name
/// from the oldest report, falling back to the folder name.
pub fn classify_folder(folder: &Path, strategy: SmellKeyStrategy) -> Result<ProjectEvolution> {
    let docs = ReportStore.load_all(folder)?;
    let mut snapshots = Vec::with_capacity(docs.len());
    let mut excluded = 0;
    for doc in &docs {
        match Snapshot::from_document(doc, strategy) {
            Ok(s) => snapshots.push(s),
            Err(e) => {
                warn!(path = %doc.path().display(), error = %e, "report excluded from classification");
                excluded += 1;
            }
        }
    }

    let history = SnapshotHistory::new(snapshots);
    let project = history
        .first()
        .map(|s| s.project_name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| folder_name(folder));
    let classification = classify(&history)?;
    info!(
        project = %project,
        snapshots = history.len(),
        keys = classification.total_keys,
        "project classified"
    );

    Ok(ProjectEvolution {
        project,
        snapshots: history.len(),
        excluded,
        distribution: classification.distribution(),
        classification,
    })
}

fn folder_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string())
}

/// Immediate sub-directories of `root`, one per project, sorted.
pub fn project_folders(root: &Path) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            folders.push(entry.path());
        } else {
            info!(path = %entry.path().display(), "not a project folder; skipped");
        }
    }
    folders.sort();
    Ok(folders)
}

/// Classify every project folder under `root` in parallel.
///
/// A project that fails to load is skipped with a warning; a partition
/// violation stops the whole run.
pub fn classify_all(root: &Path, config: &Config) -> Result<Vec<ProjectEvolution>> {
    let folders = project_folders(root)?;
    let pool = config.thread_pool()?;
    let results: Vec<Result<ProjectEvolution>> = pool.install(|| {
        folders
            .par_iter()
            .map(|f| classify_folder(f, config.smell_key))
            .collect()
    });

    let mut projects = Vec::with_capacity(results.len());
    for (folder, result) in folders.iter().zip(results) {
        match result {
            Ok(p) => projects.push(p),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => warn!(path = %folder.display(), error = %e, "project skipped"),
        }
    }
    Ok(projects)
}

pub fn run(root: &Path, config: &Config, json: bool) -> Result<()> {
    let projects = classify_all(root, config)?;
    if json {
        report::print_json(&projects)
    } else {
        report::print_report(&projects);
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
