//! Fault correlation: how many faults had been introduced by the time each
//! reported commit was made.
//!
//! For a report at commit `C` the count is the number of SZZ attributions
//! whose introducing commit is a proper ancestor of `C`. The count is a pure
//! function of the attributions and the commit graph, so re-running yields
//! the same annotation.

mod report;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::ancestry;
use crate::cancel::CancelToken;
use crate::config::Config;
use crate::error::{MiningError, Result};
use crate::git;
use crate::report::{ReportDocument, ReportStore};
use crate::szz::{self, SzzAttribution, SzzSummary};

/// Number of attributions per bug-introducing commit.
pub fn faults_per_commit(attributions: &[SzzAttribution]) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for a in attributions {
        *counts.entry(a.bug_introducing_commit.clone()).or_default() += 1;
    }
    counts
}

/// Faults introduced strictly before `commit`: the attribution counts of
/// every introducing commit found in `ancestors`, excluding `commit` itself.
pub fn count_faults_until(
    commit: &str,
    ancestors: &HashSet<String>,
    per_commit: &HashMap<String, u64>,
) -> u64 {
    per_commit
        .iter()
        .filter(|(bic, _)| bic.as_str() != commit && ancestors.contains(bic.as_str()))
        .map(|(_, n)| n)
        .sum()
}

/// Where the repository of each project lives.
#[derive(Debug, Clone)]
pub enum RepoSource {
    /// One repository for every project found.
    Single(PathBuf),
    /// `<root>/<project_name>` per project.
    PerProject(PathBuf),
}

impl RepoSource {
    pub fn resolve(&self, project: &str) -> PathBuf {
        match self {
            Self::Single(path) => path.clone(),
            Self::PerProject(root) => root.join(project),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FaultRunSummary {
    pub project: String,
    pub repository: String,
    pub reports: usize,
    pub annotated: usize,
    pub already_annotated: usize,
    /// Reports whose commit is not in the repository history.
    pub missing_ancestry: usize,
    /// Reports that could not be written back.
    pub skipped: usize,
    pub szz: Option<SzzSummary>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FaultRun {
    pub projects: Vec<FaultRunSummary>,
    /// Reports without a project name or commit hash.
    pub unusable_reports: usize,
}

/// Annotate the reports of one project against its repository.
///
/// Already annotated reports are left alone unless `force` is set.
pub fn annotate_project(
    project: &str,
    docs: Vec<ReportDocument>,
    repo: &Path,
    config: &Config,
    force: bool,
    cancel: &CancelToken,
) -> Result<FaultRunSummary> {
    let mut summary = FaultRunSummary {
        project: project.to_string(),
        repository: repo.display().to_string(),
        reports: docs.len(),
        ..FaultRunSummary::default()
    };

    let (done, pending): (Vec<_>, Vec<_>) =
        docs.into_iter().partition(|d| d.is_annotated() && !force);
    summary.already_annotated = done.len();
    if pending.is_empty() {
        info!(project, "all reports already annotated");
        return Ok(summary);
    }

    let history = git::open(repo, config)?;
    let commits = history.commits()?;
    let outcome = szz::attribute(
        history.as_ref(),
        &commits,
        &config.bug_fix_keywords,
        config.merge_policy,
        cancel,
    )?;
    let per_commit = faults_per_commit(&outcome.attributions);
    summary.szz = Some(outcome.summary);

    let targets: Vec<String> = pending
        .iter()
        .filter_map(|d| d.commit_hash())
        .map(str::to_string)
        .collect();
    let ancestors = ancestry::ancestor_map(repo, config, &targets)?;

    let store = ReportStore;
    for mut doc in pending {
        if cancel.is_cancelled() {
            return Err(MiningError::Cancelled(project.to_string()));
        }
        let Some(hash) = doc.commit_hash().map(str::to_ascii_lowercase) else {
            summary.missing_ancestry += 1;
            continue;
        };
        let Some(set) = ancestors.get(&hash) else {
            warn!(project, commit = %hash, path = %doc.path().display(), "no ancestry for report commit; not annotated");
            summary.missing_ancestry += 1;
            continue;
        };

        let count = count_faults_until(&hash, set, &per_commit);
        let written = doc
            .set_bug_introducing_commits(count)
            .and_then(|()| store.save(&doc));
        match written {
            Ok(()) => summary.annotated += 1,
            Err(e) => {
                warn!(project, path = %doc.path().display(), error = %e, "report not written");
                summary.skipped += 1;
            }
        }
    }

    info!(
        project,
        annotated = summary.annotated,
        missing_ancestry = summary.missing_ancestry,
        "fault correlation finished"
    );
    Ok(summary)
}

/// Group reports by project name. Reports without a name or commit hash are
/// counted and dropped.
pub fn group_by_project(docs: Vec<ReportDocument>) -> (BTreeMap<String, Vec<ReportDocument>>, usize) {
    let mut groups: BTreeMap<String, Vec<ReportDocument>> = BTreeMap::new();
    let mut unusable = 0;
    for doc in docs {
        let name = doc.project_name().map(str::to_string);
        let has_hash = doc.commit_hash().is_some();
        match (name, has_hash) {
            (Some(name), true) => groups.entry(name).or_default().push(doc),
            (None, _) => {
                warn!(path = %doc.path().display(), "report has no project_info.project_name; skipped");
                unusable += 1;
            }
            (Some(_), false) => {
                warn!(path = %doc.path().display(), "report has no project_info.project_commit_hash; skipped");
                unusable += 1;
            }
        }
    }
    (groups, unusable)
}

/// Annotate every report under `folder`, one project per worker.
///
/// A failure in one project is recorded in its summary and never stops the
/// others; each project gets its own cancellation token.
pub fn annotate_all(folder: &Path, source: &RepoSource, config: &Config, force: bool) -> Result<FaultRun> {
    let docs = ReportStore.load_all(folder)?;
    let (groups, unusable_reports) = group_by_project(docs);
    info!(projects = groups.len(), "annotating reports");

    let pool = config.thread_pool()?;
    let projects = pool.install(|| {
        groups
            .into_par_iter()
            .map(|(project, docs)| {
                let repo = source.resolve(&project);
                let cancel = CancelToken::new();
                let reports = docs.len();
                annotate_project(&project, docs, &repo, config, force, &cancel).unwrap_or_else(|e| {
                    warn!(project = %project, error = %e, "project not processed");
                    FaultRunSummary {
                        project: project.clone(),
                        repository: repo.display().to_string(),
                        reports,
                        error: Some(e.to_string()),
                        ..FaultRunSummary::default()
                    }
                })
            })
            .collect()
    });

    Ok(FaultRun {
        projects,
        unusable_reports,
    })
}

pub fn run(folder: &Path, source: &RepoSource, config: &Config, force: bool, json: bool) -> Result<()> {
    let run = annotate_all(folder, source, config, force)?;
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
