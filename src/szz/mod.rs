//! SZZ attribution: trace the lines removed by bug-fix commits back to the
//! commits that last touched them.
//!
//! Bug-fix commits are found by keyword match on the commit subject. Each one
//! is diffed against its first parent, the parent revision of every touched
//! file is blamed once, and every removed line is attributed to the commit
//! the blame names. Fixes are attributed in parallel; the per-fix lists are
//! concatenated in discovery order and deduplicated once afterwards, so the
//! result does not depend on scheduling.

pub mod report;

use std::collections::HashSet;
use std::path::Path;

use clap::ValueEnum;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::error::{MiningError, Result};
use crate::git::patch::{FileRemovals, parse_patch};
use crate::git::{self, Commit, History};

pub const DEFAULT_KEYWORDS: &[&str] = &[
    "fix", "fixed", "fixes", "bug", "bugs", "issue", "issues", "error", "errors", "defect",
    "defects", "mistake", "mistakes", "fault", "faults", "resolve", "resolved", "resolves",
    "repair", "repaired", "patch", "patched", "correct", "corrected", "problem", "problems",
    "crash", "fail", "fails", "failure", "failing",
];

pub fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

/// Case-sensitive substring match of any keyword.
pub fn is_bug_fix<S: AsRef<str>>(message: &str, keywords: &[S]) -> bool {
    keywords.iter().any(|k| message.contains(k.as_ref()))
}

/// How commits with more than one parent are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Diff against the first listed parent only.
    #[default]
    FirstParent,
    /// Leave merges out of attribution entirely.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SzzAttribution {
    pub bug_fix_commit: String,
    pub bug_fix_timestamp: i64,
    pub bug_fix_message: String,
    pub bug_introducing_commit: String,
    pub bug_introducing_timestamp: i64,
    pub file_path: String,
    pub blamed_line: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SzzSummary {
    pub commits_scanned: usize,
    pub bug_fix_commits: usize,
    pub skipped_roots: usize,
    pub skipped_merges: usize,
    pub failed_diffs: usize,
    pub failed_blames: usize,
    pub duplicates_dropped: usize,
    pub attributions: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SzzOutcome {
    pub attributions: Vec<SzzAttribution>,
    pub summary: SzzSummary,
}

/// What attributing one bug-fix commit produced.
#[derive(Default)]
struct FixOutcome {
    attributions: Vec<SzzAttribution>,
    skipped_root: bool,
    skipped_merge: bool,
    failed_diff: bool,
    failed_blames: usize,
    timeout: Option<MiningError>,
}

/// Attribute every bug-fix commit in `commits`.
///
/// Recoverable failures cost one file or one fix and are tallied in the
/// summary. A timeout trips `cancel`, stops the remaining fixes and is
/// returned as the error; an already-tripped token yields
/// [`MiningError::Cancelled`].
pub fn attribute(
    history: &dyn History,
    commits: &[Commit],
    keywords: &[String],
    policy: MergePolicy,
    cancel: &CancelToken,
) -> Result<SzzOutcome> {
    let fixes: Vec<&Commit> = commits
        .iter()
        .filter(|c| is_bug_fix(&c.message, keywords))
        .collect();
    info!(
        commits = commits.len(),
        bug_fixes = fixes.len(),
        "identified bug-fix commits"
    );

    let mut outcomes: Vec<FixOutcome> = fixes
        .par_iter()
        .map(|fix| attribute_fix(history, fix, policy, cancel))
        .collect();

    if let Some(err) = outcomes.iter_mut().find_map(|o| o.timeout.take()) {
        return Err(err);
    }
    if cancel.is_cancelled() {
        return Err(MiningError::Cancelled("szz attribution".into()));
    }

    let mut summary = SzzSummary {
        commits_scanned: commits.len(),
        bug_fix_commits: fixes.len(),
        ..SzzSummary::default()
    };
    let mut merged = Vec::new();
    for outcome in outcomes {
        summary.skipped_roots += usize::from(outcome.skipped_root);
        summary.skipped_merges += usize::from(outcome.skipped_merge);
        summary.failed_diffs += usize::from(outcome.failed_diff);
        summary.failed_blames += outcome.failed_blames;
        merged.extend(outcome.attributions);
    }

    let before = merged.len();
    let attributions = dedup_first(merged);
    summary.duplicates_dropped = before - attributions.len();
    summary.attributions = attributions.len();

    info!(
        attributions = summary.attributions,
        duplicates = summary.duplicates_dropped,
        "szz attribution finished"
    );
    Ok(SzzOutcome {
        attributions,
        summary,
    })
}

/// Keep the first occurrence of every (introducing commit, file, line) triple.
fn dedup_first(attributions: Vec<SzzAttribution>) -> Vec<SzzAttribution> {
    let mut seen = HashSet::new();
    attributions
        .into_iter()
        .filter(|a| {
            seen.insert((
                a.bug_introducing_commit.clone(),
                a.file_path.clone(),
                a.blamed_line.clone(),
            ))
        })
        .collect()
}

fn attribute_fix(
    history: &dyn History,
    fix: &Commit,
    policy: MergePolicy,
    cancel: &CancelToken,
) -> FixOutcome {
    let mut outcome = FixOutcome::default();
    if cancel.is_cancelled() {
        return outcome;
    }

    let Some(parent) = fix.first_parent() else {
        debug!(commit = %fix.hash, "root commit has no parent; skipped");
        outcome.skipped_root = true;
        return outcome;
    };
    if fix.is_merge() && policy == MergePolicy::Skip {
        debug!(commit = %fix.hash, "merge commit skipped");
        outcome.skipped_merge = true;
        return outcome;
    }

    let files = match history.patch(fix).and_then(|p| parse_patch(&p)) {
        Ok(files) => files,
        Err(e) => {
            if matches!(e, MiningError::Timeout { .. }) {
                cancel.cancel();
                outcome.timeout = Some(e);
            } else {
                warn!(commit = %fix.hash, error = %e, "diff failed; commit skipped");
                outcome.failed_diff = true;
            }
            return outcome;
        }
    };

    let per_file: Vec<Result<Vec<SzzAttribution>>> = files
        .par_iter()
        .map(|file| attribute_file(history, fix, parent, file, cancel))
        .collect();

    for result in per_file {
        match result {
            Ok(found) => outcome.attributions.extend(found),
            Err(e @ MiningError::Timeout { .. }) => {
                cancel.cancel();
                outcome.timeout.get_or_insert(e);
            }
            Err(MiningError::Cancelled(_)) => {}
            Err(_) => outcome.failed_blames += 1,
        }
    }
    outcome
}

fn attribute_file(
    history: &dyn History,
    fix: &Commit,
    parent: &str,
    file: &FileRemovals,
    cancel: &CancelToken,
) -> Result<Vec<SzzAttribution>> {
    if cancel.is_cancelled() {
        return Err(MiningError::Cancelled(fix.hash.clone()));
    }

    let blame = history.blame(parent, &file.path).inspect_err(|e| {
        if !matches!(e, MiningError::Timeout { .. }) {
            warn!(commit = %fix.hash, file = %file.path, error = %e, "blame failed; file skipped");
        }
    })?;

    let found = file
        .removed
        .iter()
        .filter_map(|removed| blame.get(&removed.line))
        .filter(|blamed| blamed.commit != fix.hash)
        .map(|blamed| SzzAttribution {
            bug_fix_commit: fix.hash.clone(),
            bug_fix_timestamp: fix.timestamp,
            bug_fix_message: fix.message.clone(),
            bug_introducing_commit: blamed.commit.clone(),
            bug_introducing_timestamp: blamed.timestamp,
            file_path: file.path.clone(),
            blamed_line: blamed.content.clone(),
        })
        .collect();
    Ok(found)
}

/// Attribute the whole history of the repository at `repo`.
pub fn mine(repo: &Path, config: &Config, cancel: &CancelToken) -> Result<SzzOutcome> {
    let history = git::open(repo, config)?;
    let commits = history.commits()?;
    attribute(
        history.as_ref(),
        &commits,
        &config.bug_fix_keywords,
        config.merge_policy,
        cancel,
    )
}

pub fn run(repo: &Path, config: &Config, json: bool) -> Result<()> {
    let pool = config.thread_pool()?;
    let outcome = pool.install(|| mine(repo, config, &CancelToken::new()))?;
    if json {
        report::print_json(&outcome)
    } else {
        report::print_report(&outcome);
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
