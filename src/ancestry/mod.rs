//! In-memory commit graph and ancestor sets.
//!
//! The graph is built once from the commit list the history backend already
//! produced, so ancestry queries never spawn anything. Ancestor sets are
//! computed for an explicit list of commits of interest, in parallel, and
//! are read-only afterwards.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::git::{self, Commit};
use crate::report_helpers;

/// Hash → every hash reachable through parent edges, excluding itself.
/// A hash missing from the map has unknown ancestry.
pub type AncestorMap = HashMap<String, HashSet<String>>;

/// Shortest abbreviated hash accepted, as with `git rev-parse`.
const MIN_PREFIX: usize = 4;

/// Adjacency list keyed by commit hash, plus the reverse (child) index.
pub struct CommitGraph {
    parents: HashMap<String, Vec<String>>,
    children: HashMap<String, Vec<String>>,
}

impl CommitGraph {
    pub fn new(commits: &[Commit]) -> Self {
        let mut parents = HashMap::with_capacity(commits.len());
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for c in commits {
            for p in &c.parents {
                children.entry(p.clone()).or_default().push(c.hash.clone());
            }
            parents.insert(c.hash.clone(), c.parents.clone());
        }
        Self { parents, children }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.parents.contains_key(hash)
    }

    /// Transitive parents of `hash`, or `None` if the commit is not in the graph.
    ///
    /// Parents that are referenced but absent (shallow history) are included
    /// and not walked further.
    pub fn ancestors(&self, hash: &str) -> Option<HashSet<String>> {
        let start = self.parents.get(self.resolve(hash)?)?;
        Some(closure(start, &self.parents))
    }

    /// Transitive children of `hash`, or `None` if the commit is not in the graph.
    pub fn descendants(&self, hash: &str) -> Option<HashSet<String>> {
        let full = self.resolve(hash)?;
        let start = self.children.get(full).map(Vec::as_slice).unwrap_or_default();
        Some(closure(start, &self.children))
    }

    /// Full hash for `hash`, which may be abbreviated. A prefix resolves
    /// only when exactly one commit in the graph starts with it.
    pub fn resolve<'a>(&'a self, hash: &'a str) -> Option<&'a str> {
        if self.parents.contains_key(hash) {
            return Some(hash);
        }
        if hash.len() < MIN_PREFIX || hash.len() >= 40 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut matches = self.parents.keys().filter(|k| k.starts_with(hash));
        match (matches.next(), matches.next()) {
            (Some(full), None) => Some(full.as_str()),
            _ => None,
        }
    }

    /// Ancestor sets for every hash in `targets`, keyed as given. Unknown
    /// or ambiguous hashes are logged and left out of the result.
    pub fn ancestor_map(&self, targets: &[String]) -> AncestorMap {
        targets
            .par_iter()
            .filter_map(|hash| match self.ancestors(hash) {
                Some(set) => Some((hash.clone(), set)),
                None if hash.len() < 40 => {
                    warn!(commit = %hash, "abbreviated hash is unknown or ambiguous; ancestry unknown");
                    None
                }
                None => {
                    warn!(commit = %hash, "commit not found in history; ancestry unknown");
                    None
                }
            })
            .collect()
    }
}

/// Read the history of `repo` into a [`CommitGraph`].
pub fn commit_graph(repo: &Path, config: &Config) -> Result<CommitGraph> {
    let history = git::open(repo, config)?;
    let graph = CommitGraph::new(&history.commits()?);
    info!(commits = graph.len(), "commit graph built");
    Ok(graph)
}

/// Ancestor sets of `hashes` in the history of `repo`. Hashes may be
/// abbreviated; a missing key means unknown ancestry, not no ancestors.
pub fn ancestor_map(repo: &Path, config: &Config, hashes: &[String]) -> Result<AncestorMap> {
    let targets: Vec<String> = hashes.iter().map(|h| h.to_ascii_lowercase()).collect();
    Ok(commit_graph(repo, config)?.ancestor_map(&targets))
}

fn closure(start: &[String], edges: &HashMap<String, Vec<String>>) -> HashSet<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut stack: Vec<&str> = start.iter().map(String::as_str).collect();
    while let Some(next) = stack.pop() {
        if !seen.insert(next.to_string()) {
            continue;
        }
        if let Some(more) = edges.get(next) {
            stack.extend(more.iter().map(String::as_str));
        }
    }
    seen
}

#[derive(Serialize)]
struct AncestryEntry {
    commit: String,
    known: bool,
    ancestors: Option<usize>,
    descendants: Option<usize>,
}

pub fn run(repo: &Path, config: &Config, hashes: &[String], json: bool) -> Result<()> {
    // The graph is kept for the descendant counts.
    let graph = commit_graph(repo, config)?;
    let targets: Vec<String> = hashes.iter().map(|h| h.to_ascii_lowercase()).collect();
    let pool = config.thread_pool()?;
    let map = pool.install(|| graph.ancestor_map(&targets));

    let entries: Vec<AncestryEntry> = targets
        .iter()
        .map(|h| AncestryEntry {
            commit: h.clone(),
            known: map.contains_key(h),
            ancestors: map.get(h).map(HashSet::len),
            descendants: graph.descendants(h).map(|d| d.len()),
        })
        .collect();

    if json {
        return report_helpers::print_json_stdout(&entries);
    }

    let separator = report_helpers::separator(66);
    println!("{separator}");
    println!(" {:<42} {:>10} {:>11}", "Commit", "Ancestors", "Descendants");
    println!("{separator}");
    for e in &entries {
        match (e.ancestors, e.descendants) {
            (Some(a), Some(d)) => println!(" {:<42} {a:>10} {d:>11}", e.commit),
            _ => println!(" {:<42} {:>10} {:>11}", e.commit, "unknown", "unknown"),
        }
    }
    println!("{separator}");
    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
