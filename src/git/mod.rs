//! Read-only access to repository history.
//!
//! Two backends implement [`History`]: an in-process libgit2 one (default)
//! and one that drives the `git` binary and parses its textual output with
//! the parsers in [`log`], [`patch`] and [`blame`]. Neither ever touches the
//! working tree.

pub mod blame;
mod cli;
mod libgit;
pub mod log;
pub mod patch;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{Backend, Config};
use crate::error::Result;

pub use blame::{BlameLine, BlameMap};
pub use cli::GitCliHistory;
pub use libgit::Git2History;

/// One commit as read from history. Identity is the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub timestamp: i64,
    /// First line of the commit message.
    pub message: String,
    pub parents: Vec<String>,
}

impl Commit {
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Full 40-digit hexadecimal object name.
pub fn is_commit_hash(s: &str) -> bool {
    s.len() == 40 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// The history operations the mining engine needs.
///
/// Implementations must be shareable across worker threads; every call is
/// independent and read-only.
pub trait History: Sync {
    /// Every commit reachable from any ref. An empty repository yields an
    /// empty list.
    fn commits(&self) -> Result<Vec<Commit>>;

    /// Zero-context unified diff of `commit` against its first parent.
    fn patch(&self, commit: &Commit) -> Result<String>;

    /// Full-file blame of `path` at revision `rev`, keyed by line number.
    fn blame(&self, rev: &str, path: &str) -> Result<BlameMap>;
}

/// Open the backend selected by `config` for the repository at `path`.
pub fn open(path: &Path, config: &Config) -> Result<Box<dyn History>> {
    match config.backend {
        Backend::Libgit2 => Ok(Box::new(Git2History::open(path)?)),
        Backend::Cli => Ok(Box::new(GitCliHistory::open(
            path,
            &config.git_binary,
            config.git_timeout(),
        )?)),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
