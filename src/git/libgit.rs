use std::collections::HashMap;
use std::path::{Path, PathBuf};

use git2::{BlameOptions, DiffFormat, DiffOptions, Oid, Repository, Sort};
use tracing::{debug, warn};

use super::{BlameLine, BlameMap, Commit, History};
use crate::error::{MiningError, Result};

/// libgit2-backed history.
///
/// `git2::Repository` is not `Sync`, so each call opens its own handle from
/// the stored path; that keeps calls independent across worker threads.
pub struct Git2History {
    root: PathBuf,
}

impl Git2History {
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        let root = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        Ok(Self { root })
    }

    fn repo(&self) -> Result<Repository> {
        Ok(Repository::open(&self.root)?)
    }
}

impl History for Git2History {
    fn commits(&self) -> Result<Vec<Commit>> {
        let repo = self.repo()?;
        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        // Every ref plus a detached HEAD; an empty repository pushes nothing.
        revwalk.push_glob("*")?;
        if repo.head().is_ok() {
            revwalk.push_head()?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = match oid {
                Ok(oid) => oid,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable revwalk entry");
                    continue;
                }
            };
            let commit = match repo.find_commit(oid) {
                Ok(c) => c,
                Err(err) => {
                    warn!(commit = %oid, error = %err, "skipping unreadable commit");
                    continue;
                }
            };
            commits.push(Commit {
                hash: oid.to_string(),
                timestamp: commit.time().seconds(),
                message: commit.summary().unwrap_or_default().to_string(),
                parents: commit.parent_ids().map(|p| p.to_string()).collect(),
            });
        }
        Ok(commits)
    }

    fn patch(&self, commit: &Commit) -> Result<String> {
        let repo = self.repo()?;
        let fix = repo.find_commit(Oid::from_str(&commit.hash)?)?;
        let parent_tree = match commit.first_parent() {
            Some(p) => Some(repo.find_commit(Oid::from_str(p)?)?.tree()?),
            None => None,
        };

        let mut opts = DiffOptions::new();
        opts.context_lines(0);
        let mut diff =
            repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&fix.tree()?), Some(&mut opts))?;
        // Renames keep their old path on the `---` side, which is what gets blamed.
        diff.find_similar(None)?;

        let mut out = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            let content = String::from_utf8_lossy(line.content());
            match line.origin() {
                origin @ ('+' | '-' | ' ') => {
                    out.push(origin);
                    out.push_str(&content);
                }
                // End-of-file newline markers carry no line of their own.
                '=' | '>' | '<' => return true,
                _ => out.push_str(&content),
            }
            if !out.ends_with('\n') {
                out.push('\n');
            }
            true
        })?;
        Ok(out)
    }

    fn blame(&self, rev: &str, path: &str) -> Result<BlameMap> {
        let repo = self.repo()?;
        let rev_oid = Oid::from_str(rev)?;
        let tree = repo.find_commit(rev_oid)?.tree()?;
        let blob = tree
            .get_path(Path::new(path))?
            .to_object(&repo)?
            .peel_to_blob()?;
        if blob.is_binary() {
            return Err(MiningError::external(
                format!("{path}@{rev}"),
                "binary file cannot be blamed",
            ));
        }

        let mut opts = BlameOptions::new();
        opts.newest_commit(rev_oid);
        let blame = repo.blame_file(Path::new(path), Some(&mut opts))?;

        let content = String::from_utf8_lossy(blob.content());
        let mut times: HashMap<Oid, i64> = HashMap::new();
        let mut map = BlameMap::new();

        for (idx, text) in content.lines().enumerate() {
            let line_no = idx + 1;
            let Some(hunk) = blame.get_line(line_no) else {
                debug!(path, line = line_no, "no blame hunk for line");
                continue;
            };
            let oid = hunk.final_commit_id();
            let timestamp = *times.entry(oid).or_insert_with(|| {
                repo.find_commit(oid)
                    .map(|c| c.time().seconds())
                    .unwrap_or(0)
            });
            map.insert(
                line_no,
                BlameLine {
                    commit: oid.to_string(),
                    timestamp,
                    content: text.to_string(),
                },
            );
        }

        Ok(map)
    }
}

#[cfg(test)]
#[path = "libgit_test.rs"]
mod tests;
