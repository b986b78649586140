//! Fixture repositories for tests.

use std::fs;
use std::path::Path;

use git2::{Oid, Repository};

pub fn create_test_repo() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo_at(dir.path());
    (dir, repo)
}

pub fn init_repo_at(path: &Path) -> Repository {
    let repo = Repository::init(path).unwrap();

    // Configure identity for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@test.com").unwrap();

    repo
}

/// Write `files`, stage them and commit on top of HEAD at `epoch`.
pub fn make_commit_at(repo: &Repository, files: &[(&str, &str)], message: &str, epoch: i64) -> Oid {
    let sig = git2::Signature::new("Test", "test@test.com", &git2::Time::new(epoch, 0)).unwrap();
    let mut index = repo.index().unwrap();

    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }

    index.write().unwrap();
    let tree_oid = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

pub fn make_commit(repo: &Repository, files: &[(&str, &str)], message: &str) -> Oid {
    make_commit_at(repo, files, message, 1_700_000_000)
}

/// Commit the first parent's tree with several parents and advance HEAD.
/// `parents[0]` must be the current HEAD commit.
pub fn make_merge(repo: &Repository, parents: &[Oid], message: &str, epoch: i64) -> Oid {
    let sig = git2::Signature::new("Test", "test@test.com", &git2::Time::new(epoch, 0)).unwrap();
    let first = repo.find_commit(parents[0]).unwrap();
    let tree = first.tree().unwrap();
    let commits: Vec<git2::Commit> = parents
        .iter()
        .map(|p| repo.find_commit(*p).unwrap())
        .collect();
    let refs: Vec<&git2::Commit> = commits.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &refs)
        .unwrap()
}

/// Create a commit on top of `parent` without moving HEAD. Paths must be
/// top-level file names.
pub fn make_side_commit(
    repo: &Repository,
    parent: Oid,
    files: &[(&str, &str)],
    message: &str,
    epoch: i64,
) -> Oid {
    let sig = git2::Signature::new("Test", "test@test.com", &git2::Time::new(epoch, 0)).unwrap();
    let parent = repo.find_commit(parent).unwrap();
    let mut builder = repo.treebuilder(Some(&parent.tree().unwrap())).unwrap();
    for (path, content) in files {
        let blob = repo.blob(content.as_bytes()).unwrap();
        builder.insert(path, blob, 0o100644).unwrap();
    }
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();
    repo.commit(None, &sig, &sig, message, &tree, &[&parent])
        .unwrap()
}

/// Minimal detector report with one empty smell per key.
pub fn report_json(project: &str, hash: &str, date: serde_json::Value, keys: &[&str]) -> serde_json::Value {
    let clumps: serde_json::Map<String, serde_json::Value> = keys
        .iter()
        .map(|k| (k.to_string(), serde_json::json!({ "key": k })))
        .collect();
    serde_json::json!({
        "report_version": "0.1",
        "project_info": {
            "project_name": project,
            "project_url": format!("https://example.org/{project}.git"),
            "project_commit_hash": hash,
            "project_tag": null,
            "project_commit_date": date,
        },
        "report_summary": {
            "fields_to_fields_data_clump": keys.len(),
            "parameters_to_parameters_data_clump": 0,
            "parameters_to_fields_data_clump": 0,
        },
        "data_clumps": clumps,
    })
}

pub fn write_report(dir: &Path, name: &str, value: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}
