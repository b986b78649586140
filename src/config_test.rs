use std::io::Write;

use super::*;

#[test]
fn defaults() {
    let c = Config::default();
    assert_eq!(c.bug_fix_keywords.len(), 31);
    assert_eq!(c.backend, Backend::Libgit2);
    assert_eq!(c.git_binary, "git");
    assert_eq!(c.git_timeout(), Duration::from_secs(300));
    assert_eq!(c.workers, 0);
    assert_eq!(c.smell_key, SmellKeyStrategy::Report);
    assert_eq!(c.merge_policy, MergePolicy::FirstParent);
}

#[test]
fn empty_file_is_all_defaults() {
    let c = Config::parse("").unwrap();
    assert_eq!(c.bug_fix_keywords, default_keywords());
}

#[test]
fn parses_every_field() {
    let c = Config::parse(
        r#"
bug_fix_keywords = ["fix", "hotfix"]
backend = "cli"
git_binary = "/usr/local/bin/git"
git_timeout_secs = 12
workers = 4
smell_key = "sorted-variables"
merge_policy = "skip"
"#,
    )
    .unwrap();
    assert_eq!(c.bug_fix_keywords, vec!["fix", "hotfix"]);
    assert_eq!(c.backend, Backend::Cli);
    assert_eq!(c.git_binary, "/usr/local/bin/git");
    assert_eq!(c.git_timeout(), Duration::from_secs(12));
    assert_eq!(c.workers, 4);
    assert_eq!(c.smell_key, SmellKeyStrategy::SortedVariables);
    assert_eq!(c.merge_policy, MergePolicy::Skip);
}

#[test]
fn unknown_field_is_rejected() {
    let err = Config::parse("bug_fix_keyword = [\"fix\"]").unwrap_err();
    assert!(matches!(err, MiningError::Config(_)));
}

#[test]
fn empty_keyword_is_rejected() {
    assert!(Config::parse(r#"bug_fix_keywords = ["fix", ""]"#).is_err());
}

#[test]
fn empty_keyword_list_is_allowed() {
    let c = Config::parse("bug_fix_keywords = []").unwrap();
    assert!(c.bug_fix_keywords.is_empty());
}

#[test]
fn zero_timeout_is_rejected() {
    assert!(Config::parse("git_timeout_secs = 0").is_err());
    let c = Config {
        git_timeout_secs: 0,
        ..Config::default()
    };
    assert!(c.validate().is_err());
}

#[test]
fn load_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "workers = 2").unwrap();
    let c = Config::load(Some(file.path())).unwrap();
    assert_eq!(c.workers, 2);
}

#[test]
fn missing_explicit_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(matches!(err, MiningError::Config(_)));
}

#[test]
fn thread_pool_honours_workers() {
    let c = Config {
        workers: 2,
        ..Config::default()
    };
    let pool = c.thread_pool().unwrap();
    assert_eq!(pool.current_num_threads(), 2);
}
