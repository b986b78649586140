//! Parser for the commit log stream produced by
//! `git log --all --pretty=format:%H%n%ct%n%s%n%P%x1f`.
//!
//! Each record is hash, committer timestamp, subject and the space
//! separated parent list, terminated by a unit separator (0x1f).

use tracing::debug;

use super::{Commit, is_commit_hash};

/// Format string handed to `git log` so that its output matches [`parse_log`].
pub const LOG_FORMAT: &str = "--pretty=format:%H%n%ct%n%s%n%P%x1f";

const RECORD_SEPARATOR: char = '\u{1f}';

/// Parse a raw log stream into commits, in stream order.
///
/// Records that do not start with a full hash, or whose timestamp line is
/// missing or not a number, are skipped one by one.
pub fn parse_log(raw: &str) -> Vec<Commit> {
    raw.split(RECORD_SEPARATOR)
        .filter_map(|record| {
            let commit = parse_record(record);
            if commit.is_none() && !record.trim().is_empty() {
                debug!(record = record.trim(), "skipping malformed log record");
            }
            commit
        })
        .collect()
}

fn parse_record(record: &str) -> Option<Commit> {
    let mut lines = record.trim_start().lines();
    let hash = lines.next()?.trim();
    if !is_commit_hash(hash) {
        return None;
    }
    let timestamp = lines.next()?.trim().parse::<i64>().ok()?;
    let message = lines.next().unwrap_or_default().to_string();
    let parents = lines
        .next()
        .map(|l| {
            l.split_whitespace()
                .filter(|p| is_commit_hash(p))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(Commit {
        hash: hash.to_ascii_lowercase(),
        timestamp,
        message,
        parents,
    })
}

#[cfg(test)]
#[path = "log_test.rs"]
mod tests;
