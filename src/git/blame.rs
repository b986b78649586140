//! Per-line blame results and the `git blame --porcelain` parser.

use std::collections::HashMap;

use super::is_commit_hash;

/// Last modification of one line of a file at some revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlameLine {
    pub commit: String,
    pub timestamp: i64,
    pub content: String,
}

/// 1-based line number → blame entry.
pub type BlameMap = HashMap<usize, BlameLine>;

/// Parse porcelain blame output.
///
/// Each group starts with `<hash> <orig-line> <final-line> [<count>]`.
/// Header lines such as `committer-time` are only emitted the first time a
/// commit appears, so timestamps are remembered per commit. The content
/// line is prefixed with a tab.
pub fn parse_porcelain(output: &str) -> BlameMap {
    let mut map = BlameMap::new();
    let mut times: HashMap<String, i64> = HashMap::new();
    let mut commit = String::new();
    let mut final_line = 0usize;

    for line in output.lines() {
        if let Some(content) = line.strip_prefix('\t') {
            if !commit.is_empty() && final_line > 0 {
                map.insert(
                    final_line,
                    BlameLine {
                        commit: commit.clone(),
                        timestamp: times.get(&commit).copied().unwrap_or(0),
                        content: content.to_string(),
                    },
                );
            }
            continue;
        }

        if let Some(ts) = line.strip_prefix("committer-time ") {
            if let Ok(ts) = ts.trim().parse::<i64>() {
                times.insert(commit.clone(), ts);
            }
            continue;
        }

        let mut fields = line.split(' ');
        if let Some(hash) = fields.next()
            && is_commit_hash(hash)
            && let Some(Ok(n)) = fields.nth(1).map(str::parse::<usize>)
        {
            commit = hash.to_ascii_lowercase();
            final_line = n;
        }
    }

    map
}

#[cfg(test)]
#[path = "blame_test.rs"]
mod tests;
