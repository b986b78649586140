//! Unified diff walker.
//!
//! Reduces a patch to the lines it removes from each old file, with their
//! 1-based line numbers in the old (parent) version. File headers are only
//! recognized between hunks: inside a hunk the header's old/new line counts
//! decide where the body ends, so a removed line whose content begins with
//! `--` is still a removal.

use crate::error::{MiningError, Result};

/// A line removed from the old version of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedLine {
    pub line: usize,
    pub content: String,
}

/// All removals one patch makes to a single old file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRemovals {
    pub path: String,
    pub removed: Vec<RemovedLine>,
}

struct Hunk {
    old_left: usize,
    new_left: usize,
}

impl Hunk {
    fn is_open(&self) -> bool {
        self.old_left > 0 || self.new_left > 0
    }
}

/// Walk `patch` and collect removed lines per old file, in patch order.
/// Files without removals (additions, new files) are omitted.
pub fn parse_patch(patch: &str) -> Result<Vec<FileRemovals>> {
    let mut files: Vec<FileRemovals> = Vec::new();
    // None while the current old file is /dev/null or not yet seen.
    let mut current: Option<FileRemovals> = None;
    let mut old_line = 0usize;
    let mut hunk = Hunk {
        old_left: 0,
        new_left: 0,
    };

    for raw in patch.lines() {
        if hunk.is_open() {
            match raw.as_bytes().first() {
                Some(b'-') => {
                    if let Some(file) = current.as_mut() {
                        file.removed.push(RemovedLine {
                            line: old_line,
                            content: raw[1..].to_string(),
                        });
                    }
                    old_line += 1;
                    hunk.old_left = hunk.old_left.saturating_sub(1);
                    continue;
                }
                Some(b'+') => {
                    hunk.new_left = hunk.new_left.saturating_sub(1);
                    continue;
                }
                Some(b' ') | None => {
                    old_line += 1;
                    hunk.old_left = hunk.old_left.saturating_sub(1);
                    hunk.new_left = hunk.new_left.saturating_sub(1);
                    continue;
                }
                Some(b'\\') => continue,
                // Truncated hunk: treat the line as outside any hunk.
                Some(_) => {
                    hunk.old_left = 0;
                    hunk.new_left = 0;
                }
            }
        }

        if let Some(rest) = raw.strip_prefix("--- ") {
            flush(&mut files, current.take());
            current = old_path(rest).map(|path| FileRemovals {
                path,
                removed: Vec::new(),
            });
            old_line = 0;
        } else if raw.starts_with("@@ ") {
            let (start, old_count, new_count) = parse_hunk_header(raw)?;
            old_line = start.max(1);
            hunk.old_left = old_count;
            hunk.new_left = new_count;
        }
    }

    flush(&mut files, current);
    Ok(files)
}

fn flush(files: &mut Vec<FileRemovals>, file: Option<FileRemovals>) {
    if let Some(file) = file
        && !file.removed.is_empty()
    {
        files.push(file);
    }
}

/// Path of the old file from a `--- ` header, without its `a/` prefix.
/// `None` for `/dev/null`.
fn old_path(header: &str) -> Option<String> {
    let header = header.strip_suffix('\t').unwrap_or(header);
    let name = if header.starts_with('"') {
        unquote(header)
    } else {
        header.to_string()
    };
    if name == "/dev/null" {
        return None;
    }
    let path = name
        .strip_prefix("a/")
        .or_else(|| name.strip_prefix("b/"))
        .unwrap_or(&name);
    Some(path.to_string())
}

/// Undo git's C-style quoting of paths with unusual characters.
fn unquote(quoted: &str) -> String {
    let inner = quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(quoted);
    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 >= bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let next = bytes[i + 1];
        match next {
            b'0'..=b'7' if i + 3 < bytes.len() && is_octal(&bytes[i + 1..i + 4]) => {
                let value = bytes[i + 1..i + 4]
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                out.push((value & 0xff) as u8);
                i += 4;
            }
            b'n' => {
                out.push(b'\n');
                i += 2;
            }
            b't' => {
                out.push(b'\t');
                i += 2;
            }
            other => {
                out.push(other);
                i += 2;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal(digits: &[u8]) -> bool {
    digits.iter().all(|d| (b'0'..=b'7').contains(d))
}

/// Parse `@@ -<start>[,<count>] +<start>[,<count>] @@` into
/// (old start, old count, new count).
fn parse_hunk_header(line: &str) -> Result<(usize, usize, usize)> {
    let malformed = || MiningError::parse("hunk header", line.to_string());

    let mut parts = line.split_whitespace().skip(1);
    let old = parts
        .next()
        .and_then(|p| p.strip_prefix('-'))
        .ok_or_else(malformed)?;
    let new = parts
        .next()
        .and_then(|p| p.strip_prefix('+'))
        .ok_or_else(malformed)?;

    let (old_start, old_count) = parse_range(old).ok_or_else(malformed)?;
    let (_, new_count) = parse_range(new).ok_or_else(malformed)?;
    Ok((old_start, old_count, new_count))
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

#[cfg(test)]
#[path = "patch_test.rs"]
mod tests;
