use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::ReportDocument;
use crate::error::Result;

/// How a data clump is turned into the key that identifies it across
/// snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SmellKeyStrategy {
    /// The key the detector filed the smell under.
    #[default]
    Report,
    /// `(type)name` per distinct variable name, concatenated in document order.
    Variables,
    /// Same pairs as `Variables`, sorted first.
    SortedVariables,
}

impl SmellKeyStrategy {
    /// Key for one entry of `data_clumps`. Variable strategies fall back to
    /// the report key when the entry carries no `data_clump_data`.
    pub fn key(self, report_key: &str, smell: &Value) -> String {
        if self == Self::Report {
            return report_key.to_string();
        }
        let Some(variables) = smell.get("data_clump_data").and_then(Value::as_object) else {
            debug!(key = report_key, "no data_clump_data; using report key");
            return report_key.to_string();
        };

        // One pair per variable name: first position, last type seen.
        let mut by_name: Vec<(&str, &str)> = Vec::with_capacity(variables.len());
        for v in variables.values() {
            let ty = v.get("type").and_then(Value::as_str).unwrap_or_default();
            let name = v.get("name").and_then(Value::as_str).unwrap_or_default();
            match by_name.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = ty,
                None => by_name.push((name, ty)),
            }
        }
        let mut pairs: Vec<String> = by_name
            .into_iter()
            .map(|(name, ty)| format!("({ty}){name}"))
            .collect();
        if self == Self::SortedVariables {
            pairs.sort();
        }
        pairs.concat()
    }
}

/// One dated set of smell keys for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub project_name: String,
    pub commit_hash: String,
    pub commit_date: i64,
    pub tag: Option<String>,
    pub keys: BTreeSet<String>,
    pub path: Option<PathBuf>,
}

impl Snapshot {
    /// Snapshot with only the fields the classifier needs.
    pub fn new(commit_date: i64, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            project_name: String::new(),
            commit_hash: String::new(),
            commit_date,
            tag: None,
            keys: keys.into_iter().map(Into::into).collect(),
            path: None,
        }
    }

    pub fn from_document(doc: &ReportDocument, strategy: SmellKeyStrategy) -> Result<Self> {
        let info = doc.project_info()?;
        let keys = doc
            .data_clumps()
            .map(|clumps| {
                clumps
                    .iter()
                    .map(|(key, smell)| strategy.key(key, smell))
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            project_name: info.project_name,
            commit_hash: info.project_commit_hash,
            commit_date: info.project_commit_date,
            tag: info.project_tag,
            keys,
            path: Some(doc.path().to_path_buf()),
        })
    }
}

/// Snapshots of one project, oldest first.
///
/// Construction sorts by commit date, then by commit hash, so the order the
/// reports were found in never leaks into classification.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
}

impl SnapshotHistory {
    pub fn new(mut snapshots: Vec<Snapshot>) -> Self {
        snapshots.sort_by(|a, b| {
            a.commit_date
                .cmp(&b.commit_date)
                .then_with(|| a.commit_hash.cmp(&b.commit_hash))
        });
        Self { snapshots }
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn first(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
