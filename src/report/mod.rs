//! Data-clump report documents as produced by the external detector.
//!
//! A document is kept as a raw JSON value so that fields this crate does not
//! know about survive a load/annotate/save cycle unchanged. Typed accessors
//! read the handful of fields the mining engine needs.

mod snapshot;
mod store;

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{MiningError, Result};

pub use snapshot::{SmellKeyStrategy, Snapshot, SnapshotHistory};
pub use store::{ReportStore, find_report_files};

/// Field written by fault correlation, inside `report_summary`.
pub const BUG_INTRODUCING_FIELD: &str = "number_of_bug_introducing_commits";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    pub project_name: String,
    pub project_url: Option<String>,
    pub project_commit_hash: String,
    pub project_tag: Option<String>,
    pub project_commit_date: i64,
}

/// The three data-clump totals from `report_summary`. Absent counts are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataClumpCounts {
    pub fields_to_fields: u64,
    pub parameters_to_parameters: u64,
    pub parameters_to_fields: u64,
}

impl DataClumpCounts {
    pub fn total(&self) -> u64 {
        self.fields_to_fields + self.parameters_to_parameters + self.parameters_to_fields
    }
}

#[derive(Debug, Clone)]
pub struct ReportDocument {
    path: PathBuf,
    value: Value,
}

impl ReportDocument {
    pub fn new(path: impl Into<PathBuf>, value: Value) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    fn field(&self, section: &str, name: &str) -> Option<&Value> {
        self.value.get(section)?.get(name)
    }

    fn non_empty_str(&self, section: &str, name: &str) -> Option<&str> {
        self.field(section, name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn project_name(&self) -> Option<&str> {
        self.non_empty_str("project_info", "project_name")
    }

    pub fn commit_hash(&self) -> Option<&str> {
        self.non_empty_str("project_info", "project_commit_hash")
    }

    /// `project_info.project_commit_date` as unix seconds. Both numbers and
    /// numeric strings are accepted.
    pub fn commit_date(&self) -> Result<i64> {
        let missing = || MiningError::missing_field(&self.path, "project_info.project_commit_date");
        match self.field("project_info", "project_commit_date") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(missing),
            Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| missing()),
            _ => Err(missing()),
        }
    }

    /// The identifying metadata. Name, commit hash and date are required.
    pub fn project_info(&self) -> Result<ProjectInfo> {
        let project_name = self
            .project_name()
            .ok_or_else(|| MiningError::missing_field(&self.path, "project_info.project_name"))?;
        let project_commit_hash = self.commit_hash().ok_or_else(|| {
            MiningError::missing_field(&self.path, "project_info.project_commit_hash")
        })?;
        Ok(ProjectInfo {
            project_name: project_name.to_string(),
            project_url: self
                .non_empty_str("project_info", "project_url")
                .map(str::to_string),
            project_commit_hash: project_commit_hash.to_string(),
            project_tag: self
                .non_empty_str("project_info", "project_tag")
                .map(str::to_string),
            project_commit_date: self.commit_date()?,
        })
    }

    pub fn counts(&self) -> DataClumpCounts {
        let count = |name| {
            self.field("report_summary", name)
                .and_then(Value::as_u64)
                .unwrap_or(0)
        };
        DataClumpCounts {
            fields_to_fields: count("fields_to_fields_data_clump"),
            parameters_to_parameters: count("parameters_to_parameters_data_clump"),
            parameters_to_fields: count("parameters_to_fields_data_clump"),
        }
    }

    pub fn data_clumps(&self) -> Option<&Map<String, Value>> {
        self.value.get("data_clumps")?.as_object()
    }

    /// The fault-correlation annotation, if the document already carries one.
    pub fn bug_introducing_commits(&self) -> Option<u64> {
        self.field("report_summary", BUG_INTRODUCING_FIELD)
            .and_then(Value::as_u64)
    }

    pub fn is_annotated(&self) -> bool {
        self.bug_introducing_commits().is_some()
    }

    /// Write the fault-correlation annotation, creating `report_summary`
    /// when the document has none.
    pub fn set_bug_introducing_commits(&mut self, count: u64) -> Result<()> {
        let root = self
            .value
            .as_object_mut()
            .ok_or_else(|| MiningError::parse(self.path.display().to_string(), "not a JSON object"))?;
        let summary = root
            .entry("report_summary")
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(summary) = summary.as_object_mut() else {
            return Err(MiningError::parse(
                self.path.display().to_string(),
                "report_summary is not an object",
            ));
        };
        summary.insert(BUG_INTRODUCING_FIELD.to_string(), Value::from(count));
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
