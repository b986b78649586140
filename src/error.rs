//! Error taxonomy for the mining engine.
//!
//! Recoverable variants (`ExternalTool`, `Timeout`, `Parse`, `MissingField`)
//! are logged by the caller and cost only the smallest affected unit: one
//! file's blame, one commit's diff, one report. `Consistency` is fatal.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MiningError {
    #[error("git failed for {unit}: {message}")]
    ExternalTool { unit: String, message: String },

    #[error("`{command}` did not finish within {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("unexpected output for {unit}: {message}")]
    Parse { unit: String, message: String },

    #[error("{}: missing field `{field}`", path.display())]
    MissingField { path: PathBuf, field: String },

    #[error(
        "evolution categories do not partition the key space: \
         {classified} classified vs {total} unique keys"
    )]
    Consistency { classified: usize, total: usize },

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl MiningError {
    pub fn external(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalTool {
            unit: unit.into(),
            message: message.into(),
        }
    }

    pub fn parse(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            unit: unit.into(),
            message: message.into(),
        }
    }

    pub fn missing_field(path: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        Self::MissingField {
            path: path.into(),
            field: field.into(),
        }
    }

    /// Whether the failure should stop the whole run instead of one unit.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Consistency { .. })
    }
}

pub type Result<T> = std::result::Result<T, MiningError>;
