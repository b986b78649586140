//! Run configuration loaded from an optional TOML file.
//!
//! Every field has a default, so an absent file or an empty one is a valid
//! configuration. Command-line flags override what the file says.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{MiningError, Result};
use crate::report::SmellKeyStrategy;
use crate::szz::{MergePolicy, default_keywords};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "clumptrail.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Libgit2,
    Cli,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bug_fix_keywords: Vec<String>,
    pub backend: Backend,
    pub git_binary: String,
    pub git_timeout_secs: u64,
    /// Worker threads; 0 lets rayon decide.
    pub workers: usize,
    pub smell_key: SmellKeyStrategy,
    pub merge_policy: MergePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bug_fix_keywords: default_keywords(),
            backend: Backend::default(),
            git_binary: "git".to_string(),
            git_timeout_secs: 300,
            workers: 0,
            smell_key: SmellKeyStrategy::default(),
            merge_policy: MergePolicy::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists, or
    /// fall back to defaults. An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    return Ok(Self::default());
                }
                p
            }
        };

        debug!(path = %path.display(), "loading configuration");
        let content = fs::read_to_string(&path)
            .map_err(|e| MiningError::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| MiningError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can work with. Re-run after applying overrides.
    pub fn validate(&self) -> Result<()> {
        if self.bug_fix_keywords.iter().any(|k| k.is_empty()) {
            return Err(MiningError::Config(
                "bug_fix_keywords must not contain empty strings".into(),
            ));
        }
        if self.bug_fix_keywords.is_empty() {
            warn!("bug_fix_keywords is empty; no commit will be treated as a bug fix");
        }
        if self.git_timeout_secs == 0 {
            return Err(MiningError::Config("git_timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs)
    }

    /// Worker pool bounded by `workers`.
    pub fn thread_pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("clumptrail-{i}"))
            .build()
            .map_err(|e| MiningError::Config(format!("cannot start worker pool: {e}")))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
