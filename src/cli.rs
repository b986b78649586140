/// CLI argument definitions for the `ctrail` command.
use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::cli_help;
use crate::config::{Backend, Config};
use crate::report::SmellKeyStrategy;
use crate::szz::MergePolicy;

#[derive(Parser, Debug)]
#[command(name = "ctrail", version, about = "Repository history mining for data clump research")]
pub struct Cli {
    /// Configuration file (default: ./clumptrail.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that take precedence over the configuration file.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Worker threads (0 = one per core)
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Git access: in-process libgit2 or the git executable
    #[arg(long, global = true, value_parser = parse_backend)]
    pub backend: Option<Backend>,

    /// Seconds before a single git invocation is abandoned
    #[arg(long, global = true)]
    pub git_timeout: Option<u64>,

    /// Treatment of merge commits during attribution
    #[arg(long, global = true, value_enum)]
    pub merge_policy: Option<MergePolicy>,
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    match s {
        "libgit2" => Ok(Backend::Libgit2),
        "cli" => Ok(Backend::Cli),
        other => Err(format!("unknown backend '{other}' (expected libgit2 or cli)")),
    }
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(secs) = self.git_timeout {
            config.git_timeout_secs = secs;
        }
        if let Some(policy) = self.merge_policy {
            config.merge_policy = policy;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find bug-introducing commits in a repository
    #[command(long_about = cli_help::SZZ)]
    Szz {
        /// Repository to mine
        repo: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Bug-fix keywords, comma separated (replaces the configured list)
        #[arg(long, value_delimiter = ',')]
        keywords: Option<Vec<String>>,
    },

    /// Ancestor and descendant counts of commits
    #[command(long_about = cli_help::ANCESTORS)]
    Ancestors {
        repo: PathBuf,

        /// Full commit hashes
        #[arg(required = true)]
        hashes: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Annotate reports with the faults introduced before their commit
    #[command(long_about = cli_help::FAULTS)]
    #[command(group(ArgGroup::new("source").required(true).args(["repo", "repos_root"])))]
    Faults {
        /// Folder searched recursively for report files
        folder: PathBuf,

        /// A single repository for all projects
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Directory holding one repository per project name
        #[arg(long)]
        repos_root: Option<PathBuf>,

        /// Recompute reports that are already annotated
        #[arg(long)]
        force: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify data clump evolution per project
    #[command(long_about = cli_help::EVOLUTION)]
    Evolution {
        /// Folder with one sub-folder of reports per project
        folder: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// How smells are identified across snapshots
        #[arg(long, value_enum)]
        smell_key: Option<SmellKeyStrategy>,
    },

    /// Correlate fault annotations with data clump counts
    #[command(long_about = cli_help::CORRELATE)]
    Correlate {
        /// Folder searched recursively for report files
        folder: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a shell completion script
    Completions {
        shell: Shell,
    },
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
