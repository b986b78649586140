use std::io;

use clap::{CommandFactory, Parser};
use tracing::debug;

use clumptrail::cli::{Cli, Commands};
use clumptrail::config::Config;
use clumptrail::error::{MiningError, Result};
use clumptrail::faults::RepoSource;
use clumptrail::{ancestry, correlation, evolution, faults, logging, szz};

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.overrides.apply(&mut config);
    config.validate()?;
    debug!(?config, "effective configuration");

    match cli.command {
        Commands::Szz {
            repo,
            json,
            keywords,
        } => {
            if let Some(keywords) = keywords {
                config.bug_fix_keywords = keywords;
            }
            szz::run(&repo, &config, json)
        }
        Commands::Ancestors { repo, hashes, json } => ancestry::run(&repo, &config, &hashes, json),
        Commands::Faults {
            folder,
            repo,
            repos_root,
            force,
            json,
        } => {
            let source = match (repo, repos_root) {
                (Some(repo), _) => RepoSource::Single(repo),
                (None, Some(root)) => RepoSource::PerProject(root),
                (None, None) => {
                    return Err(MiningError::Config(
                        "one of --repo or --repos-root is required".into(),
                    ));
                }
            };
            faults::run(&folder, &source, &config, force, json)
        }
        Commands::Evolution {
            folder,
            json,
            smell_key,
        } => {
            if let Some(strategy) = smell_key {
                config.smell_key = strategy;
            }
            evolution::run(&folder, &config, json)
        }
        Commands::Correlate { folder, json } => correlation::run(&folder, &config, json),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ctrail", &mut io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
