use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::blame::parse_porcelain;
use super::log::{LOG_FORMAT, parse_log};
use super::{BlameMap, Commit, History};
use crate::error::{MiningError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// History read by spawning the `git` binary.
///
/// Every invocation is bounded by `timeout`; a call that overruns is killed
/// and reported as [`MiningError::Timeout`].
pub struct GitCliHistory {
    root: PathBuf,
    binary: String,
    timeout: Duration,
}

impl GitCliHistory {
    pub fn open(path: &Path, binary: &str, timeout: Duration) -> Result<Self> {
        let history = Self {
            root: path.to_path_buf(),
            binary: binary.to_string(),
            timeout,
        };
        history
            .run(&["rev-parse", "--git-dir"], "rev-parse")
            .map_err(|e| match e {
                MiningError::ExternalTool { message, .. } => MiningError::external(
                    path.display().to_string(),
                    format!("not a git repository: {message}"),
                ),
                other => other,
            })?;
        Ok(history)
    }

    fn run(&self, args: &[&str], unit: &str) -> Result<String> {
        debug!(binary = %self.binary, ?args, "spawning git");
        let mut child = Command::new(&self.binary)
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MiningError::external(unit, format!("cannot run {}: {e}", self.binary)))?;

        // Drain both pipes off-thread so a chatty child cannot block on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                kill(&mut child);
                return Err(MiningError::Timeout {
                    command: format!("git {}", args.join(" ")),
                    secs: self.timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let out = stdout
            .join()
            .map_err(|_| MiningError::external(unit, "stdout reader panicked"))??;
        if !status.success() {
            let err = stderr.join().ok().and_then(|r| r.ok()).unwrap_or_default();
            return Err(MiningError::external(
                unit,
                String::from_utf8_lossy(&err).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl History for GitCliHistory {
    fn commits(&self) -> Result<Vec<Commit>> {
        // `git log --all` on a repository without refs is an error on some
        // versions; no refs means no reachable commits.
        let refs = self.run(&["for-each-ref", "--count=1"], "for-each-ref")?;
        if refs.trim().is_empty() {
            return Ok(Vec::new());
        }
        let raw = self.run(&["log", "--all", LOG_FORMAT], "log")?;
        Ok(parse_log(&raw))
    }

    fn patch(&self, commit: &Commit) -> Result<String> {
        let parent = commit.first_parent().ok_or_else(|| {
            MiningError::external(commit.hash.clone(), "root commit has no parent to diff against")
        })?;
        self.run(
            &[
                "diff",
                "-U0",
                "-M",
                "--no-color",
                "--no-ext-diff",
                "--src-prefix=a/",
                "--dst-prefix=b/",
                parent,
                &commit.hash,
            ],
            &commit.hash,
        )
    }

    fn blame(&self, rev: &str, path: &str) -> Result<BlameMap> {
        let unit = format!("{path}@{rev}");
        let out = self.run(&["blame", "--porcelain", rev, "--", path], &unit)?;
        Ok(parse_porcelain(&out))
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
