use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::warn;

use super::ReportDocument;
use crate::error::{MiningError, Result};

/// Every `*.json` file under `root`, sorted by path.
///
/// Hidden entries are included and ignore files are not honoured: report
/// folders are data, not source trees.
pub fn find_report_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(MiningError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("report folder does not exist: {}", root.display()),
        )));
    }

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if entry.path().extension().is_some_and(|ext| ext == "json") {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Loads and persists report documents on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportStore;

impl ReportStore {
    pub fn load(&self, path: &Path) -> Result<ReportDocument> {
        let content = fs::read_to_string(path)?;
        let value = serde_json::from_str(&content).map_err(|e| {
            MiningError::parse(path.display().to_string(), format!("invalid JSON: {e}"))
        })?;
        Ok(ReportDocument::new(path, value))
    }

    /// Overwrite the document's file. The new content goes to a temporary
    /// file in the same directory first and is renamed into place, so a
    /// crash never leaves a half-written report.
    pub fn save(&self, doc: &ReportDocument) -> Result<()> {
        let path = doc.path();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, doc.value())?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| MiningError::Io(e.error))?;
        Ok(())
    }

    /// Load every report under `root`. Unreadable or malformed files are
    /// logged and skipped.
    pub fn load_all(&self, root: &Path) -> Result<Vec<ReportDocument>> {
        let mut docs = Vec::new();
        for path in find_report_files(root)? {
            match self.load(&path) {
                Ok(doc) => docs.push(doc),
                Err(e) => warn!(path = %path.display(), error = %e, "report skipped"),
            }
        }
        Ok(docs)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
