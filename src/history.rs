//! Append-only analysis history.
//!
//! Entries are stored one JSON object per line, oldest first on disk, and
//! read back most-recent-first. The classifier never touches this log; the
//! caller decides what gets recorded.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Result;
use crate::types::{Analysis, now_millis};

/// One recorded analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The analyzed text as submitted.
    pub text: String,
    /// When the entry was recorded (unix millis).
    pub timestamp: u64,
    pub analysis: Analysis,
}

/// JSON-lines history file.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    /// Open a log at `path`. The file is created on first append.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an analysis of `text`.
    pub fn append(&self, text: &str, analysis: &Analysis) -> Result<HistoryEntry> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let entry = HistoryEntry {
            text: text.to_string(),
            timestamp: now_millis(),
            analysis: analysis.clone(),
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(entry)
    }

    /// Up to `limit` entries, most recent first.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.read_all()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    /// Number of readable entries.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_all(&self) -> Result<Vec<HistoryEntry>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %e,
                    "skipping malformed history entry"
                ),
            }
        }
        Ok(entries)
    }
}
