//! Checkpoint file: the durable crawl cursor
//!
//! The checkpoint is a small JSON record `{"segment_index": N, "page": M}`.
//! It is read once at run start and overwritten on every page advance and on
//! every halt, so an interrupted run loses at most one page of work.

use crate::state::Cursor;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur reading or writing the checkpoint file
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to read checkpoint file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed checkpoint file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Failed to replace checkpoint file: {0}")]
    Replace(String),
}

/// Reads and writes the cursor at a fixed path
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted cursor.
    ///
    /// A missing file is the normal first-run case and yields the starting
    /// cursor. A file that exists but cannot be parsed is an error: guessing
    /// a resume point would silently re-crawl or skip work.
    pub fn load(&self) -> Result<Cursor, CheckpointError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Cursor::start()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persists the cursor, replacing the file atomically.
    ///
    /// The temp file is created in the checkpoint's own directory so the
    /// final rename stays on one filesystem.
    pub fn save(&self, cursor: &Cursor) -> Result<(), CheckpointError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut tmp, cursor)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .map_err(|e| CheckpointError::Replace(e.to_string()))?;
        tracing::debug!("Checkpoint saved: {}", cursor);
        Ok(())
    }
}
