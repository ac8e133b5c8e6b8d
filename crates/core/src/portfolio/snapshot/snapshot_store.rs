//! Snapshot persistence.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use super::Snapshot;
use crate::errors::{Result, SnapshotError};

/// Storage for the previous run's snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved snapshot. Returns an empty snapshot when none
    /// exists yet.
    fn load(&self) -> Result<Snapshot>;

    /// Replace the stored snapshot wholesale.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Snapshot stored as a flat, pretty-printed JSON object on local disk.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn write_error(&self, message: impl ToString) -> SnapshotError {
        SnapshotError::Write {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<Snapshot> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "No snapshot at {}; treating this run as the baseline",
                    self.path.display()
                );
                return Ok(Snapshot::default());
            }
            Err(e) => {
                return Err(SnapshotError::Read {
                    path: self.path.clone(),
                    source: e,
                }
                .into())
            }
        };

        let snapshot: Snapshot =
            serde_json::from_str(&raw).map_err(|e| SnapshotError::Malformed {
                path: self.path.clone(),
                source: e,
            })?;
        debug!(
            "Loaded snapshot with {} entries from {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        // Write next to the target and rename over it, so a crash never
        // leaves a half-written snapshot behind.
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        serde_json::to_writer_pretty(&mut tmp, snapshot).map_err(|e| self.write_error(e))?;
        tmp.write_all(b"\n").map_err(|e| self.write_error(e))?;
        tmp.flush().map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_error(e.error))?;

        debug!(
            "Saved snapshot with {} entries to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }
}
