//! JSON ledger file with soft-failing load and atomic save.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::data_dir;
use super::migrations::{self, LedgerDocument};
use crate::error::StorageError;
use crate::ledger::Ledger;

pub const LEDGER_FILE_NAME: &str = "ledger.json";

/// How a ledger was obtained by [`LedgerStore::try_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// No file yet; a default ledger was created.
    Missing,
    /// Decoded directly with the current schema.
    Current,
    /// Decoded with an older schema and lifted to the current one.
    Migrated { from: &'static str },
}

/// Reads and writes the ledger document at a fixed path.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data dir>/ledger.json`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::new(data_dir()?.join(LEDGER_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load without falling back. A missing or blank file yields a default
    /// ledger; anything no schema accepts is an error.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded.
    pub fn try_load(&self) -> Result<(Ledger, LoadSource), StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok((Ledger::new(), LoadSource::Missing))
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if raw.trim().is_empty() {
            return Ok((Ledger::new(), LoadSource::Missing));
        }

        let decoded = migrations::decode(&raw).ok_or_else(|| StorageError::NoSchemaMatched {
            path: self.path.clone(),
        })?;
        let source = if decoded.migrated {
            LoadSource::Migrated {
                from: decoded.schema,
            }
        } else {
            LoadSource::Current
        };
        Ok((decoded.ledger, source))
    }

    /// Load the ledger, never failing.
    ///
    /// Migrated documents are re-saved in the current schema right away.
    /// An unreadable or undecodable file is copied aside to
    /// `<name>.corrupt` and replaced by a default ledger in memory.
    pub fn load(&self) -> Ledger {
        match self.try_load() {
            Ok((ledger, LoadSource::Migrated { from })) => {
                info!(path = %self.path.display(), from, "migrated ledger to current schema");
                if let Err(err) = self.save(&ledger) {
                    warn!(%err, "failed to persist migrated ledger");
                }
                ledger
            }
            Ok((ledger, _)) => ledger,
            Err(err) => {
                warn!(%err, "ledger unusable, starting from defaults");
                self.set_aside_corrupt();
                Ledger::new()
            }
        }
    }

    /// Persist the ledger atomically: the document is written to a sibling
    /// temp file, synced, then renamed over the target.
    ///
    /// # Errors
    /// Returns an error if encoding, writing or renaming fails.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| self.io_error(parent, source))?;
            }
        }

        let content = serde_json::to_string_pretty(&LedgerDocument::from(ledger))?;
        let tmp_path = self.sibling("tmp");

        let written = write_synced(&tmp_path, content.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(source) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(&self.path, source));
        }

        debug!(path = %self.path.display(), days = ledger.day_count(), "ledger saved");
        Ok(())
    }

    fn set_aside_corrupt(&self) {
        if !self.path.exists() {
            return;
        }
        let backup = self.sibling("corrupt");
        match fs::copy(&self.path, &backup) {
            Ok(_) => warn!(backup = %backup.display(), "kept a copy of the unreadable ledger"),
            Err(err) => warn!(%err, "could not copy the unreadable ledger aside"),
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| LEDGER_FILE_NAME.into());
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
