//! Durable storage for the driver's ledger counters.
//!
//! The stored document holds exactly three keys: `isOnline`, `earnings` and
//! `balance`. Absent documents and absent keys read back as the defaults.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::ledger::LedgerState;

/// Errors raised by a [`LedgerStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed ledger document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Storage port for the ledger.
pub trait LedgerStore {
    /// Read the persisted state, or the defaults when nothing was saved yet.
    fn load(&self) -> Result<LedgerState, StoreError>;

    /// Persist `state`. Must be durable once this returns `Ok`.
    fn save(&mut self, state: &LedgerState) -> Result<(), StoreError>;
}

/// Ledger persisted as a small JSON document on disk.
///
/// Saves write a temp file next to the target and rename it into place, so a
/// crash never leaves a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<LedgerState, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored ledger, using defaults");
                Ok(LedgerState::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, state: &LedgerState) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, state)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "ledger saved");
        Ok(())
    }
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Option<LedgerState>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `state`.
    pub fn with_state(state: LedgerState) -> Self {
        Self {
            state: Some(state),
            saves: 0,
        }
    }

    /// Last saved state, if any.
    pub fn saved(&self) -> Option<LedgerState> {
        self.state
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<LedgerState, StoreError> {
        Ok(self.state.unwrap_or_default())
    }

    fn save(&mut self, state: &LedgerState) -> Result<(), StoreError> {
        self.state = Some(*state);
        self.saves += 1;
        Ok(())
    }
}

impl<S: LedgerStore + ?Sized> LedgerStore for Box<S> {
    fn load(&self) -> Result<LedgerState, StoreError> {
        (**self).load()
    }

    fn save(&mut self, state: &LedgerState) -> Result<(), StoreError> {
        (**self).save(state)
    }
}
