//! Ledger file I/O.
//!
//! The ledger is saved as a JSON [`LedgerSnapshot`]. Saves write a sibling
//! temporary file and rename it over the target, so a crash mid-write
//! leaves the previous save intact.

use std::path::{Path, PathBuf};

use chrono::Utc;
use stewpot_ledger::{EffectStore, LedgerSnapshot};
use stewpot_types::EffectKindRegistry;
use tracing::info;

use crate::error::EngineError;

/// The file a ledger is restored from and saved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerFile {
    path: PathBuf,
}

impl LedgerFile {
    /// Create a handle for the ledger at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> EngineError {
        EngineError::LedgerFile {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Restore `store` from the file.
    ///
    /// Returns the tick the snapshot was taken at, or `None` when no file
    /// exists yet (the store is left untouched).
    pub fn load<R>(&self, store: &mut EffectStore, registry: &R) -> Result<Option<u64>, EngineError>
    where
        R: EffectKindRegistry + ?Sized,
    {
        if !self.path.exists() {
            info!(path = %self.path.display(), "No ledger file found, starting empty");
            return Ok(None);
        }

        let json = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let snapshot = LedgerSnapshot::from_json(&json)?;
        let report = snapshot.restore_into(store, registry);

        let age = Utc::now().signed_duration_since(snapshot.saved_at);
        info!(
            path = %self.path.display(),
            tick = snapshot.tick,
            age_seconds = age.num_seconds(),
            entries = report.entries_restored,
            "Ledger file loaded"
        );
        Ok(Some(snapshot.tick))
    }

    /// Save `store` as of `tick`.
    pub fn save<R>(&self, store: &EffectStore, registry: &R, tick: u64) -> Result<(), EngineError>
    where
        R: EffectKindRegistry + ?Sized,
    {
        let json = LedgerSnapshot::capture(store, registry, tick).to_json()?;

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        std::fs::write(&staging, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&staging, &self.path).map_err(|e| self.io_error(e))?;

        info!(path = %self.path.display(), tick, entries = store.len(), "Ledger saved");
        Ok(())
    }
}
