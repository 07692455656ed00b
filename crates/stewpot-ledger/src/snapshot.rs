//! Persisted layout of the effect store.
//!
//! On disk the ledger is an ordered list of entries, each a position and an
//! ordered list of `{kind_key, level, remaining_ticks}` records. Kinds are
//! stored by canonical key and resolved through an [`EffectKindRegistry`] on
//! load; a key the registry no longer knows drops that record only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stewpot_types::{BlockPos, EffectKindRegistry, EffectRecord, LedgerEntry};
use tracing::{info, warn};

use crate::LedgerError;
use crate::store::EffectStore;

/// Format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One persisted effect record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    /// Canonical key of the effect kind.
    pub kind_key: String,
    /// Amplifier, 0-based.
    pub level: u32,
    /// Ticks of duration left.
    pub remaining_ticks: u32,
}

/// One persisted ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEntry {
    /// Container position as `[x, y, z]`.
    pub position: [i32; 3],
    /// Records in kind-key order.
    pub records: Vec<PersistedRecord>,
}

/// The whole store as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Format version, see [`SNAPSHOT_VERSION`].
    pub version: u32,
    /// Wall-clock time the snapshot was captured.
    pub saved_at: DateTime<Utc>,
    /// World tick at capture time.
    pub tick: u64,
    /// Entries in position order.
    pub entries: Vec<PersistedEntry>,
}

/// Outcome of loading a snapshot into a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Entries present in the store after the restore.
    pub entries_restored: usize,
    /// Records kept.
    pub records_restored: usize,
    /// Records dropped because the registry did not know their kind.
    pub unknown_kinds_dropped: usize,
}

impl LedgerSnapshot {
    /// Capture the current store contents.
    pub fn capture<R>(store: &EffectStore, registry: &R, tick: u64) -> Self
    where
        R: EffectKindRegistry + ?Sized,
    {
        let entries = store
            .entries()
            .map(|entry| PersistedEntry {
                position: entry.position.into(),
                records: entry
                    .records
                    .iter()
                    .map(|(kind, record)| PersistedRecord {
                        kind_key: registry.key_of(kind),
                        level: record.level,
                        remaining_ticks: record.remaining_ticks,
                    })
                    .collect(),
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            tick,
            entries,
        }
    }

    /// Resolve every record's kind, dropping records with unknown keys.
    ///
    /// Returns the resolved entries and the number of dropped records.
    pub fn resolve<R>(&self, registry: &R) -> (Vec<LedgerEntry>, usize)
    where
        R: EffectKindRegistry + ?Sized,
    {
        let mut dropped: usize = 0;
        let mut resolved = Vec::with_capacity(self.entries.len());

        for persisted in &self.entries {
            let position = BlockPos::from(persisted.position);
            let mut records = BTreeMap::new();

            for record in &persisted.records {
                if let Some(kind) = registry.resolve(&record.kind_key) {
                    records.insert(kind, EffectRecord {
                        level: record.level,
                        remaining_ticks: record.remaining_ticks,
                    });
                } else {
                    warn!(
                        %position,
                        kind_key = %record.kind_key,
                        "Dropping ledger record with unknown effect kind"
                    );
                    dropped = dropped.saturating_add(1);
                }
            }

            resolved.push(LedgerEntry { position, records });
        }

        (resolved, dropped)
    }

    /// Replace the contents of `store` with this snapshot.
    pub fn restore_into<R>(&self, store: &mut EffectStore, registry: &R) -> RestoreReport
    where
        R: EffectKindRegistry + ?Sized,
    {
        let (entries, unknown_kinds_dropped) = self.resolve(registry);
        store.restore(entries);

        let records_restored = store.entries().map(|e| e.records.len()).sum();
        let report = RestoreReport {
            entries_restored: store.len(),
            records_restored,
            unknown_kinds_dropped,
        };

        info!(
            tick = self.tick,
            saved_at = %self.saved_at,
            entries = report.entries_restored,
            records = report.records_restored,
            dropped = report.unknown_kinds_dropped,
            "Ledger restored from snapshot"
        );

        report
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON, rejecting unknown format versions.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Json`] for malformed input and
    /// [`LedgerError::UnsupportedVersion`] for a version other than
    /// [`SNAPSHOT_VERSION`].
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}
