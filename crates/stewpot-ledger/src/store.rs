//! The effect store: every cauldron's accumulated effects, keyed by position.
//!
//! # Design
//!
//! - **Single write path**: accumulation only happens through
//!   [`EffectStore::merge`]. Level is monotonic, duration stacks up to
//!   [`MAX_REMAINING_TICKS`].
//! - **No empty entries**: a [`LedgerEntry`] is removed in the same call
//!   that removes its last record.
//! - **Caller-paced decay**: [`EffectStore::decay_all`] removes exactly one
//!   tick from every record. How fast stored effects fade is decided by how
//!   often the caller invokes it.

use std::collections::BTreeMap;

use stewpot_types::{BlockPos, EffectKind, EffectRecord, LedgerEntry, MAX_REMAINING_TICKS};
use tracing::debug;

/// Outcome of one [`EffectStore::decay_all`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecayReport {
    /// Records whose duration reached zero and were dropped.
    pub records_expired: usize,
    /// Entries dropped because their last record expired.
    pub entries_removed: usize,
}

/// All ledger entries for one world.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectStore {
    /// Entries keyed by container position, iterated in position order.
    entries: BTreeMap<BlockPos, LedgerEntry>,
}

impl EffectStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Return the number of positions holding effects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether no position holds effects.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry at `position`.
    ///
    /// `None` means "no accumulated effects", never an error.
    pub fn get(&self, position: BlockPos) -> Option<&LedgerEntry> {
        self.entries.get(&position)
    }

    /// Iterate over all entries in position order.
    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.values()
    }

    /// Positions that currently hold effects, in position order.
    pub fn positions(&self) -> Vec<BlockPos> {
        self.entries.keys().copied().collect()
    }

    /// Merge `ticks` of `kind` at `level` into the entry at `position`.
    ///
    /// Creates the entry if needed. An existing record keeps the higher
    /// level and adds the durations, capped at [`MAX_REMAINING_TICKS`]. A
    /// new record starts at `min(ticks, MAX_REMAINING_TICKS)`.
    ///
    /// Returns the resulting record, or `None` when a zero-tick merge would
    /// have created an already-expired record (nothing is stored then).
    pub fn merge(
        &mut self,
        position: BlockPos,
        kind: &EffectKind,
        level: u32,
        ticks: u32,
    ) -> Option<EffectRecord> {
        let existing = self
            .entries
            .get(&position)
            .and_then(|entry| entry.records.get(kind))
            .copied();

        let merged = match existing {
            Some(current) => EffectRecord {
                level: current.level.max(level),
                remaining_ticks: current
                    .remaining_ticks
                    .saturating_add(ticks)
                    .min(MAX_REMAINING_TICKS),
            },
            None if ticks == 0 => return None,
            None => EffectRecord::new(level, ticks),
        };

        self.entries
            .entry(position)
            .or_insert_with(|| LedgerEntry::new(position))
            .records
            .insert(kind.clone(), merged);

        debug!(
            %position,
            kind = %kind,
            level = merged.level,
            remaining_ticks = merged.remaining_ticks,
            "Merged effect into ledger"
        );

        Some(merged)
    }

    /// Delete the entry at `position` unconditionally, returning it.
    pub fn remove_entry(&mut self, position: BlockPos) -> Option<LedgerEntry> {
        let removed = self.entries.remove(&position);
        if removed.is_some() {
            debug!(%position, "Removed ledger entry");
        }
        removed
    }

    /// Remove one tick from every record, dropping expired records and any
    /// entry left empty.
    pub fn decay_all(&mut self) -> DecayReport {
        let mut report = DecayReport::default();

        self.entries.retain(|_, entry| {
            let before = entry.records.len();
            entry.records.retain(|_, record| {
                record.remaining_ticks = record.remaining_ticks.saturating_sub(1);
                record.remaining_ticks > 0
            });
            let expired = before.saturating_sub(entry.records.len());
            report.records_expired = report.records_expired.saturating_add(expired);

            let keep = !entry.records.is_empty();
            if !keep {
                report.entries_removed = report.entries_removed.saturating_add(1);
            }
            keep
        });

        report
    }

    /// Ordered copy of every entry, for persistence.
    pub fn snapshot(&self) -> Vec<LedgerEntry> {
        self.entries.values().cloned().collect()
    }

    /// Replace all state with `entries`.
    ///
    /// Durations are capped at [`MAX_REMAINING_TICKS`], expired records and
    /// empty entries are skipped, and entries sharing a position are folded
    /// together with the merge rule.
    pub fn restore(&mut self, entries: Vec<LedgerEntry>) {
        self.entries.clear();
        for entry in entries {
            for (kind, record) in entry.records {
                self.merge(entry.position, &kind, record.level, record.remaining_ticks);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
