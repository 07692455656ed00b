//! Per-position effect ledger for the Stewpot effect cauldron.
//!
//! Every cauldron that has soaked up effects owns one [`LedgerEntry`] in the
//! [`EffectStore`]. Entries only grow through [`EffectStore::merge`] and only
//! shrink through [`EffectStore::decay_all`] or wholesale removal.
//!
//! # Architecture
//!
//! - [`store`] -- The [`EffectStore`] struct: merge, decay, lookup, removal.
//! - [`snapshot`] -- The persisted layout ([`LedgerSnapshot`]) and its
//!   conversion to and from store state through an effect registry.
//!
//! # Merge Rule
//!
//! For a kind already present at a position:
//!
//! ```text
//! level          = max(existing.level, merged.level)
//! remaining_ticks = min(existing.remaining_ticks + merged.ticks, 72000)
//! ```
//!
//! Lookups never fail: a position without an entry simply has no
//! accumulated effects.
//!
//! # Usage
//!
//! ```
//! use stewpot_ledger::EffectStore;
//! use stewpot_types::{BlockPos, EffectKind};
//!
//! let mut store = EffectStore::new();
//! let pos = BlockPos::new(0, 64, 0);
//! let poison = EffectKind::new("minecraft:poison");
//!
//! store.merge(pos, &poison, 1, 600);
//! store.merge(pos, &poison, 0, 500);
//!
//! let record = store.get(pos).and_then(|e| e.record(&poison)).copied();
//! assert_eq!(record.map(|r| (r.level, r.remaining_ticks)), Some((1, 1100)));
//! ```
//!
//! [`LedgerEntry`]: stewpot_types::LedgerEntry

pub mod snapshot;
pub mod store;

// Re-export primary types at crate root.
pub use snapshot::{LedgerSnapshot, PersistedEntry, PersistedRecord, RestoreReport, SNAPSHOT_VERSION};
pub use store::{DecayReport, EffectStore};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when encoding or decoding a ledger snapshot.
///
/// Store operations themselves are infallible.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The snapshot could not be serialized or parsed as JSON.
    #[error("snapshot JSON error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The snapshot was written by an incompatible format version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the snapshot.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
}
