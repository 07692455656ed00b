//! Shared type definitions for the Stewpot effect cauldron.
//!
//! This crate is the single source of truth for the data that flows between
//! the ledger, the codec, the interaction state machine, and the host world.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for actor identifiers
//! - [`enums`] -- Enumeration types (effect categories, block kinds, surfaces, held items)
//! - [`structs`] -- Core data structs (positions, effect records, ledger entries, encoded forms)
//! - [`registry`] -- The [`EffectKindRegistry`] lookup trait and a static implementation

pub mod enums;
pub mod ids;
pub mod registry;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BlockKind, EffectCategory, HeldItem, SurfaceKind};
pub use ids::ActorId;
pub use registry::{
    DEFAULT_NAMESPACE, EffectDescriptor, EffectKindRegistry, StaticEffectRegistry, normalize_key,
};
pub use structs::{
    ActiveEffect, BlockPos, BlockState, EffectKind, EffectRecord, EncodedEffect, EncodedStack,
    LedgerEntry, MAX_REMAINING_TICKS, TICKS_PER_SECOND,
};
