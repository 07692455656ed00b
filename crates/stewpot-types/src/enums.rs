//! Enumeration types for the Stewpot effect cauldron.
//!
//! Block kinds are a deliberately small slice of the host world: only the
//! blocks that decide whether a cauldron collects, cools, or does nothing
//! are named. Everything else collapses into [`BlockKind::Other`].

use serde::{Deserialize, Serialize};

use crate::structs::EncodedStack;

// ---------------------------------------------------------------------------
// Effect categories
// ---------------------------------------------------------------------------

/// The broad category of a status effect.
///
/// Cooling surfaces only drain [`EffectCategory::Harmful`] effects; heating
/// surfaces drain every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    /// Helpful effects (speed, regeneration, ...).
    Beneficial,
    /// Debuffs (poison, slowness, ...).
    Harmful,
    /// Effects with no clear sign (glowing, bad omen, ...).
    Neutral,
}

impl EffectCategory {
    /// Whether this category is drained by a cooling surface.
    pub const fn is_harmful(self) -> bool {
        matches!(self, Self::Harmful)
    }
}

// ---------------------------------------------------------------------------
// Blocks and surfaces
// ---------------------------------------------------------------------------

/// The kind of block occupying a world position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Nothing there.
    Air,
    /// An empty cauldron.
    Cauldron,
    /// A cauldron holding water; its fill level lives on the block state.
    WaterCauldron,
    /// A campfire, lit or extinguished.
    Campfire {
        /// Whether the fire is burning.
        lit: bool,
    },
    /// A magma block.
    MagmaBlock,
    /// A lava source or flow.
    Lava,
    /// Any block that plays no part in the cauldron mechanic.
    Other,
}

impl BlockKind {
    /// Whether this block is a water-holding container that can own a
    /// ledger entry.
    pub const fn is_water_container(self) -> bool {
        matches!(self, Self::WaterCauldron)
    }
}

/// The role a block plays when it sits directly below a full container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// Drains harmful effects from the bather without storing them.
    Cooling,
    /// Drains every effect from the bather into the container's ledger entry.
    Heating,
}

impl SurfaceKind {
    /// Classify a supporting block. Returns `None` for inert blocks.
    pub const fn of(kind: BlockKind) -> Option<Self> {
        match kind {
            BlockKind::Campfire { lit: true } => Some(Self::Cooling),
            BlockKind::MagmaBlock | BlockKind::Lava => Some(Self::Heating),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Held items
// ---------------------------------------------------------------------------

/// The item an actor is holding when interacting with a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "item")]
pub enum HeldItem {
    /// Empty hand.
    Nothing,
    /// An empty bowl: the vessel that crystallizes a container.
    Bowl,
    /// An empty glass bottle.
    GlassBottle,
    /// An empty bucket.
    Bucket,
    /// A crystallized stew carrying encoded effects.
    Stew(EncodedStack),
    /// Anything else, named for diagnostics.
    Other {
        /// Host item identifier.
        name: String,
    },
}

impl HeldItem {
    /// Whether this item would draw water out of a cauldron.
    pub const fn draws_water(&self) -> bool {
        matches!(self, Self::GlassBottle | Self::Bucket)
    }
}
