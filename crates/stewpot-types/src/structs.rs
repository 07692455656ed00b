//! Core data structs for the Stewpot effect cauldron.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{BlockKind, EffectCategory};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upper bound on the remaining duration of any stored effect record
/// (one hour of game time).
pub const MAX_REMAINING_TICKS: u32 = 72_000;

/// Host ticks per displayed second.
pub const TICKS_PER_SECOND: u32 = 20;

// ---------------------------------------------------------------------------
// Positions and blocks
// ---------------------------------------------------------------------------

/// An integer block position in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// East-west coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
    /// North-south coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Create a position from its three coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The position directly below this one. Saturates at the bottom of the
    /// coordinate range.
    pub const fn below(self) -> Self {
        Self {
            x: self.x,
            y: self.y.saturating_sub(1),
            z: self.z,
        }
    }
}

impl core::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<BlockPos> for [i32; 3] {
    fn from(pos: BlockPos) -> Self {
        [pos.x, pos.y, pos.z]
    }
}

/// The observable state of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    /// What the block is.
    pub kind: BlockKind,
    /// Fill level for layered containers (1..=3 for a water cauldron).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_level: Option<u8>,
}

impl BlockState {
    /// A block state with no fill level.
    pub const fn of(kind: BlockKind) -> Self {
        Self {
            kind,
            fill_level: None,
        }
    }

    /// A water cauldron at the given fill level.
    pub const fn water_cauldron(fill_level: u8) -> Self {
        Self {
            kind: BlockKind::WaterCauldron,
            fill_level: Some(fill_level),
        }
    }

    /// Whether this is a water container filled to exactly `full_level`.
    pub fn is_full_water_container(&self, full_level: u8) -> bool {
        self.kind.is_water_container() && self.fill_level == Some(full_level)
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// The durable identity of a status effect: its namespaced canonical key
/// (e.g. `minecraft:speed`).
///
/// Kinds are normally obtained from an
/// [`EffectKindRegistry`](crate::registry::EffectKindRegistry), which
/// guarantees the key is known to the host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectKind(String);

impl EffectKind {
    /// Wrap a canonical key without registry validation.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The canonical key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accumulated potency of one effect kind inside a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectRecord {
    /// Amplifier, 0-based (level 0 displays as `I`).
    pub level: u32,
    /// Ticks of duration left, at most [`MAX_REMAINING_TICKS`].
    pub remaining_ticks: u32,
}

impl EffectRecord {
    /// Create a record, capping the duration at [`MAX_REMAINING_TICKS`].
    pub fn new(level: u32, remaining_ticks: u32) -> Self {
        Self {
            level,
            remaining_ticks: remaining_ticks.min(MAX_REMAINING_TICKS),
        }
    }
}

/// All effect records accumulated at one container position.
///
/// At most one record exists per [`EffectKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The container's position.
    pub position: BlockPos,
    /// Records keyed by effect kind, iterated in key order.
    pub records: BTreeMap<EffectKind, EffectRecord>,
}

impl LedgerEntry {
    /// Create an entry with no records.
    pub const fn new(position: BlockPos) -> Self {
        Self {
            position,
            records: BTreeMap::new(),
        }
    }

    /// Whether the entry holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up the record for one kind.
    pub fn record(&self, kind: &EffectKind) -> Option<&EffectRecord> {
        self.records.get(kind)
    }
}

/// An effect currently applied to an actor, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    /// Which effect.
    pub kind: EffectKind,
    /// Amplifier, 0-based.
    pub level: u32,
    /// Ticks left before the host expires it.
    pub remaining_ticks: u32,
    /// Category used to decide whether cooling drains it.
    pub category: EffectCategory,
}

// ---------------------------------------------------------------------------
// Encoded forms
// ---------------------------------------------------------------------------

/// The display-text form of one effect record.
///
/// Only `effect_kind` is authoritative; the other fields are derived for
/// display and re-derived on every encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedEffect {
    /// Localized effect name.
    pub display_name: String,
    /// Numeral for `level + 1`.
    pub level_glyph: String,
    /// Remaining duration as `MM:SS`.
    pub time_text: String,
    /// Canonical key of the effect kind.
    pub effect_kind: String,
}

impl EncodedEffect {
    /// Render as a single lore line: `"{name} {glyph} {time} [{key}]"`.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl core::fmt::Display for EncodedEffect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.display_name, self.level_glyph, self.time_text, self.effect_kind
        )
    }
}

/// A portable crystallized item: a title and one text line per effect.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodedStack {
    /// Item display title.
    pub title: String,
    /// Lore lines. Effect lines end in a bracketed canonical key.
    pub lines: Vec<String>,
}
