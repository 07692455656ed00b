//! In-memory sandbox world implementing every host port.
//!
//! [`MemoryWorld`] keeps blocks, actors, and dropped items in ordered maps
//! so that runs are reproducible. It mimics the host rules the cauldron
//! mechanic depends on: applying an effect never weakens an existing one,
//! and effects expire on their own as [`MemoryWorld::tick_effects`] runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stewpot_types::{
    ActiveEffect, ActorId, BlockKind, BlockPos, BlockState, EffectKind, EffectKindRegistry,
    HeldItem, StaticEffectRegistry,
};
use tracing::debug;

use crate::error::WorldError;
use crate::ports::{ActorEffects, Holdings, WorldQuery};

/// Default number of inventory slots for a sandbox actor.
pub const DEFAULT_INVENTORY_CAPACITY: usize = 36;

/// One actor in the sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxActor {
    /// Display name.
    pub name: String,
    /// Block position the actor occupies.
    pub position: BlockPos,
    /// Whether the actor is crouching.
    pub crouching: bool,
    /// Item in hand.
    pub held: HeldItem,
    /// Stack size of the item in hand.
    pub held_count: u32,
    /// Carried items, one per slot.
    pub inventory: Vec<HeldItem>,
    /// Maximum number of inventory slots.
    pub inventory_capacity: usize,
    /// Applied effects keyed by kind.
    pub effects: BTreeMap<EffectKind, ActiveEffect>,
}

impl SandboxActor {
    /// Create an actor standing at `position` with an empty hand.
    pub fn new(name: impl Into<String>, position: BlockPos) -> Self {
        Self {
            name: name.into(),
            position,
            crouching: false,
            held: HeldItem::Nothing,
            held_count: 0,
            inventory: Vec::new(),
            inventory_capacity: DEFAULT_INVENTORY_CAPACITY,
            effects: BTreeMap::new(),
        }
    }
}

/// A world held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorld {
    /// Effect metadata used to categorize applied effects.
    registry: StaticEffectRegistry,
    /// Non-air blocks.
    blocks: BTreeMap<BlockPos, BlockState>,
    /// Actor roster.
    actors: BTreeMap<ActorId, SandboxActor>,
    /// Items dropped on the ground, in drop order.
    dropped: Vec<(BlockPos, HeldItem)>,
}

impl MemoryWorld {
    /// Create an empty world using `registry` to categorize effects.
    pub const fn new(registry: StaticEffectRegistry) -> Self {
        Self {
            registry,
            blocks: BTreeMap::new(),
            actors: BTreeMap::new(),
            dropped: Vec::new(),
        }
    }

    /// The effect registry this world categorizes with.
    pub const fn registry(&self) -> &StaticEffectRegistry {
        &self.registry
    }

    /// Place a full water cauldron at `position` on top of `support`.
    pub fn build_cauldron(&mut self, position: BlockPos, support: BlockKind, fill_level: u8) {
        self.set_block_state(position, BlockState::water_cauldron(fill_level));
        self.set_block_state(position.below(), BlockState::of(support));
    }

    /// Add an actor to the roster.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateActor`] if `id` is already present.
    pub fn add_actor(&mut self, id: ActorId, actor: SandboxActor) -> Result<(), WorldError> {
        if self.actors.contains_key(&id) {
            return Err(WorldError::DuplicateActor(id));
        }
        self.actors.insert(id, actor);
        Ok(())
    }

    /// Create a fresh actor at `position` and return its id.
    pub fn spawn_actor(&mut self, name: impl Into<String>, position: BlockPos) -> ActorId {
        let id = ActorId::new();
        self.actors.insert(id, SandboxActor::new(name, position));
        id
    }

    /// Look up an actor.
    pub fn actor(&self, id: ActorId) -> Option<&SandboxActor> {
        self.actors.get(&id)
    }

    /// Look up an actor for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ActorNotFound`] if the actor is not present.
    pub fn actor_mut(&mut self, id: ActorId) -> Result<&mut SandboxActor, WorldError> {
        self.actors.get_mut(&id).ok_or(WorldError::ActorNotFound(id))
    }

    /// All actor ids in roster order.
    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    /// Move an actor to `position`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ActorNotFound`] if the actor is not present.
    pub fn move_actor(&mut self, id: ActorId, position: BlockPos) -> Result<(), WorldError> {
        self.actor_mut(id)?.position = position;
        Ok(())
    }

    /// Put `count` of `item` in the actor's hand.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ActorNotFound`] if the actor is not present.
    pub fn set_held(&mut self, id: ActorId, item: HeldItem, count: u32) -> Result<(), WorldError> {
        let actor = self.actor_mut(id)?;
        actor.held = item;
        actor.held_count = count;
        Ok(())
    }

    /// Items dropped on the ground so far.
    pub fn dropped_items(&self) -> &[(BlockPos, HeldItem)] {
        &self.dropped
    }

    /// Advance every actor's effects by one tick, expiring finished ones.
    pub fn tick_effects(&mut self) {
        for actor in self.actors.values_mut() {
            actor.effects.retain(|_, effect| {
                effect.remaining_ticks = effect.remaining_ticks.saturating_sub(1);
                effect.remaining_ticks > 0
            });
        }
    }
}

impl WorldQuery for MemoryWorld {
    fn block_state_at(&self, position: BlockPos) -> BlockState {
        self.blocks
            .get(&position)
            .copied()
            .unwrap_or(BlockState::of(BlockKind::Air))
    }

    fn set_block_state(&mut self, position: BlockPos, state: BlockState) {
        if state.kind == BlockKind::Air {
            self.blocks.remove(&position);
        } else {
            self.blocks.insert(position, state);
        }
    }
}

impl ActorEffects for MemoryWorld {
    fn active(&self, actor: ActorId) -> Vec<ActiveEffect> {
        self.actors
            .get(&actor)
            .map(|a| a.effects.values().cloned().collect())
            .unwrap_or_default()
    }

    fn remove(&mut self, actor: ActorId, kind: &EffectKind) {
        if let Some(a) = self.actors.get_mut(&actor) {
            a.effects.remove(kind);
        }
    }

    fn apply(&mut self, actor: ActorId, kind: &EffectKind, level: u32, remaining_ticks: u32) {
        if remaining_ticks == 0 {
            return;
        }
        let category = self.registry.category(kind);
        let Some(a) = self.actors.get_mut(&actor) else {
            return;
        };

        // Never weaken: a lower level, or the same level with less time, is ignored.
        if let Some(existing) = a.effects.get(kind) {
            let stronger = level > existing.level
                || (level == existing.level && remaining_ticks > existing.remaining_ticks);
            if !stronger {
                return;
            }
        }

        a.effects.insert(kind.clone(), ActiveEffect {
            kind: kind.clone(),
            level,
            remaining_ticks,
            category,
        });
        debug!(%actor, kind = %kind, level, remaining_ticks, "Applied effect");
    }
}

impl Holdings for MemoryWorld {
    fn consume_held(&mut self, actor: ActorId) {
        if let Some(a) = self.actors.get_mut(&actor) {
            a.held_count = a.held_count.saturating_sub(1);
            if a.held_count == 0 {
                a.held = HeldItem::Nothing;
            }
        }
    }

    fn give(&mut self, actor: ActorId, item: HeldItem) -> Result<(), HeldItem> {
        match self.actors.get_mut(&actor) {
            Some(a) if a.inventory.len() < a.inventory_capacity => {
                a.inventory.push(item);
                Ok(())
            }
            _ => Err(item),
        }
    }

    fn drop_item(&mut self, actor: ActorId, item: HeldItem) {
        let position = self
            .actors
            .get(&actor)
            .map_or(BlockPos::new(0, 0, 0), |a| a.position);
        self.dropped.push((position, item));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use stewpot_types::EffectCategory;

    use super::*;

    fn world() -> MemoryWorld {
        MemoryWorld::new(StaticEffectRegistry::vanilla())
    }

    fn kind(key: &str) -> EffectKind {
        StaticEffectRegistry::vanilla().resolve(key).unwrap()
    }

    #[test]
    fn unknown_positions_are_air() {
        let w = world();
        assert_eq!(w.block_state_at(BlockPos::new(0, 0, 0)).kind, BlockKind::Air);
    }

    #[test]
    fn build_cauldron_places_support_below() {
        let mut w = world();
        let pos = BlockPos::new(0, 64, 0);
        w.build_cauldron(pos, BlockKind::MagmaBlock, 3);
        assert!(w.block_state_at(pos).is_full_water_container(3));
        assert_eq!(w.block_state_at(pos.below()).kind, BlockKind::MagmaBlock);

        w.set_block_state(pos, BlockState::of(BlockKind::Air));
        assert_eq!(w.block_state_at(pos).kind, BlockKind::Air);
    }

    #[test]
    fn apply_categorizes_and_never_weakens() {
        let mut w = world();
        let id = w.spawn_actor("Alder", BlockPos::new(0, 64, 0));
        let poison = kind("poison");

        w.apply(id, &poison, 1, 400);
        w.apply(id, &poison, 0, 900);
        w.apply(id, &poison, 1, 100);

        let active = w.active(id);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].level, 1);
        assert_eq!(active[0].remaining_ticks, 400);
        assert_eq!(active[0].category, EffectCategory::Harmful);

        w.remove(id, &poison);
        w.apply(id, &poison, 1, 100);
        assert_eq!(w.active(id)[0].remaining_ticks, 100);
    }

    #[test]
    fn effects_expire_with_ticks() {
        let mut w = world();
        let id = w.spawn_actor("Birch", BlockPos::new(0, 64, 0));
        w.apply(id, &kind("speed"), 0, 2);
        w.tick_effects();
        assert_eq!(w.active(id).len(), 1);
        w.tick_effects();
        assert!(w.active(id).is_empty());
    }

    #[test]
    fn give_falls_back_when_full() {
        let mut w = world();
        let id = w.spawn_actor("Cedar", BlockPos::new(0, 64, 0));
        w.actor_mut(id).unwrap().inventory_capacity = 1;

        assert!(w.give(id, HeldItem::Bowl).is_ok());
        let rejected = w.give(id, HeldItem::Bucket);
        assert_eq!(rejected, Err(HeldItem::Bucket));

        w.drop_item(id, HeldItem::Bucket);
        assert_eq!(w.dropped_items(), &[(BlockPos::new(0, 64, 0), HeldItem::Bucket)]);
    }

    #[test]
    fn actor_with_stew_survives_json() {
        let mut w = world();
        let id = w.spawn_actor("Grove", BlockPos::new(4, 64, 2));
        w.apply(id, &kind("poison"), 1, 400);
        w.set_held(id, HeldItem::Bowl, 3).unwrap();
        let stew = HeldItem::Stew(stewpot_types::EncodedStack {
            title: "Mystery Stew".to_owned(),
            lines: vec!["Poison II 00:20 [minecraft:poison]".to_owned()],
        });
        assert!(w.give(id, stew).is_ok());

        let actor = w.actor(id).unwrap();
        let json = serde_json::to_string(actor).unwrap();
        let restored: SandboxActor = serde_json::from_str(&json).unwrap();
        assert_eq!(&restored, actor);
    }

    #[test]
    fn consume_held_empties_hand() {
        let mut w = world();
        let id = w.spawn_actor("Dusk", BlockPos::new(0, 64, 0));
        w.set_held(id, HeldItem::Bowl, 2).unwrap();
        w.consume_held(id);
        assert_eq!(w.actor(id).unwrap().held, HeldItem::Bowl);
        w.consume_held(id);
        assert_eq!(w.actor(id).unwrap().held, HeldItem::Nothing);
    }

    #[test]
    fn roster_errors() {
        let mut w = world();
        let id = w.spawn_actor("Ember", BlockPos::new(0, 64, 0));
        assert!(matches!(
            w.add_actor(id, SandboxActor::new("Fern", BlockPos::new(1, 1, 1))),
            Err(WorldError::DuplicateActor(_))
        ));
        assert!(matches!(
            w.move_actor(ActorId::new(), BlockPos::new(0, 0, 0)),
            Err(WorldError::ActorNotFound(_))
        ));
    }
}
