//! Per-actor cauldron interaction lifecycle.
//!
//! Each actor is either cooling down until some tick or active. An active
//! actor standing in a full water cauldron is drained every step: a cooling
//! surface burns harmful effects away, a heating surface pulls every effect
//! into the ledger entry at the cauldron. Offering a bowl crystallizes that
//! entry into a stew, and eating the stew applies the effects again.
//!
//! Actors that have nothing to contribute are put on cooldown so they are
//! skipped for a while. Cooldowns are only a throttle: dropping one costs a
//! redundant step, never a wrong duration.

use std::collections::BTreeMap;

use stewpot_ledger::EffectStore;
use stewpot_types::{
    ActiveEffect, ActorId, BlockKind, BlockPos, BlockState, EffectKindRegistry, EncodedStack,
    HeldItem, SurfaceKind,
};
use stewpot_world::{ActorEffects, Holdings, WorldQuery};
use tracing::{debug, info};

use crate::codec::EncodingCodec;
use crate::config::TuningConfig;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Where an actor stands in the cooldown cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorPhase {
    /// Skipped until the clock reaches `until`.
    CoolingDown {
        /// First tick at which the actor is active again.
        until: u64,
    },
    /// Examined on every step.
    Active,
}

/// Result of one actor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The actor is still cooling down; nothing was read.
    Waiting {
        /// First tick at which the actor is active again.
        until: u64,
    },
    /// The actor is not in a water cauldron; cooldown started.
    NotInContainer {
        /// First tick at which the actor is active again.
        until: u64,
    },
    /// The actor is in a water cauldron below the full fill level. No
    /// cooldown, so a refill is noticed on the next step.
    NotFull,
    /// The actor is in a full cauldron but carries no effects; cooldown
    /// started.
    NothingToDrain {
        /// First tick at which the actor is active again.
        until: u64,
    },
    /// The cauldron sits on a surface that neither cools nor heats.
    Idle,
    /// A cooling surface drained harmful effects.
    Cooled {
        /// Effects shortened.
        drained: usize,
        /// Effects removed because they ran out.
        removed: usize,
    },
    /// A heating surface moved effect time into the ledger.
    Collected {
        /// Effects shortened.
        drained: usize,
        /// Effects removed because they ran out.
        removed: usize,
        /// Total ticks merged into the ledger entry.
        ticks_collected: u64,
    },
}

/// Result of one actor step together with the cauldron's brewing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// What the step did.
    pub outcome: StepOutcome,
    /// Whether the actor's cauldron holds a non-empty ledger entry after
    /// the step.
    pub brewing: bool,
}

/// Why an item use on a cauldron was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// Water holding collected effects can only be drawn with a bowl.
    UseBowlInstead,
}

impl core::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UseBowlInstead => f.write_str("use_bowl_instead"),
        }
    }
}

/// Where a crystallized stack ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Placed in the actor's holding set.
    Inventory,
    /// The holding set was full; dropped at the actor's feet.
    Dropped,
}

/// Result of using an item on a cauldron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Not intercepted; the host handles the use normally.
    PassThrough,
    /// Intercepted and refused.
    Denied(DenialReason),
    /// The ledger entry was crystallized into a stack.
    Crystallized {
        /// The stack handed to the actor.
        stack: EncodedStack,
        /// Where the stack went.
        delivery: Delivery,
    },
}

/// An actor using its held item on a block.
#[derive(Debug, Clone, Copy)]
pub struct ItemUse<'a> {
    /// The acting actor.
    pub actor: ActorId,
    /// The block the item is used on.
    pub position: BlockPos,
    /// The item in the actor's hand.
    pub held: &'a HeldItem,
    /// Whether the actor is crouching.
    pub crouching: bool,
}

/// Result of eating a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumption {
    /// Effects handed to the host.
    pub applied: usize,
    /// Decoded records with no duration left, not applied.
    pub skipped: usize,
    /// What replaces the eaten stack.
    pub vessel: HeldItem,
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Cooldown tracking and cauldron interactions for every actor.
#[derive(Debug, Clone, Default)]
pub struct InteractionStateMachine {
    /// Mechanic constants.
    tuning: TuningConfig,
    /// Actors on cooldown, keyed to the first tick they are active again.
    cooldowns: BTreeMap<ActorId, u64>,
}

impl InteractionStateMachine {
    /// Create a state machine with no actors on cooldown.
    pub const fn new(tuning: TuningConfig) -> Self {
        Self {
            tuning,
            cooldowns: BTreeMap::new(),
        }
    }

    /// The mechanic constants in use.
    pub const fn tuning(&self) -> &TuningConfig {
        &self.tuning
    }

    /// The actor's phase at tick `now`.
    pub fn phase(&self, actor: ActorId, now: u64) -> ActorPhase {
        match self.cooldowns.get(&actor) {
            Some(&until) if now < until => ActorPhase::CoolingDown { until },
            _ => ActorPhase::Active,
        }
    }

    /// Number of actors with a cooldown entry, expired or not.
    pub fn cooldown_count(&self) -> usize {
        self.cooldowns.len()
    }

    /// Drop cooldown entries that have expired by `now`.
    pub fn prune_cooldowns(&mut self, now: u64) {
        self.cooldowns.retain(|_, until| now < *until);
    }

    /// Forget an actor entirely (it left the world).
    pub fn forget(&mut self, actor: ActorId) {
        self.cooldowns.remove(&actor);
    }

    fn start_cooldown(&mut self, actor: ActorId, now: u64) -> u64 {
        let until = now.saturating_add(self.tuning.cooldown_ticks);
        self.cooldowns.insert(actor, until);
        until
    }

    /// Run one step for `actor` standing at `position` at tick `now`.
    pub fn step<H>(
        &mut self,
        now: u64,
        actor: ActorId,
        position: BlockPos,
        store: &mut EffectStore,
        host: &mut H,
    ) -> StepReport
    where
        H: WorldQuery + ActorEffects + ?Sized,
    {
        let outcome = self.step_outcome(now, actor, position, store, host);
        let examined = !matches!(
            outcome,
            StepOutcome::Waiting { .. }
                | StepOutcome::NotInContainer { .. }
                | StepOutcome::NotFull
        );
        let brewing = examined && store.get(position).is_some_and(|entry| !entry.is_empty());
        StepReport { outcome, brewing }
    }

    fn step_outcome<H>(
        &mut self,
        now: u64,
        actor: ActorId,
        position: BlockPos,
        store: &mut EffectStore,
        host: &mut H,
    ) -> StepOutcome
    where
        H: WorldQuery + ActorEffects + ?Sized,
    {
        if let ActorPhase::CoolingDown { until } = self.phase(actor, now) {
            return StepOutcome::Waiting { until };
        }
        self.cooldowns.remove(&actor);

        let state = host.block_state_at(position);
        if !state.kind.is_water_container() {
            let until = self.start_cooldown(actor, now);
            return StepOutcome::NotInContainer { until };
        }
        if !state.is_full_water_container(self.tuning.full_fill_level) {
            return StepOutcome::NotFull;
        }

        let effects = host.active(actor);
        if effects.is_empty() {
            let until = self.start_cooldown(actor, now);
            return StepOutcome::NothingToDrain { until };
        }

        match SurfaceKind::of(host.block_state_at(position.below()).kind) {
            Some(SurfaceKind::Cooling) => self.cool(actor, &effects, host),
            Some(SurfaceKind::Heating) => self.collect(actor, position, &effects, store, host),
            None => StepOutcome::Idle,
        }
    }

    /// Shorten every harmful effect by the drain amount, removing those
    /// that run out. Nothing reaches the ledger.
    fn cool<H>(&self, actor: ActorId, effects: &[ActiveEffect], host: &mut H) -> StepOutcome
    where
        H: ActorEffects + ?Sized,
    {
        let mut drained: usize = 0;
        let mut removed: usize = 0;

        for effect in effects.iter().filter(|e| e.category.is_harmful()) {
            host.remove(actor, &effect.kind);
            match effect.remaining_ticks.checked_sub(self.tuning.drain_per_step) {
                Some(left) if left > 0 => {
                    host.apply(actor, &effect.kind, effect.level, left);
                    drained = drained.saturating_add(1);
                }
                _ => removed = removed.saturating_add(1),
            }
        }

        debug!(%actor, drained, removed, "Cooled harmful effects");
        StepOutcome::Cooled { drained, removed }
    }

    /// Shorten every effect by the drain amount and merge what was drained
    /// into the ledger. An effect that runs out merges all it had left.
    fn collect<H>(
        &self,
        actor: ActorId,
        position: BlockPos,
        effects: &[ActiveEffect],
        store: &mut EffectStore,
        host: &mut H,
    ) -> StepOutcome
    where
        H: ActorEffects + ?Sized,
    {
        let drain = self.tuning.drain_per_step;
        let mut drained: usize = 0;
        let mut removed: usize = 0;
        let mut ticks_collected: u64 = 0;

        for effect in effects {
            host.remove(actor, &effect.kind);
            let taken = match effect.remaining_ticks.checked_sub(drain) {
                Some(left) if left > 0 => {
                    host.apply(actor, &effect.kind, effect.level, left);
                    drained = drained.saturating_add(1);
                    drain
                }
                _ => {
                    removed = removed.saturating_add(1);
                    effect.remaining_ticks
                }
            };
            store.merge(position, &effect.kind, effect.level, taken);
            ticks_collected = ticks_collected.saturating_add(u64::from(taken));
        }

        debug!(%actor, %position, drained, removed, ticks_collected, "Collected effects into cauldron");
        StepOutcome::Collected {
            drained,
            removed,
            ticks_collected,
        }
    }

    /// Handle an actor using its held item on the block at `use.position`.
    ///
    /// A bowl offered while standing upright at a full cauldron with a
    /// ledger entry crystallizes it: the cauldron is emptied, the entry
    /// removed and encoded, one bowl consumed, and the stack delivered (or
    /// dropped when the holding set is full). A bottle or bucket offered to
    /// a cauldron with an entry over a heating surface is denied. Every
    /// other use passes through.
    pub fn use_item<H, R>(
        &self,
        item_use: ItemUse<'_>,
        store: &mut EffectStore,
        codec: &EncodingCodec<'_, R>,
        host: &mut H,
    ) -> InteractionOutcome
    where
        H: WorldQuery + Holdings + ?Sized,
        R: EffectKindRegistry + ?Sized,
    {
        let ItemUse {
            actor,
            position,
            held,
            crouching,
        } = item_use;

        let state = host.block_state_at(position);
        if state.kind != BlockKind::WaterCauldron {
            return InteractionOutcome::PassThrough;
        }
        let Some(entry) = store.get(position).filter(|entry| !entry.is_empty()) else {
            return InteractionOutcome::PassThrough;
        };

        let heated = SurfaceKind::of(host.block_state_at(position.below()).kind)
            == Some(SurfaceKind::Heating);
        if held.draws_water() && heated {
            debug!(%actor, %position, "Denied drawing water from brewing cauldron");
            return InteractionOutcome::Denied(DenialReason::UseBowlInstead);
        }

        if *held != HeldItem::Bowl
            || crouching
            || !state.is_full_water_container(self.tuning.full_fill_level)
        {
            return InteractionOutcome::PassThrough;
        }

        let stack = codec.encode_stack(&entry.records);
        store.remove_entry(position);
        host.set_block_state(position, BlockState::of(BlockKind::Cauldron));

        let delivery = match host.give(actor, HeldItem::Stew(stack.clone())) {
            Ok(()) => Delivery::Inventory,
            Err(item) => {
                host.drop_item(actor, item);
                Delivery::Dropped
            }
        };
        host.consume_held(actor);

        info!(
            %actor,
            %position,
            effects = stack.lines.len(),
            ?delivery,
            "Crystallized cauldron into stew"
        );
        InteractionOutcome::Crystallized { stack, delivery }
    }

    /// Apply every effect encoded on `stack` to `actor`.
    ///
    /// Always succeeds and always hands back an empty bowl. Records decoded
    /// with no duration left are skipped.
    pub fn consume<H, R>(
        actor: ActorId,
        stack: &EncodedStack,
        codec: &EncodingCodec<'_, R>,
        host: &mut H,
    ) -> Consumption
    where
        H: ActorEffects + ?Sized,
        R: EffectKindRegistry + ?Sized,
    {
        let mut applied: usize = 0;
        let mut skipped: usize = 0;

        for (kind, record) in codec.decode_stack(stack) {
            if record.remaining_ticks == 0 {
                skipped = skipped.saturating_add(1);
                continue;
            }
            host.apply(actor, &kind, record.level, record.remaining_ticks);
            applied = applied.saturating_add(1);
        }

        info!(%actor, applied, skipped, "Consumed stew");
        Consumption {
            applied,
            skipped,
            vessel: HeldItem::Bowl,
        }
    }

    /// Discard the ledger entry of a broken water cauldron.
    ///
    /// `broken` is the block kind that was destroyed; other kinds leave the
    /// ledger untouched. Returns whether an entry was removed.
    pub fn on_container_broken(
        position: BlockPos,
        broken: BlockKind,
        store: &mut EffectStore,
    ) -> bool {
        if !broken.is_water_container() {
            return false;
        }
        store.remove_entry(position).is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use stewpot_types::{EffectKind, StaticEffectRegistry};
    use stewpot_world::MemoryWorld;

    use super::*;

    const CAULDRON: BlockPos = BlockPos { x: 0, y: 64, z: 0 };

    fn setup(support: BlockKind) -> (MemoryWorld, ActorId) {
        let mut world = MemoryWorld::new(StaticEffectRegistry::vanilla());
        world.build_cauldron(CAULDRON, support, 3);
        let actor = world.spawn_actor("Alder", CAULDRON);
        (world, actor)
    }

    fn kind(key: &str) -> EffectKind {
        StaticEffectRegistry::vanilla().resolve(key).unwrap()
    }

    fn machine() -> InteractionStateMachine {
        InteractionStateMachine::new(TuningConfig::default())
    }

    #[test]
    fn out_of_container_starts_cooldown() {
        let (mut world, actor) = setup(BlockKind::MagmaBlock);
        world.move_actor(actor, BlockPos::new(5, 64, 5)).unwrap();
        let mut store = EffectStore::new();
        let mut sm = machine();

        let report = sm.step(100, actor, BlockPos::new(5, 64, 5), &mut store, &mut world);
        assert_eq!(report.outcome, StepOutcome::NotInContainer { until: 160 });
        assert_eq!(sm.phase(actor, 159), ActorPhase::CoolingDown { until: 160 });
        assert_eq!(sm.phase(actor, 160), ActorPhase::Active);

        let report = sm.step(130, actor, CAULDRON, &mut store, &mut world);
        assert_eq!(report.outcome, StepOutcome::Waiting { until: 160 });
    }

    #[test]
    fn partial_fill_waits_without_cooldown() {
        let (mut world, actor) = setup(BlockKind::MagmaBlock);
        world.set_block_state(CAULDRON, BlockState::water_cauldron(2));
        world.apply(actor, &kind("speed"), 0, 600);
        let mut store = EffectStore::new();
        let mut sm = machine();

        let report = sm.step(0, actor, CAULDRON, &mut store, &mut world);
        assert_eq!(report.outcome, StepOutcome::NotFull);
        assert!(!report.brewing);
        assert_eq!(sm.phase(actor, 1), ActorPhase::Active);
        assert!(store.is_empty());

        world.set_block_state(CAULDRON, BlockState::water_cauldron(3));
        let report = sm.step(1, actor, CAULDRON, &mut store, &mut world);
        assert!(matches!(report.outcome, StepOutcome::Collected { .. }));
        assert_eq!(
            store.get(CAULDRON).unwrap().record(&kind("speed")).unwrap().remaining_ticks,
            30
        );
    }

    #[test]
    fn no_effects_starts_cooldown() {
        let (mut world, actor) = setup(BlockKind::MagmaBlock);
        let mut store = EffectStore::new();
        let mut sm = machine();

        let report = sm.step(10, actor, CAULDRON, &mut store, &mut world);
        assert_eq!(report.outcome, StepOutcome::NothingToDrain { until: 70 });
    }

    #[test]
    fn cooling_drains_only_harmful_effects() {
        let (mut world, actor) = setup(BlockKind::Campfire { lit: true });
        world.apply(actor, &kind("poison"), 1, 100);
        world.apply(actor, &kind("wither"), 0, 20);
        world.apply(actor, &kind("speed"), 0, 100);
        let mut store = EffectStore::new();
        let mut sm = machine();

        let report = sm.step(0, actor, CAULDRON, &mut store, &mut world);
        assert_eq!(report.outcome, StepOutcome::Cooled { drained: 1, removed: 1 });
        assert!(!report.brewing);
        assert!(store.is_empty());

        let active = world.active(actor);
        assert_eq!(active.len(), 2);
        let poison = active.iter().find(|e| e.kind == kind("poison")).unwrap();
        assert_eq!(poison.remaining_ticks, 70);
        assert_eq!(poison.level, 1);
        let speed = active.iter().find(|e| e.kind == kind("speed")).unwrap();
        assert_eq!(speed.remaining_ticks, 100);
    }

    #[test]
    fn unlit_campfire_is_idle() {
        let (mut world, actor) = setup(BlockKind::Campfire { lit: false });
        world.apply(actor, &kind("poison"), 0, 100);
        let mut store = EffectStore::new();
        let mut sm = machine();

        let report = sm.step(0, actor, CAULDRON, &mut store, &mut world);
        assert_eq!(report.outcome, StepOutcome::Idle);
        assert_eq!(world.active(actor)[0].remaining_ticks, 100);
    }

    #[test]
    fn heating_collects_drain_and_remainder() {
        let (mut world, actor) = setup(BlockKind::Lava);
        world.apply(actor, &kind("speed"), 2, 100);
        world.apply(actor, &kind("poison"), 0, 25);
        let mut store = EffectStore::new();
        let mut sm = machine();

        let report = sm.step(0, actor, CAULDRON, &mut store, &mut world);
        assert_eq!(report.outcome, StepOutcome::Collected {
            drained: 1,
            removed: 1,
            ticks_collected: 55,
        });
        assert!(report.brewing);

        let entry = store.get(CAULDRON).unwrap();
        assert_eq!(entry.record(&kind("speed")).unwrap().remaining_ticks, 30);
        assert_eq!(entry.record(&kind("speed")).unwrap().level, 2);
        assert_eq!(entry.record(&kind("poison")).unwrap().remaining_ticks, 25);

        let active = world.active(actor);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].remaining_ticks, 70);
    }

    #[test]
    fn exact_drain_removes_effect() {
        let (mut world, actor) = setup(BlockKind::MagmaBlock);
        world.apply(actor, &kind("haste"), 0, 30);
        let mut store = EffectStore::new();
        let mut sm = machine();

        sm.step(0, actor, CAULDRON, &mut store, &mut world);
        assert!(world.active(actor).is_empty());
        assert_eq!(
            store.get(CAULDRON).unwrap().record(&kind("haste")).unwrap().remaining_ticks,
            30
        );
    }

    fn brewing_cauldron() -> (MemoryWorld, ActorId, EffectStore) {
        let (mut world, actor) = setup(BlockKind::MagmaBlock);
        let mut store = EffectStore::new();
        store.merge(CAULDRON, &kind("speed"), 1, 1200);
        world.set_held(actor, HeldItem::Bowl, 2).unwrap();
        (world, actor, store)
    }

    fn bowl_use(actor: ActorId, held: &HeldItem) -> ItemUse<'_> {
        ItemUse {
            actor,
            position: CAULDRON,
            held,
            crouching: false,
        }
    }

    #[test]
    fn bowl_crystallizes_entry() {
        let (mut world, actor, mut store) = brewing_cauldron();
        let registry = StaticEffectRegistry::vanilla();
        let codec = EncodingCodec::new(&registry);
        let sm = machine();

        let outcome = sm.use_item(bowl_use(actor, &HeldItem::Bowl), &mut store, &codec, &mut world);
        let InteractionOutcome::Crystallized { stack, delivery } = outcome else {
            panic!("expected crystallization, got {outcome:?}");
        };
        assert_eq!(delivery, Delivery::Inventory);
        assert_eq!(stack.lines, vec!["Speed II 01:00 [minecraft:speed]".to_owned()]);
        assert!(store.get(CAULDRON).is_none());
        assert_eq!(world.block_state_at(CAULDRON).kind, BlockKind::Cauldron);

        let holder = world.actor(actor).unwrap();
        assert_eq!(holder.held_count, 1);
        assert_eq!(holder.inventory, vec![HeldItem::Stew(stack)]);
    }

    #[test]
    fn full_inventory_drops_the_stack() {
        let (mut world, actor, mut store) = brewing_cauldron();
        world.actor_mut(actor).unwrap().inventory_capacity = 0;
        let registry = StaticEffectRegistry::vanilla();
        let codec = EncodingCodec::new(&registry);

        let outcome = machine().use_item(bowl_use(actor, &HeldItem::Bowl), &mut store, &codec, &mut world);
        assert!(matches!(outcome, InteractionOutcome::Crystallized {
            delivery: Delivery::Dropped,
            ..
        }));
        assert_eq!(world.dropped_items().len(), 1);
    }

    #[test]
    fn crouching_or_partial_fill_passes_through() {
        let (mut world, actor, mut store) = brewing_cauldron();
        let registry = StaticEffectRegistry::vanilla();
        let codec = EncodingCodec::new(&registry);
        let sm = machine();

        let crouched = ItemUse {
            crouching: true,
            ..bowl_use(actor, &HeldItem::Bowl)
        };
        assert_eq!(
            sm.use_item(crouched, &mut store, &codec, &mut world),
            InteractionOutcome::PassThrough
        );

        world.set_block_state(CAULDRON, BlockState::water_cauldron(2));
        assert_eq!(
            sm.use_item(bowl_use(actor, &HeldItem::Bowl), &mut store, &codec, &mut world),
            InteractionOutcome::PassThrough
        );
        assert!(store.get(CAULDRON).is_some());
    }

    #[test]
    fn empty_ledger_passes_through() {
        let (mut world, actor) = setup(BlockKind::MagmaBlock);
        let mut store = EffectStore::new();
        let registry = StaticEffectRegistry::vanilla();
        let codec = EncodingCodec::new(&registry);

        let outcome = machine().use_item(bowl_use(actor, &HeldItem::Bowl), &mut store, &codec, &mut world);
        assert_eq!(outcome, InteractionOutcome::PassThrough);
        assert!(world.block_state_at(CAULDRON).is_full_water_container(3));
    }

    #[test]
    fn bottle_and_bucket_denied_over_heat() {
        let (mut world, actor, mut store) = brewing_cauldron();
        let registry = StaticEffectRegistry::vanilla();
        let codec = EncodingCodec::new(&registry);
        let sm = machine();

        for held in [HeldItem::GlassBottle, HeldItem::Bucket] {
            assert_eq!(
                sm.use_item(bowl_use(actor, &held), &mut store, &codec, &mut world),
                InteractionOutcome::Denied(DenialReason::UseBowlInstead)
            );
        }
        assert_eq!(DenialReason::UseBowlInstead.to_string(), "use_bowl_instead");

        world.set_block_state(CAULDRON.below(), BlockState::of(BlockKind::Other));
        assert_eq!(
            sm.use_item(bowl_use(actor, &HeldItem::Bucket), &mut store, &codec, &mut world),
            InteractionOutcome::PassThrough
        );
    }

    #[test]
    fn consume_applies_and_returns_bowl() {
        let (mut world, actor) = setup(BlockKind::Other);
        let registry = StaticEffectRegistry::vanilla();
        let codec = EncodingCodec::new(&registry);
        let stack = EncodedStack {
            title: "Mystery Stew".to_owned(),
            lines: vec![
                "Speed II 01:00 [minecraft:speed]".to_owned(),
                "Poison I [minecraft:poison]".to_owned(),
                "Frostbite I 00:10 [mymod:frostbite]".to_owned(),
            ],
        };

        let result = InteractionStateMachine::consume(actor, &stack, &codec, &mut world);
        assert_eq!(result, Consumption {
            applied: 1,
            skipped: 1,
            vessel: HeldItem::Bowl,
        });
        let active = world.active(actor);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, kind("speed"));
        assert_eq!(active[0].level, 1);
        assert_eq!(active[0].remaining_ticks, 1200);
    }

    #[test]
    fn consume_empty_stack_still_returns_bowl() {
        let (mut world, actor) = setup(BlockKind::Other);
        let registry = StaticEffectRegistry::vanilla();
        let codec = EncodingCodec::new(&registry);

        let result = InteractionStateMachine::consume(actor, &EncodedStack::default(), &codec, &mut world);
        assert_eq!(result.applied, 0);
        assert_eq!(result.vessel, HeldItem::Bowl);
    }

    #[test]
    fn breaking_water_cauldron_discards_entry() {
        let mut store = EffectStore::new();
        store.merge(CAULDRON, &kind("speed"), 0, 100);

        assert!(!InteractionStateMachine::on_container_broken(
            CAULDRON,
            BlockKind::Campfire { lit: true },
            &mut store
        ));
        assert!(store.get(CAULDRON).is_some());
        assert!(InteractionStateMachine::on_container_broken(
            CAULDRON,
            BlockKind::WaterCauldron,
            &mut store
        ));
        assert!(store.get(CAULDRON).is_none());
    }

    #[test]
    fn pruning_keeps_live_cooldowns() {
        let (mut world, actor) = setup(BlockKind::MagmaBlock);
        let other = world.spawn_actor("Birch", BlockPos::new(9, 64, 9));
        let mut store = EffectStore::new();
        let mut sm = machine();

        sm.step(0, actor, CAULDRON, &mut store, &mut world);
        sm.step(50, other, BlockPos::new(9, 64, 9), &mut store, &mut world);
        assert_eq!(sm.cooldown_count(), 2);

        sm.prune_cooldowns(60);
        assert_eq!(sm.cooldown_count(), 1);
        sm.forget(other);
        assert_eq!(sm.cooldown_count(), 0);
    }
}
