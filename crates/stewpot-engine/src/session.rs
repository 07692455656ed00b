//! Tick callback that plays out the sandbox.
//!
//! Every tick the session paces ledger decay, steps each actor through the
//! interaction state machine, and then lets actors act at random: wander
//! between cauldrons, scoop a brewing cauldron, or eat a stew they carry.
//! Actor effects then count down one tick and the ledger is autosaved on
//! its interval.

use rand::Rng;
use rand::rngs::SmallRng;
use stewpot_core::clock::WorldClock;
use stewpot_core::codec::EncodingCodec;
use stewpot_core::interaction::{
    Delivery, InteractionOutcome, InteractionStateMachine, ItemUse, StepOutcome,
};
use stewpot_core::runner::{TickCallback, TickControl};
use stewpot_core::tick::TickDriver;
use stewpot_ledger::EffectStore;
use stewpot_types::{ActorId, BlockKind, BlockPos, BlockState, HeldItem, StaticEffectRegistry};
use stewpot_world::{Holdings, MemoryWorld, WorldQuery};
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::persistence::LedgerFile;
use crate::spawner::{Sandbox, SandboxConfig, beside, roll};

/// Running totals for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Ticks of effect time moved into cauldrons.
    pub ticks_collected: u64,
    /// Stews crystallized.
    pub stews_made: u32,
    /// Stews dropped because the actor's inventory was full.
    pub stews_dropped: u32,
    /// Stews eaten.
    pub stews_eaten: u32,
    /// Effects applied by eating stews.
    pub effects_restored: u32,
    /// Bottle or bucket uses refused.
    pub denials: u32,
    /// Cauldrons broken with effects still inside.
    pub cauldrons_broken: u32,
    /// Successful ledger saves.
    pub saves: u32,
}

/// The sandbox world plus everything needed to drive it.
pub struct SandboxSession {
    world: MemoryWorld,
    store: EffectStore,
    driver: TickDriver,
    registry: StaticEffectRegistry,
    cauldrons: Vec<BlockPos>,
    actors: Vec<ActorId>,
    behaviour: SandboxConfig,
    full_fill_level: u8,
    rng: SmallRng,
    ledger_file: LedgerFile,
    autosave_interval: u64,
    stats: SessionStats,
}

impl SandboxSession {
    /// Assemble a session.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sandbox: Sandbox,
        store: EffectStore,
        driver: TickDriver,
        registry: StaticEffectRegistry,
        behaviour: SandboxConfig,
        rng: SmallRng,
        ledger_file: LedgerFile,
        autosave_interval: u64,
    ) -> Self {
        let full_fill_level = driver.machine().tuning().full_fill_level;
        Self {
            world: sandbox.world,
            store,
            driver,
            registry,
            cauldrons: sandbox.cauldrons,
            actors: sandbox.actors,
            behaviour,
            full_fill_level,
            rng,
            ledger_file,
            autosave_interval,
            stats: SessionStats::default(),
        }
    }

    /// Totals so far.
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The ledger.
    pub const fn store(&self) -> &EffectStore {
        &self.store
    }

    /// Save the ledger as of `tick`.
    pub fn save(&mut self, tick: u64) -> Result<(), EngineError> {
        self.ledger_file.save(&self.store, &self.registry, tick)?;
        self.stats.saves = self.stats.saves.saturating_add(1);
        Ok(())
    }

    fn autosave(&mut self, tick: u64) {
        if !WorldClock::from_tick(tick).is_multiple_of(self.autosave_interval) {
            return;
        }
        if let Err(e) = self.save(tick) {
            warn!(tick, error = %e, "Autosave failed");
        }
    }

    /// Refill emptied cauldrons and occasionally break a brewing one.
    fn tend_cauldrons(&mut self) {
        for position in self.cauldrons.clone() {
            let state = self.world.block_state_at(position);
            match state.kind {
                BlockKind::Cauldron if roll(&mut self.rng, self.behaviour.refill_percent) => {
                    self.world
                        .set_block_state(position, BlockState::water_cauldron(self.full_fill_level));
                    debug!(%position, "Cauldron refilled");
                }
                BlockKind::WaterCauldron
                    if self.store.get(position).is_some()
                        && roll(&mut self.rng, self.behaviour.break_percent) =>
                {
                    if InteractionStateMachine::on_container_broken(position, state.kind, &mut self.store) {
                        self.stats.cauldrons_broken = self.stats.cauldrons_broken.saturating_add(1);
                        info!(%position, "Brewing cauldron broken, contents lost");
                    }
                    self.world.set_block_state(position, BlockState::of(BlockKind::Cauldron));
                }
                _ => {}
            }
        }
    }

    fn act(&mut self, tick: u64, actor: ActorId) {
        let Some(position) = self.world.actor(actor).map(|a| a.position) else {
            return;
        };

        let report = self
            .driver
            .on_actor_tick(tick, actor, position, &mut self.store, &mut self.world);

        match report.outcome {
            StepOutcome::Collected { ticks_collected, .. } => {
                self.stats.ticks_collected = self.stats.ticks_collected.saturating_add(ticks_collected);
            }
            StepOutcome::NotInContainer { .. }
            | StepOutcome::NotFull
            | StepOutcome::NothingToDrain { .. }
            | StepOutcome::Idle => {
                if roll(&mut self.rng, self.behaviour.wander_percent) {
                    self.wander(actor);
                }
            }
            StepOutcome::Waiting { .. } | StepOutcome::Cooled { .. } => {}
        }

        if report.brewing && roll(&mut self.rng, self.behaviour.crystallize_percent) {
            self.scoop(actor, position);
        }
        if roll(&mut self.rng, self.behaviour.eat_percent) {
            self.eat(actor);
        }
    }

    /// Move to a random cauldron, or the ground beside one.
    fn wander(&mut self, actor: ActorId) {
        if self.cauldrons.is_empty() {
            return;
        }
        let Some(&cauldron) = self
            .cauldrons
            .get(self.rng.random_range(0..self.cauldrons.len()))
        else {
            return;
        };
        let target = if self.rng.random_bool(0.5) { cauldron } else { beside(cauldron) };

        if self.world.move_actor(actor, target).is_ok() {
            // Arriving actors are examined on the next step.
            self.driver.machine_mut().forget(actor);
            debug!(%actor, %target, "Actor wandered");
        }
    }

    /// Offer the held bowl (or, sometimes, a bottle) to the cauldron.
    fn scoop(&mut self, actor: ActorId, position: BlockPos) {
        let Some((held, crouching)) = self.world.actor(actor).map(|a| (a.held.clone(), a.crouching))
        else {
            return;
        };
        let vessel = if roll(&mut self.rng, self.behaviour.bottle_percent) {
            HeldItem::GlassBottle
        } else {
            held
        };

        let codec = EncodingCodec::new(&self.registry);
        let item_use = ItemUse {
            actor,
            position,
            held: &vessel,
            crouching,
        };
        match self
            .driver
            .machine()
            .use_item(item_use, &mut self.store, &codec, &mut self.world)
        {
            InteractionOutcome::Crystallized { delivery, .. } => {
                self.stats.stews_made = self.stats.stews_made.saturating_add(1);
                if delivery == Delivery::Dropped {
                    self.stats.stews_dropped = self.stats.stews_dropped.saturating_add(1);
                }
            }
            InteractionOutcome::Denied(reason) => {
                self.stats.denials = self.stats.denials.saturating_add(1);
                info!(%actor, %position, %reason, "Item use denied");
            }
            InteractionOutcome::PassThrough => {}
        }
    }

    /// Eat the first stew in the actor's inventory, if any.
    fn eat(&mut self, actor: ActorId) {
        let Ok(holder) = self.world.actor_mut(actor) else {
            return;
        };
        let Some(slot) = holder
            .inventory
            .iter()
            .position(|item| matches!(item, HeldItem::Stew(_)))
        else {
            return;
        };
        let HeldItem::Stew(stack) = holder.inventory.swap_remove(slot) else {
            return;
        };

        let codec = EncodingCodec::new(&self.registry);
        let eaten = InteractionStateMachine::consume(actor, &stack, &codec, &mut self.world);
        self.stats.stews_eaten = self.stats.stews_eaten.saturating_add(1);
        self.stats.effects_restored = self
            .stats
            .effects_restored
            .saturating_add(u32::try_from(eaten.applied).unwrap_or(u32::MAX));

        self.return_vessel(actor, eaten.vessel);
    }

    /// Put an emptied vessel back in the actor's hand, or away.
    fn return_vessel(&mut self, actor: ActorId, vessel: HeldItem) {
        if let Ok(holder) = self.world.actor_mut(actor) {
            if holder.held == vessel {
                holder.held_count = holder.held_count.saturating_add(1);
                return;
            }
            if holder.held == HeldItem::Nothing {
                holder.held = vessel;
                holder.held_count = 1;
                return;
            }
        }
        if let Err(item) = self.world.give(actor, vessel) {
            self.world.drop_item(actor, item);
        }
    }

    /// Log the session totals.
    pub fn log_summary(&self) {
        let stats = self.stats();
        info!(
            ticks_collected = stats.ticks_collected,
            stews_made = stats.stews_made,
            stews_dropped = stats.stews_dropped,
            stews_eaten = stats.stews_eaten,
            effects_restored = stats.effects_restored,
            denials = stats.denials,
            cauldrons_broken = stats.cauldrons_broken,
            saves = stats.saves,
            brewing = self.store().len(),
            cooling_down = self.driver.machine().cooldown_count(),
            "Session summary"
        );
    }
}

impl TickCallback for SandboxSession {
    fn on_tick(&mut self, tick: u64) -> TickControl {
        let report = self.driver.on_world_tick(tick, &mut self.store);
        if report.decayed() {
            if !report.brewing.is_empty() {
                debug!(tick, brewing = report.brewing.len(), "Cauldrons brewing");
            }
            self.tend_cauldrons();
        }

        for actor in self.actors.clone() {
            self.act(tick, actor);
        }

        self.world.tick_effects();
        self.autosave(tick);
        TickControl::Continue
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use stewpot_core::config::{SimulationBoundsConfig, TuningConfig};
    use stewpot_core::runner::FixedRateScheduler;

    use super::*;
    use crate::spawner::build_sandbox;

    fn session(behaviour: SandboxConfig, name: &str) -> SandboxSession {
        let mut rng = SmallRng::seed_from_u64(42);
        let bounds = SimulationBoundsConfig {
            actors: 4,
            cauldrons: 4,
            effects_per_actor: 3,
            ..SimulationBoundsConfig::default()
        };
        let tuning = TuningConfig::default();
        let registry = StaticEffectRegistry::vanilla();
        let sandbox = build_sandbox(&bounds, &tuning, &behaviour, registry.clone(), &mut rng).unwrap();
        let path = std::env::temp_dir().join(format!(
            "stewpot-session-{}-{name}.json",
            std::process::id()
        ));
        SandboxSession::new(
            sandbox,
            EffectStore::new(),
            TickDriver::new(tuning),
            registry,
            behaviour,
            rng,
            LedgerFile::new(path),
            0,
        )
    }

    #[tokio::test]
    async fn busy_sandbox_collects_and_crystallizes() {
        let behaviour = SandboxConfig {
            wander_percent: 100,
            crystallize_percent: 50,
            bottle_percent: 0,
            eat_percent: 50,
            refill_percent: 100,
            break_percent: 0,
            ..SandboxConfig::default()
        };
        let mut session = session(behaviour, "busy");
        let mut clock = WorldClock::new();

        FixedRateScheduler::new(0, 600)
            .on_fixed_tick(&mut clock, &mut session)
            .await
            .unwrap();

        let stats = session.stats();
        assert!(stats.ticks_collected > 0);
        assert!(stats.stews_made > 0);
        assert_eq!(stats.denials, 0);
        assert_eq!(stats.cauldrons_broken, 0);
    }

    #[tokio::test]
    async fn still_sandbox_does_nothing() {
        let behaviour = SandboxConfig {
            wander_percent: 0,
            crystallize_percent: 0,
            eat_percent: 0,
            refill_percent: 0,
            break_percent: 0,
            ..SandboxConfig::default()
        };
        let mut session = session(behaviour, "still");
        let mut clock = WorldClock::new();

        FixedRateScheduler::new(0, 100)
            .on_fixed_tick(&mut clock, &mut session)
            .await
            .unwrap();

        assert_eq!(session.stats(), SessionStats::default());
        assert!(session.store().is_empty());
    }

    #[test]
    fn save_counts_successes() {
        let mut session = session(SandboxConfig::default(), "save");
        session.save(1).unwrap();
        assert_eq!(session.stats().saves, 1);
        std::fs::remove_file(session.ledger_file.path()).unwrap();
    }

    #[tokio::test]
    async fn autosaves_on_interval_multiples() {
        let still = SandboxConfig {
            wander_percent: 0,
            crystallize_percent: 0,
            eat_percent: 0,
            refill_percent: 0,
            break_percent: 0,
            ..SandboxConfig::default()
        };
        let mut session = session(still, "autosave");
        session.autosave_interval = 5;
        let mut clock = WorldClock::new();

        FixedRateScheduler::new(0, 12)
            .on_fixed_tick(&mut clock, &mut session)
            .await
            .unwrap();

        assert_eq!(session.stats().saves, 2);
        std::fs::remove_file(session.ledger_file.path()).unwrap();
    }
}
