//! Tick dispatch: paces ledger decay and runs per-actor steps.
//!
//! The host calls [`TickDriver::on_world_tick`] once per world tick and
//! [`TickDriver::on_actor_tick`] once per actor per tick. Decay runs on
//! every `decay_interval_ticks`-th world tick and removes one tick from
//! every ledger record, so the ledger drains at a fixed fraction of real
//! time. Skipping or doubling world tick calls changes that rate.

use stewpot_ledger::{DecayReport, EffectStore};
use stewpot_types::{ActorId, BlockPos};
use stewpot_world::{ActorEffects, WorldQuery};
use tracing::debug;

use crate::config::TuningConfig;
use crate::interaction::{InteractionStateMachine, StepReport};

/// What a world tick did to the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldTickReport {
    /// The tick this report belongs to.
    pub tick: u64,
    /// Decay results, present only on decay ticks.
    pub decay: Option<DecayReport>,
    /// Positions still holding effects after decay. Empty on non-decay
    /// ticks.
    pub brewing: Vec<BlockPos>,
}

impl WorldTickReport {
    /// Whether decay ran on this tick.
    pub const fn decayed(&self) -> bool {
        self.decay.is_some()
    }
}

/// Periodic driver for the ledger and the interaction state machine.
#[derive(Debug, Clone)]
pub struct TickDriver {
    /// Per-actor cooldowns and interactions.
    machine: InteractionStateMachine,
    /// World ticks between decay passes, at least 1.
    decay_interval: u32,
    /// World ticks since the last decay pass.
    counter: u32,
}

impl TickDriver {
    /// Create a driver with the given constants. A zero decay interval is
    /// treated as 1.
    pub const fn new(tuning: TuningConfig) -> Self {
        let decay_interval = if tuning.decay_interval_ticks == 0 {
            1
        } else {
            tuning.decay_interval_ticks
        };
        Self {
            machine: InteractionStateMachine::new(tuning),
            decay_interval,
            counter: 0,
        }
    }

    /// World ticks between decay passes.
    pub const fn decay_interval(&self) -> u32 {
        self.decay_interval
    }

    /// The interaction state machine.
    pub const fn machine(&self) -> &InteractionStateMachine {
        &self.machine
    }

    /// The interaction state machine, for item uses and bookkeeping.
    pub const fn machine_mut(&mut self) -> &mut InteractionStateMachine {
        &mut self.machine
    }

    /// Advance the decay pacing by one world tick, decaying the ledger
    /// when the interval is reached.
    pub fn on_world_tick(&mut self, tick: u64, store: &mut EffectStore) -> WorldTickReport {
        self.counter = self.counter.saturating_add(1);
        if self.counter < self.decay_interval {
            return WorldTickReport {
                tick,
                ..WorldTickReport::default()
            };
        }
        self.counter = 0;

        let decay = store.decay_all();
        let brewing = store.positions();
        debug!(
            tick,
            records_expired = decay.records_expired,
            entries_removed = decay.entries_removed,
            brewing = brewing.len(),
            "Ledger decay pass"
        );

        self.machine.prune_cooldowns(tick);

        WorldTickReport {
            tick,
            decay: Some(decay),
            brewing,
        }
    }

    /// Run one step for `actor` standing at `position`.
    pub fn on_actor_tick<H>(
        &mut self,
        tick: u64,
        actor: ActorId,
        position: BlockPos,
        store: &mut EffectStore,
        host: &mut H,
    ) -> StepReport
    where
        H: WorldQuery + ActorEffects + ?Sized,
    {
        self.machine.step(tick, actor, position, store, host)
    }
}
