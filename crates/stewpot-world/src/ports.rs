//! Collaborator ports consumed by the cauldron mechanic.
//!
//! Every method is infallible. A missing actor or block is a normal
//! "nothing there" answer (an empty effect list, [`BlockKind::Air`]), never
//! an error, and mutations aimed at a missing actor are ignored.
//!
//! [`BlockKind::Air`]: stewpot_types::BlockKind::Air

use stewpot_types::{ActiveEffect, ActorId, BlockPos, BlockState, EffectKind, HeldItem};

/// Read and write access to block states.
pub trait WorldQuery {
    /// The block state at `position`.
    fn block_state_at(&self, position: BlockPos) -> BlockState;

    /// Replace the block at `position`.
    fn set_block_state(&mut self, position: BlockPos, state: BlockState);
}

/// Status effects applied to actors.
pub trait ActorEffects {
    /// Effects currently applied to `actor`, in a stable order.
    fn active(&self, actor: ActorId) -> Vec<ActiveEffect>;

    /// Remove one effect from `actor`.
    fn remove(&mut self, actor: ActorId, kind: &EffectKind);

    /// Apply an effect to `actor` with the given level and duration.
    ///
    /// Hosts typically refuse to shorten an effect this way; callers that
    /// need a shorter duration [`remove`](Self::remove) first.
    fn apply(&mut self, actor: ActorId, kind: &EffectKind, level: u32, remaining_ticks: u32);
}

/// Items carried by actors.
pub trait Holdings {
    /// Use up one unit of the item in the actor's hand.
    fn consume_held(&mut self, actor: ActorId);

    /// Put `item` into the actor's holding set.
    ///
    /// # Errors
    ///
    /// Hands the item back when the holding set is full.
    fn give(&mut self, actor: ActorId, item: HeldItem) -> Result<(), HeldItem>;

    /// Drop `item` into the world at the actor's feet.
    fn drop_item(&mut self, actor: ActorId, item: HeldItem);
}
