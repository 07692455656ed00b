//! Sandbox seeding: cauldrons, actors, and their starting effects.
//!
//! Cauldrons are laid out in a row four blocks apart, cycling through the
//! supports magma, lava, lit campfire, and plain ground, so every drain
//! path is exercised. Actors start on the ground beside a cauldron with a
//! few random effects and a stack of bowls.

use rand::Rng;
use serde::Deserialize;
use stewpot_core::config::{SimulationBoundsConfig, TuningConfig};
use stewpot_types::{ActorId, BlockKind, BlockPos, EffectKind, HeldItem, StaticEffectRegistry};
use stewpot_world::{ActorEffects, MemoryWorld};
use tracing::{debug, info};

use crate::error::EngineError;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// Sandbox behaviour, loaded from the `sandbox` section of
/// `stewpot-config.yaml`.
///
/// Chances are whole percentages rolled once per actor per tick (or per
/// cauldron per decay pass for `refill_percent` and `break_percent`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SandboxConfig {
    /// Bowls each actor starts holding.
    #[serde(default = "default_bowls_per_actor")]
    pub bowls_per_actor: u32,

    /// Shortest starting effect, in ticks.
    #[serde(default = "default_min_effect_ticks")]
    pub min_effect_ticks: u32,

    /// Longest starting effect, in ticks.
    #[serde(default = "default_max_effect_ticks")]
    pub max_effect_ticks: u32,

    /// Highest starting amplifier (0-based).
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    /// Chance an idle actor walks to another spot.
    #[serde(default = "default_wander_percent")]
    pub wander_percent: u32,

    /// Chance an actor at a brewing cauldron scoops it up.
    #[serde(default = "default_crystallize_percent")]
    pub crystallize_percent: u32,

    /// Chance a scooping actor reaches for a bottle instead of a bowl.
    #[serde(default = "default_bottle_percent")]
    pub bottle_percent: u32,

    /// Chance an actor carrying stew eats one.
    #[serde(default = "default_eat_percent")]
    pub eat_percent: u32,

    /// Chance an emptied cauldron is refilled.
    #[serde(default = "default_refill_percent")]
    pub refill_percent: u32,

    /// Chance a brewing cauldron is broken and rebuilt empty.
    #[serde(default = "default_break_percent")]
    pub break_percent: u32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            bowls_per_actor: default_bowls_per_actor(),
            min_effect_ticks: default_min_effect_ticks(),
            max_effect_ticks: default_max_effect_ticks(),
            max_level: default_max_level(),
            wander_percent: default_wander_percent(),
            crystallize_percent: default_crystallize_percent(),
            bottle_percent: default_bottle_percent(),
            eat_percent: default_eat_percent(),
            refill_percent: default_refill_percent(),
            break_percent: default_break_percent(),
        }
    }
}

const fn default_bowls_per_actor() -> u32 {
    4
}

const fn default_min_effect_ticks() -> u32 {
    600
}

const fn default_max_effect_ticks() -> u32 {
    6000
}

const fn default_max_level() -> u32 {
    2
}

const fn default_wander_percent() -> u32 {
    5
}

const fn default_crystallize_percent() -> u32 {
    2
}

const fn default_bottle_percent() -> u32 {
    10
}

const fn default_eat_percent() -> u32 {
    3
}

const fn default_refill_percent() -> u32 {
    20
}

const fn default_break_percent() -> u32 {
    1
}

/// Roll a whole-percentage chance. Values above 100 always succeed.
pub fn roll(rng: &mut impl Rng, percent: u32) -> bool {
    rng.random_ratio(percent.min(100), 100)
}

// -----------------------------------------------------------------------
// Layout
// -----------------------------------------------------------------------

/// Supports cycled under successive cauldrons.
const SUPPORTS: [BlockKind; 4] = [
    BlockKind::MagmaBlock,
    BlockKind::Lava,
    BlockKind::Campfire { lit: true },
    BlockKind::Other,
];

/// Height of every cauldron.
const CAULDRON_Y: i32 = 64;

/// Blocks between neighbouring cauldrons.
const CAULDRON_SPACING: i32 = 4;

/// Built-in pool of actor names.
const NAME_POOL: &[&str] = &[
    "Alder", "Birch", "Cedar", "Dusk", "Ember", "Fern", "Grove", "Haze",
    "Iris", "Juniper", "Kestrel", "Lark", "Moss", "Nettle", "Oak", "Pine",
    "Quill", "Reed", "Sage", "Thorn", "Umber", "Vale", "Wren", "Yarrow",
];

/// A freshly seeded sandbox.
#[derive(Debug)]
pub struct Sandbox {
    /// The world, with cauldrons built and actors spawned.
    pub world: MemoryWorld,
    /// Cauldron positions in layout order.
    pub cauldrons: Vec<BlockPos>,
    /// Actor ids in spawn order.
    pub actors: Vec<ActorId>,
}

/// Position of the `index`-th cauldron.
fn cauldron_position(index: u32) -> Result<BlockPos, EngineError> {
    i32::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(CAULDRON_SPACING))
        .map(|x| BlockPos::new(x, CAULDRON_Y, 0))
        .ok_or_else(|| EngineError::Sandbox {
            message: format!("cauldron index {index} out of range"),
        })
}

/// The spot on the ground beside a cauldron.
pub const fn beside(cauldron: BlockPos) -> BlockPos {
    BlockPos::new(cauldron.x, cauldron.y, cauldron.z.saturating_add(2))
}

/// Build the sandbox world.
pub fn build_sandbox(
    bounds: &SimulationBoundsConfig,
    tuning: &TuningConfig,
    sandbox: &SandboxConfig,
    registry: StaticEffectRegistry,
    rng: &mut impl Rng,
) -> Result<Sandbox, EngineError> {
    if bounds.cauldrons == 0 {
        return Err(EngineError::Sandbox {
            message: "at least one cauldron is required".to_owned(),
        });
    }

    let kinds: Vec<EffectKind> = registry.kinds().collect();
    let mut world = MemoryWorld::new(registry);

    let mut cauldrons = Vec::new();
    for (index, support) in (0..bounds.cauldrons).zip(SUPPORTS.iter().cycle()) {
        let position = cauldron_position(index)?;
        world.build_cauldron(position, *support, tuning.full_fill_level);
        debug!(%position, support = ?support, "Cauldron built");
        cauldrons.push(position);
    }

    let names = actor_names(bounds.actors);
    let mut actors = Vec::with_capacity(names.len());
    for (name, home) in names.into_iter().zip(cauldrons.iter().cycle()) {
        let id = world.spawn_actor(name, beside(*home));
        world.set_held(id, HeldItem::Bowl, sandbox.bowls_per_actor)?;
        let effects = give_random_effects(&mut world, id, &kinds, bounds.effects_per_actor, sandbox, rng);
        debug!(actor = %id, effects, "Actor spawned");
        actors.push(id);
    }

    info!(
        cauldrons = cauldrons.len(),
        actors = actors.len(),
        "Sandbox seeded"
    );
    Ok(Sandbox {
        world,
        cauldrons,
        actors,
    })
}

/// Names for `count` actors: the pool in order, then numbered repeats.
fn actor_names(count: u32) -> Vec<String> {
    let mut names = Vec::new();
    let mut round: u32 = 0;
    while u32::try_from(names.len()).is_ok_and(|len| len < count) {
        for base in NAME_POOL {
            if u32::try_from(names.len()).is_ok_and(|len| len >= count) {
                break;
            }
            if round == 0 {
                names.push((*base).to_owned());
            } else {
                names.push(format!("{base} {round}"));
            }
        }
        round = round.saturating_add(1);
    }
    names
}

/// Apply up to `count` random effects to `actor`. Returns how many distinct
/// kinds the actor ends up with.
pub fn give_random_effects(
    world: &mut MemoryWorld,
    actor: ActorId,
    kinds: &[EffectKind],
    count: u32,
    sandbox: &SandboxConfig,
    rng: &mut impl Rng,
) -> usize {
    if kinds.is_empty() {
        return 0;
    }
    let shortest = sandbox.min_effect_ticks.min(sandbox.max_effect_ticks).max(1);
    let longest = sandbox.max_effect_ticks.max(shortest);

    for _ in 0..count {
        let Some(kind) = kinds.get(rng.random_range(0..kinds.len())) else {
            continue;
        };
        let level = rng.random_range(0..=sandbox.max_level);
        let ticks = rng.random_range(shortest..=longest);
        world.apply(actor, kind, level, ticks);
    }
    world.active(actor).len()
}
