//! Host world ports and an in-memory sandbox world.
//!
//! The cauldron mechanic never owns blocks, actors, or inventories. It reads
//! and mutates them through three narrow ports:
//!
//! - [`WorldQuery`] -- block states at positions.
//! - [`ActorEffects`] -- status effects currently applied to actors.
//! - [`Holdings`] -- the items an actor carries.
//!
//! [`MemoryWorld`] implements all three over plain maps. Tests and the
//! sandbox engine use it in place of a real game host.
//!
//! # Modules
//!
//! - [`error`] -- Error types for sandbox roster operations.
//! - [`ports`] -- The collaborator traits.
//! - [`memory`] -- The in-memory implementation.

pub mod error;
pub mod memory;
pub mod ports;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use memory::{DEFAULT_INVENTORY_CAPACITY, MemoryWorld, SandboxActor};
pub use ports::{ActorEffects, Holdings, WorldQuery};
