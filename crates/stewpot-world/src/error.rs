//! Error types for the `stewpot-world` crate.
//!
//! The ports themselves are infallible; only sandbox roster management in
//! [`MemoryWorld`](crate::MemoryWorld) can fail.

use stewpot_types::ActorId;

/// Errors that can occur when managing sandbox actors.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The actor is not part of the sandbox roster.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),

    /// An actor with this id is already in the roster.
    #[error("duplicate actor id: {0}")]
    DuplicateActor(ActorId),
}
