//! Clock, configuration, effect codec, interaction state machine, and tick
//! driver for the Stewpot effect cauldron.
//!
//! The host delivers one callback per world tick. On each one the
//! [`TickDriver`] paces ledger decay, and for every actor the
//! [`InteractionStateMachine`] decides whether to skip, cool, or collect.
//! Crystallization and consumption run through the [`EncodingCodec`].
//!
//! # Modules
//!
//! - [`clock`] -- World clock: the monotonically increasing tick counter.
//! - [`codec`] -- [`EncodingCodec`]: effect records to display lines and back.
//! - [`config`] -- Configuration loading from `stewpot-config.yaml` into
//!   strongly-typed structs.
//! - [`interaction`] -- [`InteractionStateMachine`]: per-actor cooldowns,
//!   draining, crystallization, and consumption.
//! - [`runner`] -- [`FixedRateScheduler`] and the [`TickCallback`] trait.
//! - [`tick`] -- [`TickDriver`]: decay pacing and per-actor dispatch.
//!
//! [`EncodingCodec`]: codec::EncodingCodec
//! [`InteractionStateMachine`]: interaction::InteractionStateMachine
//! [`FixedRateScheduler`]: runner::FixedRateScheduler
//! [`TickCallback`]: runner::TickCallback
//! [`TickDriver`]: tick::TickDriver

pub mod clock;
pub mod codec;
pub mod config;
pub mod interaction;
pub mod runner;
pub mod tick;
