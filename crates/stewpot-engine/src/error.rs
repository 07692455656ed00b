//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup, the tick loop, and ledger saves.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: stewpot_core::config::ConfigError,
    },

    /// The scheduler stopped with an error.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: stewpot_core::runner::RunnerError,
    },

    /// A sandbox world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: stewpot_world::WorldError,
    },

    /// The ledger snapshot could not be encoded or decoded.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: stewpot_ledger::LedgerError,
    },

    /// Reading or writing the ledger file failed.
    #[error("ledger file {path}: {source}")]
    LedgerFile {
        /// The file being read or written.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The sandbox could not be built.
    #[error("sandbox error: {message}")]
    Sandbox {
        /// Description of the sandbox failure.
        message: String,
    },
}
