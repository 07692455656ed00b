//! Sandbox engine binary for the Stewpot effect cauldron.
//!
//! Seeds an in-memory world with cauldrons over assorted supports and a
//! handful of actors carrying effects, then drives it at a fixed tick rate
//! until the tick budget runs out or the process is interrupted. The
//! cauldron ledger is restored on start, autosaved while running, and
//! saved again on shutdown.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `stewpot-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the effect registry
//! 4. Restore the ledger and world clock from the save file
//! 5. Seed the sandbox world
//! 6. Run the scheduler
//! 7. Save the ledger and log the session summary

mod error;
mod persistence;
mod session;
mod spawner;

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use stewpot_core::clock::WorldClock;
use stewpot_core::config::SimulationConfig;
use stewpot_core::runner::{FixedRateScheduler, log_run_end};
use stewpot_core::tick::TickDriver;
use stewpot_ledger::EffectStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::persistence::LedgerFile;
use crate::session::SandboxSession;
use crate::spawner::SandboxConfig;

/// Configuration file, relative to the working directory.
const CONFIG_PATH: &str = "stewpot-config.yaml";

/// Application entry point for the sandbox engine.
///
/// # Errors
///
/// Returns an error if configuration, the ledger file, sandbox seeding, or
/// the scheduler fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = Path::new(CONFIG_PATH);

    // 1. Load configuration.
    let config = load_config(config_path)?;

    // 2. Initialize structured logging.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(
        config_found = config_path.exists(),
        world_name = config.world.name,
        seed = config.world.seed,
        "stewpot-engine starting"
    );

    // 3. Build the effect registry.
    let registry = config.build_registry();
    info!(effect_kinds = registry.len(), "Effect registry built");

    // 4. Restore the ledger.
    let ledger_file = LedgerFile::new(&config.persistence.save_path);
    let mut store = EffectStore::new();
    let start_tick = ledger_file.load(&mut store, &registry)?.unwrap_or(0);
    let mut clock = WorldClock::from_tick(start_tick);
    info!(
        path = %ledger_file.path().display(),
        start_tick,
        brewing = store.len(),
        "Ledger ready"
    );

    // 5. Seed the sandbox.
    let behaviour = load_sandbox_config(config_path)?;
    let mut rng = SmallRng::seed_from_u64(config.world.seed);
    let sandbox = spawner::build_sandbox(
        &config.simulation,
        &config.tuning,
        &behaviour,
        registry.clone(),
        &mut rng,
    )?;

    let mut session = SandboxSession::new(
        sandbox,
        store,
        TickDriver::new(config.tuning),
        registry,
        behaviour,
        rng,
        ledger_file,
        config.persistence.autosave_interval_ticks,
    );

    // 6. Run until the budget is spent or the operator interrupts.
    let scheduler = FixedRateScheduler::new(config.world.tick_interval_ms, config.simulation.max_ticks);
    info!(
        tick_interval_ms = scheduler.interval_ms(),
        max_ticks = scheduler.max_ticks(),
        start_tick = clock.tick(),
        "Entering tick loop"
    );
    tokio::select! {
        result = scheduler.on_fixed_tick(&mut clock, &mut session) => {
            log_run_end(&result?);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }

    // 7. Save and summarize.
    session.save(clock.tick())?;
    session.log_summary();

    info!(final_tick = clock.tick(), "stewpot-engine shutdown complete");
    Ok(())
}

/// Load the main configuration, falling back to defaults when the file is
/// missing.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

/// Load sandbox behaviour from the `sandbox` section of the config file.
///
/// If the file does not exist or lacks the `sandbox` key, defaults are used.
fn load_sandbox_config(path: &Path) -> Result<SandboxConfig, EngineError> {
    if !path.exists() {
        return Ok(SandboxConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| EngineError::Sandbox {
        message: format!("failed to read config file: {e}"),
    })?;

    // Parse the full YAML and extract just the "sandbox" section.
    let raw: serde_yml::Value = serde_yml::from_str(&contents).map_err(|e| EngineError::Sandbox {
        message: format!("failed to parse config YAML: {e}"),
    })?;

    match raw.get("sandbox") {
        Some(section) => serde_yml::from_value(section.clone()).map_err(|e| EngineError::Sandbox {
            message: format!("failed to parse sandbox config: {e}"),
        }),
        None => Ok(SandboxConfig::default()),
    }
}
