//! Configuration loading and typed config structures for Stewpot.
//!
//! The canonical configuration lives in `stewpot-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure and a loader that reads the file. Every field has a default, so
//! an empty document is a valid configuration.

use std::path::Path;

use serde::Deserialize;
use stewpot_types::{EffectCategory, StaticEffectRegistry};
use tracing::warn;

/// Environment variable overriding `persistence.save_path`.
pub const SAVE_PATH_ENV: &str = "STEWPOT_SAVE_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `stewpot-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, tick pacing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Cauldron mechanic constants.
    #[serde(default)]
    pub tuning: TuningConfig,

    /// Ledger persistence settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Run length and sandbox population.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Additional effect kinds registered on top of the vanilla set.
    #[serde(default)]
    pub effects: Vec<EffectConfig>,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `STEWPOT_SAVE_PATH` overrides `persistence.save_path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.persistence.apply_env_overrides();
        Ok(config)
    }

    /// Build the effect registry: the vanilla set plus every configured
    /// effect. Entries with malformed keys are skipped with a warning.
    pub fn build_registry(&self) -> StaticEffectRegistry {
        let mut registry = StaticEffectRegistry::vanilla();
        for effect in &self.effects {
            if registry
                .register(&effect.key, effect.name.as_str(), effect.category)
                .is_none()
            {
                warn!(key = %effect.key, "Skipping configured effect with malformed key");
            }
        }
        registry
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable sandbox name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for the sandbox population.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Wall-clock milliseconds between world ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Cauldron mechanic constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TuningConfig {
    /// World ticks between ledger decay passes.
    #[serde(default = "default_decay_interval_ticks")]
    pub decay_interval_ticks: u32,

    /// Ticks an actor waits before it is examined again.
    #[serde(default = "default_cooldown_ticks")]
    pub cooldown_ticks: u64,

    /// Ticks drained from each affected effect per step.
    #[serde(default = "default_drain_per_step")]
    pub drain_per_step: u32,

    /// Fill level at which a water container counts as full.
    #[serde(default = "default_full_fill_level")]
    pub full_fill_level: u8,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            decay_interval_ticks: default_decay_interval_ticks(),
            cooldown_ticks: default_cooldown_ticks(),
            drain_per_step: default_drain_per_step(),
            full_fill_level: default_full_fill_level(),
        }
    }
}

/// Ledger persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// File the ledger snapshot is read from and written to.
    #[serde(default = "default_save_path")]
    pub save_path: String,

    /// Write a snapshot every N ticks (0 = only on shutdown).
    #[serde(default = "default_autosave_interval_ticks")]
    pub autosave_interval_ticks: u64,
}

impl PersistenceConfig {
    /// Override the save path from `STEWPOT_SAVE_PATH` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(SAVE_PATH_ENV) {
            self.save_path = val;
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            autosave_interval_ticks: default_autosave_interval_ticks(),
        }
    }
}

/// Run length and sandbox population.
///
/// A `max_ticks` of 0 means the run continues until interrupted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of ticks before the run ends (0 = unlimited).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Number of sandbox actors to spawn.
    #[serde(default = "default_actors")]
    pub actors: u32,

    /// Number of water cauldrons to build.
    #[serde(default = "default_cauldrons")]
    pub cauldrons: u32,

    /// Maximum number of random effects each actor starts with.
    #[serde(default = "default_effects_per_actor")]
    pub effects_per_actor: u32,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            actors: default_actors(),
            cauldrons: default_cauldrons(),
            effects_per_actor: default_effects_per_actor(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is
    /// not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// One additional effect kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EffectConfig {
    /// Registry key, namespaced or not (`mymod:frostbite`).
    pub key: String,

    /// Display name shown on crystallized items.
    pub name: String,

    /// Effect category.
    #[serde(default = "default_category")]
    pub category: EffectCategory,
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Stewpot Sandbox".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    50
}

const fn default_decay_interval_ticks() -> u32 {
    10
}

const fn default_cooldown_ticks() -> u64 {
    60
}

const fn default_drain_per_step() -> u32 {
    30
}

const fn default_full_fill_level() -> u8 {
    3
}

fn default_save_path() -> String {
    "stewpot-ledger.json".to_owned()
}

const fn default_autosave_interval_ticks() -> u64 {
    1200
}

const fn default_max_ticks() -> u64 {
    2400
}

const fn default_actors() -> u32 {
    4
}

const fn default_cauldrons() -> u32 {
    3
}

const fn default_effects_per_actor() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_category() -> EffectCategory {
    EffectCategory::Neutral
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use stewpot_types::EffectKindRegistry;

    use super::*;

    #[test]
    fn default_config_matches_mechanic_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.tuning.decay_interval_ticks, 10);
        assert_eq!(config.tuning.cooldown_ticks, 60);
        assert_eq!(config.tuning.drain_per_step, 30);
        assert_eq!(config.tuning.full_fill_level, 3);
        assert_eq!(config.world.tick_interval_ms, 50);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test Kitchen"
  seed: 7
  tick_interval_ms: 10

tuning:
  decay_interval_ticks: 20
  cooldown_ticks: 40
  drain_per_step: 15
  full_fill_level: 3

persistence:
  autosave_interval_ticks: 600

simulation:
  max_ticks: 100
  actors: 2
  cauldrons: 1
  effects_per_actor: 1

logging:
  level: "debug"
  json: true

effects:
  - key: "mymod:frostbite"
    name: "Frostbite"
    category: harmful
"#;

        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Test Kitchen");
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.tuning.decay_interval_ticks, 20);
        assert_eq!(config.tuning.drain_per_step, 15);
        assert_eq!(config.persistence.autosave_interval_ticks, 600);
        assert_eq!(config.simulation.actors, 2);
        assert!(config.logging.json);
        assert_eq!(config.effects.len(), 1);
        assert_eq!(config.effects.first().unwrap().category, EffectCategory::Harmful);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config = SimulationConfig::parse("tuning:\n  cooldown_ticks: 5\n").unwrap();
        assert_eq!(config.tuning.cooldown_ticks, 5);
        assert_eq!(config.tuning.drain_per_step, 30);
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = SimulationConfig::parse("tuning: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn registry_includes_configured_effects() {
        let config = SimulationConfig::parse(
            "effects:\n  - key: \"mymod:frostbite\"\n    name: Frostbite\n    category: harmful\n  - key: \"Bad Key\"\n    name: Broken\n",
        )
        .unwrap();
        let registry = config.build_registry();

        let frostbite = registry.resolve("mymod:frostbite").unwrap();
        assert_eq!(registry.display_name(&frostbite), "Frostbite");
        assert_eq!(registry.category(&frostbite), EffectCategory::Harmful);
        assert!(registry.resolve("speed").is_some());
        let vanilla = StaticEffectRegistry::vanilla().len();
        assert_eq!(registry.len().checked_sub(vanilla), Some(1));
    }
}
