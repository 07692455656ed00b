//! Durable identity lookup for effect kinds.
//!
//! The host owns the authoritative list of effects. The core only needs to
//! turn a canonical key back into an [`EffectKind`] (decode, restore) and to
//! derive display text for one (encode). [`StaticEffectRegistry`] is a
//! table-backed implementation preloaded with the vanilla effects; hosts
//! with modded effects register extra entries on top.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::EffectCategory;
use crate::structs::EffectKind;

/// Namespace assumed for keys given without one (`speed` -> `minecraft:speed`).
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Lookup between canonical keys and effect kinds.
pub trait EffectKindRegistry {
    /// Resolve a canonical key. Returns `None` for unknown or malformed keys.
    fn resolve(&self, key: &str) -> Option<EffectKind>;

    /// The canonical key of a kind.
    fn key_of(&self, kind: &EffectKind) -> String {
        kind.as_str().to_owned()
    }

    /// Localized display name. Defaults to the canonical key.
    fn display_name(&self, kind: &EffectKind) -> String {
        self.key_of(kind)
    }

    /// Category of the effect. Defaults to [`EffectCategory::Neutral`].
    fn category(&self, _kind: &EffectKind) -> EffectCategory {
        EffectCategory::Neutral
    }
}

/// Normalize a key to `namespace:path` form.
///
/// Surrounding whitespace is trimmed and a missing namespace becomes
/// [`DEFAULT_NAMESPACE`]. Returns `None` if either part is empty or holds a
/// character outside `[a-z0-9_.-]` (the path may also contain `/`).
pub fn normalize_key(key: &str) -> Option<String> {
    let key = key.trim();
    let (namespace, path) = key.split_once(':').unwrap_or((DEFAULT_NAMESPACE, key));

    let namespace_ok = !namespace.is_empty() && namespace.chars().all(is_namespace_char);
    let path_ok = !path.is_empty() && path.chars().all(|c| is_namespace_char(c) || c == '/');

    (namespace_ok && path_ok).then(|| format!("{namespace}:{path}"))
}

const fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

/// Display metadata for one registered effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    /// Canonical key, e.g. `minecraft:speed`.
    pub key: String,
    /// Display name, e.g. `Speed`.
    pub name: String,
    /// Effect category.
    pub category: EffectCategory,
}

/// A registry backed by an in-memory table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEffectRegistry {
    /// Descriptors keyed by canonical key.
    kinds: BTreeMap<String, EffectDescriptor>,
}

/// The vanilla effect table: `(path, display name, category)`.
const VANILLA_EFFECTS: &[(&str, &str, EffectCategory)] = &[
    ("speed", "Speed", EffectCategory::Beneficial),
    ("slowness", "Slowness", EffectCategory::Harmful),
    ("haste", "Haste", EffectCategory::Beneficial),
    ("mining_fatigue", "Mining Fatigue", EffectCategory::Harmful),
    ("strength", "Strength", EffectCategory::Beneficial),
    ("instant_health", "Instant Health", EffectCategory::Beneficial),
    ("instant_damage", "Instant Damage", EffectCategory::Harmful),
    ("jump_boost", "Jump Boost", EffectCategory::Beneficial),
    ("nausea", "Nausea", EffectCategory::Harmful),
    ("regeneration", "Regeneration", EffectCategory::Beneficial),
    ("resistance", "Resistance", EffectCategory::Beneficial),
    ("fire_resistance", "Fire Resistance", EffectCategory::Beneficial),
    ("water_breathing", "Water Breathing", EffectCategory::Beneficial),
    ("invisibility", "Invisibility", EffectCategory::Beneficial),
    ("blindness", "Blindness", EffectCategory::Harmful),
    ("night_vision", "Night Vision", EffectCategory::Beneficial),
    ("hunger", "Hunger", EffectCategory::Harmful),
    ("weakness", "Weakness", EffectCategory::Harmful),
    ("poison", "Poison", EffectCategory::Harmful),
    ("wither", "Wither", EffectCategory::Harmful),
    ("health_boost", "Health Boost", EffectCategory::Beneficial),
    ("absorption", "Absorption", EffectCategory::Beneficial),
    ("saturation", "Saturation", EffectCategory::Beneficial),
    ("glowing", "Glowing", EffectCategory::Neutral),
    ("levitation", "Levitation", EffectCategory::Harmful),
    ("luck", "Luck", EffectCategory::Beneficial),
    ("unluck", "Bad Luck", EffectCategory::Harmful),
    ("slow_falling", "Slow Falling", EffectCategory::Beneficial),
    ("conduit_power", "Conduit Power", EffectCategory::Beneficial),
    ("dolphins_grace", "Dolphin's Grace", EffectCategory::Beneficial),
    ("bad_omen", "Bad Omen", EffectCategory::Neutral),
    ("hero_of_the_village", "Hero of the Village", EffectCategory::Beneficial),
    ("darkness", "Darkness", EffectCategory::Harmful),
];

impl StaticEffectRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    /// Create a registry holding the vanilla effect table.
    pub fn vanilla() -> Self {
        let mut registry = Self::new();
        for &(path, name, category) in VANILLA_EFFECTS {
            registry.register(path, name, category);
        }
        registry
    }

    /// Register (or replace) an effect.
    ///
    /// Returns the registered kind, or `None` if the key is malformed.
    pub fn register(
        &mut self,
        key: &str,
        name: impl Into<String>,
        category: EffectCategory,
    ) -> Option<EffectKind> {
        let key = normalize_key(key)?;
        let descriptor = EffectDescriptor {
            key: key.clone(),
            name: name.into(),
            category,
        };
        self.kinds.insert(key.clone(), descriptor);
        Some(EffectKind::new(key))
    }

    /// Look up the descriptor for a kind.
    pub fn describe(&self, kind: &EffectKind) -> Option<&EffectDescriptor> {
        self.kinds.get(kind.as_str())
    }

    /// Number of registered effects.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether no effects are registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterate over all registered kinds in key order.
    pub fn kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.kinds.keys().map(|key| EffectKind::new(key.as_str()))
    }
}

impl EffectKindRegistry for StaticEffectRegistry {
    fn resolve(&self, key: &str) -> Option<EffectKind> {
        let key = normalize_key(key)?;
        self.kinds.contains_key(&key).then(|| EffectKind::new(key))
    }

    fn display_name(&self, kind: &EffectKind) -> String {
        self.describe(kind)
            .map_or_else(|| kind.as_str().to_owned(), |d| d.name.clone())
    }

    fn category(&self, kind: &EffectKind) -> EffectCategory {
        self.describe(kind)
            .map_or(EffectCategory::Neutral, |d| d.category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_default_namespace() {
        assert_eq!(normalize_key("speed").as_deref(), Some("minecraft:speed"));
        assert_eq!(normalize_key(" minecraft:speed ").as_deref(), Some("minecraft:speed"));
        assert_eq!(normalize_key("mymod:frost/bite").as_deref(), Some("mymod:frost/bite"));
    }

    #[test]
    fn normalize_rejects_malformed_keys() {
        assert_eq!(normalize_key(""), None);
        assert_eq!(normalize_key("minecraft:"), None);
        assert_eq!(normalize_key(":speed"), None);
        assert_eq!(normalize_key("Minecraft:Speed"), None);
        assert_eq!(normalize_key("minecraft:sp eed"), None);
    }

    #[test]
    fn vanilla_resolves_known_keys() {
        let registry = StaticEffectRegistry::vanilla();
        let speed = registry.resolve("minecraft:speed").unwrap();
        assert_eq!(speed.as_str(), "minecraft:speed");
        assert_eq!(registry.resolve("poison").map(|k| k.to_string()).as_deref(), Some("minecraft:poison"));
        assert_eq!(registry.resolve("minecraft:not_an_effect"), None);
    }

    #[test]
    fn vanilla_describes_names_and_categories() {
        let registry = StaticEffectRegistry::vanilla();
        let poison = registry.resolve("poison").unwrap();
        assert_eq!(registry.display_name(&poison), "Poison");
        assert_eq!(registry.category(&poison), EffectCategory::Harmful);
        assert_eq!(registry.key_of(&poison), "minecraft:poison");
        assert_eq!(registry.len(), VANILLA_EFFECTS.len());
    }

    #[test]
    fn unknown_kind_falls_back_to_key() {
        let registry = StaticEffectRegistry::new();
        let kind = EffectKind::new("mymod:frostbite");
        assert_eq!(registry.display_name(&kind), "mymod:frostbite");
        assert_eq!(registry.category(&kind), EffectCategory::Neutral);
        assert!(registry.is_empty());
    }

    #[test]
    fn register_adds_modded_effect() {
        let mut registry = StaticEffectRegistry::vanilla();
        let kind = registry
            .register("mymod:frostbite", "Frostbite", EffectCategory::Harmful)
            .unwrap();
        assert_eq!(registry.resolve("mymod:frostbite"), Some(kind.clone()));
        assert_eq!(registry.display_name(&kind), "Frostbite");
        assert!(registry.register("Bad Key", "x", EffectCategory::Neutral).is_none());
    }
}
