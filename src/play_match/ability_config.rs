//! Data-Driven Character Kits
//!
//! Character stats and skill definitions are loaded from RON instead of being
//! hardcoded. The built-in roster (`assets/config/characters.ron`) is embedded
//! at compile time; an alternative file can be loaded at runtime to try
//! balance changes without recompiling.
//!
//! ## Usage
//! ```ignore
//! let kits = KitDefinitions::builtin()?;
//! let ranger = kits.get(CharacterKey::Ranger).unwrap();
//! println!("Snipe cooldown: {}", ranger.skill(SkillSlot::Q).unwrap().cooldown);
//! ```

use bevy::log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::abilities::{Archetype, AttackType, PassiveKind, SkillId, SkillSlot, SkillTag};
use super::match_config::CharacterKey;

const BUILTIN_KITS: &str = include_str!("../../assets/config/characters.ron");

/// Static per-character skill data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Behavior the resolver executes
    pub id: SkillId,
    /// Display name
    pub name: String,
    /// Energy deducted on a locally-paid cast
    #[serde(default)]
    pub energy_cost: f32,
    /// Cooldown after cast in seconds
    #[serde(default)]
    pub cooldown: f32,
    /// Maximum range in units (0 = self-centered)
    #[serde(default)]
    pub range: f32,
    /// Hints for the AI offense scorer; never read by the resolver
    #[serde(default)]
    pub tags: Vec<SkillTag>,
}

impl SkillDefinition {
    pub fn has_tag(&self, tag: SkillTag) -> bool {
        self.tags.contains(&tag)
    }

    /// True if the skill does nothing but move the caster.
    pub fn is_pure_mobility(&self) -> bool {
        !self.tags.is_empty() && self.tags.iter().all(|t| *t == SkillTag::Mobility)
    }
}

/// A full character kit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CharacterDefinition {
    pub name: String,
    pub attack_type: AttackType,
    pub archetype: Archetype,
    pub max_health: f32,
    pub max_energy: f32,
    /// Base energy regeneration per second
    pub energy_regen: f32,
    /// Base movement speed in units per second
    pub move_speed: f32,
    /// Comfortable distance band (min, max) for kiting
    pub preferred_range: (f32, f32),
    /// Skill the AI reflex layer uses as a dodge, if any
    #[serde(default)]
    pub dodge_skill: Option<SkillSlot>,
    pub passive: PassiveKind,
    pub skills: HashMap<SkillSlot, SkillDefinition>,
}

impl CharacterDefinition {
    pub fn skill(&self, slot: SkillSlot) -> Option<&SkillDefinition> {
        self.skills.get(&slot)
    }

    fn validate(&self) -> Result<(), String> {
        for slot in SkillSlot::ALL {
            let Some(skill) = self.skills.get(&slot) else {
                return Err(format!("{} is missing skill slot {:?}", self.name, slot));
            };
            if skill.energy_cost < 0.0 || skill.cooldown < 0.0 || skill.range < 0.0 {
                return Err(format!(
                    "{} skill {} has a negative cost, cooldown or range",
                    self.name, skill.name
                ));
            }
        }
        if self.max_health <= 0.0 || self.max_energy <= 0.0 || self.move_speed <= 0.0 {
            return Err(format!("{} has non-positive pools or speed", self.name));
        }
        if self.preferred_range.0 > self.preferred_range.1 {
            return Err(format!("{} has an inverted preferred range", self.name));
        }
        Ok(())
    }
}

/// Root structure for the characters.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct KitsConfig {
    pub characters: HashMap<CharacterKey, CharacterDefinition>,
}

/// All character kits available to a match.
#[derive(Clone, Debug)]
pub struct KitDefinitions {
    definitions: HashMap<CharacterKey, CharacterDefinition>,
}

impl Default for KitDefinitions {
    /// Parse the embedded roster. Panics if it is invalid - use for tests only.
    fn default() -> Self {
        Self::builtin().expect("Failed to parse built-in character kits")
    }
}

impl KitDefinitions {
    pub fn new(config: KitsConfig) -> Self {
        Self {
            definitions: config.characters,
        }
    }

    /// Parse the roster embedded in the binary.
    pub fn builtin() -> Result<Self, String> {
        Self::from_ron(BUILTIN_KITS, "built-in characters.ron")
    }

    /// Load kits from a RON file on disk.
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_ron(&contents, &path.display().to_string())
    }

    fn from_ron(contents: &str, origin: &str) -> Result<Self, String> {
        let config: KitsConfig = ron::from_str(contents)
            .map_err(|e| format!("Failed to parse {}: {}", origin, e))?;

        let definitions = KitDefinitions::new(config);
        definitions.validate()?;

        info!("Loaded {} character kits from {}", definitions.definitions.len(), origin);
        Ok(definitions)
    }

    pub fn get(&self, key: CharacterKey) -> Option<&CharacterDefinition> {
        self.definitions.get(&key)
    }

    /// Check every roster character is present and well-formed.
    pub fn validate(&self) -> Result<(), String> {
        let missing: Vec<CharacterKey> = CharacterKey::all()
            .iter()
            .copied()
            .filter(|key| !self.definitions.contains_key(key))
            .collect();
        if !missing.is_empty() {
            return Err(format!("Missing character kits: {:?}", missing));
        }
        for definition in self.definitions.values() {
            definition.validate()?;
        }
        Ok(())
    }
}
