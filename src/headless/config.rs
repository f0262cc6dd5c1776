//! JSON configuration parsing for headless mode
//!
//! Parses JSON match configurations and converts them to the game's MatchConfig format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::play_match::ability_config::KitDefinitions;
use crate::play_match::combat_ai::AiTier;
use crate::play_match::match_config::{ArenaMap, CharacterKey, GameMode, MatchConfig};

/// Headless match configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessMatchConfig {
    /// Character for slot One (e.g. "Ranger")
    pub fighter1: String,
    /// Character for slot Two
    pub fighter2: String,
    /// AI tier names for the two slots (default: both "Master").
    /// "Local" leaves a slot without AI; it will stand still.
    #[serde(default)]
    pub tiers: Vec<String>,
    /// Arena map name (default: "BasicArena")
    #[serde(default = "default_map")]
    pub map: String,
    /// Game mode name (default: "Standard")
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Maximum match duration in seconds (default: 300)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic match reproduction
    /// If provided, the match will use a seeded RNG for reproducible results
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for match log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Alternative characters.ron to load instead of the built-in roster
    #[serde(default)]
    pub kits_path: Option<String>,
}

fn default_map() -> String {
    "BasicArena".to_string()
}

fn default_mode() -> String {
    "Standard".to_string()
}

fn default_max_duration() -> f32 {
    300.0
}

impl HeadlessMatchConfig {
    /// A config for two Master-tier AIs on the basic arena.
    pub fn new(fighter1: CharacterKey, fighter2: CharacterKey) -> Self {
        Self {
            fighter1: fighter1.name().to_string(),
            fighter2: fighter2.name().to_string(),
            tiers: Vec::new(),
            map: default_map(),
            mode: default_mode(),
            max_duration_secs: default_max_duration(),
            random_seed: None,
            output_path: None,
            kits_path: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_json(&contents)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: HeadlessMatchConfig =
            serde_json::from_str(contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        Self::parse_character(&self.fighter1)?;
        Self::parse_character(&self.fighter2)?;

        if self.tiers.len() > 2 {
            return Err(format!("tiers has {} entries, expected at most 2", self.tiers.len()));
        }
        for tier in &self.tiers {
            Self::parse_tier(tier)?;
        }

        Self::parse_map(&self.map)?;
        Self::parse_mode(&self.mode)?;

        if !self.max_duration_secs.is_finite() || self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }

        Ok(())
    }

    fn parse_character(name: &str) -> Result<CharacterKey, String> {
        CharacterKey::from_name(name).ok_or_else(|| {
            let valid: Vec<&str> = CharacterKey::all().iter().map(|k| k.name()).collect();
            format!("Unknown character: '{}'. Valid characters: {}", name, valid.join(", "))
        })
    }

    /// Parse a tier name; "Local" means no AI.
    fn parse_tier(name: &str) -> Result<Option<AiTier>, String> {
        if name.eq_ignore_ascii_case("local") {
            return Ok(None);
        }
        AiTier::from_name(name).map(Some).ok_or_else(|| {
            format!(
                "Unknown AI tier: '{}'. Valid tiers: Novice, Apprentice, Veteran, Elite, Master, Local",
                name
            )
        })
    }

    fn parse_map(name: &str) -> Result<ArenaMap, String> {
        ArenaMap::from_name(name).ok_or_else(|| {
            format!(
                "Unknown map: '{}'. Valid maps: BasicArena, PillaredArena",
                name
            )
        })
    }

    fn parse_mode(name: &str) -> Result<GameMode, String> {
        GameMode::from_name(name)
            .ok_or_else(|| format!("Unknown mode: '{}'. Valid modes: Standard, Blitz", name))
    }

    /// Convert to the game's MatchConfig format
    pub fn to_match_config(&self) -> Result<MatchConfig, String> {
        let mut tiers = [Some(AiTier::Master); 2];
        for (index, name) in self.tiers.iter().enumerate().take(2) {
            tiers[index] = Self::parse_tier(name)?;
        }

        Ok(MatchConfig {
            fighters: [
                Self::parse_character(&self.fighter1)?,
                Self::parse_character(&self.fighter2)?,
            ],
            tiers,
            map: Self::parse_map(&self.map)?,
            mode: Self::parse_mode(&self.mode)?,
        })
    }

    /// The kit roster this match uses: `kits_path` if set, else built-in.
    pub fn load_kits(&self) -> Result<KitDefinitions, String> {
        match &self.kits_path {
            Some(path) => KitDefinitions::load_from_file(Path::new(path)),
            None => KitDefinitions::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_in() {
        let config = HeadlessMatchConfig::from_json(r#"{"fighter1": "Ranger", "fighter2": "Vanguard"}"#)
            .unwrap();
        let match_config = config.to_match_config().unwrap();
        assert_eq!(match_config.map, ArenaMap::BasicArena);
        assert_eq!(match_config.mode, GameMode::Standard);
        assert_eq!(match_config.tiers, [Some(AiTier::Master), Some(AiTier::Master)]);
        assert_eq!(config.max_duration_secs, 300.0);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let bad_character = r#"{"fighter1": "Paladin", "fighter2": "Vanguard"}"#;
        assert!(HeadlessMatchConfig::from_json(bad_character)
            .unwrap_err()
            .contains("Unknown character"));

        let bad_tier = r#"{"fighter1": "Ranger", "fighter2": "Vanguard", "tiers": ["Godlike"]}"#;
        assert!(HeadlessMatchConfig::from_json(bad_tier).unwrap_err().contains("Unknown AI tier"));

        let bad_duration = r#"{"fighter1": "Ranger", "fighter2": "Vanguard", "max_duration_secs": 0}"#;
        assert!(HeadlessMatchConfig::from_json(bad_duration).is_err());
    }

    #[test]
    fn test_local_tier_means_no_ai() {
        let config = HeadlessMatchConfig::from_json(
            r#"{"fighter1": "Ranger", "fighter2": "Duelist", "tiers": ["Local", "novice"], "mode": "Blitz"}"#,
        )
        .unwrap();
        let match_config = config.to_match_config().unwrap();
        assert_eq!(match_config.tiers, [None, Some(AiTier::Novice)]);
        assert_eq!(match_config.mode, GameMode::Blitz);
    }
}
