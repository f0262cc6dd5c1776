//! Match configuration data structures
//!
//! Character roster keys, arena maps, and game modes shared by the
//! simulation, the headless runner and the CLI.

use serde::{Deserialize, Serialize};

use bevy::math::Vec3;
use bevy::prelude::Resource;

use super::combat_ai::AiTier;
use super::constants::{ARENA_HALF_X, ARENA_HALF_Z, ARENA_MARGIN};
use super::physics::{Arena, Bounds};

/// Available characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterKey {
    Vanguard,
    Ranger,
    Voidcaller,
    Duelist,
    Chronomancer,
    Engineer,
}

impl CharacterKey {
    /// Get all available characters
    pub fn all() -> &'static [CharacterKey] {
        &[
            CharacterKey::Vanguard,
            CharacterKey::Ranger,
            CharacterKey::Voidcaller,
            CharacterKey::Duelist,
            CharacterKey::Chronomancer,
            CharacterKey::Engineer,
        ]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            CharacterKey::Vanguard => "Vanguard",
            CharacterKey::Ranger => "Ranger",
            CharacterKey::Voidcaller => "Voidcaller",
            CharacterKey::Duelist => "Duelist",
            CharacterKey::Chronomancer => "Chronomancer",
            CharacterKey::Engineer => "Engineer",
        }
    }

    /// Parse a display name (case-insensitive).
    pub fn from_name(name: &str) -> Option<CharacterKey> {
        CharacterKey::all()
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(name))
    }
}

/// Available arena maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArenaMap {
    #[default]
    BasicArena,
    PillaredArena,
}

impl ArenaMap {
    pub fn name(&self) -> &'static str {
        match self {
            ArenaMap::BasicArena => "BasicArena",
            ArenaMap::PillaredArena => "PillaredArena",
        }
    }

    pub fn from_name(name: &str) -> Option<ArenaMap> {
        match name {
            "BasicArena" => Some(ArenaMap::BasicArena),
            "PillaredArena" => Some(ArenaMap::PillaredArena),
            _ => None,
        }
    }

    /// Build the static geometry for this map.
    pub fn arena(&self) -> Arena {
        let obstacles = match self {
            ArenaMap::BasicArena => Vec::new(),
            // Four pillars, one per quadrant, leaving the spawn lane open
            ArenaMap::PillaredArena => [(-8.0, -8.0), (8.0, -8.0), (-8.0, 8.0), (8.0, 8.0)]
                .into_iter()
                .map(|(x, z)| Bounds::from_center(Vec3::new(x, 0.0, z), Vec3::new(1.5, 0.0, 1.5)))
                .collect(),
        };
        Arena::new(ARENA_HALF_X, ARENA_HALF_Z, ARENA_MARGIN, obstacles)
    }
}

/// Game modes. Only energy regeneration differs between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Standard,
    Blitz,
}

impl GameMode {
    pub fn from_name(name: &str) -> Option<GameMode> {
        match name {
            "Standard" => Some(GameMode::Standard),
            "Blitz" => Some(GameMode::Blitz),
            _ => None,
        }
    }
}

impl GameMode {
    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Standard => "Standard",
            GameMode::Blitz => "Blitz",
        }
    }
}

/// The match configuration resource
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Characters for slot One and slot Two
    pub fighters: [CharacterKey; 2],
    /// AI tier per slot; `None` is local human control
    pub tiers: [Option<AiTier>; 2],
    /// Selected map
    pub map: ArenaMap,
    pub mode: GameMode,
}

impl Default for MatchConfig {
    /// Exhibition match: Ranger vs Vanguard, both Master AI.
    fn default() -> Self {
        Self {
            fighters: [CharacterKey::Ranger, CharacterKey::Vanguard],
            tiers: [Some(AiTier::Master), Some(AiTier::Master)],
            map: ArenaMap::BasicArena,
            mode: GameMode::Standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trips() {
        for key in CharacterKey::all() {
            assert_eq!(CharacterKey::from_name(key.name()), Some(*key));
        }
        for map in [ArenaMap::BasicArena, ArenaMap::PillaredArena] {
            assert_eq!(ArenaMap::from_name(map.name()), Some(map));
        }
        assert_eq!(GameMode::from_name(GameMode::Blitz.name()), Some(GameMode::Blitz));
    }

    #[test]
    fn test_pillared_arena_blocks_diagonal() {
        let arena = ArenaMap::PillaredArena.arena();
        assert!(arena.segment_blocked(Vec3::new(4.0, 0.0, 4.0), Vec3::new(12.0, 0.0, 12.0)));
        assert!(!arena.segment_blocked(Vec3::new(-18.0, 0.0, 0.0), Vec3::new(18.0, 0.0, 0.0)));
    }
}
