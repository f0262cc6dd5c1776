//! Shared Utility Functions
//!
//! Helpers used by several combat modules. Keeping them here avoids circular
//! imports between combat_core, auras and skills.

use super::components::FighterSlot;
use super::match_config::CharacterKey;

/// Helper to generate a consistent combatant ID for the combat log.
///
/// Format: "P{number} {character}" e.g., "P1 Ranger"
pub fn combatant_id(slot: FighterSlot, character: CharacterKey) -> String {
    format!("P{} {}", slot.number(), character.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combatant_id_format() {
        assert_eq!(combatant_id(FighterSlot::One, CharacterKey::Ranger), "P1 Ranger");
        assert_eq!(combatant_id(FighterSlot::Two, CharacterKey::Vanguard), "P2 Vanguard");
    }
}
