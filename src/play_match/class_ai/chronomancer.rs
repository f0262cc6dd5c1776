//! Chronomancer AI Module
//!
//! Zones the opponent with Temporal Field, wards against incoming shots,
//! rewinds when hurt and drains energy with Entropy.

use crate::play_match::abilities::{SkillId, SkillSlot};
use crate::play_match::ability_config::SkillDefinition;
use crate::play_match::constants::ENTROPY_MAX_DRAIN;

use super::{score_basic, ClassAI, Situation};

pub struct ChronomancerAI;

impl ClassAI for ChronomancerAI {
    fn score_skill(&self, _slot: SkillSlot, def: &SkillDefinition, situation: &Situation) -> f32 {
        let Some(opponent) = situation.opponent else {
            return 0.0;
        };
        match def.id {
            SkillId::ChronoBolt => score_basic(def, situation),
            SkillId::TemporalField => {
                if !situation.in_range(def.range) {
                    0.0
                } else if opponent.stunned || opponent.rooted || opponent.slowed {
                    28.0
                } else {
                    18.0
                }
            }
            SkillId::SpellWard => {
                if situation.under_fire() && !situation.shielded {
                    26.0
                } else {
                    0.0
                }
            }
            SkillId::Rewind => {
                if situation.health_pct < 0.5 {
                    24.0
                } else {
                    0.0
                }
            }
            SkillId::Entropy => {
                if !situation.in_range(def.range) || opponent.shielded || opponent.energy < 20.0 {
                    0.0
                } else {
                    10.0 + 0.4 * opponent.energy.min(ENTROPY_MAX_DRAIN)
                }
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play_match::ability_config::KitDefinitions;
    use crate::play_match::class_ai::test_support::situation;
    use crate::play_match::match_config::CharacterKey;

    #[test]
    fn test_rewind_only_when_hurt() {
        let kits = KitDefinitions::default();
        let rewind = kits.get(CharacterKey::Chronomancer).unwrap().skill(SkillSlot::E).unwrap();
        let mut s = situation(CharacterKey::Chronomancer);
        assert_eq!(ChronomancerAI.score_skill(SkillSlot::E, rewind, &s), 0.0);
        s.health_pct = 0.3;
        assert!(ChronomancerAI.score_skill(SkillSlot::E, rewind, &s) > 0.0);
    }
}
