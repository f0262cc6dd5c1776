//! Voidcaller AI Module
//!
//! Stacks gravity marks toward the Gravity Well threshold, softens the
//! target with Corrupt, and saves Implosion for when missing health makes
//! it hit hard.

use crate::play_match::abilities::{SkillId, SkillSlot};
use crate::play_match::ability_config::SkillDefinition;

use super::{score_basic, score_nuke, ClassAI, Situation};

pub struct VoidcallerAI;

impl ClassAI for VoidcallerAI {
    fn score_skill(&self, _slot: SkillSlot, def: &SkillDefinition, situation: &Situation) -> f32 {
        let Some(opponent) = situation.opponent else {
            return 0.0;
        };
        match def.id {
            SkillId::VoidOrb => score_basic(def, situation),
            SkillId::GravityBolt => {
                let base = score_nuke(20.0, def, situation);
                if base > 0.0 {
                    base + 8.0 * opponent.gravity_marks as f32
                } else {
                    0.0
                }
            }
            SkillId::Corrupt => {
                if situation.in_range(def.range) && !opponent.corrupted {
                    26.0
                } else {
                    0.0
                }
            }
            SkillId::Implosion => {
                let missing = 1.0 - opponent.health_pct;
                score_nuke(15.0 + 30.0 * missing, def, situation)
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
    fn test_marks_raise_gravity_bolt_priority() {
        let kits = KitDefinitions::default();
        let bolt = kits.get(CharacterKey::Voidcaller).unwrap().skill(SkillSlot::Q).unwrap();
        let mut s = situation(CharacterKey::Voidcaller);
        let fresh = VoidcallerAI.score_skill(SkillSlot::Q, bolt, &s);
        if let Some(o) = s.opponent.as_mut() {
            o.gravity_marks = 2;
        }
        assert!(VoidcallerAI.score_skill(SkillSlot::Q, bolt, &s) > fresh);
    }

    #[test]
    fn test_corrupt_not_reapplied() {
        let kits = KitDefinitions::default();
        let corrupt = kits.get(CharacterKey::Voidcaller).unwrap().skill(SkillSlot::W).unwrap();
        let mut s = situation(CharacterKey::Voidcaller);
        if let Some(o) = s.opponent.as_mut() {
            o.corrupted = true;
        }
        assert_eq!(VoidcallerAI.score_skill(SkillSlot::W, corrupt, &s), 0.0);
    }
}
