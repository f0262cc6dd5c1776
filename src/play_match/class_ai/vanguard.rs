//! Vanguard AI Module
//!
//! Melee bruiser. Closes distance with Charge, then trades up close.
//!
//! ## Priority Order
//! 1. Charge (gap closer, only from range)
//! 2. Ground Slam (opponent in slam radius)
//! 3. Shield Wall (while under fire)
//! 4. Warcry (brawling and hurt)
//! 5. Cleave

use crate::play_match::abilities::{SkillId, SkillSlot};
use crate::play_match::ability_config::SkillDefinition;
use crate::play_match::constants::{BATTLE_AURA_RADIUS, GROUND_SLAM_RADIUS};

use super::{score_basic, ClassAI, Situation};

/// Don't waste a charge on someone already in cleave range.
const CHARGE_MIN_DISTANCE: f32 = 4.0;

pub struct VanguardAI;

impl ClassAI for VanguardAI {
    fn score_skill(&self, _slot: SkillSlot, def: &SkillDefinition, situation: &Situation) -> f32 {
        let Some(opponent) = situation.opponent else {
            return 0.0;
        };
        match def.id {
            SkillId::Cleave => score_basic(def, situation),
            SkillId::Charge => {
                if situation.distance >= CHARGE_MIN_DISTANCE && situation.distance <= def.range {
                    if opponent.shielded {
                        12.0
                    } else {
                        30.0
                    }
                } else {
                    0.0
                }
            }
            SkillId::GroundSlam => {
                if situation.distance > GROUND_SLAM_RADIUS {
                    0.0
                } else if opponent.slowed {
                    20.0
                } else {
                    28.0
                }
            }
            SkillId::ShieldWall => {
                if situation.shielded {
                    0.0
                } else if situation.under_fire() || (opponent.charging && situation.distance < 6.0) {
                    25.0
                } else {
                    0.0
                }
            }
            SkillId::Warcry => {
                if situation.distance <= BATTLE_AURA_RADIUS + 2.0 && situation.health_pct < 0.8 {
                    22.0
                } else {
                    0.0
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
    fn test_charge_only_from_range() {
        let kits = KitDefinitions::default();
        let kit = kits.get(CharacterKey::Vanguard).unwrap();
        let charge = kit.skill(SkillSlot::Q).unwrap();

        let mut far = situation(CharacterKey::Vanguard);
        far.distance = 10.0;
        assert!(VanguardAI.score_skill(SkillSlot::Q, charge, &far) > 0.0);

        let mut close = situation(CharacterKey::Vanguard);
        close.distance = 2.0;
        assert_eq!(VanguardAI.score_skill(SkillSlot::Q, charge, &close), 0.0);
    }
}
