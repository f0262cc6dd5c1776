//! Engineer AI Module
//!
//! Keeps a turret standing and fights next to it. Mines go down when the
//! opponent closes in; the barrier answers incoming projectiles.

use crate::play_match::abilities::{SkillId, SkillSlot};
use crate::play_match::ability_config::SkillDefinition;
use crate::play_match::class_ai::ThreatKind;
use crate::play_match::constants::SIEGE_RANGE_BONUS;

use super::{score_basic, ClassAI, Situation};

pub struct EngineerAI;

impl ClassAI for EngineerAI {
    fn score_skill(&self, _slot: SkillSlot, def: &SkillDefinition, situation: &Situation) -> f32 {
        if situation.opponent.is_none() {
            return 0.0;
        }
        match def.id {
            SkillId::RivetGun => {
                if situation.sieged && situation.distance <= def.range + SIEGE_RANGE_BONUS {
                    12.0
                } else {
                    score_basic(def, situation)
                }
            }
            SkillId::DeployTurret => {
                if situation.construct.is_none() {
                    30.0
                } else {
                    0.0
                }
            }
            SkillId::ArcMine => {
                if situation.distance < 5.0 {
                    20.0
                } else {
                    0.0
                }
            }
            SkillId::Barrier => {
                let projectiles = situation
                    .threats
                    .iter()
                    .any(|t| t.kind == ThreatKind::Projectile);
                if projectiles {
                    22.0
                } else {
                    0.0
                }
            }
            SkillId::SiegeMode => {
                let good_spot = situation.construct.is_some()
                    && situation.distance > 6.0
                    && situation.distance <= situation.preferred_range.1 + SIEGE_RANGE_BONUS;
                if good_spot && !situation.sieged {
                    18.0
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
    use bevy::math::Vec3;

    #[test]
    fn test_turret_not_redeployed_while_standing() {
        let kits = KitDefinitions::default();
        let turret = kits.get(CharacterKey::Engineer).unwrap().skill(SkillSlot::Q).unwrap();
        let mut s = situation(CharacterKey::Engineer);
        assert!(EngineerAI.score_skill(SkillSlot::Q, turret, &s) > 0.0);
        s.construct = Some(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(EngineerAI.score_skill(SkillSlot::Q, turret, &s), 0.0);
    }
}
