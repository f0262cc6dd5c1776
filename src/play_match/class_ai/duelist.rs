//! Duelist AI Module
//!
//! Lunges in, parries the return swing and finishes with Eviscerate.

use crate::play_match::abilities::{SkillId, SkillSlot};
use crate::play_match::ability_config::SkillDefinition;

use super::{score_basic, score_nuke, ClassAI, Situation};

/// Lunge from just outside slash range.
const LUNGE_MIN_DISTANCE: f32 = 3.0;
const LUNGE_MAX_DISTANCE: f32 = 6.0;

pub struct DuelistAI;

impl ClassAI for DuelistAI {
    fn score_skill(&self, _slot: SkillSlot, def: &SkillDefinition, situation: &Situation) -> f32 {
        let Some(opponent) = situation.opponent else {
            return 0.0;
        };
        match def.id {
            SkillId::Slash => score_basic(def, situation),
            SkillId::Parry => {
                let pressured = situation.under_fire() || (situation.distance < 3.0 && !opponent.stunned);
                if pressured && !situation.shielded {
                    18.0
                } else {
                    0.0
                }
            }
            SkillId::Lunge => {
                if situation.distance > LUNGE_MIN_DISTANCE && situation.distance <= LUNGE_MAX_DISTANCE {
                    24.0
                } else {
                    0.0
                }
            }
            SkillId::Fade => {
                if !situation.cloaked && situation.distance > 4.0 {
                    16.0
                } else {
                    0.0
                }
            }
            SkillId::Eviscerate => {
                score_nuke(20.0 + 40.0 * (1.0 - opponent.health_pct), def, situation)
            }
            _ => 0.0,
        }
    }
}
