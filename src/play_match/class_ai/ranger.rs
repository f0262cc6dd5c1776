//! Ranger AI Module
//!
//! Kites at long range and lets the sentry add pressure. Tumble belongs to
//! the reflex layer and is never picked here.

use crate::play_match::abilities::{SkillId, SkillSlot};
use crate::play_match::ability_config::SkillDefinition;
use crate::play_match::constants::SENTRY_RANGE;

use super::{score_basic, score_nuke, ClassAI, Situation};

pub struct RangerAI;

impl ClassAI for RangerAI {
    fn score_skill(&self, _slot: SkillSlot, def: &SkillDefinition, situation: &Situation) -> f32 {
        match def.id {
            SkillId::Arrow => score_basic(def, situation),
            SkillId::Snipe => {
                let score = score_nuke(30.0, def, situation);
                if score > 0.0 && situation.opponent_locked_down() {
                    score + 10.0
                } else {
                    score
                }
            }
            SkillId::VenomArrow => score_nuke(18.0, def, situation),
            SkillId::SentryTurret => {
                if situation.construct.is_none() && situation.distance <= SENTRY_RANGE + 4.0 {
                    24.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}
