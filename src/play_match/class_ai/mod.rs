//! Character-Specific AI Modules
//!
//! Offense scoring for each character. Each character has its own module
//! that implements the `ClassAI` trait.
//!
//! ## Architecture
//!
//! The combat AI works in two phases:
//! 1. **Situation Building**: `Situation` collects everything both AI layers
//!    read (distance, line of sight, threats) once per tick
//! 2. **Scoring**: each character's `score_skill()` rates one usable skill;
//!    the tactical layer picks the best positive score
//!
//! Scores are plain utilities. Around 10-40 is a normal pick, 0 or below
//! means "don't". The execute and combo bonuses are added on top by the
//! tactical layer.

pub mod chronomancer;
pub mod duelist;
pub mod engineer;
pub mod ranger;
pub mod vanguard;
pub mod voidcaller;

use bevy::math::Vec3;
use smallvec::SmallVec;

use super::abilities::{Archetype, SkillSlot};
use super::ability_config::SkillDefinition;
use super::components::{Fighter, FighterSlot, StackKind, StatusKind};
use super::effects::TransientEffect;
use super::match_config::CharacterKey;
use super::physics::{flat_direction, Arena};
use super::skills::{self, SkillPayment};

/// Per-tick snapshot of the opponent, as far as the AI can tell.
#[derive(Clone, Copy, Debug)]
pub struct OpponentInfo {
    pub slot: FighterSlot,
    pub character: CharacterKey,
    pub position: Vec3,
    pub velocity: Vec3,
    pub health_pct: f32,
    pub energy: f32,
    pub shielded: bool,
    pub stunned: bool,
    pub rooted: bool,
    pub slowed: bool,
    pub corrupted: bool,
    pub charging: bool,
    pub gravity_marks: u32,
}

/// What kind of danger a threat is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreatKind {
    Projectile,
    Zone,
}

/// A hostile effect predicted to be near the fighter shortly.
#[derive(Clone, Copy, Debug)]
pub struct Threat {
    pub kind: ThreatKind,
    pub position: Vec3,
    /// Travel direction for projectiles, zero for zones
    pub direction: Vec3,
    /// Hazard radius for zones, zero for projectiles
    pub radius: f32,
}

/// Shared read-only analysis for both AI layers.
#[derive(Clone, Debug)]
pub struct Situation {
    pub slot: FighterSlot,
    pub character: CharacterKey,
    pub archetype: Archetype,
    pub position: Vec3,
    pub velocity: Vec3,
    pub aim: Vec3,
    pub speed: f32,
    pub health_pct: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub preferred_range: (f32, f32),
    pub dodge_skill: Option<SkillSlot>,
    pub shielded: bool,
    pub cloaked: bool,
    pub sieged: bool,
    /// Skills that could be used this instant (control, cooldown, energy)
    pub usable: SmallVec<[SkillSlot; 5]>,
    pub opponent: Option<OpponentInfo>,
    /// Planar distance to the opponent (infinite without one)
    pub distance: f32,
    /// Unit direction to the opponent
    pub bearing: Vec3,
    pub line_of_sight: bool,
    /// False while the opponent is cloaked
    pub opponent_visible: bool,
    pub threats: SmallVec<[Threat; 4]>,
    /// Position of our own standing construct
    pub construct: Option<Vec3>,
    pub match_time: f32,
}

impl Situation {
    /// Build the analysis for `fighter`. `threats` comes from the reflex
    /// layer's scan.
    pub fn build(
        fighter: &Fighter,
        opponent: Option<&Fighter>,
        live: &[TransientEffect],
        arena: &Arena,
        threats: SmallVec<[Threat; 4]>,
        match_time: f32,
    ) -> Self {
        let opponent = opponent.filter(|o| o.is_alive());
        let usable = SkillSlot::ALL
            .iter()
            .copied()
            .filter(|slot| skills::can_use(fighter, *slot, SkillPayment::Local))
            .collect();

        let (distance, bearing, line_of_sight, opponent_visible) = match opponent {
            Some(o) => (
                planar_distance(fighter.position, o.position),
                flat_direction(fighter.position, o.position),
                !arena.segment_blocked(fighter.position, o.position),
                !o.statuses.has(StatusKind::Cloak),
            ),
            None => (f32::INFINITY, fighter.aim, false, false),
        };

        let construct = fighter.construct.and_then(|id| {
            live.iter()
                .find(|e| e.id == id && !e.is_destroyed())
                .map(|e| e.position)
        });

        Self {
            slot: fighter.slot,
            character: fighter.character,
            archetype: fighter.kit.archetype,
            position: fighter.position,
            velocity: fighter.velocity,
            aim: fighter.aim,
            speed: fighter.effective_speed(),
            health_pct: fighter.health_pct(),
            energy: fighter.energy,
            max_energy: fighter.max_energy,
            preferred_range: fighter.kit.preferred_range,
            dodge_skill: fighter.kit.dodge_skill,
            shielded: fighter.statuses.has(StatusKind::Shielded)
                || fighter.statuses.has(StatusKind::SpellShield)
                || fighter.statuses.has(StatusKind::Parry),
            cloaked: fighter.statuses.has(StatusKind::Cloak),
            sieged: fighter.statuses.has(StatusKind::Siege),
            usable,
            opponent: opponent.map(OpponentInfo::from_fighter),
            distance,
            bearing,
            line_of_sight,
            opponent_visible,
            threats,
            construct,
            match_time,
        }
    }

    pub fn can_use(&self, slot: SkillSlot) -> bool {
        self.usable.contains(&slot)
    }

    /// Opponent within `range` (skill range 0 means self-centered: always true).
    pub fn in_range(&self, range: f32) -> bool {
        self.opponent.is_some() && (range <= 0.0 || self.distance <= range)
    }

    pub fn opponent_health_pct(&self) -> f32 {
        self.opponent.map_or(1.0, |o| o.health_pct)
    }

    /// Opponent can't dodge right now.
    pub fn opponent_locked_down(&self) -> bool {
        self.opponent.is_some_and(|o| o.stunned || o.rooted)
    }

    pub fn under_fire(&self) -> bool {
        !self.threats.is_empty()
    }
}

impl OpponentInfo {
    fn from_fighter(fighter: &Fighter) -> Self {
        Self {
            slot: fighter.slot,
            character: fighter.character,
            position: fighter.position,
            velocity: fighter.velocity,
            health_pct: fighter.health_pct(),
            energy: fighter.energy,
            shielded: fighter.statuses.has(StatusKind::Shielded)
                || fighter.statuses.has(StatusKind::SpellShield)
                || fighter.statuses.has(StatusKind::Parry),
            stunned: fighter.statuses.has(StatusKind::Stun),
            rooted: fighter.statuses.has(StatusKind::Root),
            slowed: fighter.statuses.has(StatusKind::Slow),
            corrupted: fighter.statuses.has(StatusKind::Corrupted),
            charging: fighter.charge.is_some(),
            gravity_marks: fighter.statuses.stacks(StackKind::GravityMark),
        }
    }
}

pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}

/// Trait for character-specific offense scoring.
pub trait ClassAI: Send + Sync {
    /// Utility of using `slot` right now. Only called for usable skills that
    /// are not reflex-only and respect the tier's energy reserve.
    fn score_skill(&self, slot: SkillSlot, def: &SkillDefinition, situation: &Situation) -> f32;
}

/// Get the AI implementation for a given character.
pub fn get_class_ai(character: CharacterKey) -> Box<dyn ClassAI> {
    match character {
        CharacterKey::Vanguard => Box::new(vanguard::VanguardAI),
        CharacterKey::Ranger => Box::new(ranger::RangerAI),
        CharacterKey::Voidcaller => Box::new(voidcaller::VoidcallerAI),
        CharacterKey::Duelist => Box::new(duelist::DuelistAI),
        CharacterKey::Chronomancer => Box::new(chronomancer::ChronomancerAI),
        CharacterKey::Engineer => Box::new(engineer::EngineerAI),
    }
}

// ============================================================================
// Shared Scoring Helpers
// ============================================================================

/// Basic attack: worth it whenever the opponent is in range and a hit can land.
pub fn score_basic(def: &SkillDefinition, situation: &Situation) -> f32 {
    if !situation.in_range(def.range) {
        return 0.0;
    }
    let mut score = 10.0;
    if situation.opponent.is_some_and(|o| o.shielded) {
        score -= 8.0;
    }
    score
}

/// Direct damage with a shield check; a blocked hit wastes the cooldown.
pub fn score_nuke(base: f32, def: &SkillDefinition, situation: &Situation) -> f32 {
    if !situation.in_range(def.range) {
        return 0.0;
    }
    match situation.opponent {
        Some(o) if o.shielded => 0.0,
        Some(_) => base,
        None => 0.0,
    }
}
