//! Combat AI
//!
//! Dual-process controller for AI fighters:
//! - Reflex layer (every tick): scan hostile projectiles and hazard zones,
//!   pick an escape direction, dodge after the tier's reaction latency
//! - Tactical layer (on the tier's decision timer): line of sight, skill
//!   scoring through the character's `ClassAI`, archetype movement
//!
//! Both layers read one `Situation` built per tick. The brain never touches
//! the registry or the opponent; it returns an [`AiIntent`] and the
//! simulation executes skills and schedules dodges.

use bevy::log::debug;
use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::abilities::{Archetype, SkillSlot, SkillTag};
use super::class_ai::{self, planar_distance, ClassAI, Situation, Threat, ThreatKind};
use super::combat_core::CombatCtx;
use super::components::{Fighter, FighterSlot, GameRng, StatusKind};
use super::constants::*;
use super::effects::TransientEffect;
use super::match_config::CharacterKey;
use super::physics::{rotate_planar, Arena};
use super::skills::{self, SkillPayment};

/// AI difficulty, strictly increasing in capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AiTier {
    Novice,
    Apprentice,
    Veteran,
    Elite,
    Master,
}

/// Parameters for one AI tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AiTierConfig {
    /// Seconds between tactical decisions (0 = every tick)
    pub decision_interval: f32,
    /// Fraction of max energy kept in reserve for non-basic skills
    pub energy_reserve: f32,
    /// Beyond this distance the AI closes in before anything else
    pub engage_range: f32,
    /// Health fraction below which casters back off
    pub retreat_health: f32,
    /// 0 = perfect tracking; aim moves `1 - lag` of the way per tick
    pub aim_lag: f32,
    /// Max random aim deviation at cast time, radians
    pub aim_error: f32,
    /// Chance a threat triggers a dodge
    pub dodge_probability: f32,
    /// Delay between deciding to dodge and dodging
    pub reaction_latency: f32,
    /// Weight of the combo bonus after a setup skill
    pub combo_propensity: f32,
}

impl AiTier {
    pub const ALL: [AiTier; 5] = [
        AiTier::Novice,
        AiTier::Apprentice,
        AiTier::Veteran,
        AiTier::Elite,
        AiTier::Master,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AiTier::Novice => "Novice",
            AiTier::Apprentice => "Apprentice",
            AiTier::Veteran => "Veteran",
            AiTier::Elite => "Elite",
            AiTier::Master => "Master",
        }
    }

    /// Parse a tier name (case-insensitive).
    pub fn from_name(name: &str) -> Option<AiTier> {
        AiTier::ALL
            .iter()
            .copied()
            .find(|tier| tier.name().eq_ignore_ascii_case(name))
    }

    pub fn config(&self) -> AiTierConfig {
        match self {
            AiTier::Novice => AiTierConfig {
                decision_interval: 1.2,
                energy_reserve: 0.4,
                engage_range: 10.0,
                retreat_health: 0.15,
                aim_lag: 0.6,
                aim_error: 0.25,
                dodge_probability: 0.15,
                reaction_latency: 0.5,
                combo_propensity: 0.1,
            },
            AiTier::Apprentice => AiTierConfig {
                decision_interval: 0.9,
                energy_reserve: 0.3,
                engage_range: 12.0,
                retreat_health: 0.2,
                aim_lag: 0.45,
                aim_error: 0.18,
                dodge_probability: 0.3,
                reaction_latency: 0.35,
                combo_propensity: 0.25,
            },
            AiTier::Veteran => AiTierConfig {
                decision_interval: 0.6,
                energy_reserve: 0.2,
                engage_range: 14.0,
                retreat_health: 0.25,
                aim_lag: 0.3,
                aim_error: 0.1,
                dodge_probability: 0.5,
                reaction_latency: 0.22,
                combo_propensity: 0.45,
            },
            AiTier::Elite => AiTierConfig {
                decision_interval: 0.35,
                energy_reserve: 0.1,
                engage_range: 16.0,
                retreat_health: 0.3,
                aim_lag: 0.15,
                aim_error: 0.05,
                dodge_probability: 0.75,
                reaction_latency: 0.1,
                combo_propensity: 0.7,
            },
            AiTier::Master => AiTierConfig {
                decision_interval: 0.0,
                energy_reserve: 0.0,
                engage_range: 18.0,
                retreat_health: 0.35,
                aim_lag: 0.0,
                aim_error: 0.0,
                dodge_probability: 1.0,
                reaction_latency: 0.0,
                combo_propensity: 0.9,
            },
        }
    }
}

/// Movement mode chosen by the tactical layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Strategy {
    Idle,
    /// Hold the preferred range band, strafing inside it
    Kite,
    Chase,
    RetreatToCast,
    DefendConstruct,
    /// Walk to a point that restores line of sight
    Flank(Vec3),
    /// Hold still briefly after a cast
    Casting(f32),
}

/// A dodge the reflex layer wants, to happen after `delay` seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DodgePlan {
    pub direction: Vec3,
    pub delay: f32,
}

/// What the brain wants the simulation to do this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AiIntent {
    pub skill: Option<SkillSlot>,
    pub dodge: Option<DodgePlan>,
}

/// Per-fighter AI state.
pub struct AiBrain {
    pub tier: AiTier,
    pub config: AiTierConfig,
    pub strategy: Strategy,
    pub decision_timer: f32,
    /// While positive the tactical layer is suppressed and no new dodge starts
    pub dodge_cooldown: f32,
    /// Wait after a failed dodge roll before rolling again
    pub retry_timer: f32,
    pub strafe_sign: f32,
    pub strafe_timer: f32,
    /// Match time of the last crowd-control or debuff skill
    pub last_setup: Option<f32>,
    class_ai: Box<dyn ClassAI>,
}

impl AiBrain {
    pub fn new(tier: AiTier, character: CharacterKey) -> Self {
        Self {
            tier,
            config: tier.config(),
            strategy: Strategy::Idle,
            decision_timer: 0.0,
            dodge_cooldown: 0.0,
            retry_timer: 0.0,
            strafe_sign: 1.0,
            strafe_timer: STRAFE_SWITCH_INTERVAL,
            last_setup: None,
            class_ai: class_ai::get_class_ai(character),
        }
    }

    pub fn is_dodging(&self) -> bool {
        self.dodge_cooldown > 0.0
    }
}

// ============================================================================
// Situational Analysis
// ============================================================================

/// Hostile effects predicted to come within the danger threshold of the
/// fighter during the next `REFLEX_LOOKAHEAD` seconds, extrapolating both
/// the fighter's and the projectile's velocity linearly.
pub fn scan_threats(fighter: &Fighter, live: &[TransientEffect]) -> SmallVec<[Threat; 4]> {
    let mut threats = SmallVec::new();
    let here = fighter.position;
    let later = here + fighter.velocity * REFLEX_LOOKAHEAD;

    for effect in live {
        if effect.is_destroyed() || !effect.is_hostile_to(fighter.slot) {
            continue;
        }
        if let Some(projectile) = effect.as_projectile() {
            let closest = closest_approach(
                effect.position - here,
                projectile.velocity - fighter.velocity,
                REFLEX_LOOKAHEAD,
            );
            if closest <= REFLEX_DANGER_THRESHOLD + PROJECTILE_HIT_RADIUS {
                threats.push(Threat {
                    kind: ThreatKind::Projectile,
                    position: effect.position,
                    direction: projectile.direction(),
                    radius: 0.0,
                });
            }
        } else if let Some(radius) = effect.hazard_radius() {
            if planar_distance(here, effect.position) > REFLEX_ZONE_SCAN_RADIUS {
                continue;
            }
            if planar_distance(later, effect.position) <= radius + REFLEX_DANGER_THRESHOLD {
                threats.push(Threat {
                    kind: ThreatKind::Zone,
                    position: effect.position,
                    direction: Vec3::ZERO,
                    radius,
                });
            }
        }
    }
    threats
}

/// Minimum planar distance over `[0, horizon]` between two points moving
/// apart by `relative_velocity`, starting `offset` apart.
fn closest_approach(offset: Vec3, relative_velocity: Vec3, horizon: f32) -> f32 {
    let offset = Vec3::new(offset.x, 0.0, offset.z);
    let velocity = Vec3::new(relative_velocity.x, 0.0, relative_velocity.z);
    let speed_sq = velocity.length_squared();
    let t = if speed_sq > 1e-6 {
        (-offset.dot(velocity) / speed_sq).clamp(0.0, horizon)
    } else {
        0.0
    };
    (offset + velocity * t).length()
}

// ============================================================================
// Decision Making
// ============================================================================

/// Run both layers for one AI fighter. Sets velocity and aim directly and
/// returns the skill/dodge the simulation should carry out.
pub fn think(
    brain: &mut AiBrain,
    fighter: &mut Fighter,
    situation: &Situation,
    arena: &Arena,
    dt: f32,
    rng: &mut GameRng,
) -> AiIntent {
    let mut intent = AiIntent::default();
    if dt <= 0.0 || !fighter.has_control() || fighter.charge.is_some() {
        return intent;
    }

    brain.dodge_cooldown = (brain.dodge_cooldown - dt).max(0.0);
    brain.retry_timer = (brain.retry_timer - dt).max(0.0);
    brain.decision_timer -= dt;
    brain.strafe_timer -= dt;
    if brain.strafe_timer <= 0.0 {
        brain.strafe_timer = STRAFE_SWITCH_INTERVAL;
        brain.strafe_sign = -brain.strafe_sign;
    }

    // Process A: reflex
    if situation.under_fire() && !brain.is_dodging() && brain.retry_timer <= 0.0 {
        if rng.random_f32() < brain.config.dodge_probability {
            match escape_direction(situation, arena) {
                Some(direction) => {
                    brain.dodge_cooldown =
                        REFLEX_COOLDOWN_BASE / brain.config.dodge_probability.max(0.01);
                    intent.dodge = Some(DodgePlan {
                        direction,
                        delay: brain.config.reaction_latency,
                    });
                    debug!("{:?} dodging {:?}", fighter.slot, direction);
                    return intent;
                }
                None => brain.retry_timer = REFLEX_RETRY_INTERVAL,
            }
        } else {
            brain.retry_timer = REFLEX_RETRY_INTERVAL;
        }
    }

    // Process B: tactical
    if brain.is_dodging() {
        return intent;
    }

    if let Strategy::Casting(remaining) = brain.strategy {
        let remaining = remaining - dt;
        brain.strategy = if remaining > 0.0 {
            Strategy::Casting(remaining)
        } else {
            default_strategy(situation, &brain.config)
        };
    }

    // Losing or regaining sight can't wait for the timer
    let flanking = matches!(brain.strategy, Strategy::Flank(_));
    if situation.opponent.is_some() && flanking == situation.line_of_sight {
        brain.decision_timer = 0.0;
    }

    if brain.decision_timer <= 0.0 {
        brain.decision_timer = brain.config.decision_interval;
        if let Some(slot) = decide(brain, fighter, situation, arena) {
            intent.skill = Some(slot);
            brain.strategy = Strategy::Casting(CAST_PAUSE);
            let error = rng.random_range(-brain.config.aim_error, brain.config.aim_error);
            fighter.aim = rotate_planar(situation.bearing, error).normalize_or_zero();
            let setup = fighter
                .skill(slot)
                .is_some_and(|def| def.has_tag(SkillTag::Cc) || def.has_tag(SkillTag::Debuff));
            if setup {
                brain.last_setup = Some(situation.match_time);
            }
        }
    }

    if intent.skill.is_none() {
        update_aim(brain, fighter, situation);
    }
    fighter.velocity = movement_direction(brain, situation) * situation.speed;
    intent
}

/// Pick a skill, or set a movement strategy when nothing is worth casting.
fn decide(
    brain: &mut AiBrain,
    fighter: &Fighter,
    situation: &Situation,
    arena: &Arena,
) -> Option<SkillSlot> {
    let Some(opponent) = situation.opponent else {
        brain.strategy = Strategy::Idle;
        return None;
    };

    if !situation.line_of_sight {
        brain.strategy = Strategy::Flank(flank_point(situation, opponent.position, arena));
        return None;
    }

    if situation.opponent_visible {
        if let Some(slot) = best_skill(brain, fighter, situation) {
            return Some(slot);
        }
    }

    brain.strategy = default_strategy(situation, &brain.config);
    None
}

/// Highest-scoring usable skill above zero. Ties keep the earlier slot.
fn best_skill(brain: &AiBrain, fighter: &Fighter, situation: &Situation) -> Option<SkillSlot> {
    let reserve = brain.config.energy_reserve * situation.max_energy;
    let combo_ready = brain
        .last_setup
        .is_some_and(|t| situation.match_time - t <= COMBO_WINDOW);

    let mut best: Option<(SkillSlot, f32)> = None;
    for slot in situation.usable.iter().copied() {
        let Some(def) = fighter.skill(slot) else {
            continue;
        };
        // Dodge skills belong to the reflex layer
        if def.is_pure_mobility() {
            continue;
        }
        if slot != SkillSlot::Basic && situation.energy - def.energy_cost < reserve {
            continue;
        }

        let mut score = brain.class_ai.score_skill(slot, def, situation);
        if score <= 0.0 {
            continue;
        }
        if def.has_tag(SkillTag::Damage) {
            if situation.opponent_health_pct() < EXECUTE_HEALTH_THRESHOLD {
                score += EXECUTE_BONUS;
            }
            if combo_ready {
                score += COMBO_BONUS * brain.config.combo_propensity;
            }
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((slot, score));
        }
    }
    best.map(|(slot, _)| slot)
}

/// Archetype movement when no skill is chosen.
fn default_strategy(situation: &Situation, config: &AiTierConfig) -> Strategy {
    if situation.opponent.is_none() {
        return Strategy::Idle;
    }
    let hurt = situation.health_pct < config.retreat_health;
    match situation.archetype {
        Archetype::Chase => Strategy::Chase,
        _ if hurt => Strategy::RetreatToCast,
        _ if situation.distance > config.engage_range.max(situation.preferred_range.1) => {
            Strategy::Chase
        }
        Archetype::Kite => Strategy::Kite,
        Archetype::RetreatAndCast => {
            if situation.distance < situation.preferred_range.0 {
                Strategy::RetreatToCast
            } else {
                Strategy::Kite
            }
        }
        Archetype::DefendConstruct => {
            if situation.construct.is_some() {
                Strategy::DefendConstruct
            } else {
                Strategy::Kite
            }
        }
    }
}

/// A point 90 degrees around the opponent from our current bearing.
fn flank_point(situation: &Situation, opponent: Vec3, arena: &Arena) -> Vec3 {
    let from_opponent = -situation.bearing;
    let sides = [std::f32::consts::FRAC_PI_2, -std::f32::consts::FRAC_PI_2];
    let candidates = sides.map(|angle| {
        arena.clamp(opponent + rotate_planar(from_opponent, angle) * FLANK_DISTANCE)
    });
    // Prefer the side with a clear view of the opponent
    candidates
        .iter()
        .copied()
        .find(|point| !arena.segment_blocked(*point, opponent) && !arena.point_in_obstacle(*point))
        .unwrap_or(candidates[0])
}

fn movement_direction(brain: &AiBrain, situation: &Situation) -> Vec3 {
    let toward = situation.bearing;
    match brain.strategy {
        Strategy::Idle | Strategy::Casting(_) => Vec3::ZERO,
        Strategy::Chase => {
            if situation.distance > CHASE_STOP_DISTANCE {
                toward
            } else {
                Vec3::ZERO
            }
        }
        Strategy::RetreatToCast => -toward,
        Strategy::Kite => {
            let (near, far) = situation.preferred_range;
            if situation.distance > far {
                toward
            } else if situation.distance < near {
                -toward
            } else {
                rotate_planar(toward, std::f32::consts::FRAC_PI_2 * brain.strafe_sign)
            }
        }
        Strategy::DefendConstruct => match situation.construct {
            Some(post) if planar_distance(situation.position, post) > GUARD_RADIUS => {
                Vec3::new(post.x - situation.position.x, 0.0, post.z - situation.position.z)
                    .normalize_or_zero()
            }
            _ => Vec3::ZERO,
        },
        Strategy::Flank(point) => {
            let offset = Vec3::new(point.x - situation.position.x, 0.0, point.z - situation.position.z);
            if offset.length() > 0.5 {
                offset.normalize_or_zero()
            } else {
                Vec3::ZERO
            }
        }
    }
}

/// Track the opponent with the tier's aim lag.
fn update_aim(brain: &AiBrain, fighter: &mut Fighter, situation: &Situation) {
    if situation.opponent.is_none() {
        return;
    }
    let target = situation.bearing;
    let lag = brain.config.aim_lag.clamp(0.0, 1.0);
    fighter.aim = if lag <= 0.0 {
        target
    } else {
        let blended = fighter.aim.lerp(target, 1.0 - lag);
        if blended.length_squared() > 1e-6 {
            blended.normalize()
        } else {
            target
        }
    };
}

/// Score the compass directions and return the best positive one.
///
/// Directions blocked by an obstacle within the escape distance, or leaving
/// the arena, are rejected outright.
pub fn escape_direction(situation: &Situation, arena: &Arena) -> Option<Vec3> {
    let origin = situation.position;
    let retreating = matches!(
        situation.archetype,
        Archetype::Kite | Archetype::RetreatAndCast
    );

    let mut best: Option<(Vec3, f32)> = None;
    for i in 0..REFLEX_DIRECTIONS {
        let angle = (i as f32) * std::f32::consts::TAU / REFLEX_DIRECTIONS as f32;
        let direction = Vec3::new(angle.cos(), 0.0, angle.sin());
        let landing = origin + direction * REFLEX_ESCAPE_DISTANCE;

        if arena.ray_obstacle(origin, direction, REFLEX_ESCAPE_DISTANCE).is_some()
            || !arena.contains(landing)
        {
            continue;
        }

        let mut score = 1.0;
        for threat in &situation.threats {
            match threat.kind {
                ThreatKind::Projectile => score -= 1.5 * direction.dot(threat.direction).abs(),
                ThreatKind::Zone => {
                    if planar_distance(landing, threat.position) < threat.radius {
                        score -= 2.0;
                    }
                }
            }
        }
        if retreating {
            if let Some(opponent) = situation.opponent {
                let gain = planar_distance(landing, opponent.position) - situation.distance;
                score += 0.5 * gain / REFLEX_ESCAPE_DISTANCE;
            }
        }

        if best.map_or(true, |(_, top)| score > top) {
            best = Some((direction, score));
        }
    }

    best.filter(|(_, score)| *score > 0.0).map(|(direction, _)| direction)
}

/// Carry out a dodge: the character's dodge skill aimed along the escape
/// direction if it can be used, otherwise a boosted velocity set directly.
pub fn execute_dodge(ctx: &mut CombatCtx, slot: FighterSlot, direction: Vec3) -> bool {
    let Some(fighter) = ctx.fighters.get_mut(slot) else {
        return false;
    };
    // A delayed dodge fires only if one could still be started now
    if !fighter.has_control() || fighter.charge.is_some() || fighter.statuses.has(StatusKind::Root) {
        return false;
    }

    if let Some(skill) = fighter.kit.dodge_skill {
        if skills::can_use(fighter, skill, SkillPayment::Local) {
            let previous_aim = fighter.aim;
            fighter.aim = direction;
            if skills::request_skill(ctx, slot, skill, SkillPayment::Local) {
                return true;
            }
            if let Some(fighter) = ctx.fighters.get_mut(slot) {
                fighter.aim = previous_aim;
            }
        }
    }

    let Some(fighter) = ctx.fighters.get_mut(slot) else {
        return false;
    };
    fighter.velocity = direction * fighter.effective_speed() * DODGE_SPEED_BOOST;
    true
}
