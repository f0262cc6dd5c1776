//! Combat Constants
//!
//! Centralized location for magic numbers used throughout the combat system.
//! Skill stats that the AI reads (cost, cooldown, range) live in
//! `assets/config/characters.ron`; the bespoke per-skill formulas below are
//! deliberately kept as one named table per skill rather than a shared rule.

// ============================================================================
// Simulation Loop
// ============================================================================

/// Upper bound for a single tick's delta (seconds). Larger frame gaps are
/// clamped so a stalled frame can't launch fighters through walls.
pub const MAX_TICK_DELTA: f32 = 0.1;

/// Fixed step used by the headless runner.
pub const HEADLESS_FIXED_STEP: f32 = 1.0 / 60.0;

// ============================================================================
// Arena & Kinematics
// ============================================================================

/// Default arena half extent along X.
pub const ARENA_HALF_X: f32 = 20.0;

/// Default arena half extent along Z.
pub const ARENA_HALF_Z: f32 = 20.0;

/// Fighters are clamped this far inside the arena edge.
pub const ARENA_MARGIN: f32 = 1.0;

/// Distance from the arena edge at which fighters spawn.
pub const SPAWN_INSET: f32 = 2.0;

/// Half extent of a fighter's square collision footprint.
pub const FIGHTER_HALF_SIZE: f32 = 0.5;

/// Per-second velocity retention. Applied as `velocity *= VELOCITY_DECAY.powf(dt)`
/// so friction is identical at every frame rate.
pub const VELOCITY_DECAY: f32 = 0.02;

/// Below this speed a fighter counts as standing still.
pub const STILL_SPEED_EPSILON: f32 = 0.1;

/// Interpolation rate (per second) for remotely-controlled fighters.
pub const REMOTE_LERP_RATE: f32 = 12.0;

// ============================================================================
// History & Visuals
// ============================================================================

/// Interval between history snapshots used by rewind skills.
pub const HISTORY_INTERVAL: f32 = 0.25;

/// Capacity of the history ring.
pub const HISTORY_CAPACITY: usize = 20;

/// Duration of the white damage flash.
pub const DAMAGE_FLASH_DURATION: f32 = 0.15;

/// Opacity of a cloaked fighter.
pub const CLOAK_OPACITY: f32 = 0.25;

// ============================================================================
// Damage Modifiers
// ============================================================================

/// Incoming damage multiplier while Corrupted.
pub const CORRUPTION_DAMAGE_MULTIPLIER: f32 = 1.3;

/// Incoming damage multiplier while Empowered.
pub const EMPOWER_DAMAGE_MULTIPLIER: f32 = 0.7;

/// Root applied to an attacker whose hit was parried.
pub const PARRY_ROOT_DURATION: f32 = 1.5;

/// Outgoing damage multiplier for the first direct hit out of cloak.
pub const CLOAK_AMBUSH_MULTIPLIER: f32 = 1.5;

/// Melee basic attacks only connect inside this cone (dot of aim and bearing).
pub const MELEE_CONE_DOT: f32 = 0.3;

// ============================================================================
// Resources
// ============================================================================

/// Regeneration multiplier for the Blitz game mode.
pub const BLITZ_REGEN_MULTIPLIER: f32 = 2.0;

/// Juggernaut passive: multiplicative regen penalty.
pub const JUGGERNAUT_REGEN_FACTOR: f32 = 0.75;

/// Overclock passive: regen bonus while the Engineer's turret stands.
pub const OVERCLOCK_REGEN_FACTOR: f32 = 1.5;

/// Rift buff regen bonus.
pub const RIFT_REGEN_FACTOR: f32 = 1.25;

/// Rift buff movement speed bonus.
pub const RIFT_SPEED_FACTOR: f32 = 1.3;

// ============================================================================
// Passives
// ============================================================================

/// Steady Aim: seconds standing still before the shield triggers.
pub const STEADY_AIM_STILL_TIME: f32 = 2.0;

/// Steady Aim: duration of the granted shield.
pub const STEADY_AIM_SHIELD_DURATION: f32 = 1.0;

/// Riposte Guard: recharge time after blocking a hit.
pub const RIPOSTE_GUARD_RECHARGE: f32 = 8.0;

/// Gravity Well: marks needed to trigger the stun and pull.
pub const GRAVITY_MARK_THRESHOLD: u32 = 3;

/// Gravity Well: lifetime of the mark stack (refreshed per mark).
pub const GRAVITY_MARK_DURATION: f32 = 4.0;

/// Gravity Well: stun applied when the stack detonates.
pub const GRAVITY_WELL_STUN: f32 = 1.0;

/// Gravity Well: pull impulse toward the Voidcaller.
pub const GRAVITY_WELL_PULL_SPEED: f32 = 14.0;

/// Stasis Echo: health fraction that triggers the spell shield.
pub const STASIS_ECHO_THRESHOLD: f32 = 0.3;

/// Stasis Echo: spell shield duration.
pub const STASIS_ECHO_DURATION: f32 = 2.0;

// ============================================================================
// Basic Attacks
// ============================================================================

/// Speed of every basic-attack projectile.
pub const BASIC_PROJECTILE_SPEED: f32 = 20.0;

/// Collision radius of projectiles.
pub const PROJECTILE_HIT_RADIUS: f32 = 0.35;

pub const CLEAVE_DAMAGE: f32 = 8.0;
pub const ARROW_DAMAGE: f32 = 7.0;
pub const VOID_ORB_DAMAGE: f32 = 6.0;
pub const SLASH_DAMAGE: f32 = 7.0;
pub const CHRONO_BOLT_DAMAGE: f32 = 6.0;
pub const RIVET_DAMAGE: f32 = 6.0;

// ============================================================================
// Vanguard
// ============================================================================

pub const CHARGE_SPEED: f32 = 20.0;
pub const CHARGE_MAX_DURATION: f32 = 0.8;
pub const CHARGE_IMPACT_DAMAGE: f32 = 15.0;
pub const CHARGE_KNOCKBACK_SPEED: f32 = 10.0;
pub const CHARGE_STUN_DURATION: f32 = 0.75;

pub const SHIELD_WALL_DURATION: f32 = 1.5;

pub const GROUND_SLAM_RADIUS: f32 = 4.0;
pub const GROUND_SLAM_DAMAGE: f32 = 18.0;
pub const GROUND_SLAM_SLOW_DURATION: f32 = 2.0;
pub const GROUND_SLAM_SLOW_FACTOR: f32 = 0.5;

pub const WARCRY_EMPOWER_DURATION: f32 = 4.0;
pub const BATTLE_AURA_RADIUS: f32 = 4.5;
pub const BATTLE_AURA_SLOW_FACTOR: f32 = 0.7;

// ============================================================================
// Ranger
// ============================================================================

pub const SNIPE_DAMAGE: f32 = 25.0;
pub const HITSCAN_WIDTH: f32 = 0.8;

pub const VENOM_ARROW_DAMAGE: f32 = 6.0;
pub const VENOM_ARROW_SPEED: f32 = 18.0;
pub const VENOM_DURATION: f32 = 3.0;
pub const VENOM_DPS: f32 = 5.0;

pub const TUMBLE_SPEED: f32 = 20.0;
pub const TUMBLE_DURATION: f32 = 0.25;

pub const SENTRY_LIFESPAN: f32 = 12.0;
pub const SENTRY_HEALTH: f32 = 30.0;
pub const SENTRY_FIRE_INTERVAL: f32 = 1.0;
pub const SENTRY_RANGE: f32 = 14.0;
pub const SENTRY_DAMAGE: f32 = 5.0;

// ============================================================================
// Voidcaller
// ============================================================================

pub const GRAVITY_BOLT_DAMAGE: f32 = 12.0;
pub const GRAVITY_BOLT_SPEED: f32 = 20.0;

pub const CORRUPT_DURATION: f32 = 4.0;
pub const CORRUPT_SILENCE_DURATION: f32 = 1.0;

pub const RIFT_STEP_DISTANCE: f32 = 6.0;
pub const RIFT_BUFF_DURATION: f32 = 2.0;

pub const IMPLOSION_DELAY: f32 = 1.5;
pub const IMPLOSION_BASE_DAMAGE: f32 = 20.0;
/// Fraction of the target's missing health added to the implosion.
pub const IMPLOSION_MISSING_HEALTH_RATIO: f32 = 0.25;

// ============================================================================
// Duelist
// ============================================================================

pub const PARRY_DURATION: f32 = 1.0;

pub const LUNGE_SPEED: f32 = 18.0;
pub const LUNGE_DURATION: f32 = 0.3;
pub const LUNGE_DAMAGE: f32 = 10.0;

pub const FADE_DURATION: f32 = 3.0;

pub const EVISCERATE_BASE_DAMAGE: f32 = 15.0;
/// Fraction of the target's missing health added to Eviscerate.
pub const EVISCERATE_MISSING_HEALTH_RATIO: f32 = 0.4;

// ============================================================================
// Chronomancer
// ============================================================================

pub const TEMPORAL_FIELD_RADIUS: f32 = 3.5;
pub const TEMPORAL_FIELD_DURATION: f32 = 4.0;
pub const TEMPORAL_FIELD_DPS: f32 = 4.0;
pub const TEMPORAL_FIELD_SLOW_FACTOR: f32 = 0.5;

/// Slows from zones and auras are re-applied every tick and linger this long.
pub const ZONE_SLOW_REFRESH: f32 = 0.25;

pub const SPELL_WARD_DURATION: f32 = 3.0;

/// How far back Rewind reaches (seconds).
pub const REWIND_LOOKBACK: f32 = 2.0;

pub const ENTROPY_MAX_DRAIN: f32 = 40.0;
pub const ENTROPY_BASE_DAMAGE: f32 = 10.0;
/// Damage dealt per point of energy drained by Entropy.
pub const ENTROPY_DAMAGE_PER_ENERGY: f32 = 0.8;
pub const FEEDBACK_LOOP_DURATION: f32 = 3.0;
pub const FEEDBACK_DRAIN_PER_SEC: f32 = 8.0;
/// Share of drained energy returned to the Chronomancer.
pub const FEEDBACK_RETURN_RATIO: f32 = 0.5;

// ============================================================================
// Engineer
// ============================================================================

pub const TURRET_HEALTH: f32 = 40.0;
pub const TURRET_FIRE_INTERVAL: f32 = 1.2;
pub const TURRET_RANGE: f32 = 13.0;
pub const TURRET_DAMAGE: f32 = 5.0;
pub const CONSTRUCT_HALF_SIZE: f32 = 0.6;

pub const ARC_MINE_ARM_TIME: f32 = 0.5;
pub const ARC_MINE_LIFESPAN: f32 = 20.0;
pub const ARC_MINE_TRIGGER_RADIUS: f32 = 1.5;
pub const ARC_MINE_DAMAGE: f32 = 15.0;
pub const ARC_MINE_ROOT_DURATION: f32 = 1.5;

pub const BARRIER_DISTANCE: f32 = 3.0;
pub const BARRIER_HALF_LENGTH: f32 = 2.5;
pub const BARRIER_HALF_THICKNESS: f32 = 0.4;
pub const BARRIER_LIFESPAN: f32 = 6.0;

pub const SIEGE_DURATION: f32 = 6.0;
pub const SIEGE_DAMAGE_MULTIPLIER: f32 = 1.6;
pub const SIEGE_RANGE_BONUS: f32 = 6.0;

// ============================================================================
// Transient Visuals
// ============================================================================

/// Lifetime of short-lived visual effect objects (impacts, rings, rifts).
pub const VISUAL_EFFECT_LIFETIME: f32 = 0.4;

// ============================================================================
// AI
// ============================================================================

/// How far ahead the reflex layer extrapolates threats (seconds).
pub const REFLEX_LOOKAHEAD: f32 = 0.5;

/// Predicted separation below which a projectile counts as a threat.
pub const REFLEX_DANGER_THRESHOLD: f32 = 1.5;

/// Hazardous zones further than this are ignored by the reflex scan.
pub const REFLEX_ZONE_SCAN_RADIUS: f32 = 8.0;

/// Length of the obstacle probe for each escape direction.
pub const REFLEX_ESCAPE_DISTANCE: f32 = 4.0;

/// Number of evenly spaced escape directions.
pub const REFLEX_DIRECTIONS: usize = 8;

/// Raw dodge velocity = escape direction * speed * this.
pub const DODGE_SPEED_BOOST: f32 = 1.8;

/// Dodge cooldown = this / dodge probability.
pub const REFLEX_COOLDOWN_BASE: f32 = 0.6;

/// After a failed dodge roll the reflex layer waits this long before re-rolling.
pub const REFLEX_RETRY_INTERVAL: f32 = 0.5;

/// Offense scoring gets a flat bonus on damaging skills below this opponent health.
pub const EXECUTE_HEALTH_THRESHOLD: f32 = 0.25;
pub const EXECUTE_BONUS: f32 = 100.0;

/// Distance of the flank point from the opponent when line of sight is blocked.
pub const FLANK_DISTANCE: f32 = 8.0;

/// Movement pause after the tactical layer casts a skill.
pub const CAST_PAUSE: f32 = 0.2;

/// Strafe direction flips this often while kiting.
pub const STRAFE_SWITCH_INTERVAL: f32 = 1.5;

/// Guard radius around an owned construct.
pub const GUARD_RADIUS: f32 = 3.0;

/// Bonus on damaging skills right after a CC/debuff, scaled by combo propensity.
pub const COMBO_BONUS: f32 = 30.0;

/// How long after a CC/debuff the combo bonus applies.
pub const COMBO_WINDOW: f32 = 2.0;

/// Chasers stop closing inside this distance.
pub const CHASE_STOP_DISTANCE: f32 = 1.6;
