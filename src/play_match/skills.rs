//! Skill Execution
//!
//! `request_skill` is the single entry point for every invocation: local
//! input, the AI (both layers) and inbound network events. Invalid requests
//! are silently rejected and return `false`.
//!
//! Behavior branches on the kit's [`SkillId`]; tags are never consulted here.

use bevy::log::debug;
use bevy::math::Vec3;

use crate::combat::events::{SoundCue, VisualKind};
use super::abilities::{SkillId, SkillSlot};
use super::ability_config::SkillDefinition;
use super::combat_core::{self, CombatCtx, HitSource};
use super::components::{ChargeState, DashKind, Fighter, FighterSlot, StatusKind};
use super::constants::*;
use super::effects::{Aura, Construct, ConstructKind, EffectKind, Lifespan, Zone};
use super::physics::{flat_direction, rotate_planar, segment_point_distance, Bounds};
use super::projectiles::{self, Projectile, ProjectilePayload};
use super::utils::combatant_id;

/// Who pays for an invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillPayment {
    /// Deduct energy and start the cooldown here
    Local,
    /// Already paid by the remote caller
    Remote,
}

/// Whether a fighter may use a skill right now.
pub fn can_use(fighter: &Fighter, slot: SkillSlot, payment: SkillPayment) -> bool {
    let Some(def) = fighter.skill(slot) else {
        return false;
    };
    if !fighter.has_control() || fighter.charge.is_some() {
        return false;
    }
    if slot != SkillSlot::Basic && fighter.statuses.has(StatusKind::Silence) {
        return false;
    }
    match payment {
        SkillPayment::Local => fighter.cooldown(slot) <= 0.0 && fighter.energy >= def.energy_cost,
        SkillPayment::Remote => true,
    }
}

/// Validate, pay for and execute a skill. Returns whether it went off.
pub fn request_skill(
    ctx: &mut CombatCtx,
    slot: FighterSlot,
    skill: SkillSlot,
    payment: SkillPayment,
) -> bool {
    let Some(fighter) = ctx.fighters.get(slot) else {
        return false;
    };
    if !can_use(fighter, skill, payment) {
        return false;
    }
    let Some(def) = fighter.skill(skill).cloned() else {
        return false;
    };
    if !has_valid_target(ctx, slot, &def) {
        return false;
    }

    let Some(fighter) = ctx.fighters.get_mut(slot) else {
        return false;
    };
    if payment == SkillPayment::Local {
        fighter.energy = (fighter.energy - def.energy_cost).max(0.0);
        fighter.cooldowns.insert(skill, def.cooldown);
    }
    let id = combatant_id(fighter.slot, fighter.character);
    ctx.log.log_ability(&id, &def.name);
    debug!("{} uses {} ({:?} payment)", id, def.name, payment);

    execute(ctx, slot, &def);
    true
}

/// Targeted skills refuse to go off without a valid opponent in range.
fn has_valid_target(ctx: &CombatCtx, slot: FighterSlot, def: &SkillDefinition) -> bool {
    let needs = match def.id {
        SkillId::Corrupt | SkillId::Implosion => TargetCheck::RangeAndSight,
        SkillId::Eviscerate | SkillId::Entropy => TargetCheck::Range,
        SkillId::Rewind => {
            return ctx
                .fighters
                .get(slot)
                .is_some_and(|f| f.history_at(ctx.match_time, REWIND_LOOKBACK).is_some());
        }
        _ => return true,
    };
    let (Some(caster), Some(target)) = (ctx.fighters.get(slot), ctx.fighters.opponent(slot)) else {
        return false;
    };
    if !target.is_alive() {
        return false;
    }
    let in_range = def.range <= 0.0 || caster.position.distance(target.position) <= def.range;
    match needs {
        TargetCheck::Range => in_range,
        TargetCheck::RangeAndSight => {
            in_range && !ctx.arena.segment_blocked(caster.position, target.position)
        }
    }
}

enum TargetCheck {
    Range,
    RangeAndSight,
}

fn execute(ctx: &mut CombatCtx, slot: FighterSlot, def: &SkillDefinition) {
    let Some(caster) = ctx.fighters.get(slot) else {
        return;
    };
    let origin = caster.position;
    let aim = caster.aim;
    let label = def.id.label();
    ctx.sink.play_sound(SoundCue::Cast);

    match def.id {
        // Projectile basics
        SkillId::Arrow => shoot(
            ctx,
            slot,
            ARROW_DAMAGE,
            BASIC_PROJECTILE_SPEED,
            def.range,
            ProjectilePayload::Plain,
            label,
        ),
        SkillId::VoidOrb => shoot(
            ctx,
            slot,
            VOID_ORB_DAMAGE,
            BASIC_PROJECTILE_SPEED,
            def.range,
            ProjectilePayload::Plain,
            label,
        ),
        SkillId::ChronoBolt => shoot(
            ctx,
            slot,
            CHRONO_BOLT_DAMAGE,
            BASIC_PROJECTILE_SPEED,
            def.range,
            ProjectilePayload::Plain,
            label,
        ),
        SkillId::RivetGun => {
            let sieged = ctx
                .fighters
                .get(slot)
                .is_some_and(|f| f.statuses.has(StatusKind::Siege));
            let (damage, range) = if sieged {
                (RIVET_DAMAGE * SIEGE_DAMAGE_MULTIPLIER, def.range + SIEGE_RANGE_BONUS)
            } else {
                (RIVET_DAMAGE, def.range)
            };
            shoot(ctx, slot, damage, BASIC_PROJECTILE_SPEED, range, ProjectilePayload::Plain, label);
        }

        // Melee basics
        SkillId::Cleave => melee(ctx, slot, CLEAVE_DAMAGE, def.range, label),
        SkillId::Slash => melee(ctx, slot, SLASH_DAMAGE, def.range, label),

        // Vanguard
        SkillId::Charge => {
            let duration = (def.range / CHARGE_SPEED).min(CHARGE_MAX_DURATION);
            start_dash(ctx, slot, DashKind::Charge, CHARGE_SPEED, duration);
            combat_core::apply_status(ctx, slot, StatusKind::Unstoppable, duration, 0.0);
        }
        SkillId::ShieldWall => {
            combat_core::apply_status(ctx, slot, StatusKind::Shielded, SHIELD_WALL_DURATION, 0.0);
        }
        SkillId::GroundSlam => {
            combat_core::spawn_visual(ctx, VisualKind::Ring { radius: GROUND_SLAM_RADIUS }, origin);
            ctx.sink.play_sound(SoundCue::Explosion);
            if let Some(target) = opponent_within(ctx, slot, GROUND_SLAM_RADIUS) {
                let dealt = combat_core::apply_damage(
                    ctx,
                    target,
                    GROUND_SLAM_DAMAGE,
                    false,
                    HitSource::new(slot, label),
                );
                if dealt > 0.0 {
                    combat_core::apply_cc(
                        ctx,
                        target,
                        StatusKind::Slow,
                        GROUND_SLAM_SLOW_DURATION,
                        GROUND_SLAM_SLOW_FACTOR,
                    );
                }
            }
        }
        SkillId::Warcry => {
            combat_core::apply_status(ctx, slot, StatusKind::Empowered, WARCRY_EMPOWER_DURATION, 0.0);
            ctx.spawner.spawn_owned(
                EffectKind::Aura(Aura {
                    radius: BATTLE_AURA_RADIUS,
                    slow_factor: BATTLE_AURA_SLOW_FACTOR,
                }),
                origin,
                Lifespan::Finite(WARCRY_EMPOWER_DURATION),
                slot,
            );
            combat_core::spawn_visual(ctx, VisualKind::Ring { radius: BATTLE_AURA_RADIUS }, origin);
        }

        // Ranger
        SkillId::Snipe => snipe(ctx, slot, def.range, label),
        SkillId::VenomArrow => shoot(
            ctx,
            slot,
            VENOM_ARROW_DAMAGE,
            VENOM_ARROW_SPEED,
            def.range,
            ProjectilePayload::Venom,
            label,
        ),
        SkillId::Tumble => start_dash(ctx, slot, DashKind::Tumble, TUMBLE_SPEED, TUMBLE_DURATION),
        SkillId::SentryTurret => deploy(
            ctx,
            slot,
            Construct {
                kind: ConstructKind::Sentry,
                health: SENTRY_HEALTH,
                fire_timer: 0.0,
                fire_interval: SENTRY_FIRE_INTERVAL,
                range: SENTRY_RANGE,
                damage: SENTRY_DAMAGE,
            },
            Lifespan::Finite(SENTRY_LIFESPAN),
        ),

        // Voidcaller
        SkillId::GravityBolt => shoot(
            ctx,
            slot,
            GRAVITY_BOLT_DAMAGE,
            GRAVITY_BOLT_SPEED,
            def.range,
            ProjectilePayload::GravityMark,
            label,
        ),
        SkillId::Corrupt => {
            let target = slot.opponent();
            combat_core::apply_status(ctx, target, StatusKind::Corrupted, CORRUPT_DURATION, 0.0);
            combat_core::apply_cc(ctx, target, StatusKind::Silence, CORRUPT_SILENCE_DURATION, 0.0);
        }
        SkillId::RiftStep => rift_step(ctx, slot, origin, aim),
        SkillId::Implosion => {
            combat_core::apply_status(ctx, slot.opponent(), StatusKind::ImplosionTarget, IMPLOSION_DELAY, 0.0);
        }

        // Duelist
        SkillId::Parry => {
            combat_core::apply_status(ctx, slot, StatusKind::Parry, PARRY_DURATION, 0.0);
        }
        SkillId::Lunge => start_dash(ctx, slot, DashKind::Lunge, LUNGE_SPEED, LUNGE_DURATION),
        SkillId::Fade => {
            combat_core::apply_status(ctx, slot, StatusKind::Cloak, FADE_DURATION, 0.0);
        }
        SkillId::Eviscerate => {
            let target = slot.opponent();
            let missing = ctx
                .fighters
                .get(target)
                .map_or(0.0, |f| f.max_health - f.health);
            let position = ctx.fighters.get(target).map_or(origin, |f| f.position);
            combat_core::spawn_visual(ctx, VisualKind::Slash, position);
            combat_core::apply_damage(
                ctx,
                target,
                EVISCERATE_BASE_DAMAGE + missing * EVISCERATE_MISSING_HEALTH_RATIO,
                false,
                HitSource::new(slot, label),
            );
        }

        // Chronomancer
        SkillId::TemporalField => {
            let center = match opponent_within(ctx, slot, def.range) {
                Some(target) => ctx.fighters.get(target).map_or(origin, |f| f.position),
                None => origin + aim * def.range,
            };
            let center = ctx.arena.clamp(center);
            ctx.spawner.spawn(
                EffectKind::Zone(Zone::TemporalField {
                    radius: TEMPORAL_FIELD_RADIUS,
                }),
                center,
                Lifespan::Finite(TEMPORAL_FIELD_DURATION),
                Some(slot),
            );
            combat_core::spawn_visual(ctx, VisualKind::Ring { radius: TEMPORAL_FIELD_RADIUS }, center);
        }
        SkillId::SpellWard => {
            combat_core::apply_status(ctx, slot, StatusKind::SpellShield, SPELL_WARD_DURATION, 0.0);
        }
        SkillId::Rewind => rewind(ctx, slot, label),
        SkillId::Entropy => entropy(ctx, slot, label),

        // Engineer
        SkillId::DeployTurret => deploy(
            ctx,
            slot,
            Construct {
                kind: ConstructKind::Turret,
                health: TURRET_HEALTH,
                fire_timer: 0.0,
                fire_interval: TURRET_FIRE_INTERVAL,
                range: TURRET_RANGE,
                damage: TURRET_DAMAGE,
            },
            Lifespan::Infinite,
        ),
        SkillId::ArcMine => {
            ctx.spawner.spawn(
                EffectKind::Zone(Zone::ArcMine {
                    arm_timer: ARC_MINE_ARM_TIME,
                }),
                origin,
                Lifespan::Finite(ARC_MINE_LIFESPAN),
                Some(slot),
            );
        }
        SkillId::Barrier => {
            let center = ctx.arena.clamp(origin + aim * BARRIER_DISTANCE);
            let across = rotate_planar(aim, std::f32::consts::FRAC_PI_2);
            let half = Vec3::new(
                across.x.abs() * BARRIER_HALF_LENGTH + aim.x.abs() * BARRIER_HALF_THICKNESS,
                0.0,
                across.z.abs() * BARRIER_HALF_LENGTH + aim.z.abs() * BARRIER_HALF_THICKNESS,
            );
            ctx.spawner.spawn(
                EffectKind::Zone(Zone::Barrier {
                    bounds: Bounds::from_center(center, half),
                }),
                center,
                Lifespan::Finite(BARRIER_LIFESPAN),
                Some(slot),
            );
        }
        SkillId::SiegeMode => {
            if let Some(caster) = ctx.fighters.get_mut(slot) {
                caster.charge = None;
                caster.velocity = Vec3::ZERO;
            }
            combat_core::apply_status(ctx, slot, StatusKind::Siege, SIEGE_DURATION, 0.0);
        }
    }
}

/// The opponent, if alive and within `radius` of the caster.
fn opponent_within(ctx: &CombatCtx, slot: FighterSlot, radius: f32) -> Option<FighterSlot> {
    let caster = ctx.fighters.get(slot)?;
    ctx.fighters
        .opponent(slot)
        .filter(|f| f.is_alive() && f.position.distance(caster.position) <= radius)
        .map(|f| f.slot)
}

fn shoot(
    ctx: &mut CombatCtx,
    slot: FighterSlot,
    damage: f32,
    speed: f32,
    range: f32,
    payload: ProjectilePayload,
    label: &'static str,
) {
    let Some(caster) = ctx.fighters.get(slot) else {
        return;
    };
    let projectile = Projectile::new(caster.aim * speed, damage, payload, label);
    projectiles::fire(ctx.spawner, slot, caster.position, projectile, range);
}

/// Instant swing hitting the opponent if within reach and in front.
fn melee(ctx: &mut CombatCtx, slot: FighterSlot, damage: f32, range: f32, label: &'static str) {
    let Some(caster) = ctx.fighters.get(slot) else {
        return;
    };
    let swing_at = caster.position + caster.aim * (range * 0.5);
    let hit = ctx.fighters.opponent(slot).is_some_and(|target| {
        let to_target = flat_direction(caster.position, target.position);
        target.is_alive()
            && caster.position.distance(target.position) <= range + FIGHTER_HALF_SIZE
            && caster.aim.dot(to_target) >= MELEE_CONE_DOT
    });

    combat_core::spawn_visual(ctx, VisualKind::Slash, swing_at);
    if hit {
        combat_core::apply_damage(ctx, slot.opponent(), damage, false, HitSource::new(slot, label));
    }
}

fn start_dash(ctx: &mut CombatCtx, slot: FighterSlot, kind: DashKind, speed: f32, duration: f32) {
    let Some(caster) = ctx.fighters.get_mut(slot) else {
        return;
    };
    caster.charge = Some(ChargeState {
        kind,
        direction: caster.aim,
        speed,
        remaining: duration,
    });
    caster.velocity = caster.aim * speed;
    ctx.sink.play_sound(SoundCue::Dash);
    combat_core::apply_status(ctx, slot, StatusKind::Charging, duration, 0.0);
}

/// Hitscan along the caster's aim. Walls and projectile-blocking effects of
/// the other side stop the shot.
fn snipe(ctx: &mut CombatCtx, slot: FighterSlot, range: f32, label: &'static str) {
    let Some(caster) = ctx.fighters.get(slot) else {
        return;
    };
    let origin = caster.position;
    let aim = caster.aim;

    let mut reach = ctx.arena.ray_obstacle(origin, aim, range).unwrap_or(range);
    for effect in ctx.live {
        if effect.is_destroyed() || !effect.blocks_projectiles() || effect.source == Some(slot) {
            continue;
        }
        if let Some(distance) = effect.collider().and_then(|c| c.ray_hit(origin, aim, reach)) {
            reach = reach.min(distance);
        }
    }
    let end = origin + aim * reach;

    let target = ctx.fighters.opponent(slot).filter(|target| {
        target.is_alive()
            && (target.position - origin).dot(aim) > 0.0
            && segment_point_distance(origin, end, target.position)
                <= HITSCAN_WIDTH * 0.5 + FIGHTER_HALF_SIZE
    });
    let hit = target.map(|t| (t.slot, t.position));

    let tracer_end = hit.map_or(end, |(_, position)| position);
    combat_core::spawn_visual(ctx, VisualKind::Tracer { to: tracer_end }, origin);
    if let Some((target, _)) = hit {
        combat_core::apply_damage(ctx, target, SNIPE_DAMAGE, false, HitSource::new(slot, label));
    }
}

/// Replace the caster's construct with a fresh one in front of it.
fn deploy(ctx: &mut CombatCtx, slot: FighterSlot, construct: Construct, lifespan: Lifespan) {
    let arena = ctx.arena;
    let Some(caster) = ctx.fighters.get_mut(slot) else {
        return;
    };
    let position = arena.clamp(caster.position + caster.aim * (FIGHTER_HALF_SIZE + CONSTRUCT_HALF_SIZE + 0.5));
    let previous = caster.construct.take();

    if let Some(previous) = previous {
        ctx.spawner.request_destroy(previous);
    }
    let id = ctx
        .spawner
        .spawn_owned(EffectKind::Construct(construct), position, lifespan, slot);
    if let Some(caster) = ctx.fighters.get_mut(slot) {
        caster.construct = Some(id);
    }
}

/// Blink forward, stopping short of obstacles.
fn rift_step(ctx: &mut CombatCtx, slot: FighterSlot, origin: Vec3, aim: Vec3) {
    let distance = ctx
        .arena
        .ray_obstacle(origin, aim, RIFT_STEP_DISTANCE + FIGHTER_HALF_SIZE)
        .map(|d| (d - FIGHTER_HALF_SIZE - 0.05).max(0.0))
        .unwrap_or(RIFT_STEP_DISTANCE);
    let destination = ctx.arena.clamp(origin + aim * distance);

    if let Some(caster) = ctx.fighters.get_mut(slot) {
        caster.position = destination;
        caster.velocity = Vec3::ZERO;
        caster.charge = None;
    }
    combat_core::spawn_visual(ctx, VisualKind::Rift, origin);
    combat_core::spawn_visual(ctx, VisualKind::Rift, destination);
    combat_core::apply_status(ctx, slot, StatusKind::RiftBuff, RIFT_BUFF_DURATION, 0.0);
}

/// Return to the oldest snapshot within the lookback, recovering any health
/// lost since then.
fn rewind(ctx: &mut CombatCtx, slot: FighterSlot, label: &'static str) {
    let match_time = ctx.match_time;
    let Some(caster) = ctx.fighters.get_mut(slot) else {
        return;
    };
    let Some(snapshot) = caster.history_at(match_time, REWIND_LOOKBACK).copied() else {
        return;
    };
    let from = caster.position;
    caster.position = snapshot.position;
    caster.velocity = Vec3::ZERO;
    caster.charge = None;
    let recovered = (snapshot.health - caster.health).max(0.0);

    combat_core::spawn_visual(ctx, VisualKind::Rift, from);
    if recovered > 0.0 {
        combat_core::heal(ctx, slot, recovered, label);
    }
}

/// Burn the opponent's energy and convert it into damage.
fn entropy(ctx: &mut CombatCtx, slot: FighterSlot, label: &'static str) {
    let target = slot.opponent();
    let Some(victim) = ctx.fighters.get_mut(target) else {
        return;
    };
    let drained = victim.energy.min(ENTROPY_MAX_DRAIN);
    victim.energy -= drained;
    let position = victim.position;

    combat_core::spawn_visual(ctx, VisualKind::Ring { radius: 1.0 }, position);
    combat_core::apply_damage(
        ctx,
        target,
        ENTROPY_BASE_DAMAGE + drained * ENTROPY_DAMAGE_PER_ENERGY,
        false,
        HitSource::new(slot, label),
    );
    combat_core::apply_status(ctx, slot, StatusKind::FeedbackLoop, FEEDBACK_LOOP_DURATION, 0.0);
}
