//! Status & Passive Systems
//!
//! The self-contained part of a fighter's tick:
//! - Cooldown and status decay, stack bookkeeping
//! - Expiry side effects (attachments, implosion detonation)
//! - Damage-over-time and energy drain
//! - Energy regeneration
//! - Character passives

use bevy::log::debug;
use bevy::math::Vec3;
use smallvec::SmallVec;

use crate::combat::events::{SoundCue, VisualKind};
use crate::combat::log::CombatLogEventType;
use super::abilities::PassiveKind;
use super::combat_core::{self, CombatCtx, HitSource};
use super::components::{FighterSlot, StackKind, StatusKind};
use super::constants::*;
use super::match_config::GameMode;
use super::physics::flat_direction;
use super::utils::combatant_id;

/// Decay timers, run expiry side effects, then apply damage over time and
/// the feedback drain for the time that actually elapsed.
///
/// Periodic amounts are computed before decay so the last partial tick of a
/// status still lands, and never for longer than the status had left.
pub fn tick_statuses(ctx: &mut CombatCtx, slot: FighterSlot, dt: f32) {
    let Some(fighter) = ctx.fighters.get_mut(slot) else {
        return;
    };

    let venom = fighter
        .statuses
        .magnitude(StatusKind::Venom)
        .map(|dps| dps * dt.min(fighter.statuses.remaining(StatusKind::Venom)))
        .unwrap_or(0.0);
    let drain = if fighter.statuses.has(StatusKind::FeedbackLoop) {
        FEEDBACK_DRAIN_PER_SEC * dt.min(fighter.statuses.remaining(StatusKind::FeedbackLoop))
    } else {
        0.0
    };

    fighter.decay_cooldowns(dt);
    let expired = fighter.statuses.decay(dt);
    fighter.statuses.clear_expired_stacks();

    handle_expired(ctx, slot, &expired);

    if venom > 0.0 {
        combat_core::apply_damage(
            ctx,
            slot,
            venom,
            true,
            HitSource {
                attacker: Some(slot.opponent()),
                label: "Venom",
            },
        );
    }
    if drain > 0.0 {
        drain_opponent_energy(ctx, slot, drain);
    }
}

fn handle_expired(ctx: &mut CombatCtx, slot: FighterSlot, expired: &SmallVec<[StatusKind; 4]>) {
    for kind in expired.iter().copied() {
        let Some(fighter) = ctx.fighters.get_mut(slot) else {
            return;
        };
        fighter.visual.attachments.retain(|k| *k != kind);
        if kind == StatusKind::Charging {
            fighter.charge = None;
        }
        let id = combatant_id(fighter.slot, fighter.character);
        ctx.log.log(
            CombatLogEventType::StatusExpired,
            format!("{:?} fades from {}", kind, id),
        );

        if kind == StatusKind::ImplosionTarget {
            detonate_implosion(ctx, slot);
        }
    }
}

/// Implosion goes off when its mark runs out, scaling with missing health.
fn detonate_implosion(ctx: &mut CombatCtx, slot: FighterSlot) {
    let Some(target) = ctx.fighters.get(slot).filter(|f| f.is_alive()) else {
        return;
    };
    let missing = target.max_health - target.health;
    let position = target.position;
    let damage = IMPLOSION_BASE_DAMAGE + missing * IMPLOSION_MISSING_HEALTH_RATIO;

    combat_core::spawn_visual(
        ctx,
        VisualKind::Ring {
            radius: FIGHTER_HALF_SIZE * 3.0,
        },
        position,
    );
    ctx.sink.play_sound(SoundCue::Explosion);
    combat_core::apply_damage(
        ctx,
        slot,
        damage,
        false,
        HitSource::new(slot.opponent(), "Implosion"),
    );
}

/// Feedback Loop: the holder siphons the opponent's energy, keeping part of it.
fn drain_opponent_energy(ctx: &mut CombatCtx, slot: FighterSlot, amount: f32) {
    let (Some(holder), Some(victim)) = ctx.fighters.pair_mut(slot) else {
        return;
    };
    if !holder.is_alive() || !victim.is_alive() {
        return;
    }
    let drained = amount.min(victim.energy);
    victim.energy -= drained;
    holder.energy = (holder.energy + drained * FEEDBACK_RETURN_RATIO).min(holder.max_energy);
}

/// Base regen scaled by game mode, passives and buffs (all multiplicative).
pub fn regenerate(ctx: &mut CombatCtx, slot: FighterSlot, dt: f32) {
    let live = ctx.live;
    let mode = ctx.mode;
    let Some(fighter) = ctx.fighters.get_mut(slot) else {
        return;
    };

    let mut rate = fighter.kit.energy_regen;
    if mode == GameMode::Blitz {
        rate *= BLITZ_REGEN_MULTIPLIER;
    }
    if fighter.has_passive(PassiveKind::Juggernaut) {
        rate *= JUGGERNAUT_REGEN_FACTOR;
    }
    if fighter.has_passive(PassiveKind::Overclock) {
        let turret_standing = fighter
            .construct
            .is_some_and(|id| live.iter().any(|e| e.id == id && !e.is_destroyed()));
        if turret_standing {
            rate *= OVERCLOCK_REGEN_FACTOR;
        }
    }
    if fighter.statuses.has(StatusKind::RiftBuff) {
        rate *= RIFT_REGEN_FACTOR;
    }

    fighter.energy = (fighter.energy + rate * dt).clamp(0.0, fighter.max_energy);
}

/// Evaluate the fighter's passive once. Only called for ticks with elapsed time.
pub fn tick_passive(ctx: &mut CombatCtx, slot: FighterSlot, dt: f32) {
    let Some(passive) = ctx.fighters.get(slot).map(|f| f.kit.passive) else {
        return;
    };
    match passive {
        PassiveKind::SteadyAim => steady_aim(ctx, slot, dt),
        PassiveKind::GravityWell => gravity_well(ctx, slot),
        PassiveKind::StasisEcho => stasis_echo(ctx, slot),
        // Juggernaut and Overclock act through regen, Riposte Guard inside damage
        PassiveKind::Juggernaut | PassiveKind::Overclock | PassiveKind::RiposteGuard => {}
    }
}

fn steady_aim(ctx: &mut CombatCtx, slot: FighterSlot, dt: f32) {
    let Some(fighter) = ctx.fighters.get_mut(slot) else {
        return;
    };
    if fighter.velocity.length() > STILL_SPEED_EPSILON || fighter.charge.is_some() {
        fighter.passive.still_time = 0.0;
        return;
    }
    fighter.passive.still_time += dt;
    if fighter.passive.still_time >= STEADY_AIM_STILL_TIME {
        fighter.passive.still_time = 0.0;
        combat_core::apply_status(
            ctx,
            slot,
            StatusKind::Shielded,
            STEADY_AIM_SHIELD_DURATION,
            0.0,
        );
    }
}

/// Enough marks on the opponent collapse into a stun and a pull toward the holder.
fn gravity_well(ctx: &mut CombatCtx, slot: FighterSlot) {
    let (Some(holder), Some(victim)) = ctx.fighters.pair_mut(slot) else {
        return;
    };
    if !victim.is_alive() || victim.statuses.stacks(StackKind::GravityMark) < GRAVITY_MARK_THRESHOLD {
        return;
    }
    victim.statuses.reset_stacks(StackKind::GravityMark);
    let pull = flat_direction(victim.position, holder.position);
    let unstoppable = victim.statuses.has(StatusKind::Unstoppable);
    if !unstoppable && pull != Vec3::ZERO {
        victim.velocity = pull * GRAVITY_WELL_PULL_SPEED;
    }
    let position = victim.position;
    debug!("Gravity Well collapses on {:?}", slot.opponent());

    combat_core::apply_cc(ctx, slot.opponent(), StatusKind::Stun, GRAVITY_WELL_STUN, 0.0);
    combat_core::spawn_visual(
        ctx,
        VisualKind::Ring {
            radius: FIGHTER_HALF_SIZE * 4.0,
        },
        position,
    );
}

fn stasis_echo(ctx: &mut CombatCtx, slot: FighterSlot) {
    let Some(fighter) = ctx.fighters.get_mut(slot) else {
        return;
    };
    if fighter.passive.echo_spent || fighter.health_pct() >= STASIS_ECHO_THRESHOLD {
        return;
    }
    fighter.passive.echo_spent = true;
    combat_core::apply_status(
        ctx,
        slot,
        StatusKind::SpellShield,
        STASIS_ECHO_DURATION,
        0.0,
    );
}
