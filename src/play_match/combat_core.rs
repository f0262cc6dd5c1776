//! Core Combat Resolution
//!
//! Damage and its defensive layering, crowd control, healing, death, and the
//! per-tick integration of a single fighter (decay through visuals).
//!
//! Everything here works on fighter slots through a [`CombatCtx`], so a
//! missing or already-dead opponent is just a skipped lookup.

use bevy::log::{debug, info};
use bevy::math::Vec3;

use crate::combat::events::{EffectSink, SoundCue, VisualKind};
use crate::combat::log::{CombatLog, CombatLogEventType};
use super::abilities::PassiveKind;
use super::auras;
use super::components::{
    DashKind, FighterSlot, Fighters, GameRng, LifeState, StackKind, StatusKind,
};
use super::constants::*;
use super::effects::{EffectKind, EffectSpawner, Lifespan, TransientEffect};
use super::match_config::GameMode;
use super::physics::{flat_direction, Arena};
use super::utils::combatant_id;

/// Everything a combat rule may read or write during a tick.
pub struct CombatCtx<'a> {
    pub fighters: &'a mut Fighters,
    pub spawner: &'a mut EffectSpawner,
    /// Live effects, read-only. Empty while the effect pass itself runs.
    pub live: &'a [TransientEffect],
    pub arena: &'a Arena,
    pub log: &'a mut CombatLog,
    pub sink: &'a mut dyn EffectSink,
    pub rng: &'a mut GameRng,
    pub match_time: f32,
    pub mode: GameMode,
}

/// Attribution for a damage instance.
#[derive(Clone, Copy, Debug)]
pub struct HitSource {
    pub attacker: Option<FighterSlot>,
    pub label: &'static str,
}

impl HitSource {
    pub fn new(attacker: FighterSlot, label: &'static str) -> Self {
        Self {
            attacker: Some(attacker),
            label,
        }
    }
}

pub fn is_alive(ctx: &CombatCtx, slot: FighterSlot) -> bool {
    ctx.fighters.get(slot).is_some_and(|f| f.is_alive())
}

/// Ask the renderer for a visual and keep a short-lived world object for it.
pub fn spawn_visual(ctx: &mut CombatCtx, kind: VisualKind, position: Vec3) {
    ctx.sink.spawn_visual_effect(kind, position);
    ctx.spawner.spawn(
        EffectKind::Visual(kind),
        position,
        Lifespan::Finite(VISUAL_EFFECT_LIFETIME),
        None,
    );
}

/// Apply damage to a fighter.
///
/// Defensive layers are checked in order and the first one that matches
/// fully absorbs a direct hit: Shielded, Riposte Guard, Spell Shield, Parry.
/// Damage over time skips all of them. Surviving damage is multiplied by
/// Corrupted and then Empowered.
///
/// Returns the health actually removed.
pub fn apply_damage(
    ctx: &mut CombatCtx,
    target: FighterSlot,
    amount: f32,
    is_dot: bool,
    source: HitSource,
) -> f32 {
    debug_assert!(
        amount >= 0.0,
        "apply_damage: damage cannot be negative, got {}",
        amount
    );

    let Some(victim) = ctx.fighters.get(target) else {
        return 0.0;
    };
    if !victim.is_alive() || amount <= 0.0 {
        return 0.0;
    }
    let target_id = combatant_id(victim.slot, victim.character);
    let position = victim.position;

    let mut amount = amount;
    if !is_dot {
        if let Some(blocked_by) = absorb_hit(ctx, target) {
            ctx.log.log_block(&target_id, source.label, blocked_by);
            spawn_visual(ctx, VisualKind::BlockFlash, position);
            ctx.sink.play_sound(SoundCue::Blocked);
            return 0.0;
        }
        amount *= consume_ambush(ctx, source.attacker, target);
    }

    let Some(victim) = ctx.fighters.get_mut(target) else {
        return 0.0;
    };
    if victim.statuses.has(StatusKind::Corrupted) {
        amount *= CORRUPTION_DAMAGE_MULTIPLIER;
    }
    if victim.statuses.has(StatusKind::Empowered) {
        amount *= EMPOWER_DAMAGE_MULTIPLIER;
    }

    let before = victim.health;
    victim.health = (victim.health - amount).max(0.0);
    let dealt = before - victim.health;
    victim.damage_taken += dealt;
    if !is_dot {
        victim.visual.flash();
    }
    let lethal = victim.health <= 0.0;

    debug_assert!(
        victim.health >= 0.0 && victim.health <= victim.max_health,
        "apply_damage: health out of range ({})",
        victim.health
    );

    let attacker_id = source
        .attacker
        .filter(|attacker| *attacker != target)
        .and_then(|attacker| ctx.fighters.get_mut(attacker))
        .map(|attacker| {
            attacker.damage_dealt += dealt;
            combatant_id(attacker.slot, attacker.character)
        });
    ctx.log
        .log_damage(attacker_id.as_deref(), &target_id, source.label, dealt, is_dot);

    if !is_dot {
        spawn_visual(ctx, VisualKind::DamageNumber { amount: dealt }, position);
        spawn_visual(ctx, VisualKind::HitSparks, position);
        ctx.sink.play_sound(SoundCue::Hit);
    }

    if lethal {
        die(ctx, target);
    }
    dealt
}

/// The first direct hit out of cloak that lands is amplified and breaks the
/// cloak. Blocked hits leave it in place.
fn consume_ambush(ctx: &mut CombatCtx, attacker: Option<FighterSlot>, target: FighterSlot) -> f32 {
    let Some(attacker) = attacker
        .filter(|a| *a != target)
        .and_then(|a| ctx.fighters.get_mut(a))
    else {
        return 1.0;
    };
    if attacker.is_alive() && attacker.statuses.has(StatusKind::Cloak) {
        attacker.statuses.clear(StatusKind::Cloak);
        CLOAK_AMBUSH_MULTIPLIER
    } else {
        1.0
    }
}

/// Check the single-hit defensive layers in order. Returns the name of the
/// layer that absorbed the hit.
fn absorb_hit(ctx: &mut CombatCtx, target: FighterSlot) -> Option<&'static str> {
    let victim = ctx.fighters.get_mut(target)?;

    if victim.statuses.has(StatusKind::Shielded) {
        return Some("Shield");
    }

    if victim.has_passive(PassiveKind::RiposteGuard) && victim.passive.guard_recharge <= 0.0 {
        victim.passive.guard_recharge = RIPOSTE_GUARD_RECHARGE;
        return Some("Riposte Guard");
    }

    if victim.statuses.has(StatusKind::SpellShield) {
        victim.statuses.clear(StatusKind::SpellShield);
        victim.visual.attachments.retain(|k| *k != StatusKind::SpellShield);
        return Some("Spell Shield");
    }

    if victim.statuses.has(StatusKind::Parry) {
        victim.statuses.clear(StatusKind::Parry);
        victim.visual.attachments.retain(|k| *k != StatusKind::Parry);
        apply_cc(ctx, target.opponent(), StatusKind::Root, PARRY_ROOT_DURATION, 0.0);
        return Some("Parry");
    }

    None
}

/// Apply a non-crowd-control status (buff, debuff, DoT).
pub fn apply_status(
    ctx: &mut CombatCtx,
    target: FighterSlot,
    kind: StatusKind,
    duration: f32,
    magnitude: f32,
) -> bool {
    grant(ctx, target, kind, duration, magnitude, CombatLogEventType::StatusApplied)
}

/// Apply crowd control. Slow, root, stun and silence do nothing to an
/// Unstoppable target. Stun and root cancel an active dash.
pub fn apply_cc(
    ctx: &mut CombatCtx,
    target: FighterSlot,
    kind: StatusKind,
    duration: f32,
    magnitude: f32,
) -> bool {
    let Some(victim) = ctx.fighters.get_mut(target) else {
        return false;
    };
    if !victim.is_alive() {
        return false;
    }
    if kind.is_crowd_control() && victim.statuses.has(StatusKind::Unstoppable) {
        debug!("{:?} resisted by Unstoppable on {:?}", kind, target);
        return false;
    }
    if matches!(kind, StatusKind::Stun | StatusKind::Root) {
        victim.charge = None;
    }
    let event_type = if kind.is_crowd_control() {
        CombatLogEventType::CrowdControl
    } else {
        CombatLogEventType::StatusApplied
    };
    grant(ctx, target, kind, duration, magnitude, event_type)
}

fn grant(
    ctx: &mut CombatCtx,
    target: FighterSlot,
    kind: StatusKind,
    duration: f32,
    magnitude: f32,
    event_type: CombatLogEventType,
) -> bool {
    let Some(fighter) = ctx.fighters.get_mut(target) else {
        return false;
    };
    if !fighter.is_alive() {
        return false;
    }
    let fresh = !fighter.statuses.has(kind);
    fighter.statuses.apply(kind, duration, magnitude);

    let attach = kind.has_attachment() && !fighter.visual.attachments.contains(&kind);
    if attach {
        fighter.visual.attachments.push(kind);
    }
    let position = fighter.position;
    let id = combatant_id(fighter.slot, fighter.character);

    if attach {
        ctx.sink
            .spawn_visual_effect(VisualKind::StatusAttachment(kind), position);
    }
    if fresh {
        ctx.log.log(
            event_type,
            format!("{} gains {:?} ({:.1}s)", id, kind, duration),
        );
    }
    true
}

/// Add one gravity mark and refresh the stack timer.
pub fn add_gravity_mark(ctx: &mut CombatCtx, target: FighterSlot) {
    let Some(fighter) = ctx.fighters.get_mut(target) else {
        return;
    };
    if !fighter.is_alive() {
        return;
    }
    let count = fighter
        .statuses
        .add_stack(StackKind::GravityMark, GRAVITY_MARK_DURATION);
    debug!("{:?} has {} gravity marks", target, count);
}

/// Heal a fighter, clamped to max health. Returns the amount restored.
pub fn heal(ctx: &mut CombatCtx, target: FighterSlot, amount: f32, label: &str) -> f32 {
    debug_assert!(amount >= 0.0, "heal: amount cannot be negative, got {}", amount);
    let Some(fighter) = ctx.fighters.get_mut(target) else {
        return 0.0;
    };
    if !fighter.is_alive() {
        return 0.0;
    }
    let before = fighter.health;
    fighter.health = (fighter.health + amount.max(0.0)).min(fighter.max_health);
    let healed = fighter.health - before;
    let position = fighter.position;
    let id = combatant_id(fighter.slot, fighter.character);

    if healed > 0.0 {
        ctx.log.log_healing(&id, label, healed);
        spawn_visual(ctx, VisualKind::HealNumber { amount: healed }, position);
    }
    healed
}

/// Alive to Dead. Runs once; later calls are no-ops.
///
/// Match outcome is not decided here; the simulation looks at both fighters
/// once per tick so a double knockout is a draw.
pub fn die(ctx: &mut CombatCtx, slot: FighterSlot) {
    let Some(fighter) = ctx.fighters.get_mut(slot) else {
        return;
    };
    if fighter.life != LifeState::Alive {
        return;
    }

    fighter.life = LifeState::Dead;
    fighter.health = 0.0;
    fighter.velocity = Vec3::ZERO;
    fighter.charge = None;
    fighter.statuses.clear_all();
    fighter.visual.restore_tint();
    fighter.visual.hidden = true;
    fighter.visual.attachments.clear();
    fighter.construct = None;
    fighter.generation = fighter.generation.wrapping_add(1);
    let position = fighter.position;
    let id = combatant_id(fighter.slot, fighter.character);

    ctx.sink.release_attachments(slot);
    spawn_visual(ctx, VisualKind::DeathBurst, position);
    ctx.sink.play_sound(SoundCue::Death);
    ctx.spawner.request_release(slot);

    ctx.log.log_death(&id);
    info!("{} has died at {:.2}s", id, ctx.match_time);
}

/// Per-tick integration of one fighter, everything after input resolution:
/// decay, stack bookkeeping, damage over time, regen, passives, movement,
/// arena clamp, facing, collision, history and visuals.
pub fn advance_fighter(ctx: &mut CombatCtx, slot: FighterSlot, dt: f32) {
    if !is_alive(ctx, slot) {
        return;
    }

    auras::tick_statuses(ctx, slot, dt);
    if !is_alive(ctx, slot) {
        return;
    }

    auras::regenerate(ctx, slot, dt);
    if dt > 0.0 {
        auras::tick_passive(ctx, slot, dt);
    }

    integrate_movement(ctx, slot, dt);
    face_opponent(ctx, slot);
    resolve_collisions(ctx, slot);

    let match_time = ctx.match_time;
    if let Some(fighter) = ctx.fighters.get_mut(slot) {
        fighter.record_history(dt, match_time);
        fighter.visual.opacity = if fighter.statuses.has(StatusKind::Cloak) {
            CLOAK_OPACITY
        } else {
            1.0
        };
        fighter.visual.tick_flash(dt);
    }
}

/// Dash overrides, position integration, frame-rate independent damping and
/// the arena clamp.
fn integrate_movement(ctx: &mut CombatCtx, slot: FighterSlot, dt: f32) {
    let arena = ctx.arena;
    let Some(fighter) = ctx.fighters.get_mut(slot) else {
        return;
    };

    let mut dash_ended = false;
    if let Some(mut charge) = fighter.charge {
        fighter.velocity = charge.direction * charge.speed;
        charge.remaining -= dt;
        if charge.remaining > 0.0 {
            fighter.charge = Some(charge);
        } else {
            fighter.charge = None;
            dash_ended = true;
        }
    } else if fighter.statuses.has(StatusKind::Root) || fighter.statuses.has(StatusKind::Siege) {
        fighter.velocity = Vec3::ZERO;
    }

    fighter.position += fighter.velocity * dt;
    fighter.velocity *= VELOCITY_DECAY.powf(dt);

    if dash_ended {
        fighter.velocity = Vec3::ZERO;
        fighter.statuses.clear(StatusKind::Charging);
    }

    fighter.position = arena.clamp(fighter.position);
}

/// Non-AI fighters always face the opponent; AI aim is owned by the brain.
fn face_opponent(ctx: &mut CombatCtx, slot: FighterSlot) {
    let Some(opponent_position) = ctx
        .fighters
        .opponent(slot)
        .filter(|f| f.is_alive())
        .map(|f| f.position)
    else {
        return;
    };
    let Some(fighter) = ctx.fighters.get_mut(slot) else {
        return;
    };
    if fighter.is_ai() || fighter.charge.is_some() {
        return;
    }
    let direction = flat_direction(fighter.position, opponent_position);
    if direction != Vec3::ZERO {
        fighter.aim = direction;
    }
}

/// Push the fighter out of obstacles and the opponent along the axis of
/// least penetration. Dashes stop on contact; charge and lunge hit the
/// opponent they run into.
fn resolve_collisions(ctx: &mut CombatCtx, slot: FighterSlot) {
    let arena = ctx.arena;
    let (Some(fighter), opponent) = ctx.fighters.pair_mut(slot) else {
        return;
    };

    let mut hit_obstacle = false;
    for obstacle in &arena.obstacles {
        if let Some(push) = fighter.bounds().penetration(obstacle) {
            fighter.position += push;
            hit_obstacle = true;
        }
    }

    let mut hit_opponent = false;
    if let Some(opponent) = opponent.filter(|o| o.is_alive()) {
        if let Some(push) = fighter.bounds().penetration(&opponent.bounds()) {
            fighter.position += push;
            hit_opponent = true;
        }
    }
    if hit_obstacle || hit_opponent {
        fighter.position = arena.clamp(fighter.position);
    }

    let Some(charge) = fighter.charge else {
        return;
    };
    let impact = match charge.kind {
        DashKind::Charge | DashKind::Lunge if hit_opponent => Some(charge.kind),
        _ if hit_obstacle || hit_opponent => None,
        _ => return,
    };

    fighter.charge = None;
    fighter.velocity = Vec3::ZERO;
    fighter.statuses.clear(StatusKind::Charging);

    match impact {
        Some(DashKind::Charge) => charge_impact(ctx, slot),
        Some(DashKind::Lunge) => {
            apply_damage(
                ctx,
                slot.opponent(),
                LUNGE_DAMAGE,
                false,
                HitSource::new(slot, "Lunge"),
            );
        }
        _ => {}
    }
}

fn charge_impact(ctx: &mut CombatCtx, slot: FighterSlot) {
    let target = slot.opponent();
    let dealt = apply_damage(
        ctx,
        target,
        CHARGE_IMPACT_DAMAGE,
        false,
        HitSource::new(slot, "Charge"),
    );
    if dealt <= 0.0 {
        return;
    }

    let (Some(vanguard), Some(victim)) = ctx.fighters.pair_mut(slot) else {
        return;
    };
    if !victim.is_alive() || victim.statuses.has(StatusKind::Unstoppable) {
        return;
    }
    let direction = flat_direction(vanguard.position, victim.position);
    victim.velocity = direction * CHARGE_KNOCKBACK_SPEED;
    apply_cc(ctx, target, StatusKind::Stun, CHARGE_STUN_DURATION, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::events::NullSink;
    use crate::play_match::ability_config::KitDefinitions;
    use crate::play_match::components::{Controller, Fighter};
    use crate::play_match::match_config::CharacterKey;

    struct Harness {
        fighters: Fighters,
        spawner: EffectSpawner,
        arena: Arena,
        log: CombatLog,
        sink: NullSink,
        rng: GameRng,
    }

    impl Harness {
        fn new() -> Self {
            let kits = KitDefinitions::default();
            let mut fighters = Fighters::default();
            for (slot, key, x) in [
                (FighterSlot::One, CharacterKey::Ranger, -5.0),
                (FighterSlot::Two, CharacterKey::Vanguard, 5.0),
            ] {
                let kit = kits.get(key).cloned().unwrap();
                fighters.insert(Fighter::new(
                    slot,
                    key,
                    kit,
                    Controller::Local,
                    Vec3::new(x, 0.0, 0.0),
                    Vec3::new(-x.signum(), 0.0, 0.0),
                ));
            }
            Self {
                fighters,
                spawner: EffectSpawner::default(),
                arena: Arena::new(20.0, 20.0, 1.0, Vec::new()),
                log: CombatLog::default(),
                sink: NullSink,
                rng: GameRng::from_seed(1),
            }
        }

        fn ctx(&mut self) -> CombatCtx<'_> {
            CombatCtx {
                fighters: &mut self.fighters,
                spawner: &mut self.spawner,
                live: &[],
                arena: &self.arena,
                log: &mut self.log,
                sink: &mut self.sink,
                rng: &mut self.rng,
                match_time: 0.0,
                mode: GameMode::Standard,
            }
        }
    }

    fn hit(attacker: FighterSlot) -> HitSource {
        HitSource::new(attacker, "Test")
    }

    #[test]
    fn test_shield_blocks_direct_but_not_dot() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        apply_status(&mut ctx, FighterSlot::Two, StatusKind::Shielded, 2.0, 0.0);

        assert_eq!(apply_damage(&mut ctx, FighterSlot::Two, 10.0, false, hit(FighterSlot::One)), 0.0);
        assert_eq!(ctx.fighters.get(FighterSlot::Two).unwrap().health, 100.0);

        apply_damage(&mut ctx, FighterSlot::Two, 10.0, true, hit(FighterSlot::One));
        assert_eq!(ctx.fighters.get(FighterSlot::Two).unwrap().health, 90.0);
    }

    #[test]
    fn test_corruption_then_empower_multiply() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        apply_status(&mut ctx, FighterSlot::Two, StatusKind::Corrupted, 5.0, 0.0);
        apply_status(&mut ctx, FighterSlot::Two, StatusKind::Empowered, 5.0, 0.0);

        let dealt = apply_damage(&mut ctx, FighterSlot::Two, 20.0, false, hit(FighterSlot::One));
        assert!((dealt - 20.0 * 1.3 * 0.7).abs() < 1e-4);
    }

    #[test]
    fn test_spell_shield_is_consumed_by_one_hit() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        apply_status(&mut ctx, FighterSlot::Two, StatusKind::SpellShield, 3.0, 0.0);

        assert_eq!(apply_damage(&mut ctx, FighterSlot::Two, 10.0, false, hit(FighterSlot::One)), 0.0);
        assert_eq!(apply_damage(&mut ctx, FighterSlot::Two, 10.0, false, hit(FighterSlot::One)), 10.0);
    }

    #[test]
    fn test_parry_roots_the_attacker() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        apply_status(&mut ctx, FighterSlot::Two, StatusKind::Parry, 1.0, 0.0);

        apply_damage(&mut ctx, FighterSlot::Two, 10.0, false, hit(FighterSlot::One));
        let attacker = ctx.fighters.get(FighterSlot::One).unwrap();
        assert!(attacker.statuses.has(StatusKind::Root));
        assert!(!ctx.fighters.get(FighterSlot::Two).unwrap().statuses.has(StatusKind::Parry));
    }

    #[test]
    fn test_unstoppable_ignores_crowd_control() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        apply_status(&mut ctx, FighterSlot::Two, StatusKind::Unstoppable, 1.0, 0.0);
        assert!(!apply_cc(&mut ctx, FighterSlot::Two, StatusKind::Stun, 1.0, 0.0));
        assert!(!ctx.fighters.get(FighterSlot::Two).unwrap().statuses.has(StatusKind::Stun));
    }

    #[test]
    fn test_health_stays_in_range() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        heal(&mut ctx, FighterSlot::Two, 50.0, "Test");
        assert_eq!(ctx.fighters.get(FighterSlot::Two).unwrap().health, 100.0);

        apply_damage(&mut ctx, FighterSlot::Two, 500.0, false, hit(FighterSlot::One));
        let victim = ctx.fighters.get(FighterSlot::Two).unwrap();
        assert_eq!(victim.health, 0.0);
        assert_eq!(victim.life, LifeState::Dead);
    }

    #[test]
    fn test_die_twice_is_same_as_once() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        die(&mut ctx, FighterSlot::Two);
        let generation = ctx.fighters.get(FighterSlot::Two).unwrap().generation;
        let pending = ctx.spawner.pending_len();
        die(&mut ctx, FighterSlot::Two);

        assert_eq!(ctx.fighters.get(FighterSlot::Two).unwrap().generation, generation);
        assert_eq!(ctx.spawner.pending_len(), pending);
        assert_eq!(ctx.log.deaths_of("P2 Vanguard"), 1);
    }

    #[test]
    fn test_dead_fighter_takes_no_damage() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        die(&mut ctx, FighterSlot::Two);
        assert_eq!(apply_damage(&mut ctx, FighterSlot::Two, 10.0, false, hit(FighterSlot::One)), 0.0);
    }

    #[test]
    fn test_velocity_damping_is_frame_rate_independent() {
        let mut coarse = Harness::new();
        let mut fine = Harness::new();
        for h in [&mut coarse, &mut fine] {
            h.fighters.get_mut(FighterSlot::One).unwrap().velocity = Vec3::new(0.0, 0.0, 4.0);
        }
        integrate_movement(&mut coarse.ctx(), FighterSlot::One, 0.1);
        for _ in 0..4 {
            integrate_movement(&mut fine.ctx(), FighterSlot::One, 0.025);
        }
        let a = coarse.fighters.get(FighterSlot::One).unwrap().velocity;
        let b = fine.fighters.get(FighterSlot::One).unwrap().velocity;
        assert!((a - b).length() < 1e-4);
    }

    #[test]
    fn test_push_out_stays_inside_arena() {
        let mut h = Harness::new();
        let edge = h.arena.clamp(Vec3::new(-100.0, 0.0, 0.0));
        h.fighters.get_mut(FighterSlot::One).unwrap().position = edge;
        h.fighters.get_mut(FighterSlot::Two).unwrap().position = edge + Vec3::new(0.5, 0.0, 0.0);

        resolve_collisions(&mut h.ctx(), FighterSlot::One);
        let position = h.fighters.get(FighterSlot::One).unwrap().position;
        assert!(h.arena.contains(position), "pushed out of bounds to {:?}", position);
    }

    #[test]
    fn test_ambush_breaks_cloak() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        apply_status(&mut ctx, FighterSlot::One, StatusKind::Cloak, 3.0, 0.0);
        let dealt = apply_damage(&mut ctx, FighterSlot::Two, 10.0, false, hit(FighterSlot::One));
        assert!((dealt - 15.0).abs() < 1e-4);
        assert!(!ctx.fighters.get(FighterSlot::One).unwrap().statuses.has(StatusKind::Cloak));
    }

    #[test]
    fn test_blocked_hit_keeps_ambush() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        apply_status(&mut ctx, FighterSlot::One, StatusKind::Cloak, 3.0, 0.0);
        apply_status(&mut ctx, FighterSlot::Two, StatusKind::Shielded, 2.0, 0.0);

        assert_eq!(apply_damage(&mut ctx, FighterSlot::Two, 10.0, false, hit(FighterSlot::One)), 0.0);
        assert!(ctx.fighters.get(FighterSlot::One).unwrap().statuses.has(StatusKind::Cloak));

        ctx.fighters
            .get_mut(FighterSlot::Two)
            .unwrap()
            .statuses
            .clear(StatusKind::Shielded);
        let dealt = apply_damage(&mut ctx, FighterSlot::Two, 10.0, false, hit(FighterSlot::One));
        assert!((dealt - 15.0).abs() < 1e-4);
        assert!(!ctx.fighters.get(FighterSlot::One).unwrap().statuses.has(StatusKind::Cloak));
    }
}
