//! Zones, auras and constructs
//!
//! Read-only resolution for the stationary (or owner-following) effects.
//! Each function returns the actions its effect wants this tick; the
//! registry applies them.

use bevy::math::Vec3;

use crate::combat::events::{SoundCue, VisualKind};
use crate::play_match::components::{FighterSlot, Fighters, StatusKind};
use crate::play_match::constants::*;
use crate::play_match::physics::{flat_direction, Arena};
use crate::play_match::projectiles::ProjectilePayload;

use super::{Aura, Construct, EffectAction, EffectActions, TransientEffect, Zone};

fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}

/// Living fighters this effect is hostile to, within `radius` of its position.
fn hostiles_within<'a>(
    effect: &TransientEffect,
    fighters: &'a Fighters,
    radius: f32,
) -> impl Iterator<Item = FighterSlot> + 'a {
    let center = effect.position;
    let source = effect.source;
    fighters
        .iter()
        .filter(move |f| f.is_alive() && source.is_some_and(|s| s != f.slot))
        .filter(move |f| planar_distance(f.position, center) <= radius)
        .map(|f| f.slot)
}

pub fn resolve_zone(
    effect: &TransientEffect,
    zone: &Zone,
    fighters: &Fighters,
    dt: f32,
) -> EffectActions {
    let mut actions = EffectActions::new();
    match zone {
        Zone::TemporalField { radius } => {
            for target in hostiles_within(effect, fighters, *radius) {
                if dt > 0.0 {
                    actions.push(EffectAction::Damage {
                        target,
                        amount: TEMPORAL_FIELD_DPS * dt,
                        is_dot: true,
                        label: "Temporal Field",
                        payload: ProjectilePayload::Plain,
                    });
                }
                actions.push(EffectAction::Crowd {
                    target,
                    kind: StatusKind::Slow,
                    duration: ZONE_SLOW_REFRESH,
                    magnitude: TEMPORAL_FIELD_SLOW_FACTOR,
                });
            }
        }
        Zone::ArcMine { arm_timer } => {
            if *arm_timer > 0.0 {
                return actions;
            }
            let Some(target) = hostiles_within(effect, fighters, ARC_MINE_TRIGGER_RADIUS).next()
            else {
                return actions;
            };
            actions.push(EffectAction::DestroySelf);
            actions.push(EffectAction::Damage {
                target,
                amount: ARC_MINE_DAMAGE,
                is_dot: false,
                label: "Arc Mine",
                payload: ProjectilePayload::Plain,
            });
            actions.push(EffectAction::Crowd {
                target,
                kind: StatusKind::Root,
                duration: ARC_MINE_ROOT_DURATION,
                magnitude: 0.0,
            });
            actions.push(EffectAction::Visual {
                kind: VisualKind::Ring {
                    radius: ARC_MINE_TRIGGER_RADIUS,
                },
                position: effect.position,
            });
            actions.push(EffectAction::Sound(SoundCue::Explosion));
        }
        Zone::Barrier { .. } => {}
    }
    actions
}

pub fn resolve_aura(effect: &TransientEffect, aura: &Aura, fighters: &Fighters) -> EffectActions {
    let mut actions = EffectActions::new();
    let owner_alive = effect
        .owner_slot()
        .and_then(|slot| fighters.get(slot))
        .is_some_and(|f| f.is_alive());
    if !owner_alive {
        actions.push(EffectAction::DestroySelf);
        return actions;
    }
    for target in hostiles_within(effect, fighters, aura.radius) {
        actions.push(EffectAction::Crowd {
            target,
            kind: StatusKind::Slow,
            duration: ZONE_SLOW_REFRESH,
            magnitude: aura.slow_factor,
        });
    }
    actions
}

pub fn resolve_construct(
    effect: &TransientEffect,
    construct: &Construct,
    fighters: &Fighters,
    arena: &Arena,
) -> EffectActions {
    let mut actions = EffectActions::new();
    let owner_alive = effect
        .owner_slot()
        .and_then(|slot| fighters.get(slot))
        .is_some_and(|f| f.is_alive());
    if !owner_alive || construct.health <= 0.0 {
        actions.push(EffectAction::DestroySelf);
        return actions;
    }
    if construct.fire_timer > 0.0 {
        return actions;
    }

    let target = fighters.iter().find(|f| {
        f.is_alive()
            && effect.is_hostile_to(f.slot)
            && !f.statuses.has(StatusKind::Cloak)
            && planar_distance(f.position, effect.position) <= construct.range
            && !arena.segment_blocked(effect.position, f.position)
    });
    if let Some(target) = target {
        let direction = flat_direction(effect.position, target.position);
        if direction != Vec3::ZERO {
            actions.push(EffectAction::Fire { direction });
        }
    }
    actions
}
