//! Projectile Systems
//!
//! Projectiles travel in a straight line from the caster along its aim and
//! are resolved with a swept test over the distance covered this tick, so a
//! fast projectile cannot tunnel through a fighter or a wall between frames.

use bevy::math::Vec3;
use smallvec::smallvec;

use crate::combat::events::{SoundCue, VisualKind};
use super::components::{FighterSlot, Fighters};
use super::constants::*;
use super::effects::{
    EffectAction, EffectActions, EffectId, EffectKind, EffectSpawner, Lifespan, TransientEffect,
};
use super::physics::{segment_point_distance, Arena};

/// Extra effect applied when a projectile lands on a fighter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProjectilePayload {
    Plain,
    /// Applies the venom damage-over-time
    Venom,
    /// Adds a gravity mark
    GravityMark,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Projectile {
    pub velocity: Vec3,
    /// Position at the start of the current tick
    pub previous: Vec3,
    pub damage: f32,
    pub payload: ProjectilePayload,
    pub label: &'static str,
}

impl Projectile {
    pub fn new(velocity: Vec3, damage: f32, payload: ProjectilePayload, label: &'static str) -> Self {
        Self {
            velocity,
            previous: Vec3::ZERO,
            damage,
            payload,
            label,
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.velocity.normalize_or_zero()
    }
}

/// Launch a projectile from a fighter. Lifespan is set so it expires after
/// travelling `range`.
pub fn fire(
    spawner: &mut EffectSpawner,
    source: FighterSlot,
    origin: Vec3,
    projectile: Projectile,
    range: f32,
) -> EffectId {
    let speed = projectile.velocity.length().max(f32::EPSILON);
    let start = origin + projectile.direction() * (FIGHTER_HALF_SIZE + 0.1);
    spawner.spawn(
        EffectKind::Projectile(projectile),
        start,
        Lifespan::Finite(range / speed),
        Some(source),
    )
}

enum Hit {
    Wall,
    Fighter(FighterSlot),
    Effect { index: usize, construct: bool },
}

/// Swept collision for one projectile against walls, projectile-blocking
/// effects and hostile fighters. The nearest hit along the path wins.
pub fn resolve_projectile(
    effect: &TransientEffect,
    projectile: &Projectile,
    live: &[TransientEffect],
    fighters: &Fighters,
    arena: &Arena,
) -> EffectActions {
    let from = projectile.previous;
    let to = effect.position;
    let travel = to - from;
    let step = travel.length();
    let direction = if step > 1e-6 { travel / step } else { projectile.direction() };

    let mut nearest: Option<(f32, Hit)> = None;
    let mut consider = |distance: f32, hit: Hit| {
        if nearest.as_ref().map_or(true, |(best, _)| distance < *best) {
            nearest = Some((distance, hit));
        }
    };

    if step > 1e-6 {
        if let Some(distance) = arena.ray_obstacle(from, direction, step) {
            consider(distance, Hit::Wall);
        }

        for (index, other) in live.iter().enumerate() {
            if other.id == effect.id
                || other.is_destroyed()
                || !other.blocks_projectiles()
                || other.source == effect.source
            {
                continue;
            }
            let Some(collider) = other.collider() else {
                continue;
            };
            if let Some(distance) = collider.ray_hit(from, direction, step) {
                let construct = matches!(other.kind, EffectKind::Construct(_));
                consider(distance, Hit::Effect { index, construct });
            }
        }
    }

    for fighter in fighters.iter() {
        if !fighter.is_alive() || !effect.is_hostile_to(fighter.slot) {
            continue;
        }
        let reach = PROJECTILE_HIT_RADIUS + FIGHTER_HALF_SIZE;
        if segment_point_distance(from, to, fighter.position) <= reach {
            let along = (fighter.position - from).dot(direction).clamp(0.0, step);
            consider(along, Hit::Fighter(fighter.slot));
        }
    }

    let Some((distance, hit)) = nearest else {
        return EffectActions::new();
    };

    let impact = from + direction * distance;
    let mut actions: EffectActions = smallvec![
        EffectAction::DestroySelf,
        EffectAction::Visual {
            kind: VisualKind::Impact,
            position: impact,
        },
    ];
    match hit {
        Hit::Wall => {}
        Hit::Effect { index, construct } => {
            if construct {
                actions.push(EffectAction::DamageConstruct {
                    index,
                    amount: projectile.damage,
                });
            }
        }
        Hit::Fighter(target) => {
            actions.push(EffectAction::Damage {
                target,
                amount: projectile.damage,
                is_dot: false,
                label: projectile.label,
                payload: projectile.payload,
            });
            actions.push(EffectAction::Sound(SoundCue::Hit));
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play_match::effects::EffectRegistry;

    #[test]
    fn test_fire_sets_lifespan_from_range() {
        let mut registry = EffectRegistry::new();
        let projectile = Projectile::new(
            Vec3::X * 20.0,
            7.0,
            ProjectilePayload::Plain,
            "Arrow",
        );
        let id = fire(registry.spawner(), FighterSlot::One, Vec3::ZERO, projectile, 18.0);
        registry.commit();
        let effect = registry.get(id).expect("projectile should be live");
        assert_eq!(effect.lifespan, Lifespan::Finite(0.9));
        assert!(effect.position.x > 0.0);
        assert!(effect.is_hostile_to(FighterSlot::Two));
        assert!(!effect.is_hostile_to(FighterSlot::One));
    }
}
