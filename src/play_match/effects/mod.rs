//! Transient effect registry
//!
//! Every non-fighter object of a match (projectiles, zones, auras,
//! constructs, short-lived visuals) lives in one flat registry.
//!
//! ## Mark and sweep
//! - Destruction only sets a flag. Destroyed entries are skipped by every
//!   scan and never updated again.
//! - New effects are queued in the [`EffectSpawner`] and only join the live
//!   list at [`EffectRegistry::commit`], which also compacts out destroyed
//!   entries. Nothing changes the length of the live list during a pass.
//! - Owners are weak: an effect stores the slot or id it came from and every
//!   lookup tolerates the owner being gone.

pub mod zones;

use bevy::log::debug;
use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::combat::events::{SoundCue, VisualKind};
use super::combat_core::{self, CombatCtx, HitSource};
use super::components::{FighterSlot, Fighters, StatusKind};
use super::constants::*;
use super::physics::{Arena, Bounds};
use super::projectiles::{self, Projectile, ProjectilePayload};

/// Registry handle for a transient effect.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct EffectId(pub u64);

/// Non-owning back-reference to whatever created an effect.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Owner {
    Fighter(FighterSlot),
    Effect(EffectId),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Lifespan {
    Finite(f32),
    Infinite,
}

impl Lifespan {
    /// Count down; true once the lifespan has run out.
    fn tick(&mut self, dt: f32) -> bool {
        match self {
            Lifespan::Finite(remaining) => {
                *remaining = (*remaining - dt).max(0.0);
                *remaining <= 0.0
            }
            Lifespan::Infinite => false,
        }
    }
}

/// Ground zones.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Zone {
    /// Slowing damage-over-time field
    TemporalField { radius: f32 },
    /// Roots and damages the first hostile fighter to step on it once armed
    ArcMine { arm_timer: f32 },
    /// Projectile-blocking wall
    Barrier { bounds: Bounds },
}

/// An aura that follows its owner.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Aura {
    pub radius: f32,
    pub slow_factor: f32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConstructKind {
    Sentry,
    Turret,
}

/// A deployed construct that shoots at the opponent of its owner.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Construct {
    pub kind: ConstructKind,
    pub health: f32,
    pub fire_timer: f32,
    pub fire_interval: f32,
    pub range: f32,
    pub damage: f32,
}

impl Construct {
    pub fn label(&self) -> &'static str {
        match self.kind {
            ConstructKind::Sentry => "Sentry",
            ConstructKind::Turret => "Turret",
        }
    }

    /// Whether it stops hostile projectiles.
    pub fn blocks_projectiles(&self) -> bool {
        self.kind == ConstructKind::Turret
    }
}

/// Closed set of effect variants; behavior dispatches on this tag.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum EffectKind {
    Projectile(Projectile),
    Zone(Zone),
    Aura(Aura),
    Construct(Construct),
    Visual(VisualKind),
}

/// A transient world object.
#[derive(Clone, Debug)]
pub struct TransientEffect {
    pub id: EffectId,
    pub kind: EffectKind,
    pub owner: Option<Owner>,
    /// Fighter credited for damage; also decides friend or foe
    pub source: Option<FighterSlot>,
    pub position: Vec3,
    pub lifespan: Lifespan,
    /// Released when the owning fighter dies
    pub exclusive: bool,
    destroyed: bool,
}

impl TransientEffect {
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Mark destroyed. Returns false if it already was.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        true
    }

    /// Effects created by the other fighter.
    pub fn is_hostile_to(&self, slot: FighterSlot) -> bool {
        self.source.is_some_and(|source| source != slot)
    }

    pub fn owner_slot(&self) -> Option<FighterSlot> {
        match self.owner {
            Some(Owner::Fighter(slot)) => Some(slot),
            _ => None,
        }
    }

    pub fn collider(&self) -> Option<Bounds> {
        match &self.kind {
            EffectKind::Zone(Zone::Barrier { bounds }) => Some(*bounds),
            EffectKind::Construct(_) => Some(Bounds::from_center(
                self.position,
                Vec3::new(CONSTRUCT_HALF_SIZE, 0.0, CONSTRUCT_HALF_SIZE),
            )),
            _ => None,
        }
    }

    pub fn blocks_projectiles(&self) -> bool {
        match &self.kind {
            EffectKind::Zone(Zone::Barrier { .. }) => true,
            EffectKind::Construct(construct) => construct.blocks_projectiles(),
            _ => false,
        }
    }

    /// Radius of ground a fighter should avoid, for zones that hurt.
    pub fn hazard_radius(&self) -> Option<f32> {
        match &self.kind {
            EffectKind::Zone(Zone::TemporalField { radius }) => Some(*radius),
            EffectKind::Zone(Zone::ArcMine { arm_timer }) if *arm_timer <= 0.0 => {
                Some(ARC_MINE_TRIGGER_RADIUS)
            }
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            EffectKind::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }

    /// Per-effect internal state only: motion, timers, lifespan.
    /// Returns true if the lifespan ran out this tick.
    fn advance(&mut self, dt: f32, owner_position: Option<Vec3>) -> bool {
        match &mut self.kind {
            EffectKind::Projectile(projectile) => {
                projectile.previous = self.position;
                self.position += projectile.velocity * dt;
            }
            EffectKind::Zone(Zone::ArcMine { arm_timer }) => {
                *arm_timer = (*arm_timer - dt).max(0.0);
            }
            EffectKind::Aura(_) => {
                if let Some(position) = owner_position {
                    self.position = position;
                }
            }
            EffectKind::Construct(construct) => {
                construct.fire_timer = (construct.fire_timer - dt).max(0.0);
            }
            EffectKind::Zone(_) | EffectKind::Visual(_) => {}
        }
        self.lifespan.tick(dt)
    }
}

/// Queues creations and destruction requests made while the live list is
/// being read or iterated.
#[derive(Debug, Default)]
pub struct EffectSpawner {
    pending: Vec<TransientEffect>,
    next_id: u64,
    destroy_requests: Vec<EffectId>,
    release_requests: Vec<FighterSlot>,
}

impl EffectSpawner {
    fn push(
        &mut self,
        kind: EffectKind,
        position: Vec3,
        lifespan: Lifespan,
        owner: Option<Owner>,
        source: Option<FighterSlot>,
        exclusive: bool,
    ) -> EffectId {
        self.next_id += 1;
        let id = EffectId(self.next_id);
        self.pending.push(TransientEffect {
            id,
            kind,
            owner,
            source,
            position,
            lifespan,
            exclusive,
            destroyed: false,
        });
        id
    }

    /// Shared world object credited to `source` but not released on its death.
    pub fn spawn(
        &mut self,
        kind: EffectKind,
        position: Vec3,
        lifespan: Lifespan,
        source: Option<FighterSlot>,
    ) -> EffectId {
        let owner = source.map(Owner::Fighter);
        self.push(kind, position, lifespan, owner, source, false)
    }

    /// Exclusively owned by a fighter; released when it dies.
    pub fn spawn_owned(
        &mut self,
        kind: EffectKind,
        position: Vec3,
        lifespan: Lifespan,
        owner: FighterSlot,
    ) -> EffectId {
        self.push(kind, position, lifespan, Some(Owner::Fighter(owner)), Some(owner), true)
    }

    /// Created by another effect (a turret's shot).
    pub fn spawn_child(
        &mut self,
        kind: EffectKind,
        position: Vec3,
        lifespan: Lifespan,
        parent: EffectId,
        source: Option<FighterSlot>,
    ) -> EffectId {
        self.push(kind, position, lifespan, Some(Owner::Effect(parent)), source, false)
    }

    /// Destroy an effect at the next commit. Unknown or already-destroyed ids
    /// are ignored.
    pub fn request_destroy(&mut self, id: EffectId) {
        self.destroy_requests.push(id);
    }

    /// Destroy every effect exclusively owned by a fighter at the next commit.
    pub fn request_release(&mut self, owner: FighterSlot) {
        self.release_requests.push(owner);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Flat collection of transient effects.
#[derive(Debug, Default)]
pub struct EffectRegistry {
    live: Vec<TransientEffect>,
    spawner: EffectSpawner,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> &[TransientEffect] {
        &self.live
    }

    pub fn spawner(&mut self) -> &mut EffectSpawner {
        &mut self.spawner
    }

    /// Read-only live list plus the spawner, for skill execution.
    pub fn split(&mut self) -> (&[TransientEffect], &mut EffectSpawner) {
        (&self.live, &mut self.spawner)
    }

    /// Mutable live list plus the spawner, for the effect pass.
    pub fn split_mut(&mut self) -> (&mut [TransientEffect], &mut EffectSpawner) {
        (&mut self.live, &mut self.spawner)
    }

    /// A live, not-destroyed effect by id.
    pub fn get(&self, id: EffectId) -> Option<&TransientEffect> {
        self.live.iter().find(|e| e.id == id && !e.is_destroyed())
    }

    pub fn is_alive(&self, id: EffectId) -> bool {
        self.get(id).is_some()
    }

    /// Apply queued destruction, sweep destroyed entries, then admit pending
    /// effects. Returns how many entries were swept.
    pub fn commit(&mut self) -> usize {
        let spawner = &mut self.spawner;
        let destroy = std::mem::take(&mut spawner.destroy_requests);
        let release = std::mem::take(&mut spawner.release_requests);
        let mut pending = std::mem::take(&mut spawner.pending);

        for effect in self.live.iter_mut().chain(pending.iter_mut()) {
            let owner_released = effect.exclusive
                && effect.owner_slot().is_some_and(|slot| release.contains(&slot));
            if destroy.contains(&effect.id) || owner_released {
                effect.destroy();
            }
        }

        let before = self.live.len();
        self.live.retain(|e| !e.is_destroyed());
        let swept = before - self.live.len();

        pending.retain(|e| !e.is_destroyed());
        self.live.append(&mut pending);

        if swept > 0 {
            debug!("Swept {} destroyed effects ({} live)", swept, self.live.len());
        }
        swept
    }

    /// Destroy and drop everything (match teardown).
    pub fn destroy_all(&mut self) {
        for effect in self.live.iter_mut().chain(self.spawner.pending.iter_mut()) {
            effect.destroy();
        }
        self.commit();
    }
}

/// One consequence of an effect's update, computed from a read-only view
/// and applied afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectAction {
    DestroySelf,
    /// Damage a fighter; the payload only lands if the hit isn't blocked
    Damage {
        target: FighterSlot,
        amount: f32,
        is_dot: bool,
        label: &'static str,
        payload: ProjectilePayload,
    },
    /// Crowd control (ignored while Unstoppable)
    Crowd {
        target: FighterSlot,
        kind: StatusKind,
        duration: f32,
        magnitude: f32,
    },
    DamageConstruct {
        index: usize,
        amount: f32,
    },
    Fire {
        direction: Vec3,
    },
    Visual {
        kind: VisualKind,
        position: Vec3,
    },
    Sound(SoundCue),
}

pub type EffectActions = SmallVec<[EffectAction; 4]>;

/// Run one update over every live effect.
///
/// `live` must be the registry's live list and `ctx.live` should be empty:
/// each effect is first resolved against a read-only view of the list, then
/// its actions are applied. Anything destroyed along the way, including later
/// entries, is skipped for the rest of the pass.
pub fn update_effects(live: &mut [TransientEffect], ctx: &mut CombatCtx, dt: f32) {
    for index in 0..live.len() {
        if live[index].is_destroyed() {
            continue;
        }

        let owner_position = live[index]
            .owner_slot()
            .and_then(|slot| ctx.fighters.get(slot))
            .filter(|f| f.is_alive())
            .map(|f| f.position);
        let expired = live[index].advance(dt, owner_position);
        // A projectile still sweeps the segment it covered on its last tick.
        if expired && !matches!(live[index].kind, EffectKind::Projectile(_)) {
            live[index].destroy();
            continue;
        }

        let actions = resolve(index, live, &*ctx.fighters, ctx.arena, dt);
        for action in actions {
            if live[index].is_destroyed() && action_needs_self(&action) {
                continue;
            }
            apply_action(live, index, action, ctx);
        }
        if expired {
            live[index].destroy();
        }
    }
}

fn resolve(
    index: usize,
    live: &[TransientEffect],
    fighters: &Fighters,
    arena: &Arena,
    dt: f32,
) -> EffectActions {
    let effect = &live[index];
    match &effect.kind {
        EffectKind::Projectile(projectile) => {
            projectiles::resolve_projectile(effect, projectile, live, fighters, arena)
        }
        EffectKind::Zone(zone) => zones::resolve_zone(effect, zone, fighters, dt),
        EffectKind::Aura(aura) => zones::resolve_aura(effect, aura, fighters),
        EffectKind::Construct(construct) => {
            zones::resolve_construct(effect, construct, fighters, arena)
        }
        EffectKind::Visual(_) => EffectActions::new(),
    }
}

/// Turret shots need the firing effect to still exist.
fn action_needs_self(action: &EffectAction) -> bool {
    matches!(action, EffectAction::Fire { .. })
}

fn apply_action(
    live: &mut [TransientEffect],
    index: usize,
    action: EffectAction,
    ctx: &mut CombatCtx,
) {
    let source = live[index].source;
    match action {
        EffectAction::DestroySelf => {
            live[index].destroy();
        }
        EffectAction::Damage {
            target,
            amount,
            is_dot,
            label,
            payload,
        } => {
            let dealt = combat_core::apply_damage(
                ctx,
                target,
                amount,
                is_dot,
                HitSource {
                    attacker: source,
                    label,
                },
            );
            if dealt > 0.0 {
                apply_payload(ctx, target, payload);
            }
        }
        EffectAction::Crowd {
            target,
            kind,
            duration,
            magnitude,
        } => {
            combat_core::apply_cc(ctx, target, kind, duration, magnitude);
        }
        EffectAction::DamageConstruct { index: hit, amount } => {
            damage_construct(live, hit, amount, ctx);
        }
        EffectAction::Fire { direction } => {
            let shooter = &mut live[index];
            let EffectKind::Construct(construct) = &mut shooter.kind else {
                return;
            };
            construct.fire_timer = construct.fire_interval;
            let projectile = Projectile::new(
                direction * BASIC_PROJECTILE_SPEED,
                construct.damage,
                projectiles::ProjectilePayload::Plain,
                construct.label(),
            );
            let lifespan = Lifespan::Finite(construct.range / BASIC_PROJECTILE_SPEED);
            let origin = shooter.position;
            ctx.spawner.spawn_child(
                EffectKind::Projectile(projectile),
                origin,
                lifespan,
                shooter.id,
                source,
            );
        }
        EffectAction::Visual { kind, position } => {
            combat_core::spawn_visual(ctx, kind, position);
        }
        EffectAction::Sound(cue) => {
            ctx.sink.play_sound(cue);
        }
    }
}

fn apply_payload(ctx: &mut CombatCtx, target: FighterSlot, payload: ProjectilePayload) {
    match payload {
        ProjectilePayload::Plain => {}
        ProjectilePayload::Venom => {
            combat_core::apply_status(ctx, target, StatusKind::Venom, VENOM_DURATION, VENOM_DPS);
        }
        ProjectilePayload::GravityMark => {
            combat_core::add_gravity_mark(ctx, target);
        }
    }
}

fn damage_construct(live: &mut [TransientEffect], index: usize, amount: f32, ctx: &mut CombatCtx) {
    let effect = &mut live[index];
    if effect.is_destroyed() {
        return;
    }
    let position = effect.position;
    let EffectKind::Construct(construct) = &mut effect.kind else {
        return;
    };
    construct.health = (construct.health - amount).max(0.0);
    if construct.health <= 0.0 {
        let label = construct.label();
        effect.destroy();
        ctx.log.log(
            crate::combat::log::CombatLogEventType::MatchEvent,
            format!("{} destroyed", label),
        );
        combat_core::spawn_visual(ctx, VisualKind::Ring { radius: 1.5 }, position);
        ctx.sink.play_sound(SoundCue::Explosion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visual() -> EffectKind {
        EffectKind::Visual(VisualKind::HitSparks)
    }

    #[test]
    fn test_spawned_effects_join_at_commit() {
        let mut registry = EffectRegistry::new();
        let id = registry
            .spawner()
            .spawn(visual(), Vec3::ZERO, Lifespan::Finite(1.0), None);
        assert!(registry.live().is_empty());
        registry.commit();
        assert!(registry.is_alive(id));
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut registry = EffectRegistry::new();
        let id = registry
            .spawner()
            .spawn(visual(), Vec3::ZERO, Lifespan::Infinite, None);
        registry.commit();
        let (live, _) = registry.split_mut();
        assert!(live[0].destroy());
        assert!(!live[0].destroy());
        registry.spawner().request_destroy(id);
        assert_eq!(registry.commit(), 1);
        assert!(registry.live().is_empty());
    }

    #[test]
    fn test_release_only_drops_exclusive_effects() {
        let mut registry = EffectRegistry::new();
        let turret = registry.spawner().spawn_owned(
            visual(),
            Vec3::ZERO,
            Lifespan::Infinite,
            FighterSlot::One,
        );
        let mine = registry.spawner().spawn(
            visual(),
            Vec3::ZERO,
            Lifespan::Infinite,
            Some(FighterSlot::One),
        );
        registry.commit();
        registry.spawner().request_release(FighterSlot::One);
        registry.commit();
        assert!(!registry.is_alive(turret));
        assert!(registry.is_alive(mine));
    }

    #[test]
    fn test_destroy_request_reaches_pending_effects() {
        let mut registry = EffectRegistry::new();
        let id = registry
            .spawner()
            .spawn(visual(), Vec3::ZERO, Lifespan::Infinite, None);
        registry.spawner().request_destroy(id);
        registry.commit();
        assert!(registry.live().is_empty());
    }

    #[test]
    fn test_lifespan_counts_down() {
        let mut lifespan = Lifespan::Finite(0.3);
        assert!(!lifespan.tick(0.2));
        assert!(lifespan.tick(0.2));
        assert!(!Lifespan::Infinite.tick(100.0));
    }
}
