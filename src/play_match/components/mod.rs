//! Fighter state
//!
//! Plain data for the two fighters of a match: pools, kinematics, statuses,
//! cooldowns, passive bookkeeping and the derived visual state the renderer
//! reads. Behavior that touches more than one fighter lives in `combat_core`.

pub mod status;

use bevy::color::Color;
use bevy::math::Vec3;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap, VecDeque};

use super::abilities::{PassiveKind, SkillSlot};
use super::ability_config::{CharacterDefinition, SkillDefinition};
use super::combat_ai::AiTier;
use super::constants::*;
use super::effects::EffectId;
use super::match_config::CharacterKey;
use super::physics::Bounds;

pub use status::{StackKind, StatusKind, StatusTable};

/// Seeded random number generator for deterministic simulation.
///
/// Every random decision of a match (AI dodge rolls, aim error) goes through
/// this so a seed reproduces the match exactly.
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// One of the two sides of a 1v1 match.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum FighterSlot {
    One,
    Two,
}

impl FighterSlot {
    pub const ALL: [FighterSlot; 2] = [FighterSlot::One, FighterSlot::Two];

    pub fn index(&self) -> usize {
        match self {
            FighterSlot::One => 0,
            FighterSlot::Two => 1,
        }
    }

    pub fn opponent(&self) -> FighterSlot {
        match self {
            FighterSlot::One => FighterSlot::Two,
            FighterSlot::Two => FighterSlot::One,
        }
    }

    /// Player number shown in logs (1 or 2).
    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Who drives a fighter's movement and skills.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Controller {
    /// Human input read from the input collaborator
    Local,
    /// Driven by an AI brain of the given tier
    Ai(AiTier),
    /// Networked opponent; position interpolates toward a reported target
    Remote,
}

/// Lifecycle of a fighter within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    Dead,
    /// Match torn down; all resources released
    CleanedUp,
}

/// What a forced-velocity movement was started by.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DashKind {
    /// Vanguard charge: interrupted by obstacles, impacts the opponent
    Charge,
    /// Plain evasive dash
    Tumble,
    /// Dash strike that damages the opponent on contact
    Lunge,
}

/// An active charge/dash overriding normal velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargeState {
    pub kind: DashKind,
    pub direction: Vec3,
    pub speed: f32,
    pub remaining: f32,
}

/// A point in the fighter's recent past, for rewind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistorySnapshot {
    pub time: f32,
    pub position: Vec3,
    pub health: f32,
    pub energy: f32,
}

/// Per-character passive bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PassiveState {
    /// Seconds spent standing still (Steady Aim)
    pub still_time: f32,
    /// Seconds until Riposte Guard can block again (0 = ready)
    pub guard_recharge: f32,
    /// Stasis Echo fires once per match
    pub echo_spent: bool,
}

/// Derived presentation state. The core only writes it; a renderer reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualState {
    pub tint: Color,
    /// Tint to restore when the damage flash ends
    pub pre_flash_tint: Option<Color>,
    pub flash_timer: f32,
    pub opacity: f32,
    pub hidden: bool,
    /// Statuses with a visual attached to the model
    pub attachments: SmallVec<[StatusKind; 4]>,
}

impl VisualState {
    pub fn new(tint: Color) -> Self {
        Self {
            tint,
            pre_flash_tint: None,
            flash_timer: 0.0,
            opacity: 1.0,
            hidden: false,
            attachments: SmallVec::new(),
        }
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_timer > 0.0
    }

    /// Start or refresh the damage flash. The original tint is captured only
    /// when going from not flashing to flashing.
    pub fn flash(&mut self) {
        if !self.is_flashing() {
            self.pre_flash_tint = Some(self.tint);
            self.tint = Color::WHITE;
        }
        self.flash_timer = DAMAGE_FLASH_DURATION;
    }

    /// Put back the captured tint and stop flashing.
    pub fn restore_tint(&mut self) {
        if let Some(tint) = self.pre_flash_tint.take() {
            self.tint = tint;
        }
        self.flash_timer = 0.0;
    }

    /// Decay the flash timer; restores the tint when it runs out.
    pub fn tick_flash(&mut self, dt: f32) {
        if !self.is_flashing() {
            return;
        }
        self.flash_timer = (self.flash_timer - dt).max(0.0);
        if self.flash_timer <= 0.0 {
            self.restore_tint();
        }
    }
}

/// Base model tint per character.
pub fn character_tint(key: CharacterKey) -> Color {
    match key {
        CharacterKey::Vanguard => Color::srgb(0.75, 0.2, 0.15),
        CharacterKey::Ranger => Color::srgb(0.2, 0.6, 0.25),
        CharacterKey::Voidcaller => Color::srgb(0.45, 0.2, 0.7),
        CharacterKey::Duelist => Color::srgb(0.85, 0.75, 0.2),
        CharacterKey::Chronomancer => Color::srgb(0.2, 0.55, 0.85),
        CharacterKey::Engineer => Color::srgb(0.9, 0.5, 0.1),
    }
}

/// A combat entity, human-, AI- or network-controlled.
#[derive(Clone, Debug)]
pub struct Fighter {
    pub slot: FighterSlot,
    pub character: CharacterKey,
    pub kit: CharacterDefinition,
    pub controller: Controller,
    pub life: LifeState,

    pub position: Vec3,
    pub velocity: Vec3,
    /// Unit aim vector on the XZ plane
    pub aim: Vec3,

    pub health: f32,
    pub max_health: f32,
    pub energy: f32,
    pub max_energy: f32,

    pub statuses: StatusTable,
    pub cooldowns: HashMap<SkillSlot, f32>,
    pub charge: Option<ChargeState>,
    pub passive: PassiveState,

    pub history: VecDeque<HistorySnapshot>,
    pub history_timer: f32,

    pub visual: VisualState,

    /// Deployed construct (turret/sentry), a weak lookup into the registry
    pub construct: Option<EffectId>,
    /// Network-reported position for remote fighters
    pub remote_target: Option<Vec3>,
    /// Bumped on death; scheduled actions carry the value they were made with
    pub generation: u32,

    pub damage_dealt: f32,
    pub damage_taken: f32,
}

impl Fighter {
    pub fn new(
        slot: FighterSlot,
        character: CharacterKey,
        kit: CharacterDefinition,
        controller: Controller,
        position: Vec3,
        aim: Vec3,
    ) -> Self {
        let cooldowns = SkillSlot::ALL.iter().map(|slot| (*slot, 0.0)).collect();
        Self {
            slot,
            character,
            controller,
            life: LifeState::Alive,
            position,
            velocity: Vec3::ZERO,
            aim: aim.normalize_or_zero(),
            health: kit.max_health,
            max_health: kit.max_health,
            energy: kit.max_energy,
            max_energy: kit.max_energy,
            statuses: StatusTable::default(),
            cooldowns,
            charge: None,
            passive: PassiveState::default(),
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            history_timer: 0.0,
            visual: VisualState::new(character_tint(character)),
            construct: None,
            remote_target: None,
            generation: 0,
            damage_dealt: 0.0,
            damage_taken: 0.0,
            kit,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai(_))
    }

    pub fn health_pct(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    pub fn cooldown(&self, slot: SkillSlot) -> f32 {
        self.cooldowns.get(&slot).copied().unwrap_or(0.0)
    }

    pub fn skill(&self, slot: SkillSlot) -> Option<&SkillDefinition> {
        self.kit.skill(slot)
    }

    pub fn has_passive(&self, passive: PassiveKind) -> bool {
        self.kit.passive == passive
    }

    /// Collision footprint at the current position.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_center(
            self.position,
            Vec3::new(FIGHTER_HALF_SIZE, 0.0, FIGHTER_HALF_SIZE),
        )
    }

    /// Stunned fighters ignore input and AI; charging ones are locked into the dash.
    pub fn has_control(&self) -> bool {
        self.is_alive() && !self.statuses.has(StatusKind::Stun)
    }

    /// Movement speed after slows, roots and buffs.
    pub fn effective_speed(&self) -> f32 {
        if self.statuses.has(StatusKind::Root) || self.statuses.has(StatusKind::Siege) {
            return 0.0;
        }
        let mut speed = self.kit.move_speed;
        if let Some(factor) = self.statuses.magnitude(StatusKind::Slow) {
            speed *= factor;
        }
        if self.statuses.has(StatusKind::RiftBuff) {
            speed *= RIFT_SPEED_FACTOR;
        }
        speed
    }

    /// Reduce every cooldown and passive timer, floored at zero.
    pub fn decay_cooldowns(&mut self, dt: f32) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
        self.passive.guard_recharge = (self.passive.guard_recharge - dt).max(0.0);
    }

    /// Push a history point every `HISTORY_INTERVAL`, keeping the ring bounded.
    pub fn record_history(&mut self, dt: f32, match_time: f32) {
        self.history_timer += dt;
        while self.history_timer >= HISTORY_INTERVAL {
            self.history_timer -= HISTORY_INTERVAL;
            if self.history.len() == HISTORY_CAPACITY {
                self.history.pop_front();
            }
            self.history.push_back(HistorySnapshot {
                time: match_time,
                position: self.position,
                health: self.health,
                energy: self.energy,
            });
        }
    }

    /// The oldest recorded point no further back than `lookback` seconds.
    pub fn history_at(&self, match_time: f32, lookback: f32) -> Option<&HistorySnapshot> {
        self.history
            .iter()
            .find(|snapshot| snapshot.time >= match_time - lookback)
    }

    /// Serializable view for HUDs and the round-trip check.
    pub fn snapshot(&self) -> FighterSnapshot {
        let cooldowns = SkillSlot::ALL
            .iter()
            .map(|slot| (*slot, self.cooldown(*slot)))
            .collect();
        FighterSnapshot {
            slot: self.slot,
            character: self.character,
            health: self.health,
            max_health: self.max_health,
            energy: self.energy,
            max_energy: self.max_energy,
            cooldowns,
            position: self.position.to_array(),
            is_dead: !self.is_alive(),
            statuses: self.statuses.active(),
            gravity_marks: self.statuses.stacks(StackKind::GravityMark),
        }
    }
}

/// What a HUD or minimap needs from a fighter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterSnapshot {
    pub slot: FighterSlot,
    pub character: CharacterKey,
    pub health: f32,
    pub max_health: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub cooldowns: BTreeMap<SkillSlot, f32>,
    pub position: [f32; 3],
    pub is_dead: bool,
    pub statuses: BTreeMap<StatusKind, f32>,
    pub gravity_marks: u32,
}

/// The two fighter slots of a match.
#[derive(Clone, Debug, Default)]
pub struct Fighters {
    slots: [Option<Fighter>; 2],
}

impl Fighters {
    pub fn insert(&mut self, fighter: Fighter) {
        let index = fighter.slot.index();
        self.slots[index] = Some(fighter);
    }

    pub fn get(&self, slot: FighterSlot) -> Option<&Fighter> {
        self.slots[slot.index()].as_ref()
    }

    pub fn get_mut(&mut self, slot: FighterSlot) -> Option<&mut Fighter> {
        self.slots[slot.index()].as_mut()
    }

    /// The other fighter of the 1v1, if it exists.
    pub fn opponent(&self, slot: FighterSlot) -> Option<&Fighter> {
        self.get(slot.opponent())
    }

    /// Both fighters mutably, ordered as (slot, opponent).
    pub fn pair_mut(&mut self, slot: FighterSlot) -> (Option<&mut Fighter>, Option<&mut Fighter>) {
        let [one, two] = &mut self.slots;
        match slot {
            FighterSlot::One => (one.as_mut(), two.as_mut()),
            FighterSlot::Two => (two.as_mut(), one.as_mut()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fighter> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Fighter> {
        self.slots.iter_mut().flatten()
    }
}
