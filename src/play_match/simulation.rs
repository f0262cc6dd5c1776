//! Simulation Loop
//!
//! Owns everything a match needs and advances it one `tick(dt)` at a time:
//!
//! 1. Clamp `dt`, advance the match clock
//! 2. Run reflex dodges whose reaction latency has elapsed
//! 3. Input resolution per fighter (local input, AI brain, or remote lerp)
//! 4. Per-fighter integration (`combat_core::advance_fighter`), then sweep
//! 5. One pass over the transient effects, then sweep
//! 6. Outcome arbitration, once, after both fighters and all effects moved
//!
//! The single-threaded tick is the only writer of gameplay state. The network
//! path goes through [`Simulation::apply_network_state`] and
//! [`Simulation::on_skill_event_received`].

use bevy::log::{debug, info, warn};
use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::combat::events::{
    EffectSink, InputSource, NetworkReport, NetworkSink, NullInput, NullNetwork, NullSink,
    RemoteState,
};
use crate::combat::log::{CombatLog, CombatLogEventType};
use super::abilities::SkillSlot;
use super::ability_config::KitDefinitions;
use super::class_ai::Situation;
use super::combat_ai::{self, AiBrain, AiTier};
use super::combat_core::{self, CombatCtx};
use super::components::{
    Controller, Fighter, FighterSlot, FighterSnapshot, Fighters, GameRng, LifeState,
};
use super::constants::*;
use super::effects::{self, EffectRegistry};
use super::match_config::{ArenaMap, CharacterKey, GameMode, MatchConfig};
use super::physics::{flat_direction, Arena};
use super::skills::{self, SkillPayment};
use super::utils::combatant_id;

/// How a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(FighterSlot),
    /// Both fighters died on the same tick (or the match timed out)
    Draw,
}

/// A reflex dodge waiting out its reaction latency.
#[derive(Clone, Copy, Debug)]
struct ScheduledDodge {
    slot: FighterSlot,
    due_at: f32,
    direction: Vec3,
    /// Fighter generation at scheduling time; a death in between voids it
    generation: u32,
}

/// One 1v1 match.
pub struct Simulation {
    map: ArenaMap,
    arena: Arena,
    kits: KitDefinitions,
    mode: GameMode,
    fighters: Fighters,
    brains: [Option<AiBrain>; 2],
    effects: EffectRegistry,
    scheduled: Vec<ScheduledDodge>,
    log: CombatLog,
    rng: GameRng,
    sink: Box<dyn EffectSink>,
    input: Box<dyn InputSource>,
    network: Box<dyn NetworkSink>,
    match_time: f32,
    outcome: Option<MatchOutcome>,
    torn_down: bool,
}

impl Simulation {
    /// A match on `map` with no fighters yet. Without a seed the RNG is
    /// seeded from entropy.
    pub fn new(map: ArenaMap, kits: KitDefinitions, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => GameRng::from_seed(seed),
            None => GameRng::from_entropy(),
        };
        let mut log = CombatLog::default();
        log.log(
            CombatLogEventType::MatchEvent,
            format!("Match started on {}", map.name()),
        );
        Self {
            map,
            arena: map.arena(),
            kits,
            mode: GameMode::Standard,
            fighters: Fighters::default(),
            brains: [None, None],
            effects: EffectRegistry::new(),
            scheduled: Vec::new(),
            log,
            rng,
            sink: Box::new(NullSink),
            input: Box::new(NullInput),
            network: Box::new(NullNetwork),
            match_time: 0.0,
            outcome: None,
            torn_down: false,
        }
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_sink(mut self, sink: impl EffectSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn with_network(mut self, network: impl NetworkSink + 'static) -> Self {
        self.network = Box::new(network);
        self
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Build a ready-to-tick match from a [`MatchConfig`].
    pub fn from_config(config: &MatchConfig, kits: KitDefinitions, seed: Option<u64>) -> Result<Self, String> {
        let mut sim = Simulation::new(config.map, kits, seed).with_mode(config.mode);
        for slot in FighterSlot::ALL {
            sim.create_fighter(slot, config.fighters[slot.index()], config.tiers[slot.index()])?;
        }
        Ok(sim)
    }

    /// Place a fighter at its side's spawn point. `ai_tier` of `None` means
    /// local human control.
    pub fn create_fighter(
        &mut self,
        slot: FighterSlot,
        key: CharacterKey,
        ai_tier: Option<AiTier>,
    ) -> Result<(), String> {
        let controller = match ai_tier {
            Some(tier) => Controller::Ai(tier),
            None => Controller::Local,
        };
        self.spawn(slot, key, controller)?;
        self.brains[slot.index()] = ai_tier.map(|tier| AiBrain::new(tier, key));
        Ok(())
    }

    /// Place a network-driven fighter. Its position follows
    /// [`Simulation::apply_network_state`].
    pub fn create_remote_fighter(&mut self, slot: FighterSlot, key: CharacterKey) -> Result<(), String> {
        self.spawn(slot, key, Controller::Remote)?;
        self.brains[slot.index()] = None;
        if let Some(fighter) = self.fighters.get_mut(slot) {
            fighter.remote_target = Some(fighter.position);
        }
        Ok(())
    }

    fn spawn(&mut self, slot: FighterSlot, key: CharacterKey, controller: Controller) -> Result<(), String> {
        let kit = self
            .kits
            .get(key)
            .cloned()
            .ok_or_else(|| format!("No kit defined for {}", key.name()))?;
        let spawn_x = ARENA_HALF_X - SPAWN_INSET;
        let (position, aim) = match slot {
            FighterSlot::One => (Vec3::new(-spawn_x, 0.0, 0.0), Vec3::X),
            FighterSlot::Two => (Vec3::new(spawn_x, 0.0, 0.0), Vec3::NEG_X),
        };

        let fighter = Fighter::new(slot, key, kit, controller, self.arena.clamp(position), aim);
        let id = combatant_id(slot, key);
        let tier = match controller {
            Controller::Ai(tier) => tier.name(),
            Controller::Local => "local",
            Controller::Remote => "remote",
        };
        self.log.log(
            CombatLogEventType::MatchEvent,
            format!("{} enters the arena ({})", id, tier),
        );
        info!("Spawned {} ({}) at {:?}", id, tier, fighter.position);
        self.fighters.insert(fighter);
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn snapshot(&self, slot: FighterSlot) -> Option<FighterSnapshot> {
        self.fighters.get(slot).map(Fighter::snapshot)
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn fighter(&self, slot: FighterSlot) -> Option<&Fighter> {
        self.fighters.get(slot)
    }

    /// Direct access for scenario setup and tests.
    pub fn fighter_mut(&mut self, slot: FighterSlot) -> Option<&mut Fighter> {
        self.fighters.get_mut(slot)
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn match_time(&self) -> f32 {
        self.match_time
    }

    pub fn map(&self) -> ArenaMap {
        self.map
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed
    }

    pub fn brain(&self, slot: FighterSlot) -> Option<&AiBrain> {
        self.brains[slot.index()].as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the match by `dt` seconds. Non-finite or negative deltas count
    /// as zero; large ones are clamped to `MAX_TICK_DELTA`.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_TICK_DELTA)
        } else {
            0.0
        };
        if self.outcome.is_some() || self.torn_down {
            return;
        }

        self.match_time += dt;
        self.log.match_time = self.match_time;

        self.run_scheduled_dodges();

        for slot in FighterSlot::ALL {
            let controller = match self.fighters.get(slot) {
                Some(fighter) if fighter.is_alive() => fighter.controller,
                _ => continue,
            };
            match controller {
                Controller::Local => self.drive_local(slot),
                Controller::Ai(_) => self.drive_ai(slot, dt),
                Controller::Remote => self.drive_remote(slot, dt),
            }
        }

        self.with_ctx(|ctx| {
            for slot in FighterSlot::ALL {
                combat_core::advance_fighter(ctx, slot, dt);
            }
        });

        if dt > 0.0 {
            self.update_effects(dt);
        }

        self.check_outcome();
    }

    /// Build a combat context over the read-only live list, run `f`, then
    /// commit whatever it spawned or destroyed.
    fn with_ctx<R>(&mut self, f: impl FnOnce(&mut CombatCtx) -> R) -> R {
        let (live, spawner) = self.effects.split();
        let mut ctx = CombatCtx {
            fighters: &mut self.fighters,
            spawner,
            live,
            arena: &self.arena,
            log: &mut self.log,
            sink: &mut *self.sink,
            rng: &mut self.rng,
            match_time: self.match_time,
            mode: self.mode,
        };
        let result = f(&mut ctx);
        self.effects.commit();
        result
    }

    fn update_effects(&mut self, dt: f32) {
        let (live, spawner) = self.effects.split_mut();
        let mut ctx = CombatCtx {
            fighters: &mut self.fighters,
            spawner,
            live: &[],
            arena: &self.arena,
            log: &mut self.log,
            sink: &mut *self.sink,
            rng: &mut self.rng,
            match_time: self.match_time,
            mode: self.mode,
        };
        effects::update_effects(live, &mut ctx, dt);
        self.effects.commit();
    }

    fn drive_local(&mut self, slot: FighterSlot) {
        let intent = self.input.query_input_intent(slot);
        let opponent = self
            .fighters
            .opponent(slot)
            .filter(|o| o.is_alive())
            .map(|o| o.position);

        if let Some(fighter) = self.fighters.get_mut(slot) {
            if fighter.has_control() && fighter.charge.is_none() {
                let direction = Vec3::new(intent.move_vector.x, 0.0, intent.move_vector.z)
                    .normalize_or_zero();
                fighter.velocity = direction * fighter.effective_speed();
            }
            if let Some(target) = opponent {
                let bearing = flat_direction(fighter.position, target);
                if bearing != Vec3::ZERO {
                    fighter.aim = bearing;
                }
            }
        }

        for skill in intent.wants_skill {
            self.request_skill(slot, skill, SkillPayment::Local);
        }
    }

    fn drive_ai(&mut self, slot: FighterSlot, dt: f32) {
        let Some(fighter) = self.fighters.get(slot) else {
            return;
        };
        let live = self.effects.live();
        let threats = combat_ai::scan_threats(fighter, live);
        let situation = Situation::build(
            fighter,
            self.fighters.opponent(slot),
            live,
            &self.arena,
            threats,
            self.match_time,
        );

        let (Some(brain), Some(fighter)) =
            (self.brains[slot.index()].as_mut(), self.fighters.get_mut(slot))
        else {
            return;
        };
        let intent = combat_ai::think(brain, fighter, &situation, &self.arena, dt, &mut self.rng);
        let generation = fighter.generation;

        if let Some(dodge) = intent.dodge {
            if dodge.delay <= 0.0 {
                self.with_ctx(|ctx| combat_ai::execute_dodge(ctx, slot, dodge.direction));
            } else {
                self.scheduled.push(ScheduledDodge {
                    slot,
                    due_at: self.match_time + dodge.delay,
                    direction: dodge.direction,
                    generation,
                });
            }
        }

        if let Some(skill) = intent.skill {
            let cast = self.request_skill(slot, skill, SkillPayment::Local);
            debug!("{:?} AI picked {:?} (cast: {})", slot, skill, cast);
        }
    }

    fn drive_remote(&mut self, slot: FighterSlot, dt: f32) {
        let Some(fighter) = self.fighters.get_mut(slot) else {
            return;
        };
        if let Some(target) = fighter.remote_target {
            let blend = (REMOTE_LERP_RATE * dt).min(1.0);
            fighter.position = fighter.position.lerp(target, blend);
        }
    }

    /// Fire every dodge whose latency has elapsed, if its fighter is still
    /// the same life.
    fn run_scheduled_dodges(&mut self) {
        if self.scheduled.is_empty() {
            return;
        }
        let now = self.match_time;
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.scheduled.drain(..).partition(|d| d.due_at <= now);
        self.scheduled = waiting;

        for dodge in due {
            let valid = self
                .fighters
                .get(dodge.slot)
                .is_some_and(|f| f.is_alive() && f.generation == dodge.generation);
            if !valid {
                debug!("Dropped stale dodge for {:?}", dodge.slot);
                continue;
            }
            self.with_ctx(|ctx| combat_ai::execute_dodge(ctx, dodge.slot, dodge.direction));
        }
    }

    /// Decide the outcome once both fighters have moved this tick.
    fn check_outcome(&mut self) {
        let (Some(one), Some(two)) = (
            self.fighters.get(FighterSlot::One),
            self.fighters.get(FighterSlot::Two),
        ) else {
            return;
        };
        let outcome = match (one.is_alive(), two.is_alive()) {
            (true, true) => return,
            (false, false) => MatchOutcome::Draw,
            (true, false) => MatchOutcome::Winner(FighterSlot::One),
            (false, true) => MatchOutcome::Winner(FighterSlot::Two),
        };
        self.finish(outcome);
    }

    /// End the match with `outcome`. Later calls are ignored.
    pub fn finish(&mut self, outcome: MatchOutcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.scheduled.clear();
        let message = match outcome {
            MatchOutcome::Winner(slot) => {
                let id = self
                    .fighters
                    .get(slot)
                    .map(|f| combatant_id(f.slot, f.character))
                    .unwrap_or_else(|| format!("P{}", slot.number()));
                format!("Match ended: {} wins", id)
            }
            MatchOutcome::Draw => "Match ended in a draw".to_string(),
        };
        self.log.log(CombatLogEventType::MatchEvent, message.clone());
        info!("{} after {:.2}s", message, self.match_time);
    }

    // ========================================================================
    // Skills & network boundary
    // ========================================================================

    /// Entry point for skill invocation. `SkillPayment::Remote` skips the cost
    /// and cooldown (already paid by the remote caller).
    ///
    /// A locally-paid skill of a locally-controlled fighter is echoed to the
    /// network sink.
    pub fn request_skill(&mut self, slot: FighterSlot, skill: SkillSlot, payment: SkillPayment) -> bool {
        if self.outcome.is_some() || self.torn_down {
            return false;
        }
        let cast = self.with_ctx(|ctx| skills::request_skill(ctx, slot, skill, payment));
        let local = self
            .fighters
            .get(slot)
            .is_some_and(|f| f.controller == Controller::Local);
        if cast && local && payment == SkillPayment::Local {
            self.network.send_skill_event(slot, skill);
        }
        cast
    }

    /// Inbound remote skill event. Applied like a local cast without paying
    /// and never echoed.
    pub fn on_skill_event_received(&mut self, slot: FighterSlot, key: &str) -> bool {
        let Some(skill) = SkillSlot::from_key(key) else {
            warn!("Ignoring remote skill event with unknown key {:?}", key);
            return false;
        };
        if self.outcome.is_some() || self.torn_down {
            return false;
        }
        self.with_ctx(|ctx| skills::request_skill(ctx, slot, skill, SkillPayment::Remote))
    }

    /// Validated setter for a remote fighter's synced state. Health is only
    /// ever lowered; reaching zero kills the fighter.
    pub fn apply_network_state(&mut self, slot: FighterSlot, state: RemoteState) -> bool {
        let finite = state.position.is_finite() && state.health.is_finite() && state.energy.is_finite();
        if !finite {
            warn!("Rejected non-finite network state for {:?}: {:?}", slot, state);
            return false;
        }
        let target = self.arena.clamp(state.position);
        let Some(fighter) = self.fighters.get_mut(slot) else {
            return false;
        };
        if fighter.controller != Controller::Remote || !fighter.is_alive() {
            return false;
        }

        fighter.remote_target = Some(target);
        fighter.energy = state.energy.clamp(0.0, fighter.max_energy);
        if state.health < fighter.health {
            fighter.health = state.health.max(0.0);
        }
        if fighter.health <= 0.0 {
            self.with_ctx(|ctx| combat_core::die(ctx, slot));
            self.check_outcome();
        }
        true
    }

    /// Outbound state for the network collaborator.
    pub fn network_report(&self, slot: FighterSlot) -> Option<NetworkReport> {
        self.fighters.get(slot).map(|f| NetworkReport {
            position: f.position,
            health: f.health,
            energy: f.energy,
        })
    }

    /// Clamped heal. Returns the amount restored.
    pub fn heal(&mut self, slot: FighterSlot, amount: f32) -> f32 {
        if self.torn_down || !amount.is_finite() {
            return 0.0;
        }
        self.with_ctx(|ctx| combat_core::heal(ctx, slot, amount.max(0.0), "Heal"))
    }

    /// Release everything. Fighters move to CleanedUp and the simulation
    /// ignores further ticks.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.scheduled.clear();
        self.effects.destroy_all();
        for fighter in self.fighters.iter_mut() {
            fighter.life = LifeState::CleanedUp;
            fighter.velocity = Vec3::ZERO;
            fighter.charge = None;
            self.sink.release_attachments(fighter.slot);
        }
        self.brains = [None, None];
        info!("Match torn down at {:.2}s", self.match_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::events::{InputIntent, RecordingNetwork, ScriptedInput};
    use crate::play_match::components::StatusKind;
    use crate::play_match::projectiles::{self, Projectile, ProjectilePayload};

    fn duel(one: CharacterKey, two: CharacterKey) -> Simulation {
        let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(7));
        sim.create_fighter(FighterSlot::One, one, None).unwrap();
        sim.create_fighter(FighterSlot::Two, two, None).unwrap();
        sim
    }

    #[test]
    fn test_spawn_points_face_each_other() {
        let sim = duel(CharacterKey::Ranger, CharacterKey::Vanguard);
        let one = sim.fighter(FighterSlot::One).unwrap();
        let two = sim.fighter(FighterSlot::Two).unwrap();
        assert_eq!(one.position.x, -two.position.x);
        assert!(one.aim.dot(two.aim) < -0.99);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut sim = duel(CharacterKey::Ranger, CharacterKey::Vanguard);
        sim.tick(5.0);
        assert!((sim.match_time() - MAX_TICK_DELTA).abs() < 1e-6);
        sim.tick(f32::NAN);
        assert!((sim.match_time() - MAX_TICK_DELTA).abs() < 1e-6);
    }

    #[test]
    fn test_network_health_only_goes_down() {
        let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(1));
        sim.create_fighter(FighterSlot::One, CharacterKey::Ranger, None).unwrap();
        sim.create_remote_fighter(FighterSlot::Two, CharacterKey::Duelist).unwrap();

        let state = RemoteState {
            position: Vec3::new(5.0, 0.0, 0.0),
            health: 60.0,
            energy: 50.0,
        };
        assert!(sim.apply_network_state(FighterSlot::Two, state));
        assert_eq!(sim.fighter(FighterSlot::Two).unwrap().health, 60.0);

        let stale = RemoteState { health: 90.0, ..state };
        assert!(sim.apply_network_state(FighterSlot::Two, stale));
        assert_eq!(sim.fighter(FighterSlot::Two).unwrap().health, 60.0);

        let dead = RemoteState { health: 0.0, ..state };
        sim.apply_network_state(FighterSlot::Two, dead);
        assert!(!sim.fighter(FighterSlot::Two).unwrap().is_alive());
        assert_eq!(sim.outcome(), Some(MatchOutcome::Winner(FighterSlot::One)));
    }

    #[test]
    fn test_network_state_rejects_nan_and_local_fighters() {
        let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(1));
        sim.create_fighter(FighterSlot::One, CharacterKey::Ranger, None).unwrap();
        sim.create_remote_fighter(FighterSlot::Two, CharacterKey::Duelist).unwrap();
        let bad = RemoteState {
            position: Vec3::new(f32::NAN, 0.0, 0.0),
            health: 10.0,
            energy: 10.0,
        };
        assert!(!sim.apply_network_state(FighterSlot::Two, bad));
        let local = RemoteState {
            position: Vec3::ZERO,
            health: 10.0,
            energy: 10.0,
        };
        assert!(!sim.apply_network_state(FighterSlot::One, local));
        assert_eq!(sim.fighter(FighterSlot::One).unwrap().health, 100.0);
    }

    #[test]
    fn test_local_cast_echoes_and_remote_cast_does_not() {
        let network = RecordingNetwork::new();
        let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(1))
            .with_network(network.clone());
        sim.create_fighter(FighterSlot::One, CharacterKey::Ranger, None).unwrap();
        sim.create_remote_fighter(FighterSlot::Two, CharacterKey::Ranger).unwrap();

        assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));
        assert!(sim.on_skill_event_received(FighterSlot::Two, "q"));
        assert!(!sim.on_skill_event_received(FighterSlot::Two, "z"));
        assert_eq!(network.sent(), vec![(FighterSlot::One, SkillSlot::Q)]);
    }

    #[test]
    fn test_scripted_input_moves_at_speed() {
        let mut input = ScriptedInput::new();
        input.push(
            FighterSlot::One,
            InputIntent {
                move_vector: Vec3::new(0.0, 0.0, 3.0),
                ..Default::default()
            },
        );
        let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(1))
            .with_input(input);
        sim.create_fighter(FighterSlot::One, CharacterKey::Ranger, None).unwrap();
        sim.create_fighter(FighterSlot::Two, CharacterKey::Vanguard, None).unwrap();
        sim.tick(0.1);
        let ranger = sim.fighter(FighterSlot::One).unwrap();
        let expected = ranger.kit.move_speed * 0.1;
        assert!((ranger.position.z - expected).abs() < 1e-4);
    }

    #[test]
    fn test_stale_dodge_is_dropped_after_death() {
        let mut sim = duel(CharacterKey::Ranger, CharacterKey::Vanguard);
        let generation = sim.fighter(FighterSlot::One).unwrap().generation;
        sim.scheduled.push(ScheduledDodge {
            slot: FighterSlot::One,
            due_at: 0.05,
            direction: Vec3::Z,
            generation,
        });
        sim.with_ctx(|ctx| combat_core::die(ctx, FighterSlot::One));
        let position = sim.fighter(FighterSlot::One).unwrap().position;
        sim.tick(0.1);
        assert_eq!(sim.fighter(FighterSlot::One).unwrap().position, position);
        assert!(sim.scheduled.is_empty());
    }

    #[test]
    fn test_delayed_dodge_waits_for_reaction_latency() {
        let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(7));
        sim.create_fighter(FighterSlot::One, CharacterKey::Ranger, None).unwrap();
        sim.create_fighter(FighterSlot::Two, CharacterKey::Vanguard, Some(AiTier::Elite))
            .unwrap();
        let brain = sim.brains[FighterSlot::Two.index()].as_mut().unwrap();
        brain.config.dodge_probability = 1.0;
        let latency = brain.config.reaction_latency;
        assert!(latency > 0.0);
        sim.fighter_mut(FighterSlot::Two).unwrap().position = Vec3::new(-8.0, 0.0, 0.0);
        assert!(sim.request_skill(FighterSlot::One, SkillSlot::Basic, SkillPayment::Local));

        sim.tick(0.1);
        assert_eq!(sim.scheduled.len(), 1);
        let direction = sim.scheduled[0].direction;
        let due_at = sim.scheduled[0].due_at;
        assert!((due_at - (sim.match_time() + latency)).abs() < 1e-6);

        while !sim.scheduled.is_empty() {
            assert!(sim.match_time() < due_at);
            assert_eq!(sim.fighter(FighterSlot::Two).unwrap().velocity, Vec3::ZERO);
            sim.tick(0.05);
        }
        assert!(sim.match_time() >= due_at);
        assert!(sim.match_time() < due_at + 0.05 + 1e-6);

        let vanguard = sim.fighter(FighterSlot::Two).unwrap();
        let expected = direction
            * vanguard.effective_speed()
            * DODGE_SPEED_BOOST
            * VELOCITY_DECAY.powf(0.05);
        assert!(
            (vanguard.velocity - expected).length() < 1e-4,
            "expected {:?}, got {:?}",
            expected,
            vanguard.velocity
        );
    }

    #[test]
    fn test_delayed_dodge_skipped_while_rooted() {
        let mut sim = duel(CharacterKey::Ranger, CharacterKey::Vanguard);
        let ranger = sim.fighter_mut(FighterSlot::One).unwrap();
        ranger.statuses.apply(StatusKind::Root, 1.0, 0.0);
        let generation = ranger.generation;
        sim.scheduled.push(ScheduledDodge {
            slot: FighterSlot::One,
            due_at: 0.05,
            direction: Vec3::Z,
            generation,
        });

        sim.tick(0.1);
        assert!(sim.scheduled.is_empty());
        assert_eq!(sim.fighter(FighterSlot::One).unwrap().cooldown(SkillSlot::E), 0.0);
    }

    #[test]
    fn test_expiring_projectile_sweeps_its_last_segment() {
        let mut sim = duel(CharacterKey::Ranger, CharacterKey::Vanguard);
        let origin = sim.fighter(FighterSlot::One).unwrap().position;
        let projectile = Projectile::new(Vec3::X * 20.0, 7.0, ProjectilePayload::Plain, "Arrow");
        projectiles::fire(sim.effects.spawner(), FighterSlot::One, origin, projectile, 4.0);
        sim.effects.commit();
        let start = sim.effects().live()[0].position;
        sim.fighter_mut(FighterSlot::Two).unwrap().position = start + Vec3::new(3.0, 0.0, 0.0);

        sim.tick(0.1);
        assert_eq!(sim.fighter(FighterSlot::Two).unwrap().health, 100.0);
        sim.tick(0.1);
        assert_eq!(sim.fighter(FighterSlot::Two).unwrap().health, 93.0);
        assert!(sim
            .effects()
            .live()
            .iter()
            .all(|e| e.as_projectile().is_none()));
    }

    #[test]
    fn test_teardown_stops_the_match() {
        let mut sim = duel(CharacterKey::Engineer, CharacterKey::Vanguard);
        assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));
        assert!(!sim.effects().live().is_empty());
        sim.teardown();
        assert!(sim.effects().live().is_empty());
        assert_eq!(sim.fighter(FighterSlot::One).unwrap().life, LifeState::CleanedUp);
        let time = sim.match_time();
        sim.tick(0.1);
        assert_eq!(sim.match_time(), time);
        assert!(!sim.request_skill(FighterSlot::Two, SkillSlot::Basic, SkillPayment::Local));
    }

    #[test]
    fn test_silence_gates_skills_through_simulation() {
        let mut sim = duel(CharacterKey::Ranger, CharacterKey::Vanguard);
        sim.fighter_mut(FighterSlot::One)
            .unwrap()
            .statuses
            .apply(StatusKind::Silence, 2.0, 0.0);
        assert!(!sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));
        assert!(sim.request_skill(FighterSlot::One, SkillSlot::Basic, SkillPayment::Local));
    }
}
