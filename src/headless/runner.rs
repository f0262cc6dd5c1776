//! Headless match execution
//!
//! Runs arena matches without any graphical output, suitable for automated testing.
//! The simulation always advances by a fixed step, so a seeded match is
//! reproducible regardless of how fast the host runs it.

use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::log::{info, warn, LogPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::combat::log::{CombatantMetadata, MatchMetadata};
use crate::play_match::components::{Controller, FighterSlot};
use crate::play_match::constants::HEADLESS_FIXED_STEP;
use crate::play_match::simulation::{MatchOutcome, Simulation};
use crate::play_match::utils::combatant_id;

use super::config::HeadlessMatchConfig;

/// Result of a completed headless match
///
/// This struct provides programmatic access to match results for testing and analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    /// True if the match hit `max_duration_secs` (reported as a draw)
    pub timed_out: bool,
    /// Total match duration in seconds
    pub match_time: f32,
    /// Per-fighter statistics, slot One first
    pub fighters: Vec<FighterResult>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

impl MatchResult {
    pub fn winner(&self) -> Option<FighterSlot> {
        match self.outcome {
            MatchOutcome::Winner(slot) => Some(slot),
            MatchOutcome::Draw => None,
        }
    }
}

/// Statistics for a single fighter after the match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterResult {
    pub slot: FighterSlot,
    /// Character name (e.g., "Ranger")
    pub character: String,
    pub ai_tier: Option<String>,
    pub max_health: f32,
    /// Health remaining at match end (0 if dead)
    pub final_health: f32,
    pub survived: bool,
    pub damage_dealt: f32,
    pub damage_taken: f32,
}

/// Build the simulation described by `config`.
pub fn prepare_simulation(config: &HeadlessMatchConfig) -> Result<Simulation, String> {
    config.validate()?;
    let match_config = config.to_match_config()?;
    let kits = config.load_kits()?;
    match config.random_seed {
        Some(seed) => info!("Using deterministic RNG with seed: {}", seed),
        None => info!("Using non-deterministic RNG (no seed provided)"),
    }
    Simulation::from_config(&match_config, kits, config.random_seed)
}

/// Advance one fixed step. Returns true once the match is over, declaring a
/// draw when `max_duration` has elapsed without a winner.
pub fn step_match(sim: &mut Simulation, max_duration: f32) -> bool {
    if sim.outcome().is_some() {
        return true;
    }
    sim.tick(HEADLESS_FIXED_STEP);
    if sim.outcome().is_none() && sim.match_time() >= max_duration {
        info!("Match timed out after {:.1}s - declaring DRAW", sim.match_time());
        sim.finish(MatchOutcome::Draw);
    }
    sim.outcome().is_some()
}

/// Run a match to completion without Bevy and return the result.
pub fn simulate(config: &HeadlessMatchConfig) -> Result<MatchResult, String> {
    let mut sim = prepare_simulation(config)?;
    while !step_match(&mut sim, config.max_duration_secs) {}
    Ok(build_match_result(&sim, config.max_duration_secs))
}

/// Build the MatchResult from current fighter state
pub fn build_match_result(sim: &Simulation, max_duration: f32) -> MatchResult {
    let fighters = FighterSlot::ALL
        .iter()
        .filter_map(|slot| sim.fighter(*slot))
        .map(|fighter| FighterResult {
            slot: fighter.slot,
            character: fighter.character.name().to_string(),
            ai_tier: tier_name(fighter.controller),
            max_health: fighter.max_health,
            final_health: fighter.health,
            survived: fighter.is_alive(),
            damage_dealt: fighter.damage_dealt,
            damage_taken: fighter.damage_taken,
        })
        .collect();

    let outcome = sim.outcome().unwrap_or(MatchOutcome::Draw);
    let everyone_alive = FighterSlot::ALL
        .iter()
        .all(|slot| sim.fighter(*slot).is_some_and(|f| f.is_alive()));

    MatchResult {
        outcome,
        timed_out: outcome == MatchOutcome::Draw && everyone_alive && sim.match_time() >= max_duration,
        match_time: sim.match_time(),
        fighters,
        random_seed: sim.seed(),
    }
}

fn tier_name(controller: Controller) -> Option<String> {
    match controller {
        Controller::Ai(tier) => Some(tier.name().to_string()),
        Controller::Local | Controller::Remote => None,
    }
}

/// Save the combat log to a file
pub fn save_match_log(sim: &Simulation, output_path: Option<&str>) -> Result<String, String> {
    let combatants = FighterSlot::ALL
        .iter()
        .filter_map(|slot| sim.fighter(*slot))
        .map(|fighter| CombatantMetadata {
            id: combatant_id(fighter.slot, fighter.character),
            character: fighter.character.name().to_string(),
            ai_tier: tier_name(fighter.controller),
            max_health: fighter.max_health,
            final_health: fighter.health,
            max_energy: fighter.max_energy,
            final_energy: fighter.energy,
            damage_dealt: fighter.damage_dealt,
            damage_taken: fighter.damage_taken,
            final_position: (fighter.position.x, fighter.position.y, fighter.position.z),
        })
        .collect();

    let winner = match sim.outcome() {
        Some(MatchOutcome::Winner(slot)) => Some(format!("P{}", slot.number())),
        _ => None,
    };

    let metadata = MatchMetadata {
        arena_name: sim.map().name().to_string(),
        game_mode: sim.mode().name().to_string(),
        winner,
        match_time: sim.match_time(),
        random_seed: sim.seed(),
        combatants,
    };

    sim.log().save_to_file(&metadata, output_path)
}

/// Resource to track headless match state
#[derive(Resource)]
pub struct HeadlessMatchState {
    pub simulation: Simulation,
    /// Maximum match duration before declaring a draw
    pub max_duration: f32,
    /// Custom output path for match log
    pub output_path: Option<String>,
    /// Whether the match has completed
    pub match_complete: bool,
    /// Match result (populated when match completes)
    pub result: Option<MatchResult>,
}

/// Plugin for headless match execution
pub struct HeadlessPlugin {
    pub config: HeadlessMatchConfig,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let simulation = match prepare_simulation(&self.config) {
            Ok(simulation) => simulation,
            Err(e) => {
                // Reported by run_headless_match before the app is built
                warn!("Invalid match configuration: {}", e);
                return;
            }
        };

        app.insert_resource(HeadlessMatchState {
            simulation,
            max_duration: self.config.max_duration_secs,
            output_path: self.config.output_path.clone(),
            match_complete: false,
            result: None,
        })
        .add_systems(Update, headless_step_match)
        .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

/// Advance the match one fixed step and finish it up when it ends.
fn headless_step_match(mut state: ResMut<HeadlessMatchState>) {
    if state.match_complete {
        return;
    }
    let max_duration = state.max_duration;
    if !step_match(&mut state.simulation, max_duration) {
        return;
    }

    let result = build_match_result(&state.simulation, max_duration);
    match save_match_log(&state.simulation, state.output_path.as_deref()) {
        Ok(filename) => println!("Match complete. Log saved to: {}", filename),
        Err(e) => eprintln!("Failed to save combat log: {}", e),
    }
    print_summary(&result);
    state.simulation.teardown();
    state.result = Some(result);
    state.match_complete = true;
}

fn print_summary(result: &MatchResult) {
    match result.outcome {
        MatchOutcome::Winner(slot) => println!("Winner: P{} after {:.1}s", slot.number(), result.match_time),
        MatchOutcome::Draw if result.timed_out => println!("Draw (timeout at {:.1}s)", result.match_time),
        MatchOutcome::Draw => println!("Draw after {:.1}s", result.match_time),
    }
    for fighter in &result.fighters {
        println!(
            "  P{} {:<12} hp {:>5.1}/{:<5.1} dealt {:>6.1} taken {:>6.1}",
            fighter.slot.number(),
            fighter.character,
            fighter.final_health,
            fighter.max_health,
            fighter.damage_dealt,
            fighter.damage_taken
        );
    }
}

/// Exit the app when the match is complete
fn headless_exit_on_complete(
    state: Option<Res<HeadlessMatchState>>,
    mut exit: EventWriter<AppExit>,
) {
    match state {
        Some(state) if !state.match_complete => {}
        _ => {
            exit.send(AppExit::Success);
        }
    }
}

/// Run a headless match with the given configuration
pub fn run_headless_match(config: HeadlessMatchConfig) -> Result<(), String> {
    config.validate()?;
    // Surface kit errors here rather than inside the plugin
    config.load_kits()?;

    println!("Starting headless match simulation...");
    println!("  {} vs {}", config.fighter1, config.fighter2);
    println!("  Map: {}  Mode: {}", config.map, config.mode);
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    App::new()
        // Minimal plugins - no window, no rendering. Steps are fixed, so there
        // is no reason to wait between frames.
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)))
        .add_plugins(LogPlugin::default())
        .add_plugins(HeadlessPlugin { config })
        .run();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play_match::match_config::CharacterKey;

    #[test]
    fn test_timeout_is_a_draw() {
        let mut config = HeadlessMatchConfig::new(CharacterKey::Ranger, CharacterKey::Vanguard);
        config.tiers = vec!["Local".to_string(), "Local".to_string()];
        config.max_duration_secs = 1.0;
        config.random_seed = Some(5);
        let result = simulate(&config).unwrap();
        assert_eq!(result.outcome, MatchOutcome::Draw);
        assert!(result.timed_out);
        assert!(result.match_time >= 1.0);
        assert_eq!(result.fighters.len(), 2);
    }
}
