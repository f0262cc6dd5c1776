//! Integration tests for the tick loop, the effect registry and match outcome
//!
//! These tests verify that:
//! - Simultaneous deaths end the match as a draw
//! - A projectile that hits is removed and never hits again
//! - Static geometry stops projectiles
//! - Health stays within bounds for a whole AI match
//! - Teardown leaves nothing behind

use arenaduel::combat::events::{RecordingNetwork, RemoteState};
use arenaduel::combat::log::CombatLogEventType;
use arenaduel::play_match::components::StatusKind;
use arenaduel::play_match::effects::EffectKind;
use arenaduel::play_match::{
    AiTier, ArenaMap, CharacterKey, FighterSlot, KitDefinitions, MatchOutcome, SkillPayment,
    SkillSlot, Simulation,
};
use bevy::math::Vec3;

fn local_duel(map: ArenaMap, one: CharacterKey, two: CharacterKey) -> Simulation {
    let mut sim = Simulation::new(map, KitDefinitions::default(), Some(7));
    sim.create_fighter(FighterSlot::One, one, None).unwrap();
    sim.create_fighter(FighterSlot::Two, two, None).unwrap();
    sim
}

fn projectile_count(sim: &Simulation) -> usize {
    sim.effects()
        .live()
        .iter()
        .filter(|e| matches!(e.kind, EffectKind::Projectile(_)))
        .count()
}

#[test]
fn test_simultaneous_death_is_a_draw() {
    let mut sim = local_duel(ArenaMap::BasicArena, CharacterKey::Duelist, CharacterKey::Duelist);
    for slot in FighterSlot::ALL {
        let fighter = sim.fighter_mut(slot).unwrap();
        fighter.health = 5.0;
        fighter.statuses.apply(StatusKind::Venom, 2.0, 10.0);
    }

    for _ in 0..10 {
        sim.tick(0.1);
    }

    assert_eq!(sim.outcome(), Some(MatchOutcome::Draw));
    assert_eq!(sim.log().deaths_of("P1 Duelist"), 1);
    assert_eq!(sim.log().deaths_of("P2 Duelist"), 1);
    let ended: Vec<_> = sim
        .log()
        .filter_by_type(CombatLogEventType::MatchEvent)
        .into_iter()
        .filter(|e| e.message.starts_with("Match ended"))
        .collect();
    assert_eq!(ended.len(), 1);
}

#[test]
fn test_projectile_hits_exactly_once() {
    let mut sim = local_duel(ArenaMap::BasicArena, CharacterKey::Ranger, CharacterKey::Vanguard);
    sim.fighter_mut(FighterSlot::Two).unwrap().position = Vec3::new(-8.0, 0.0, 0.0);

    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Basic, SkillPayment::Local));
    sim.tick(0.0);
    assert_eq!(projectile_count(&sim), 1);

    for _ in 0..20 {
        sim.tick(0.1);
    }

    assert_eq!(sim.fighter(FighterSlot::Two).unwrap().health, 93.0);
    assert_eq!(projectile_count(&sim), 0);
    let hits = sim
        .log()
        .filter_by_type(CombatLogEventType::Damage)
        .into_iter()
        .filter(|e| e.ability.as_deref() == Some("Arrow"))
        .count();
    assert_eq!(hits, 1);
}

#[test]
fn test_pillar_stops_projectile() {
    let mut sim = local_duel(ArenaMap::PillaredArena, CharacterKey::Ranger, CharacterKey::Vanguard);
    {
        let ranger = sim.fighter_mut(FighterSlot::One).unwrap();
        ranger.position = Vec3::new(4.0, 0.0, 8.0);
        ranger.aim = Vec3::X;
    }
    sim.fighter_mut(FighterSlot::Two).unwrap().position = Vec3::new(12.0, 0.0, 8.0);

    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Basic, SkillPayment::Local));
    for _ in 0..10 {
        sim.tick(0.1);
    }

    assert_eq!(sim.fighter(FighterSlot::Two).unwrap().health, 100.0);
    assert_eq!(projectile_count(&sim), 0);
}

#[test]
fn test_health_stays_in_range_for_a_full_match() {
    let mut sim = Simulation::new(ArenaMap::PillaredArena, KitDefinitions::default(), Some(2024));
    sim.create_fighter(FighterSlot::One, CharacterKey::Engineer, Some(AiTier::Veteran))
        .unwrap();
    sim.create_fighter(FighterSlot::Two, CharacterKey::Voidcaller, Some(AiTier::Elite))
        .unwrap();

    for _ in 0..3600 {
        sim.tick(1.0 / 60.0);
        for slot in FighterSlot::ALL {
            let fighter = sim.fighter(slot).unwrap();
            assert!(fighter.health >= 0.0 && fighter.health <= fighter.max_health);
            assert!(fighter.energy >= 0.0 && fighter.energy <= fighter.max_energy);
            assert!(fighter.position.is_finite());
            assert_eq!(fighter.is_alive(), fighter.health > 0.0);
        }
        if sim.outcome().is_some() {
            break;
        }
    }
}

#[test]
fn test_ticks_after_the_end_change_nothing() {
    let mut sim = local_duel(ArenaMap::BasicArena, CharacterKey::Ranger, CharacterKey::Vanguard);
    sim.fighter_mut(FighterSlot::Two).unwrap().health = 10.0;
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));
    sim.tick(0.1);
    assert_eq!(sim.outcome(), Some(MatchOutcome::Winner(FighterSlot::One)));

    let time = sim.match_time();
    let entries = sim.log().entries.len();
    sim.tick(0.1);
    assert_eq!(sim.match_time(), time);
    assert_eq!(sim.log().entries.len(), entries);
    assert!(!sim.request_skill(FighterSlot::One, SkillSlot::Basic, SkillPayment::Local));
}

#[test]
fn test_teardown_releases_effects() {
    let mut sim = local_duel(ArenaMap::BasicArena, CharacterKey::Engineer, CharacterKey::Ranger);
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Basic, SkillPayment::Local));
    assert!(sim.request_skill(FighterSlot::Two, SkillSlot::Basic, SkillPayment::Local));
    sim.tick(0.1);
    assert!(!sim.effects().live().is_empty());

    sim.teardown();
    assert!(sim.is_torn_down());
    assert!(sim.effects().live().is_empty());

    sim.tick(0.1);
    assert!(sim.effects().live().is_empty());
    assert_eq!(sim.heal(FighterSlot::One, 10.0), 0.0);
}

#[test]
fn test_remote_fighter_follows_network_state() {
    let network = RecordingNetwork::new();
    let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(1))
        .with_network(network.clone());
    sim.create_fighter(FighterSlot::One, CharacterKey::Ranger, None).unwrap();
    sim.create_remote_fighter(FighterSlot::Two, CharacterKey::Duelist).unwrap();

    let target = Vec3::new(10.0, 0.0, 4.0);
    assert!(sim.apply_network_state(
        FighterSlot::Two,
        RemoteState {
            position: target,
            health: 80.0,
            energy: 50.0,
        },
    ));
    for _ in 0..60 {
        sim.tick(0.1);
    }
    let duelist = sim.fighter(FighterSlot::Two).unwrap();
    assert!(duelist.position.distance(target) < 0.1);
    assert_eq!(duelist.health, 80.0);

    let report = sim.network_report(FighterSlot::Two).unwrap();
    assert_eq!(report.health, 80.0);
    assert_eq!(report.energy, duelist.energy);
    assert!(report.position.distance(target) < 0.1);

    // Local fighters are never overwritten by the network
    assert!(!sim.apply_network_state(
        FighterSlot::One,
        RemoteState {
            position: Vec3::ZERO,
            health: 1.0,
            energy: 0.0,
        },
    ));
    assert_eq!(sim.fighter(FighterSlot::One).unwrap().health, 100.0);

    // Local casts are echoed to the network
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));
    assert_eq!(network.sent(), vec![(FighterSlot::One, SkillSlot::Q)]);
}
