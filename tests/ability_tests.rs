//! Integration tests for skills and damage through the public simulation API
//!
//! These tests verify that:
//! - A skill hit deducts health, energy and starts the cooldown exactly
//! - Cooldowns decay linearly with simulated time
//! - Damage over time bypasses shields and kills exactly once
//! - Defensive layers and damage multipliers stack as documented

use arenaduel::combat::events::{PresentationEvent, RecordingSink, VisualKind};
use arenaduel::combat::log::CombatLogEventType;
use arenaduel::play_match::components::StatusKind;
use arenaduel::play_match::{
    ArenaMap, CharacterKey, FighterSlot, KitDefinitions, MatchOutcome, SkillPayment, SkillSlot,
    Simulation,
};
use bevy::math::Vec3;

/// Two locally-controlled fighters with no input: both stand still.
fn duel(one: CharacterKey, two: CharacterKey) -> Simulation {
    let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(42));
    sim.create_fighter(FighterSlot::One, one, None).unwrap();
    sim.create_fighter(FighterSlot::Two, two, None).unwrap();
    sim
}

fn health(sim: &Simulation, slot: FighterSlot) -> f32 {
    sim.fighter(slot).unwrap().health
}

#[test]
fn test_snipe_end_to_end() {
    let mut sim = duel(CharacterKey::Ranger, CharacterKey::Vanguard);

    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));

    let ranger = sim.fighter(FighterSlot::One).unwrap();
    assert_eq!(health(&sim, FighterSlot::Two), 75.0);
    assert_eq!(ranger.energy, ranger.max_energy - 25.0);
    assert_eq!(ranger.cooldown(SkillSlot::Q), 4.0);

    for _ in 0..10 {
        sim.tick(0.1);
    }
    let cooldown = sim.fighter(FighterSlot::One).unwrap().cooldown(SkillSlot::Q);
    assert!((cooldown - 3.0).abs() < 1e-4, "cooldown after 1s was {}", cooldown);

    for _ in 0..30 {
        sim.tick(0.1);
    }
    let cooldown = sim.fighter(FighterSlot::One).unwrap().cooldown(SkillSlot::Q);
    assert!(cooldown < 1e-4, "cooldown after 4s was {}", cooldown);
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));
    assert_eq!(health(&sim, FighterSlot::Two), 50.0);
}

#[test]
fn test_venom_ticks_through_shield() {
    let mut sim = duel(CharacterKey::Ranger, CharacterKey::Vanguard);
    {
        let vanguard = sim.fighter_mut(FighterSlot::Two).unwrap();
        vanguard.health = 15.0;
        vanguard.statuses.apply(StatusKind::Shielded, 5.0, 0.0);
        vanguard.statuses.apply(StatusKind::Venom, 1.0, 10.0);
    }

    let mut previous = 15.0;
    for _ in 0..10 {
        sim.tick(0.1);
        let now = health(&sim, FighterSlot::Two);
        assert!(now < previous, "venom should tick every step");
        previous = now;
    }
    assert!((previous - 5.0).abs() < 1e-3, "ended at {}", previous);
    assert!(sim.log().filter_by_type(CombatLogEventType::Blocked).is_empty());

    // Expired: no further ticks
    sim.tick(0.1);
    assert_eq!(health(&sim, FighterSlot::Two), previous);
}

#[test]
fn test_lethal_venom_kills_exactly_once() {
    let sink = RecordingSink::new();
    let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(42))
        .with_sink(sink.clone());
    sim.create_fighter(FighterSlot::One, CharacterKey::Ranger, None).unwrap();
    sim.create_fighter(FighterSlot::Two, CharacterKey::Vanguard, None).unwrap();
    {
        let vanguard = sim.fighter_mut(FighterSlot::Two).unwrap();
        vanguard.health = 5.0;
        vanguard.statuses.apply(StatusKind::Venom, 1.0, 10.0);
    }

    for _ in 0..20 {
        sim.tick(0.1);
    }

    let vanguard = sim.fighter(FighterSlot::Two).unwrap();
    assert!(!vanguard.is_alive());
    assert_eq!(vanguard.health, 0.0);
    assert_eq!(sim.log().deaths_of("P2 Vanguard"), 1);
    assert_eq!(sim.outcome(), Some(MatchOutcome::Winner(FighterSlot::One)));
    let bursts = sink.count(|e| {
        matches!(
            e,
            PresentationEvent::Visual {
                kind: VisualKind::DeathBurst,
                ..
            }
        )
    });
    assert_eq!(bursts, 1);
}

#[test]
fn test_dot_damage_is_visually_quiet() {
    let sink = RecordingSink::new();
    let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(42))
        .with_sink(sink.clone());
    sim.create_fighter(FighterSlot::One, CharacterKey::Ranger, None).unwrap();
    sim.create_fighter(FighterSlot::Two, CharacterKey::Vanguard, None).unwrap();
    sim.fighter_mut(FighterSlot::Two)
        .unwrap()
        .statuses
        .apply(StatusKind::Venom, 0.5, 10.0);

    for _ in 0..5 {
        sim.tick(0.1);
    }
    assert!(health(&sim, FighterSlot::Two) < 100.0);
    let numbers = sink.count(|e| {
        matches!(
            e,
            PresentationEvent::Visual {
                kind: VisualKind::DamageNumber { .. },
                ..
            }
        )
    });
    assert_eq!(numbers, 0);
    assert!(!sim.fighter(FighterSlot::Two).unwrap().visual.is_flashing());
}

#[test]
fn test_shield_wall_blocks_snipe() {
    let mut sim = duel(CharacterKey::Ranger, CharacterKey::Vanguard);
    assert!(sim.request_skill(FighterSlot::Two, SkillSlot::W, SkillPayment::Local));
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));
    assert_eq!(health(&sim, FighterSlot::Two), 100.0);
    assert_eq!(sim.log().filter_by_type(CombatLogEventType::Blocked).len(), 1);
}

#[test]
fn test_corrupted_and_empowered_multiply() {
    let mut sim = duel(CharacterKey::Ranger, CharacterKey::Vanguard);
    {
        let vanguard = sim.fighter_mut(FighterSlot::Two).unwrap();
        vanguard.statuses.apply(StatusKind::Corrupted, 5.0, 0.0);
        vanguard.statuses.apply(StatusKind::Empowered, 5.0, 0.0);
    }
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));
    let expected = 100.0 - 25.0 * 1.3 * 0.7;
    assert!((health(&sim, FighterSlot::Two) - expected).abs() < 1e-4);
}

#[test]
fn test_spell_ward_absorbs_one_hit() {
    let mut sim = duel(CharacterKey::Ranger, CharacterKey::Chronomancer);
    assert!(sim.request_skill(FighterSlot::Two, SkillSlot::W, SkillPayment::Local));
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));
    assert_eq!(health(&sim, FighterSlot::Two), 100.0);
    assert!(!sim
        .fighter(FighterSlot::Two)
        .unwrap()
        .statuses
        .has(StatusKind::SpellShield));

    sim.fighter_mut(FighterSlot::One)
        .unwrap()
        .cooldowns
        .insert(SkillSlot::Q, 0.0);
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));
    assert_eq!(health(&sim, FighterSlot::Two), 75.0);
}

#[test]
fn test_temporal_field_slows_and_burns() {
    let mut sim = duel(CharacterKey::Chronomancer, CharacterKey::Vanguard);
    sim.fighter_mut(FighterSlot::Two).unwrap().position = Vec3::new(-8.0, 0.0, 0.0);
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Q, SkillPayment::Local));

    for _ in 0..10 {
        sim.tick(0.1);
    }
    let vanguard = sim.fighter(FighterSlot::Two).unwrap();
    assert!(vanguard.health < 100.0);
    assert!(vanguard.statuses.has(StatusKind::Slow));
    assert!(vanguard.effective_speed() < vanguard.kit.move_speed);
}

#[test]
fn test_remote_cast_skips_cost() {
    let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(42));
    sim.create_fighter(FighterSlot::One, CharacterKey::Vanguard, None).unwrap();
    sim.create_remote_fighter(FighterSlot::Two, CharacterKey::Ranger).unwrap();

    assert!(sim.on_skill_event_received(FighterSlot::Two, "Q"));
    let ranger = sim.fighter(FighterSlot::Two).unwrap();
    assert_eq!(ranger.energy, ranger.max_energy);
    assert_eq!(ranger.cooldown(SkillSlot::Q), 0.0);
    assert_eq!(health(&sim, FighterSlot::One), 75.0);
}

#[test]
fn test_zero_tick_round_trip() {
    let mut sim = duel(CharacterKey::Voidcaller, CharacterKey::Duelist);
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Basic, SkillPayment::Local));
    {
        let duelist = sim.fighter_mut(FighterSlot::Two).unwrap();
        duelist.statuses.apply(StatusKind::Slow, 1.5, 0.5);
        duelist.health = 60.0;
    }
    for _ in 0..3 {
        sim.tick(0.1);
    }

    let before = [
        sim.snapshot(FighterSlot::One).unwrap(),
        sim.snapshot(FighterSlot::Two).unwrap(),
    ];
    sim.tick(0.0);
    let after = [
        sim.snapshot(FighterSlot::One).unwrap(),
        sim.snapshot(FighterSlot::Two).unwrap(),
    ];
    assert_eq!(before, after);
}

#[test]
fn test_snapshot_serializes() {
    let sim = duel(CharacterKey::Engineer, CharacterKey::Ranger);
    let snapshot = sim.snapshot(FighterSlot::One).unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"health\":100.0"));
    assert!(json.contains("\"is_dead\":false"));
}
