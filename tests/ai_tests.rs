//! Integration tests for the AI controller driving a live simulation
//!
//! These tests verify that:
//! - The reflex layer sidesteps an incoming projectile
//! - Without line of sight the tactical layer flanks instead of casting
//! - A Master-tier AI tracks its opponent exactly

use arenaduel::combat::log::CombatLogEventType;
use arenaduel::play_match::combat_ai::Strategy;
use arenaduel::play_match::{
    AiTier, ArenaMap, CharacterKey, FighterSlot, KitDefinitions, SkillPayment, SkillSlot,
    Simulation,
};
use bevy::math::Vec3;

fn versus_ai(map: ArenaMap, local: CharacterKey, ai: CharacterKey, tier: AiTier) -> Simulation {
    let mut sim = Simulation::new(map, KitDefinitions::default(), Some(99));
    sim.create_fighter(FighterSlot::One, local, None).unwrap();
    sim.create_fighter(FighterSlot::Two, ai, Some(tier)).unwrap();
    sim
}

#[test]
fn test_master_dodges_incoming_arrow() {
    let mut sim = versus_ai(
        ArenaMap::BasicArena,
        CharacterKey::Ranger,
        CharacterKey::Vanguard,
        AiTier::Master,
    );
    sim.fighter_mut(FighterSlot::Two).unwrap().position = Vec3::new(-8.0, 0.0, 0.0);
    assert!(sim.request_skill(FighterSlot::One, SkillSlot::Basic, SkillPayment::Local));

    sim.tick(0.1);
    assert!(sim.brain(FighterSlot::Two).unwrap().is_dodging());
    let vanguard = sim.fighter(FighterSlot::Two).unwrap();
    assert!(
        vanguard.velocity.z.abs() > vanguard.velocity.x.abs(),
        "dodge should cross the arrow's path, got {:?}",
        vanguard.velocity
    );

    for _ in 0..9 {
        sim.tick(0.1);
    }
    assert_eq!(sim.fighter(FighterSlot::Two).unwrap().health, 100.0);
    assert!(sim
        .log()
        .filter_by_type(CombatLogEventType::Damage)
        .iter()
        .all(|e| e.ability.as_deref() != Some("Arrow")));
}

#[test]
fn test_blocked_sight_flanks_instead_of_casting() {
    let mut sim = Simulation::new(ArenaMap::PillaredArena, KitDefinitions::default(), Some(5));
    sim.create_fighter(FighterSlot::One, CharacterKey::Ranger, Some(AiTier::Master))
        .unwrap();
    sim.create_fighter(FighterSlot::Two, CharacterKey::Vanguard, None).unwrap();
    let start = Vec3::new(4.0, 0.0, 8.0);
    sim.fighter_mut(FighterSlot::One).unwrap().position = start;
    sim.fighter_mut(FighterSlot::Two).unwrap().position = Vec3::new(12.0, 0.0, 8.0);

    sim.tick(0.1);

    let brain = sim.brain(FighterSlot::One).unwrap();
    assert!(
        matches!(brain.strategy, Strategy::Flank(_)),
        "expected a flank, got {:?}",
        brain.strategy
    );
    assert!(sim
        .log()
        .filter_by_type(CombatLogEventType::AbilityUsed)
        .iter()
        .all(|e| e.source.as_deref() != Some("P1 Ranger")));

    for _ in 0..5 {
        sim.tick(0.1);
    }
    let ranger = sim.fighter(FighterSlot::One).unwrap();
    assert!(ranger.position.distance(start) > 0.5);
}

#[test]
fn test_master_aim_tracks_opponent() {
    let mut sim = versus_ai(
        ArenaMap::BasicArena,
        CharacterKey::Vanguard,
        CharacterKey::Voidcaller,
        AiTier::Master,
    );
    sim.fighter_mut(FighterSlot::One).unwrap().position = Vec3::new(-10.0, 0.0, 12.0);

    sim.tick(0.1);

    let voidcaller = sim.fighter(FighterSlot::Two).unwrap();
    let vanguard = sim.fighter(FighterSlot::One).unwrap();
    let offset = vanguard.position - voidcaller.position;
    let bearing = Vec3::new(offset.x, 0.0, offset.z).normalize();
    assert!(voidcaller.aim.dot(bearing) > 0.99, "aim {:?}", voidcaller.aim);
}

#[test]
fn test_ai_duel_produces_damage() {
    let mut sim = Simulation::new(ArenaMap::BasicArena, KitDefinitions::default(), Some(17));
    sim.create_fighter(FighterSlot::One, CharacterKey::Duelist, Some(AiTier::Master))
        .unwrap();
    sim.create_fighter(FighterSlot::Two, CharacterKey::Vanguard, Some(AiTier::Master))
        .unwrap();

    for _ in 0..1200 {
        sim.tick(1.0 / 60.0);
        if sim.outcome().is_some() {
            break;
        }
    }

    let dealt: f32 = FighterSlot::ALL
        .iter()
        .map(|slot| sim.fighter(*slot).unwrap().damage_dealt)
        .sum();
    assert!(dealt > 0.0, "two melee AIs should trade blows within 20s");
    assert!(!sim.log().filter_by_type(CombatLogEventType::AbilityUsed).is_empty());
}
