//! Ability System - Types and Enums
//!
//! This module contains skill-related types and enums.
//! Actual skill stats are loaded from `assets/config/characters.ron`
//! via the `ability_config` module.

use serde::{Deserialize, Serialize};

/// The five input slots of every kit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum SkillSlot {
    Basic,
    Q,
    W,
    E,
    R,
}

impl SkillSlot {
    /// All slots in evaluation order. Iterate this rather than a kit's map so
    /// tie-breaking stays deterministic.
    pub const ALL: [SkillSlot; 5] = [
        SkillSlot::Basic,
        SkillSlot::Q,
        SkillSlot::W,
        SkillSlot::E,
        SkillSlot::R,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SkillSlot::Basic => "basic",
            SkillSlot::Q => "q",
            SkillSlot::W => "w",
            SkillSlot::E => "e",
            SkillSlot::R => "r",
        }
    }

    /// Parse a skill key as sent by input or network collaborators.
    pub fn from_key(key: &str) -> Option<SkillSlot> {
        match key.to_ascii_lowercase().as_str() {
            "basic" => Some(SkillSlot::Basic),
            "q" => Some(SkillSlot::Q),
            "w" => Some(SkillSlot::W),
            "e" => Some(SkillSlot::E),
            "r" => Some(SkillSlot::R),
            _ => None,
        }
    }
}

/// Basic attack delivery.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum AttackType {
    Melee,
    Ranged,
}

/// Descriptive tags read only by the AI's offense scorer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SkillTag {
    Damage,
    Mobility,
    Cc,
    Defense,
    Debuff,
    Construct,
}

/// Every skill behavior in the roster. The resolver branches on this, never on tags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SkillId {
    // Vanguard
    Cleave,
    Charge,
    ShieldWall,
    GroundSlam,
    Warcry,
    // Ranger
    Arrow,
    Snipe,
    VenomArrow,
    Tumble,
    SentryTurret,
    // Voidcaller
    VoidOrb,
    GravityBolt,
    Corrupt,
    RiftStep,
    Implosion,
    // Duelist
    Slash,
    Parry,
    Lunge,
    Fade,
    Eviscerate,
    // Chronomancer
    ChronoBolt,
    TemporalField,
    SpellWard,
    Rewind,
    Entropy,
    // Engineer
    RivetGun,
    DeployTurret,
    ArcMine,
    Barrier,
    SiegeMode,
}

impl SkillId {
    /// Display name used in the combat log.
    pub fn label(&self) -> &'static str {
        match self {
            SkillId::Cleave => "Cleave",
            SkillId::Charge => "Charge",
            SkillId::ShieldWall => "Shield Wall",
            SkillId::GroundSlam => "Ground Slam",
            SkillId::Warcry => "Warcry",
            SkillId::Arrow => "Arrow",
            SkillId::Snipe => "Snipe",
            SkillId::VenomArrow => "Venom Arrow",
            SkillId::Tumble => "Tumble",
            SkillId::SentryTurret => "Sentry Turret",
            SkillId::VoidOrb => "Void Orb",
            SkillId::GravityBolt => "Gravity Bolt",
            SkillId::Corrupt => "Corrupt",
            SkillId::RiftStep => "Rift Step",
            SkillId::Implosion => "Implosion",
            SkillId::Slash => "Slash",
            SkillId::Parry => "Parry",
            SkillId::Lunge => "Lunge",
            SkillId::Fade => "Fade",
            SkillId::Eviscerate => "Eviscerate",
            SkillId::ChronoBolt => "Chrono Bolt",
            SkillId::TemporalField => "Temporal Field",
            SkillId::SpellWard => "Spell Ward",
            SkillId::Rewind => "Rewind",
            SkillId::Entropy => "Entropy",
            SkillId::RivetGun => "Rivet Gun",
            SkillId::DeployTurret => "Deploy Turret",
            SkillId::ArcMine => "Arc Mine",
            SkillId::Barrier => "Barrier",
            SkillId::SiegeMode => "Siege Mode",
        }
    }
}

/// Character passives, evaluated once per tick (or inside damage resolution
/// for the ones that react to hits).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PassiveKind {
    /// Multiplicative energy regen penalty.
    Juggernaut,
    /// Standing still grants a short shield.
    SteadyAim,
    /// Stacked gravity marks on the opponent detonate into a stun and pull.
    GravityWell,
    /// Blocks the next direct hit, then recharges.
    RiposteGuard,
    /// One-time spell shield when dropping to low health.
    StasisEcho,
    /// Faster regen while an owned turret stands.
    Overclock,
}

/// Default movement behavior of an AI fighter when no skill is worth using.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Archetype {
    Kite,
    Chase,
    RetreatAndCast,
    DefendConstruct,
}
