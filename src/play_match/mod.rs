//! Play Match - the combat simulation core
//!
//! A deterministic, single-threaded 1v1 arena fight:
//! - `components`: fighter state, status table, seeded RNG
//! - `effects`, `projectiles`: the transient effect registry (mark and sweep)
//! - `combat_core`, `auras`, `skills`: damage layering, per-tick integration,
//!   passives and skill execution
//! - `combat_ai`, `class_ai`: the dual-process AI controller
//! - `simulation`: the tick loop and the collaborator boundary
//!
//! Nothing here renders or plays audio; see `crate::combat::events`.
//!
//! There is no menu/state machine around a match, so this module sits at the
//! crate root rather than under a `states` module. Match configuration lives
//! here too (`match_config`) for the same reason.

pub mod abilities;
pub mod ability_config;
pub mod auras;
pub mod class_ai;
pub mod combat_ai;
pub mod combat_core;
pub mod components;
pub mod constants;
pub mod effects;
pub mod match_config;
pub mod physics;
pub mod projectiles;
pub mod simulation;
pub mod skills;
pub mod utils;

pub use abilities::SkillSlot;
pub use ability_config::KitDefinitions;
pub use combat_ai::AiTier;
pub use components::{FighterSlot, FighterSnapshot, GameRng};
pub use match_config::{ArenaMap, CharacterKey, GameMode, MatchConfig};
pub use simulation::{MatchOutcome, Simulation};
pub use skills::SkillPayment;
