//! ArenaDuel - real-time two-fighter arena combat
//!
//! A deterministic 1v1 combat simulation: six characters with five skills and
//! a passive each, a transient effect registry, and a tiered dual-process AI.
//! Rendering, audio, input and networking are collaborators behind the traits
//! in [`combat::events`].
//!
//! This library exposes the core game modules for testing and reuse.

pub mod cli;
pub mod combat;
pub mod headless;
pub mod play_match;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::HeadlessMatchConfig;
pub use play_match::match_config::{ArenaMap, CharacterKey, GameMode, MatchConfig};
pub use play_match::simulation::{MatchOutcome, Simulation};
