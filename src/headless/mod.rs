//! Headless matches
//!
//! Runs a duel at a fixed step with no window, either as a plain loop
//! ([`simulate`], returns a [`MatchResult`]) or inside a minimal Bevy app
//! ([`run_headless_match`], writes the combat log and exits).
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --headless match.json --seed 42
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "fighter1": "Ranger",
//!   "fighter2": "Vanguard",
//!   "tiers": ["Master", "Veteran"],
//!   "map": "PillaredArena",
//!   "mode": "Standard",
//!   "max_duration_secs": 120,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::HeadlessMatchConfig;
pub use runner::{run_headless_match, simulate, FighterResult, MatchResult};
