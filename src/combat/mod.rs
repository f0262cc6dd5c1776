//! Combat boundary
//!
//! What the simulation core exposes to, and needs from, the outside:
//! - The combat log (post-match analysis, headless output)
//! - Collaborator interfaces (visuals, audio, input, network)

pub mod events;
pub mod log;
