//! Combat logging
//!
//! Records all combat events for display and post-match analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Timestamp in match time (seconds since match start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Combatant id of the source ("P1 Ranger"), if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Combatant id of the target, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Skill or effect name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    /// Damage/heal amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f32>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// Healing done
    Healing,
    /// A direct hit fully absorbed
    Blocked,
    /// Skill used
    AbilityUsed,
    /// Status applied
    StatusApplied,
    /// Status ran out
    StatusExpired,
    /// Crowd control applied
    CrowdControl,
    /// Combatant died
    Death,
    /// Match event (start, end, etc.)
    MatchEvent,
}

/// Per-fighter summary written alongside the log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantMetadata {
    pub id: String,
    pub character: String,
    pub ai_tier: Option<String>,
    pub max_health: f32,
    pub final_health: f32,
    pub max_energy: f32,
    pub final_energy: f32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub final_position: (f32, f32, f32),
}

/// Match summary written alongside the log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub arena_name: String,
    pub game_mode: String,
    /// "P1"/"P2", or None for a draw
    pub winner: Option<String>,
    pub match_time: f32,
    pub random_seed: Option<u64>,
    pub combatants: Vec<CombatantMetadata>,
}

#[derive(Serialize)]
struct SavedMatch<'a> {
    metadata: &'a MatchMetadata,
    entries: &'a [CombatLogEntry],
}

/// The combat log storing all events of one match
#[derive(Debug, Default, Clone)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current match time
    pub match_time: f32,
}

impl CombatLog {
    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            source: None,
            target: None,
            ability: None,
            amount: None,
        });
    }

    /// Damage with full attribution
    pub fn log_damage(
        &mut self,
        source: Option<&str>,
        target: &str,
        ability: &str,
        amount: f32,
        is_dot: bool,
    ) {
        let message = match source {
            Some(source) if is_dot => format!(
                "{}'s {} ticks on {} for {:.1} damage",
                source, ability, target, amount
            ),
            Some(source) => format!(
                "{}'s {} hits {} for {:.1} damage",
                source, ability, target, amount
            ),
            None => format!("{} takes {:.1} damage from {}", target, amount, ability),
        };
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type: CombatLogEventType::Damage,
            message,
            source: source.map(str::to_string),
            target: Some(target.to_string()),
            ability: Some(ability.to_string()),
            amount: Some(amount),
        });
    }

    /// A hit fully absorbed by a defensive layer
    pub fn log_block(&mut self, target: &str, ability: &str, blocked_by: &str) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type: CombatLogEventType::Blocked,
            message: format!("{}'s {} blocks {}", target, blocked_by, ability),
            source: None,
            target: Some(target.to_string()),
            ability: Some(ability.to_string()),
            amount: None,
        });
    }

    pub fn log_healing(&mut self, target: &str, ability: &str, amount: f32) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type: CombatLogEventType::Healing,
            message: format!("{}'s {} heals for {:.1}", target, ability, amount),
            source: Some(target.to_string()),
            target: Some(target.to_string()),
            ability: Some(ability.to_string()),
            amount: Some(amount),
        });
    }

    pub fn log_ability(&mut self, caster: &str, ability: &str) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type: CombatLogEventType::AbilityUsed,
            message: format!("{} uses {}", caster, ability),
            source: Some(caster.to_string()),
            target: None,
            ability: Some(ability.to_string()),
            amount: None,
        });
    }

    pub fn log_death(&mut self, victim: &str) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type: CombatLogEventType::Death,
            message: format!("{} has died", victim),
            source: None,
            target: Some(victim.to_string()),
            ability: None,
            amount: None,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Damage dealt by a combatant, summed per ability
    pub fn damage_by_ability(&self, source: &str) -> BTreeMap<String, f32> {
        let mut totals = BTreeMap::new();
        for entry in self.filter_by_type(CombatLogEventType::Damage) {
            if entry.source.as_deref() != Some(source) {
                continue;
            }
            if let (Some(ability), Some(amount)) = (&entry.ability, entry.amount) {
                *totals.entry(ability.clone()).or_insert(0.0) += amount;
            }
        }
        totals
    }

    /// Total damage dealt by a combatant
    pub fn total_damage_dealt(&self, source: &str) -> f32 {
        self.damage_by_ability(source).values().sum()
    }

    /// How many death entries name this combatant
    pub fn deaths_of(&self, victim: &str) -> usize {
        self.filter_by_type(CombatLogEventType::Death)
            .iter()
            .filter(|e| e.target.as_deref() == Some(victim))
            .count()
    }

    /// Write the log and match metadata as JSON. Returns the path written.
    pub fn save_to_file(
        &self,
        metadata: &MatchMetadata,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let path = match output_path {
            Some(path) => path.to_string(),
            None => {
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                format!("match_logs/match_{}.json", stamp)
            }
        };

        if let Some(parent) = std::path::Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }

        let saved = SavedMatch {
            metadata,
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&saved)
            .map_err(|e| format!("Failed to serialize match log: {}", e))?;
        std::fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        Ok(path)
    }
}
