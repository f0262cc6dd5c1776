//! Status Effect Table
//!
//! Timed statuses keyed by kind, plus stack counters that carry their own
//! independent expiry timer.
//!
//! ## Decay rules
//! - Every numeric duration decays by elapsed time once per tick, floored at
//!   zero. Zero means inactive.
//! - Stack counts are never time-decayed. Only their timer is; the count is
//!   cleared by [`StatusTable::clear_expired_stacks`] once the timer is zero.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Types of timed statuses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum StatusKind {
    /// Movement speed multiplied by the entry's magnitude
    Slow,
    /// No movement at all
    Root,
    /// No control (input/AI ignored, no skills); impulses still apply
    Stun,
    /// No skills except Basic
    Silence,
    /// Blocks all direct damage for the duration
    Shielded,
    /// Blocks exactly one direct hit, then is consumed
    SpellShield,
    /// Immune to slow, root, stun and silence
    Unstoppable,
    /// Translucent; AI opponents lose track of the fighter
    Cloak,
    /// Incoming damage reduced
    Empowered,
    /// Damage over time (magnitude = damage per second)
    Venom,
    /// Incoming damage amplified
    Corrupted,
    /// Drains the opponent's energy each tick
    FeedbackLoop,
    /// Velocity forced along a charge path
    Charging,
    /// Speed and regen bonus after a rift step
    RiftBuff,
    /// Blocks one direct hit and roots the attacker
    Parry,
    /// Self-root with an empowered basic attack
    Siege,
    /// Detonates for bonus damage when the timer runs out
    ImplosionTarget,
}

impl StatusKind {
    /// Crowd control that Unstoppable ignores.
    pub fn is_crowd_control(&self) -> bool {
        matches!(
            self,
            StatusKind::Slow | StatusKind::Root | StatusKind::Stun | StatusKind::Silence
        )
    }

    /// Statuses that get a visual attachment on the fighter model.
    pub fn has_attachment(&self) -> bool {
        matches!(
            self,
            StatusKind::Shielded
                | StatusKind::SpellShield
                | StatusKind::Parry
                | StatusKind::Stun
                | StatusKind::Root
                | StatusKind::Venom
                | StatusKind::Corrupted
                | StatusKind::ImplosionTarget
        )
    }
}

/// Stacking counters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum StackKind {
    GravityMark,
}

/// A single timed status.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct StatusEntry {
    /// Seconds remaining, never negative
    pub remaining: f32,
    /// Kind-specific strength (slow factor, DoT per second, ...)
    pub magnitude: f32,
}

/// A stack counter with its own expiry timer.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct StackCounter {
    pub count: u32,
    pub timer: f32,
}

/// Status table owned exclusively by one fighter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusTable {
    entries: BTreeMap<StatusKind, StatusEntry>,
    stacks: BTreeMap<StackKind, StackCounter>,
}

impl StatusTable {
    /// Apply or refresh a status. Refreshing keeps the longer remaining time
    /// and the stronger magnitude rather than stacking.
    pub fn apply(&mut self, kind: StatusKind, duration: f32, magnitude: f32) {
        debug_assert!(duration >= 0.0, "status duration cannot be negative");
        let entry = self.entries.entry(kind).or_default();
        if entry.remaining <= 0.0 {
            entry.magnitude = magnitude;
        } else {
            entry.magnitude = entry.magnitude.max(magnitude);
        }
        entry.remaining = entry.remaining.max(duration);
    }

    /// Force a status to zero (consumed or broken).
    pub fn clear(&mut self, kind: StatusKind) {
        if let Some(entry) = self.entries.get_mut(&kind) {
            entry.remaining = 0.0;
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.remaining(kind) > 0.0
    }

    pub fn remaining(&self, kind: StatusKind) -> f32 {
        self.entries.get(&kind).map_or(0.0, |e| e.remaining)
    }

    /// Magnitude of an active status, `None` when inactive.
    pub fn magnitude(&self, kind: StatusKind) -> Option<f32> {
        self.entries
            .get(&kind)
            .filter(|e| e.remaining > 0.0)
            .map(|e| e.magnitude)
    }

    /// Decay every duration and stack timer by `dt`, floored at zero.
    /// Returns the statuses that went from active to inactive during this pass.
    pub fn decay(&mut self, dt: f32) -> SmallVec<[StatusKind; 4]> {
        let mut expired = SmallVec::new();
        for (kind, entry) in self.entries.iter_mut() {
            if entry.remaining <= 0.0 {
                continue;
            }
            entry.remaining = (entry.remaining - dt).max(0.0);
            if entry.remaining <= 0.0 {
                expired.push(*kind);
            }
        }
        for counter in self.stacks.values_mut() {
            counter.timer = (counter.timer - dt).max(0.0);
        }
        expired
    }

    /// Clear stack counts whose timer has reached zero.
    pub fn clear_expired_stacks(&mut self) {
        for counter in self.stacks.values_mut() {
            if counter.timer <= 0.0 {
                counter.count = 0;
            }
        }
    }

    /// Add one stack and refresh its timer. Returns the new count.
    pub fn add_stack(&mut self, kind: StackKind, timer: f32) -> u32 {
        let counter = self.stacks.entry(kind).or_default();
        counter.count += 1;
        counter.timer = timer;
        counter.count
    }

    pub fn stacks(&self, kind: StackKind) -> u32 {
        self.stacks.get(&kind).map_or(0, |c| c.count)
    }

    pub fn stack_timer(&self, kind: StackKind) -> f32 {
        self.stacks.get(&kind).map_or(0.0, |c| c.timer)
    }

    pub fn reset_stacks(&mut self, kind: StackKind) {
        if let Some(counter) = self.stacks.get_mut(&kind) {
            counter.count = 0;
            counter.timer = 0.0;
        }
    }

    /// Active statuses with their remaining time, ordered by kind.
    pub fn active(&self) -> BTreeMap<StatusKind, f32> {
        self.entries
            .iter()
            .filter(|(_, e)| e.remaining > 0.0)
            .map(|(k, e)| (*k, e.remaining))
            .collect()
    }

    /// Drop every status and stack (death).
    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.stacks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_is_time_additive() {
        let mut split = StatusTable::default();
        split.apply(StatusKind::Slow, 2.0, 0.5);
        split.apply(StatusKind::Root, 0.5, 0.0);
        let mut whole = split.clone();

        split.decay(0.3);
        split.decay(0.45);
        whole.decay(0.75);

        for kind in [StatusKind::Slow, StatusKind::Root] {
            assert!((split.remaining(kind) - whole.remaining(kind)).abs() < 1e-5);
        }
        assert_eq!(whole.remaining(StatusKind::Root), 0.0);
    }

    #[test]
    fn test_decay_never_goes_negative() {
        let mut table = StatusTable::default();
        table.apply(StatusKind::Stun, 0.1, 0.0);
        let expired = table.decay(5.0);
        assert_eq!(table.remaining(StatusKind::Stun), 0.0);
        assert_eq!(expired.as_slice(), &[StatusKind::Stun]);
        // A second pass doesn't report it again
        assert!(table.decay(1.0).is_empty());
    }

    #[test]
    fn test_refresh_keeps_longer_duration() {
        let mut table = StatusTable::default();
        table.apply(StatusKind::Slow, 3.0, 0.5);
        table.apply(StatusKind::Slow, 1.0, 0.5);
        assert_eq!(table.remaining(StatusKind::Slow), 3.0);
    }

    #[test]
    fn test_stack_count_survives_decay_until_bookkeeping() {
        let mut table = StatusTable::default();
        table.add_stack(StackKind::GravityMark, 1.0);
        table.add_stack(StackKind::GravityMark, 1.0);
        table.decay(2.0);
        // Decay only touches the timer
        assert_eq!(table.stacks(StackKind::GravityMark), 2);
        assert_eq!(table.stack_timer(StackKind::GravityMark), 0.0);
        table.clear_expired_stacks();
        assert_eq!(table.stacks(StackKind::GravityMark), 0);
    }

    #[test]
    fn test_clear_consumes_status() {
        let mut table = StatusTable::default();
        table.apply(StatusKind::SpellShield, 3.0, 0.0);
        table.clear(StatusKind::SpellShield);
        assert!(!table.has(StatusKind::SpellShield));
        assert!(table.magnitude(StatusKind::SpellShield).is_none());
    }
}
