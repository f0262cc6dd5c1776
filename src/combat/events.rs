//! Collaborator interfaces
//!
//! The simulation never renders, plays audio, reads devices or talks to the
//! network itself. It calls out through the narrow traits below, and every
//! call is fire-and-forget: nothing a collaborator does can fail a tick.

use bevy::math::Vec3;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::play_match::abilities::SkillSlot;
use crate::play_match::components::{FighterSlot, StatusKind};

/// Visual effects the core can ask a renderer for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualKind {
    /// Floating damage number
    DamageNumber { amount: f32 },
    /// Sparks at a hit location
    HitSparks,
    /// A direct hit absorbed by a shield, parry or guard
    BlockFlash,
    /// Death particle burst
    DeathBurst,
    /// Melee swing arc
    Slash,
    /// Projectile destroyed on impact
    Impact,
    /// Expanding ring (slam, detonation)
    Ring { radius: f32 },
    /// Instant hitscan line
    Tracer { to: Vec3 },
    /// Blink in/out marker
    Rift,
    /// Model attachment for an active status
    StatusAttachment(StatusKind),
    /// Floating heal number
    HealNumber { amount: f32 },
}

/// Audio cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Hit,
    Blocked,
    Death,
    Cast,
    Explosion,
    Dash,
}

/// Renderer/audio side of the simulation.
pub trait EffectSink: Send + Sync {
    /// Request a visual effect at a position.
    fn spawn_visual_effect(&mut self, kind: VisualKind, position: Vec3);

    /// Request an audio cue.
    fn play_sound(&mut self, cue: SoundCue);

    /// Drop every status attachment on a fighter's model (death).
    fn release_attachments(&mut self, _slot: FighterSlot) {}
}

/// Ignores every request. Used by headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EffectSink for NullSink {
    fn spawn_visual_effect(&mut self, _kind: VisualKind, _position: Vec3) {}

    fn play_sound(&mut self, _cue: SoundCue) {}
}

/// A request recorded by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    Visual { kind: VisualKind, position: Vec3 },
    Sound(SoundCue),
    ReleaseAttachments(FighterSlot),
}

/// Records every request. Clones share the same buffer, so a test can keep
/// one handle while the simulation owns another.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<PresentationEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PresentationEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Count recorded events matching a predicate.
    pub fn count(&self, predicate: impl Fn(&PresentationEvent) -> bool) -> usize {
        self.events
            .lock()
            .map(|events| events.iter().filter(|e| predicate(e)).count())
            .unwrap_or(0)
    }

    fn push(&self, event: PresentationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl EffectSink for RecordingSink {
    fn spawn_visual_effect(&mut self, kind: VisualKind, position: Vec3) {
        self.push(PresentationEvent::Visual { kind, position });
    }

    fn play_sound(&mut self, cue: SoundCue) {
        self.push(PresentationEvent::Sound(cue));
    }

    fn release_attachments(&mut self, slot: FighterSlot) {
        self.push(PresentationEvent::ReleaseAttachments(slot));
    }
}

/// What a human player wants this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputIntent {
    /// Desired movement direction; normalized by the core
    pub move_vector: Vec3,
    /// Skills pressed this tick, in press order
    pub wants_skill: SmallVec<[SkillSlot; 2]>,
}

/// Local human input device.
pub trait InputSource: Send + Sync {
    fn query_input_intent(&mut self, slot: FighterSlot) -> InputIntent;
}

/// No input at all: local fighters stand still.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInput;

impl InputSource for NullInput {
    fn query_input_intent(&mut self, _slot: FighterSlot) -> InputIntent {
        InputIntent::default()
    }
}

/// Replays queued intents, one per tick, per slot. An empty queue yields the
/// default (idle) intent.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    queues: [VecDeque<InputIntent>; 2],
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, slot: FighterSlot, intent: InputIntent) {
        self.queues[slot.index()].push_back(intent);
    }
}

impl InputSource for ScriptedInput {
    fn query_input_intent(&mut self, slot: FighterSlot) -> InputIntent {
        self.queues[slot.index()].pop_front().unwrap_or_default()
    }
}

/// Outbound half of the network boundary.
pub trait NetworkSink: Send + Sync {
    /// A locally-paid skill of a local fighter went off.
    fn send_skill_event(&mut self, slot: FighterSlot, skill: SkillSlot);
}

/// Offline play.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNetwork;

impl NetworkSink for NullNetwork {
    fn send_skill_event(&mut self, _slot: FighterSlot, _skill: SkillSlot) {}
}

/// Records outbound skill events; clones share the buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingNetwork {
    sent: Arc<Mutex<Vec<(FighterSlot, SkillSlot)>>>,
}

impl RecordingNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(FighterSlot, SkillSlot)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl NetworkSink for RecordingNetwork {
    fn send_skill_event(&mut self, slot: FighterSlot, skill: SkillSlot) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((slot, skill));
        }
    }
}

/// Inbound network state for a remote fighter. Only these three values may be
/// written from the sync path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteState {
    pub position: Vec3,
    pub health: f32,
    pub energy: f32,
}

/// Outbound state of a locally-authoritative fighter. Rate limiting is the
/// caller's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkReport {
    pub position: Vec3,
    pub health: f32,
    pub energy: f32,
}
