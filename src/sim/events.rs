//! Events emitted by the sim for the host to consume
//!
//! The sim never talks to the renderer or audio directly. It pushes
//! [`GameEvent`]s into a FIFO that the session drains after each tick.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind};
use super::items::ItemKind;

/// Sound cues understood by the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    Eat(u8),
    Damage(u8),
    /// Soft bump against something too big to eat
    Kick,
    /// Jetpack loop
    Thruster,
    /// Charge-up loop and tail replay
    Charging,
    Pickup,
    Evolve,
}

/// Number of eat samples
pub const EAT_VARIANTS: u8 = 6;
/// Number of damage samples
pub const DAMAGE_VARIANTS: u8 = 2;

impl SoundId {
    /// String id of the sample
    pub fn as_str(&self) -> &'static str {
        const EAT: [&str; EAT_VARIANTS as usize] =
            ["eat_1", "eat_2", "eat_3", "eat_4", "eat_5", "eat_6"];
        const DAMAGE: [&str; DAMAGE_VARIANTS as usize] = ["damage_1", "damage_2"];
        match self {
            SoundId::Eat(i) => EAT[*i as usize % EAT.len()],
            SoundId::Damage(i) => DAMAGE[*i as usize % DAMAGE.len()],
            SoundId::Kick => "kick",
            SoundId::Thruster => "thruster",
            SoundId::Charging => "charging",
            SoundId::Pickup => "pickup",
            SoundId::Evolve => "evolve",
        }
    }
}

/// Cycles through `n` variants so the same one never plays twice in a row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundRobin {
    next: u8,
}

impl RoundRobin {
    pub fn next(&mut self, n: u8) -> u8 {
        let current = self.next % n.max(1);
        self.next = (current + 1) % n.max(1);
        current
    }
}

/// Everything the host needs to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new entity entered the world
    Spawned { id: EntityId, kind: EntityKind, pos: Vec2, radius: f32 },
    /// An entity was swept from the world
    Despawned { id: EntityId },
    /// One-shot sound
    Play(SoundId),
    /// Fade a looping sound towards `volume` (0 stops it)
    Loop { sound: SoundId, volume: f32 },
    /// A treasure planet died; an item should appear here
    SpawnItem { pos: Vec2, item: ItemKind },
    /// Player picked up an item
    ItemAcquired { item: ItemKind, level: u32 },
    /// Fuel lost to a hit
    Damaged { amount: f32 },
    /// Player levelled up
    Evolved { level: u32 },
    Victory,
    GameOver,
}

/// Simple emit/consume FIFO
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// Take the oldest event
    pub fn consume(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}
