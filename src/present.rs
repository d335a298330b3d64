//! Rendering and audio collaborators
//!
//! The session forwards sim events and per-tick transforms through these
//! traits. [`SceneMirror`] keeps an in-memory copy of what is on screen; the
//! wasm canvas draws from it and tests inspect it.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::Serialize;

use crate::sim::{EntityId, EntityKind};

/// Receives entity lifecycle and transform updates
pub trait Presenter {
    fn add_entity(&mut self, id: EntityId, kind: EntityKind, pos: Vec2, radius: f32);
    fn remove_entity(&mut self, id: EntityId);
    fn set_transform(&mut self, id: EntityId, pos: Vec2, rotation: f32, radius: f32);
    /// `flash` is true while the damage flash timer runs
    fn set_player(&mut self, pos: Vec2, angle: f32, radius: f32, flash: bool);
}

/// Plays cues by string id
pub trait AudioSink {
    /// One-shot sound
    fn play(&mut self, id: &str);
    /// Fade a looping sound towards `volume`; 0 stops it
    fn fade(&mut self, id: &str, volume: f32);
}

/// Drawable state of one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub rotation: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerSprite {
    pub pos: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub flash: bool,
}

/// In-memory presenter, ordered by entity id
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneMirror {
    pub sprites: BTreeMap<EntityId, Sprite>,
    pub player: PlayerSprite,
}

impl SceneMirror {
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &Sprite)> {
        self.sprites.iter()
    }
}

impl Presenter for SceneMirror {
    fn add_entity(&mut self, id: EntityId, kind: EntityKind, pos: Vec2, radius: f32) {
        self.sprites.insert(
            id,
            Sprite {
                kind,
                pos,
                rotation: 0.0,
                radius,
            },
        );
    }

    fn remove_entity(&mut self, id: EntityId) {
        if self.sprites.remove(&id).is_none() {
            log::warn!("Despawn for unknown entity {}", id);
        }
    }

    fn set_transform(&mut self, id: EntityId, pos: Vec2, rotation: f32, radius: f32) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.pos = pos;
            sprite.rotation = rotation;
            sprite.radius = radius;
        }
    }

    fn set_player(&mut self, pos: Vec2, angle: f32, radius: f32, flash: bool) {
        self.player = PlayerSprite {
            pos,
            angle,
            radius,
            flash,
        };
    }
}

/// Audio sink that only logs; used headless and in tests
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    /// Every one-shot played, in order
    pub played: Vec<String>,
    /// Last requested volume per loop
    pub loops: BTreeMap<String, f32>,
}

impl AudioSink for LogAudio {
    fn play(&mut self, id: &str) {
        log::trace!("play {}", id);
        self.played.push(id.to_string());
    }

    fn fade(&mut self, id: &str, volume: f32) {
        log::trace!("fade {} -> {:.2}", id, volume);
        self.loops.insert(id.to_string(), volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_mirror_lifecycle() {
        let mut scene = SceneMirror::default();
        scene.add_entity(3, EntityKind::Planet, Vec2::new(1.0, 2.0), 10.0);
        scene.add_entity(1, EntityKind::Enemy, Vec2::ZERO, 5.0);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.iter().next().map(|(id, _)| *id), Some(1));

        scene.set_transform(3, Vec2::new(4.0, 4.0), 0.5, 12.0);
        let sprite = scene.get(3).unwrap();
        assert_eq!(sprite.pos, Vec2::new(4.0, 4.0));
        assert_eq!(sprite.rotation, 0.5);

        // Unknown ids are ignored
        scene.set_transform(99, Vec2::ZERO, 0.0, 1.0);
        scene.remove_entity(99);
        scene.remove_entity(3);
        assert!(scene.get(3).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_log_audio_records() {
        let mut audio = LogAudio::default();
        audio.play("kick");
        audio.fade("thruster", 1.0);
        audio.fade("thruster", 0.0);
        assert_eq!(audio.played, vec!["kick".to_string()]);
        assert_eq!(audio.loops.get("thruster"), Some(&0.0));
    }
}
