//! Host-side frame loop
//!
//! A `GameSession` owns one `GameState` and is driven once per animation
//! frame. It clamps the delta, runs a tick with a camera that follows the
//! player, then drains the event queue into the presenter and audio sink.
//! Treasure drops are turned into world items here, the sim only asks for
//! them.

use glam::Vec2;

use crate::consts::MAX_FRAME_DELTA_MS;
use crate::error::SimError;
use crate::present::{AudioSink, Presenter};
use crate::sim::{Body, Camera, GameEvent, GameState, Keys, TickInput, tick};
use crate::tuning::Tuning;

pub struct GameSession {
    pub state: GameState,
    pub keys: Keys,
    /// Screen size in pixels
    pub viewport: Vec2,
    /// Ticks that returned an error and were skipped
    pub failed_ticks: u32,
}

impl GameSession {
    pub fn new(seed: u64, viewport: Vec2) -> Self {
        log::info!("Session started (seed {})", seed);
        Self::from_state(GameState::new(seed), viewport)
    }

    pub fn with_tuning(seed: u64, tuning: Tuning, viewport: Vec2) -> Result<Self, SimError> {
        log::info!("Session started (seed {}, custom tuning)", seed);
        Ok(Self::from_state(GameState::with_tuning(seed, tuning)?, viewport))
    }

    fn from_state(state: GameState, viewport: Vec2) -> Self {
        Self {
            state,
            keys: Keys::default(),
            viewport,
            failed_ticks: 0,
        }
    }

    /// Forward a keyboard event. Returns false for unmapped keys.
    pub fn key(&mut self, key: &str, down: bool) -> bool {
        self.keys.set(key, down)
    }

    /// Camera centred on the player, zoomed out as they grow
    pub fn camera(&self) -> Camera {
        let player = &self.state.player;
        let zoom = if player.radius > 0.0 {
            self.state.tuning.base_radius / player.radius
        } else {
            1.0
        };
        Camera::centered_on(player.pos, self.viewport.x, self.viewport.y, zoom)
    }

    /// Run one frame: tick, dispatch events, sync transforms
    pub fn frame(&mut self, delta_ms: f32, presenter: &mut impl Presenter, audio: &mut impl AudioSink) {
        let input = TickInput {
            keys: self.keys,
            delta_ms: delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS),
            camera: self.camera(),
        };

        if let Err(e) = tick(&mut self.state, &input) {
            self.failed_ticks += 1;
            log::error!("Tick failed ({} so far): {}", self.failed_ticks, e);
        }
        // One-shot
        self.keys.debug = false;

        self.dispatch(presenter, audio);
        self.sync(presenter);
    }

    fn dispatch(&mut self, presenter: &mut impl Presenter, audio: &mut impl AudioSink) {
        // Placing an item queues its own spawn event, handled in this same loop
        while let Some(event) = self.state.events.consume() {
            match event {
                GameEvent::Spawned { id, kind, pos, radius } => {
                    presenter.add_entity(id, kind, pos, radius);
                }
                GameEvent::Despawned { id } => presenter.remove_entity(id),
                GameEvent::Play(sound) => audio.play(sound.as_str()),
                GameEvent::Loop { sound, volume } => audio.fade(sound.as_str(), volume),
                GameEvent::SpawnItem { pos, item } => {
                    let radius = self.state.player.radius * self.state.tuning.item_radius_factor;
                    let id = self.state.universe.add_item(pos, item, radius, &mut self.state.events);
                    log::debug!("Dropped {} as entity {}", item.id(), id);
                }
                GameEvent::ItemAcquired { item, level } => {
                    log::info!("{} now level {}: {}", item.id(), level, item.description());
                }
                GameEvent::Damaged { .. }
                | GameEvent::Evolved { .. }
                | GameEvent::Victory
                | GameEvent::GameOver => {}
            }
        }
    }

    fn sync(&self, presenter: &mut impl Presenter) {
        let universe = &self.state.universe;
        universe
            .planets
            .iter()
            .for_each(|b| presenter.set_transform(b.id(), b.pos(), b.rotation(), b.radius()));
        universe
            .enemies
            .iter()
            .for_each(|b| presenter.set_transform(b.id(), b.pos(), b.rotation(), b.radius()));
        universe
            .projectiles
            .iter()
            .for_each(|b| presenter.set_transform(b.id(), b.pos(), b.rotation(), b.radius()));
        universe
            .items
            .iter()
            .for_each(|b| presenter.set_transform(b.id(), b.pos(), b.rotation(), b.radius()));

        let player = &self.state.player;
        presenter.set_player(
            player.pos,
            player.angle,
            player.radius,
            self.state.timers.damage_flash > 0.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::{LogAudio, SceneMirror};
    use crate::sim::{EntityKind, GamePhase};

    fn session() -> (GameSession, SceneMirror, LogAudio) {
        (
            GameSession::new(42, Vec2::new(1280.0, 720.0)),
            SceneMirror::default(),
            LogAudio::default(),
        )
    }

    #[test]
    fn test_first_frame_mirrors_world() {
        let (mut s, mut scene, mut audio) = session();
        s.frame(16.0, &mut scene, &mut audio);
        assert_eq!(scene.len(), s.state.universe.len());
        assert_eq!(scene.player.radius, s.state.player.radius);
        for planet in &s.state.universe.planets {
            assert_eq!(scene.get(planet.id()).map(|sp| sp.pos), Some(planet.pos()));
        }
    }

    #[test]
    fn test_delta_is_clamped() {
        let (mut s, mut scene, mut audio) = session();
        s.frame(5000.0, &mut scene, &mut audio);
        assert_eq!(s.state.time_ms, MAX_FRAME_DELTA_MS as f64);
        assert_eq!(s.failed_ticks, 0);
    }

    #[test]
    fn test_failed_tick_is_counted_not_fatal() {
        let (mut s, mut scene, mut audio) = session();
        s.frame(f32::NAN, &mut scene, &mut audio);
        assert_eq!(s.failed_ticks, 1);
        s.frame(16.0, &mut scene, &mut audio);
        assert_eq!(s.failed_ticks, 1);
        assert_eq!(s.state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_treasure_drop_becomes_item() {
        let (mut s, mut scene, mut audio) = session();
        s.frame(16.0, &mut scene, &mut audio);

        let treasure = s
            .state
            .universe
            .planets
            .iter_mut()
            .find(|p| p.is_treasure())
            .unwrap();
        treasure.entity.kill();
        let (id, pos) = (treasure.entity.id, treasure.entity.pos);

        s.frame(16.0, &mut scene, &mut audio);
        assert!(scene.get(id).is_none());
        assert_eq!(s.state.universe.items.len(), 1);
        let item = &s.state.universe.items[0];
        assert_eq!(item.pos(), pos);
        assert_eq!(item.radius(), s.state.player.radius * s.state.tuning.item_radius_factor);
        assert_eq!(scene.get(item.id()).map(|sp| sp.kind), Some(EntityKind::Item));
    }

    #[test]
    fn test_debug_key_is_one_shot() {
        let (mut s, mut scene, mut audio) = session();
        assert!(s.key("`", true));
        s.frame(16.0, &mut scene, &mut audio);
        assert_eq!(s.state.player.level, 1);
        assert!(!s.keys.debug);
        assert!(audio.played.iter().any(|id| id == "evolve"));

        s.frame(16.0, &mut scene, &mut audio);
        assert_eq!(s.state.player.level, 1);
        assert!(s.camera().zoom < 1.0);
    }

    #[test]
    fn test_thruster_loop_follows_key() {
        let (mut s, mut scene, mut audio) = session();
        s.key("w", true);
        s.frame(16.0, &mut scene, &mut audio);
        assert_eq!(audio.loops.get("thruster"), Some(&1.0));
        s.key("w", false);
        s.frame(16.0, &mut scene, &mut audio);
        assert_eq!(audio.loops.get("thruster"), Some(&0.0));
    }
}
