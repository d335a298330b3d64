//! Game state and core simulation types
//!
//! One `GameState` is one independent run: its own RNG, entities, timers
//! and event queue. Nothing in the sim is global.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::EventQueue;
use super::player::Frank;
use super::timers::Timers;
use super::universe::Universe;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Reached the victory level, celebration timer running
    Victory,
    /// Victory celebration finished
    Ended,
    /// Out of fuel
    GameOver,
}

/// Held keys, sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    /// `w`: thrust forward
    pub up: bool,
    /// `a`: turn left
    pub left: bool,
    /// `s`: thrust backward
    pub down: bool,
    /// `d`: turn right
    pub right: bool,
    /// space: charge
    pub charge: bool,
    /// backtick: fill fullness (one-shot)
    pub debug: bool,
}

impl Keys {
    /// Update from a keyboard event key. Returns false for unmapped keys.
    pub fn set(&mut self, key: &str, down: bool) -> bool {
        let slot = match key {
            "w" | "W" => &mut self.up,
            "a" | "A" => &mut self.left,
            "s" | "S" => &mut self.down,
            "d" | "D" => &mut self.right,
            " " => &mut self.charge,
            "`" => &mut self.debug,
            _ => return false,
        };
        *slot = down;
        true
    }
}

/// Visible world rectangle (top-left origin) plus zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::centered_on(Vec2::ZERO, 1280.0, 720.0, 1.0)
    }
}

impl Camera {
    /// Camera showing a `viewport_w` x `viewport_h` screen around `center`
    pub fn centered_on(center: Vec2, viewport_w: f32, viewport_h: f32, zoom: f32) -> Self {
        let width = viewport_w / zoom;
        let height = viewport_h / zoom;
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
            zoom,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Random point on the rectangle's edge, pushed `offset` further out
    pub fn perimeter_point(&self, rng: &mut impl Rng, offset: f32) -> Vec2 {
        let perimeter = 2.0 * (self.width + self.height);
        let mut t = rng.random::<f32>() * perimeter;

        if t < self.width {
            return Vec2::new(self.x + t, self.y - offset);
        }
        t -= self.width;
        if t < self.height {
            return Vec2::new(self.x + self.width + offset, self.y + t);
        }
        t -= self.height;
        if t < self.width {
            return Vec2::new(self.x + self.width - t, self.y + self.height + offset);
        }
        t -= self.width;
        Vec2::new(self.x - offset, self.y + self.height - t.min(self.height))
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulated time (ms)
    pub time_ms: f64,
    pub player: Frank,
    pub universe: Universe,
    pub timers: Timers,
    pub events: EventQueue,
}

impl GameState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a new run with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, SimError> {
        tuning
            .validate()
            .map_err(|e| SimError::InvalidTuning(e.to_string()))?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let player = Frank::new(&tuning);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ms: 0.0,
            universe: Universe::default(),
            timers: Timers {
                enemy_spawn: tuning.enemy_spawn_interval_ms,
                ..Default::default()
            },
            events: EventQueue::default(),
            player,
            tuning,
        };

        // First belt sits one spacing out so the player starts in open space
        state.universe.spawn_belt(
            1,
            state.player.radius,
            &state.tuning,
            &mut state.rng,
            &mut state.events,
        );

        state
    }

    /// Next belt index for the current level
    pub fn next_belt_index(&self) -> u32 {
        self.player.level + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_first_belt() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.universe.belts_spawned, 1);
        assert!(state.universe.planets.iter().any(|p| p.is_treasure()));
        assert!(!state.events.is_empty());
    }

    #[test]
    fn test_bad_tuning_is_rejected() {
        let tuning = Tuning { max_fuel: -1.0, ..Default::default() };
        assert!(matches!(GameState::with_tuning(1, tuning), Err(SimError::InvalidTuning(_))));
    }

    #[test]
    fn test_key_mapping() {
        let mut keys = Keys::default();
        assert!(keys.set("w", true));
        assert!(keys.set(" ", true));
        assert!(!keys.set("q", true));
        assert!(keys.up && keys.charge);
        keys.set("W", false);
        assert!(!keys.up);
    }

    #[test]
    fn test_perimeter_points_lie_outside_view() {
        let cam = Camera::centered_on(Vec2::new(100.0, -50.0), 800.0, 600.0, 0.5);
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let p = cam.perimeter_point(&mut rng, 40.0);
            let inside = p.x > cam.x && p.x < cam.x + cam.width && p.y > cam.y && p.y < cam.y + cam.height;
            assert!(!inside);
            let dx = (p.x - cam.center().x).abs() - cam.width / 2.0;
            let dy = (p.y - cam.center().y).abs() - cam.height / 2.0;
            assert!((dx.max(dy) - 40.0).abs() < 1e-2);
        }
    }
}
