//! Frank Eats the Universe - a belt-spawning space arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, belts, collisions, player state)
//! - `tuning`: Data-driven game balance
//! - `session`: Host-side frame loop that feeds the sim and drains its events
//! - `present`: Rendering/audio collaborator interfaces

pub mod error;
pub mod present;
pub mod session;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use error::{SimError, TuningError};
pub use session::GameSession;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Largest frame delta the host will hand to the sim (ms)
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    /// Fullness needed to evolve
    pub const FULLNESS_GOAL: f32 = 10.0;
    /// Player radius at level 0
    pub const PLAYER_BASE_RADIUS: f32 = 50.0;
    /// Log growth coefficient below the regime seam
    pub const GROWTH_EARLY: f32 = 35.0;
    /// Log growth coefficient above the regime seam
    pub const GROWTH_LATE: f32 = 70.0;
    /// Level at which the growth curve switches regime
    pub const GROWTH_SEAM_LEVEL: u32 = 147;

    /// Player movement (px/s, px/s², scaled by radius / base radius)
    pub const PLAYER_ACCELERATION: f32 = 600.0;
    pub const PLAYER_MAX_SPEED: f32 = 400.0;
    /// Multipliers applied while charging
    pub const CHARGE_ACCEL_MULT: f32 = 4.0;
    pub const CHARGE_SPEED_MULT: f32 = 4.0;
    /// Turn rate (rad/s)
    pub const PLAYER_TURN_RATE: f32 = 4.0;

    /// Jetpack fuel
    pub const MAX_FUEL: f32 = 1000.0;
    pub const FUEL_BURN_PER_SEC: f32 = 40.0;

    /// Charger timings (ms)
    pub const CHARGE_UP_DURATION_MS: f32 = 1000.0;
    pub const CHARGE_DURATION_MS: f32 = 400.0;
    pub const CHARGE_COOLDOWN_MS: f32 = 2000.0;
    pub const TAIL_REPLAY_INTERVAL_MS: f32 = 200.0;

    /// Timer registry durations (ms)
    pub const DAMAGE_FLASH_MS: f32 = 300.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: f32 = 4000.0;
    pub const VICTORY_DURATION_MS: f32 = 5000.0;

    /// Enemies
    pub const ENEMY_MAX_BASE: usize = 2;
    pub const ENEMY_CAP_LEVELS_PER_EXTRA: u32 = 2;
    pub const ENEMY_RADIUS_FACTOR: f32 = 0.9;
    pub const ENEMY_ACCELERATION: f32 = 300.0;
    pub const ENEMY_MAX_SPEED: f32 = 260.0;
    pub const ENEMY_SWEET_SPOT: f32 = 350.0;
    pub const ENEMY_ATTACK_RANGE: f32 = 600.0;
    pub const ENEMY_ATTACK_INTERVAL_MS: f32 = 1500.0;
    pub const ENEMY_HEALTH: f32 = 100.0;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 500.0;
    pub const PROJECTILE_TTL_MS: f32 = 3000.0;
    pub const PROJECTILE_DAMAGE: f32 = 40.0;
    pub const PROJECTILE_RADIUS_FACTOR: f32 = 0.25;

    /// Belts
    pub const BELT_PLANET_COUNT: u32 = 20;
    pub const PLANET_HEALTH: f32 = 100.0;
    /// Cosmetic planet spin (rad/s)
    pub const PLANET_SPIN: f32 = 0.2;
    /// World items are sized relative to the player at drop time
    pub const ITEM_RADIUS_FACTOR: f32 = 0.5;

    /// Level that wins the game
    pub const VICTORY_LEVEL: u32 = 30;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    if !angle.is_finite() {
        return angle;
    }
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unsigned shortest angular distance between two angles, in [0, π]
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
