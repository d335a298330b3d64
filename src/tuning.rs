//! Data-driven game balance
//!
//! Every field defaults to the matching constant in [`crate::consts`]. A JSON
//! override only needs the keys it wants to change:
//!
//! ```
//! let tuning = frank_eats::Tuning::from_json(r#"{ "fullness_goal": 4.0 }"#).unwrap();
//! assert_eq!(tuning.fullness_goal, 4.0);
//! assert_eq!(tuning.belt_planet_count, 20);
//! ```

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // --- Progression ---
    pub fullness_goal: f32,
    pub base_radius: f32,
    pub growth_early: f32,
    pub growth_late: f32,
    pub growth_seam_level: u32,
    pub victory_level: u32,
    pub victory_duration_ms: f32,

    // --- Player movement ---
    pub acceleration: f32,
    pub max_speed: f32,
    pub charge_accel_mult: f32,
    pub charge_speed_mult: f32,
    pub turn_rate: f32,

    // --- Jetpack / charger ---
    pub max_fuel: f32,
    pub fuel_burn_per_sec: f32,
    pub charge_up_duration_ms: f32,
    pub charge_duration_ms: f32,
    pub charge_cooldown_ms: f32,
    pub tail_replay_interval_ms: f32,
    pub damage_flash_ms: f32,

    // --- Enemies ---
    pub enemy_spawn_interval_ms: f32,
    pub enemy_max_base: usize,
    pub enemy_cap_levels_per_extra: u32,
    pub enemy_radius_factor: f32,
    pub enemy_acceleration: f32,
    pub enemy_max_speed: f32,
    pub enemy_sweet_spot: f32,
    pub enemy_attack_range: f32,
    pub enemy_attack_interval_ms: f32,
    pub enemy_health: f32,

    // --- Projectiles ---
    pub projectile_speed: f32,
    pub projectile_ttl_ms: f32,
    pub projectile_damage: f32,
    pub projectile_radius_factor: f32,

    // --- Belts ---
    pub belt_planet_count: u32,
    pub planet_health: f32,
    pub planet_spin: f32,
    pub item_radius_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fullness_goal: FULLNESS_GOAL,
            base_radius: PLAYER_BASE_RADIUS,
            growth_early: GROWTH_EARLY,
            growth_late: GROWTH_LATE,
            growth_seam_level: GROWTH_SEAM_LEVEL,
            victory_level: VICTORY_LEVEL,
            victory_duration_ms: VICTORY_DURATION_MS,

            acceleration: PLAYER_ACCELERATION,
            max_speed: PLAYER_MAX_SPEED,
            charge_accel_mult: CHARGE_ACCEL_MULT,
            charge_speed_mult: CHARGE_SPEED_MULT,
            turn_rate: PLAYER_TURN_RATE,

            max_fuel: MAX_FUEL,
            fuel_burn_per_sec: FUEL_BURN_PER_SEC,
            charge_up_duration_ms: CHARGE_UP_DURATION_MS,
            charge_duration_ms: CHARGE_DURATION_MS,
            charge_cooldown_ms: CHARGE_COOLDOWN_MS,
            tail_replay_interval_ms: TAIL_REPLAY_INTERVAL_MS,
            damage_flash_ms: DAMAGE_FLASH_MS,

            enemy_spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
            enemy_max_base: ENEMY_MAX_BASE,
            enemy_cap_levels_per_extra: ENEMY_CAP_LEVELS_PER_EXTRA,
            enemy_radius_factor: ENEMY_RADIUS_FACTOR,
            enemy_acceleration: ENEMY_ACCELERATION,
            enemy_max_speed: ENEMY_MAX_SPEED,
            enemy_sweet_spot: ENEMY_SWEET_SPOT,
            enemy_attack_range: ENEMY_ATTACK_RANGE,
            enemy_attack_interval_ms: ENEMY_ATTACK_INTERVAL_MS,
            enemy_health: ENEMY_HEALTH,

            projectile_speed: PROJECTILE_SPEED,
            projectile_ttl_ms: PROJECTILE_TTL_MS,
            projectile_damage: PROJECTILE_DAMAGE,
            projectile_radius_factor: PROJECTILE_RADIUS_FACTOR,

            belt_planet_count: BELT_PLANET_COUNT,
            planet_health: PLANET_HEALTH,
            planet_spin: PLANET_SPIN,
            item_radius_factor: ITEM_RADIUS_FACTOR,
        }
    }
}

impl Tuning {
    /// Parse a (partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the sim
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("fullness_goal", self.fullness_goal),
            ("base_radius", self.base_radius),
            ("acceleration", self.acceleration),
            ("max_speed", self.max_speed),
            ("max_fuel", self.max_fuel),
            ("charge_up_duration_ms", self.charge_up_duration_ms),
            ("charge_duration_ms", self.charge_duration_ms),
            ("enemy_radius_factor", self.enemy_radius_factor),
            ("projectile_radius_factor", self.projectile_radius_factor),
            ("projectile_speed", self.projectile_speed),
            ("planet_health", self.planet_health),
            ("item_radius_factor", self.item_radius_factor),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid { field, reason: "must be a positive number" });
            }
        }
        if self.charge_accel_mult < 1.0 || self.charge_speed_mult < 1.0 {
            return Err(TuningError::Invalid {
                field: "charge_speed_mult",
                reason: "charging must not be slower than normal flight",
            });
        }
        if self.belt_planet_count == 0 {
            return Err(TuningError::Invalid { field: "belt_planet_count", reason: "must be at least 1" });
        }
        if self.enemy_cap_levels_per_extra == 0 {
            return Err(TuningError::Invalid {
                field: "enemy_cap_levels_per_extra",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Enemy population cap for a player level
    pub fn enemy_cap(&self, level: u32) -> usize {
        self.enemy_max_base + (level / self.enemy_cap_levels_per_extra) as usize
    }
}
