//! Countdown timers ticked once per frame
//!
//! Plain millisecond countdowns, decremented by the frame delta and clamped
//! at zero. A timer is "running" while it is above zero.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    /// Red flash after taking damage
    pub damage_flash: f32,
    /// Time until the next enemy may spawn
    pub enemy_spawn: f32,
    /// Victory celebration before the run ends
    pub victory: f32,
    /// Time until the charger can be primed again
    pub charge_cooldown: f32,
}

impl Timers {
    /// Decrement every running timer by `delta_ms`
    pub fn tick(&mut self, delta_ms: f32) {
        for timer in [
            &mut self.damage_flash,
            &mut self.enemy_spawn,
            &mut self.victory,
            &mut self.charge_cooldown,
        ] {
            if *timer > 0.0 {
                *timer = (*timer - delta_ms).max(0.0);
            }
        }
    }
}
