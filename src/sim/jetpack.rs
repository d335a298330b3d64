//! Jetpack fuel
//!
//! Fuel is the player's only health pool: thrusting burns it, hard crashes
//! and enemy shots take chunks out of it. Running dry just means no more
//! thrust.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jetpack {
    fuel: f32,
    /// Was thrust applied last tick (drives the thruster loop sound)
    thrusting: bool,
}

impl Jetpack {
    pub fn new(max_fuel: f32) -> Self {
        Self {
            fuel: max_fuel,
            thrusting: false,
        }
    }

    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    pub fn is_empty(&self) -> bool {
        self.fuel <= 0.0
    }

    pub fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    /// Burn fuel for one tick of thrust. Returns false (and burns nothing)
    /// when the tank is empty or thrust isn't requested.
    pub fn burn(&mut self, wants_thrust: bool, delta_ms: f32, burn_per_sec: f32) -> bool {
        let thrust = wants_thrust && !self.is_empty();
        if thrust {
            self.fuel = (self.fuel - burn_per_sec * delta_ms / 1000.0).max(0.0);
        }
        self.thrusting = thrust;
        thrust
    }

    /// Remove fuel, returns how much was actually lost
    pub fn damage(&mut self, amount: f32) -> f32 {
        let lost = amount.min(self.fuel).max(0.0);
        self.fuel -= lost;
        lost
    }

    pub fn refill(&mut self, max_fuel: f32) {
        self.fuel = max_fuel;
    }

    /// Keep fuel within a (possibly shrunken) tank
    pub fn clamp(&mut self, max_fuel: f32) {
        self.fuel = self.fuel.min(max_fuel);
    }
}
