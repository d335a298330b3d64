//! Charge dash state machine
//!
//! ```text
//!            hold && cooldown done
//!   Normal ──────────────────────────▶ PreCharging
//!     ▲  ▲                                 │
//!     │  └──── release before full ────────┤
//!     │                                    │ release when full
//!     └──── charge timer elapsed ──── Charging ◀┘
//! ```
//!
//! The charger owns its own timers; the shared cooldown lives in
//! [`super::timers::Timers`] and is only read here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChargeState {
    #[default]
    Normal,
    PreCharging,
    Charging,
}

/// Durations for one update (ms), already item-modified
#[derive(Debug, Clone, Copy)]
pub struct ChargeParams {
    pub charge_up_duration: f32,
    pub charge_duration: f32,
    pub tail_interval: f32,
}

/// State changes reported back to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeTransition {
    /// Normal -> PreCharging
    Primed,
    /// PreCharging -> Normal, released too early
    Cancelled,
    /// PreCharging -> Charging; the caller launches the dash and starts the cooldown
    Released,
    /// Charging -> Normal
    Finished,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChargeStep {
    pub transition: Option<ChargeTransition>,
    /// Replay the charged-up cue
    pub tail_replay: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Charger {
    state: ChargeState,
    charge_up_timer: f32,
    charge_timer: f32,
    tail_timer: f32,
}

impl Charger {
    pub fn state(&self) -> ChargeState {
        self.state
    }

    pub fn charge_up_timer(&self) -> f32 {
        self.charge_up_timer
    }

    pub fn is_charging(&self) -> bool {
        self.state == ChargeState::Charging
    }

    /// Charge-up progress in [0, 1]
    pub fn progress(&self, charge_up_duration: f32) -> f32 {
        if charge_up_duration <= 0.0 {
            return 1.0;
        }
        (self.charge_up_timer / charge_up_duration).clamp(0.0, 1.0)
    }

    /// Advance the machine by one tick
    pub fn update(&mut self, held: bool, cooldown: f32, delta_ms: f32, params: &ChargeParams) -> ChargeStep {
        let mut step = ChargeStep::default();

        match self.state {
            ChargeState::Normal => {
                if held && cooldown <= 0.0 {
                    self.state = ChargeState::PreCharging;
                    self.charge_up_timer = 0.0;
                    self.tail_timer = 0.0;
                    step.transition = Some(ChargeTransition::Primed);
                }
            }
            ChargeState::PreCharging => {
                let full = self.charge_up_timer >= params.charge_up_duration;
                if !held {
                    if full {
                        self.state = ChargeState::Charging;
                        self.charge_timer = params.charge_duration;
                        step.transition = Some(ChargeTransition::Released);
                    } else {
                        self.state = ChargeState::Normal;
                        step.transition = Some(ChargeTransition::Cancelled);
                    }
                    self.charge_up_timer = 0.0;
                } else if full {
                    self.tail_timer -= delta_ms;
                    if self.tail_timer <= 0.0 {
                        self.tail_timer = params.tail_interval;
                        step.tail_replay = true;
                    }
                } else {
                    self.charge_up_timer = (self.charge_up_timer + delta_ms).min(params.charge_up_duration);
                }
            }
            ChargeState::Charging => {
                self.charge_timer = (self.charge_timer - delta_ms).max(0.0);
                if self.charge_timer <= 0.0 {
                    self.state = ChargeState::Normal;
                    step.transition = Some(ChargeTransition::Finished);
                }
            }
        }

        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: ChargeParams = ChargeParams {
        charge_up_duration: 100.0,
        charge_duration: 50.0,
        tail_interval: 200.0,
    };

    #[test]
    fn test_cooldown_blocks_priming() {
        let mut c = Charger::default();
        let step = c.update(true, 10.0, 16.0, &PARAMS);
        assert_eq!(step.transition, None);
        assert_eq!(c.state(), ChargeState::Normal);
    }

    #[test]
    fn test_early_release_cancels() {
        let mut c = Charger::default();
        assert_eq!(c.update(true, 0.0, 16.0, &PARAMS).transition, Some(ChargeTransition::Primed));
        c.update(true, 0.0, 40.0, &PARAMS);
        assert_eq!(c.charge_up_timer(), 40.0);
        let step = c.update(false, 0.0, 16.0, &PARAMS);
        assert_eq!(step.transition, Some(ChargeTransition::Cancelled));
        assert_eq!(c.state(), ChargeState::Normal);
        assert_eq!(c.charge_up_timer(), 0.0);
    }

    #[test]
    fn test_full_charge_release_then_finish() {
        let mut c = Charger::default();
        c.update(true, 0.0, 16.0, &PARAMS);
        c.update(true, 0.0, 60.0, &PARAMS);
        c.update(true, 0.0, 60.0, &PARAMS);
        assert_eq!(c.charge_up_timer(), 100.0);
        assert_eq!(c.progress(PARAMS.charge_up_duration), 1.0);

        let step = c.update(false, 0.0, 16.0, &PARAMS);
        assert_eq!(step.transition, Some(ChargeTransition::Released));
        assert!(c.is_charging());

        // Input is ignored mid-charge
        assert_eq!(c.update(true, 0.0, 20.0, &PARAMS).transition, None);
        assert_eq!(c.update(false, 0.0, 20.0, &PARAMS).transition, None);
        assert_eq!(c.update(true, 0.0, 20.0, &PARAMS).transition, Some(ChargeTransition::Finished));
        assert_eq!(c.state(), ChargeState::Normal);
    }

    #[test]
    fn test_tail_replay_rate_limited() {
        let mut c = Charger::default();
        c.update(true, 0.0, 16.0, &PARAMS);
        c.update(true, 0.0, 100.0, &PARAMS);
        let replays = (0..30)
            .filter(|_| c.update(true, 0.0, 20.0, &PARAMS).tail_replay)
            .count();
        // 600 ms held at full charge: t=0, 200, 400
        assert_eq!(replays, 3);
    }
}
