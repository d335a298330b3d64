//! One simulation step
//!
//! Advances the game state by a host-supplied delta. Order within a tick:
//! timers, phase bookkeeping, player, player collisions, evolution, fuel
//! check, then the rest of the universe. After game over the player only
//! drifts: collisions and evolution are skipped.

use super::events::{GameEvent, SoundId};
use super::state::{Camera, GamePhase, GameState, Keys};
use crate::error::SimError;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Keys held this frame
    pub keys: Keys,
    /// Elapsed time since the previous tick (ms)
    pub delta_ms: f32,
    /// Visible world rectangle, used for enemy spawning and AI
    pub camera: Camera,
}

/// Advance the game state by `input.delta_ms`
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    let delta_ms = input.delta_ms;
    if !delta_ms.is_finite() || delta_ms < 0.0 {
        return Err(SimError::NonFinite { context: "tick delta" });
    }

    state.timers.tick(delta_ms);
    state.time_ms += delta_ms as f64;

    if state.phase == GamePhase::Victory && state.timers.victory <= 0.0 {
        log::info!("Victory celebration over after {:.1}s", state.time_ms / 1000.0);
        state.phase = GamePhase::Ended;
    }

    // An empty tank is final, the player only drifts from here
    let frozen = state.phase == GamePhase::GameOver;

    if input.keys.debug && !frozen {
        log::debug!("Debug fill at level {}", state.player.level);
        state.player.fullness = state.tuning.fullness_goal;
    }

    state.player.update(
        &input.keys,
        state.phase,
        delta_ms,
        &state.tuning,
        &mut state.timers,
        &mut state.events,
    )?;
    if !frozen {
        state.player.resolve_collisions(
            &mut state.universe,
            delta_ms,
            &state.tuning,
            &mut state.timers,
            &mut state.events,
        )?;

        if state.player.fullness >= state.tuning.fullness_goal {
            evolve(state);
        }
    }

    if state.phase == GamePhase::Playing && state.player.jetpack.is_empty() {
        log::info!(
            "Game over: out of fuel at level {} after {:.1}s",
            state.player.level,
            state.time_ms / 1000.0
        );
        state.phase = GamePhase::GameOver;
        state.events.emit(GameEvent::GameOver);
    }

    state.universe.update(
        &state.player,
        &input.camera,
        delta_ms,
        &state.tuning,
        &mut state.timers,
        &mut state.rng,
        &mut state.events,
    )
}

/// Level up and push the next belt out
fn evolve(state: &mut GameState) {
    state.player.evolve(&state.tuning);
    let level = state.player.level;
    log::info!("Evolved to level {} (radius {:.1})", level, state.player.radius);
    state.events.emit(GameEvent::Evolved { level });
    state.events.emit(GameEvent::Play(SoundId::Evolve));

    let index = state.next_belt_index();
    state.universe.spawn_belt(
        index,
        state.player.radius,
        &state.tuning,
        &mut state.rng,
        &mut state.events,
    );

    if state.phase == GamePhase::Playing && level >= state.tuning.victory_level {
        log::info!("Victory at level {}", level);
        state.phase = GamePhase::Victory;
        state.timers.victory = state.tuning.victory_duration_ms;
        state.events.emit(GameEvent::Victory);
    }
}
