//! Simulation and configuration error types.
//!
//! A `SimError` means the world is in a state the sim refuses to keep
//! integrating (a radius that would divide by zero, NaN in the player's
//! kinematics). `tick` propagates these; only the host loop decides to log
//! and carry on.

use thiserror::Error;

/// Invariant violations detected during a simulation step
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// An entity taking part in collision has a non-positive or non-finite radius
    #[error("invalid radius {radius} on {context}")]
    InvalidRadius { context: &'static str, radius: f32 },

    /// Player kinematics went NaN/inf
    #[error("non-finite value in {context}")]
    NonFinite { context: &'static str },

    /// Tuning failed validation when the state was built
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

/// Errors raised while loading gameplay tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tuning field `{field}` {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Fail with [`SimError::InvalidRadius`] unless `radius` is finite and positive
pub(crate) fn check_radius(context: &'static str, radius: f32) -> Result<(), SimError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidRadius { context, radius })
    }
}
