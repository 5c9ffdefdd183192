//! Wall-clock driven integration step
//!
//! Advances a `MotionState` by the real time elapsed between two frames.
//! Position uses trapezoidal integration of velocity; both are clamped to the
//! level limits and distance is measured on the clamped position.

use super::level::LevelProfile;
use super::state::MotionState;
use crate::consts::MAX_FRAME_DT;

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepResult {
    /// Frame delta was too large (or invalid) and nothing was integrated
    pub skipped: bool,
    /// Moving state ran into the wall in its direction of travel
    pub hit_boundary: bool,
    /// Path length added this step
    pub distance_delta: f64,
}

/// Advance `state` by `dt` seconds
pub fn step(state: &mut MotionState, dt: f64, profile: &LevelProfile, moving: bool) -> StepResult {
    if !dt.is_finite() || dt < 0.0 || dt > MAX_FRAME_DT {
        log::debug!("Skipping frame with dt={:.3}s", dt);
        return StepResult {
            skipped: true,
            ..Default::default()
        };
    }

    let old_position = state.position;
    let mut new_position = old_position;

    if moving {
        let old_velocity = state.velocity;
        let new_velocity = profile.clamp_velocity(old_velocity + state.acceleration * dt);
        state.velocity = new_velocity;

        let avg_velocity = (old_velocity + new_velocity) / 2.0;
        new_position = profile.clamp_position(old_position + avg_velocity * dt);
    }

    let distance_delta = (new_position - old_position).abs();

    state.position = new_position;
    state.distance += distance_delta;
    state.time += dt;
    state.update_watermarks();

    let hit_boundary = moving
        && ((new_position == profile.track_max && state.velocity > 0.0)
            || (new_position == profile.track_min && state.velocity < 0.0));

    StepResult {
        skipped: false,
        hit_boundary,
        distance_delta,
    }
}
