//! History sampling policy
//!
//! Regular samples are rate limited to `SAMPLE_INTERVAL`; terminal events
//! (boundary stop, pause, position edits) always get a sample so graphs end
//! exactly where the motion did.

use super::state::{MotionState, SamplePoint};
use crate::consts::{SAMPLE_INTERVAL, SYNC_TOLERANCE};

/// Append decision for a regular step
#[inline]
pub fn should_sample(last_sample_time: f64, current_time: f64, forced: bool) -> bool {
    forced || current_time - last_sample_time > SAMPLE_INTERVAL
}

/// Whether the last sample lags the clock enough to need a closing sample
#[inline]
pub fn needs_sync(last_sample_time: f64, current_time: f64) -> bool {
    (current_time - last_sample_time).abs() > SYNC_TOLERANCE
}

/// Sample after an integration step. Returns true if a sample was appended.
pub fn record_step(state: &mut MotionState, forced: bool) -> bool {
    if should_sample(state.last_sample().time, state.time, forced) {
        state.record_sample();
        true
    } else {
        false
    }
}

/// Close the gap between the last sample and the clock (on stop)
pub fn sync_on_stop(state: &mut MotionState) -> bool {
    if needs_sync(state.last_sample().time, state.time) {
        state.record_sample();
        true
    } else {
        false
    }
}

/// Record a direct position jump from `from` to the current position.
///
/// Emits a "before" sample unless the last sample already sits at `from` at
/// the current time, then an "after" sample at the same instant. The vehicle
/// is at rest during a scrub, so both carry zero velocity and acceleration.
pub fn record_jump(state: &mut MotionState, from: f64, distance_before: f64) -> usize {
    let before = SamplePoint::rounded(state.time, from, distance_before, 0.0, 0.0);
    let after = SamplePoint::rounded(state.time, state.position, state.distance, 0.0, 0.0);

    let last = *state.last_sample();
    let mut appended = 0;
    if last.time < before.time || (last.position - before.position).abs() > SYNC_TOLERANCE {
        state.push_sample(before);
        appended += 1;
    }
    state.push_sample(after);
    appended + 1
}
