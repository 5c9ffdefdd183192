//! Motion state and history samples
//!
//! A `MotionState` lives for exactly one session: it is replaced wholesale on
//! reset or level change, never patched back to its initial values.

use serde::{Deserialize, Serialize};

use super::level::LevelProfile;
use crate::round_sample;

/// Rounded snapshot appended to the history for charting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub time: f64,
    pub position: f64,
    pub distance: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

impl SamplePoint {
    /// Snapshot of `state`, rounded to sample precision
    pub fn of(state: &MotionState) -> Self {
        Self::rounded(
            state.time,
            state.position,
            state.distance,
            state.velocity,
            state.acceleration,
        )
    }

    pub fn rounded(time: f64, position: f64, distance: f64, velocity: f64, acceleration: f64) -> Self {
        Self {
            time: round_sample(time),
            position: round_sample(position),
            distance: round_sample(distance),
            velocity: round_sample(velocity),
            acceleration: round_sample(acceleration),
        }
    }
}

/// Live kinematic state (full precision)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionState {
    /// Seconds since the last reset
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
    /// Total path length, never decreases
    pub distance: f64,
    pub min_position_reached: f64,
    pub max_position_reached: f64,
    /// Append-only, time-ordered, never empty
    history: Vec<SamplePoint>,
}

impl MotionState {
    /// Fresh state at the profile's starting position
    pub fn new(profile: &LevelProfile) -> Self {
        let start = profile.initial_position;
        let mut state = Self {
            time: 0.0,
            position: start,
            velocity: 0.0,
            acceleration: 0.0,
            distance: 0.0,
            min_position_reached: start,
            max_position_reached: start,
            history: Vec::with_capacity(256),
        };
        let origin = SamplePoint::of(&state);
        state.history.push(origin);
        state
    }

    pub fn history(&self) -> &[SamplePoint] {
        &self.history
    }

    /// Most recent sample (history is never empty)
    pub fn last_sample(&self) -> &SamplePoint {
        // The constructor seeds the t=0 sample and nothing removes samples
        &self.history[self.history.len() - 1]
    }

    /// Append a snapshot of the current state
    pub fn record_sample(&mut self) {
        let sample = SamplePoint::of(self);
        self.push_sample(sample);
    }

    /// Append an explicit sample; out-of-order samples are dropped
    pub(crate) fn push_sample(&mut self, sample: SamplePoint) {
        if sample.time < self.last_sample().time {
            log::warn!(
                "Dropping out-of-order sample at t={} (last t={})",
                sample.time,
                self.last_sample().time
            );
            return;
        }
        self.history.push(sample);
    }

    /// Extend the min/max watermarks to cover the current position
    pub fn update_watermarks(&mut self) {
        self.min_position_reached = self.min_position_reached.min(self.position);
        self.max_position_reached = self.max_position_reached.max(self.position);
    }
}
