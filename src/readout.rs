//! Read-only views of the simulation for the dashboard and graphs

use serde::{Deserialize, Serialize};

use crate::round_sample;
use crate::sim::{Level, MotionState, SamplePoint};

/// Dashboard snapshot, recomputed per render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readout {
    pub level: Level,
    pub moving: bool,
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub distance: f64,
    /// Signed offset from the starting position
    pub displacement: f64,
    /// |velocity|
    pub speed: f64,
    pub average_speed: f64,
    pub average_velocity: f64,
    pub min_position_reached: f64,
    pub max_position_reached: f64,
    pub track_min: f64,
    pub track_max: f64,
    pub initial_position: f64,
}

impl Readout {
    pub fn capture(level: Level, state: &MotionState, moving: bool) -> Self {
        let profile = level.profile();
        let displacement = state.position - profile.initial_position;
        let (average_speed, average_velocity) = if state.time > 0.0 {
            (state.distance / state.time, displacement / state.time)
        } else {
            (0.0, 0.0)
        };

        Self {
            level,
            moving,
            time: state.time,
            position: state.position,
            velocity: state.velocity,
            acceleration: state.acceleration,
            distance: state.distance,
            displacement,
            speed: state.velocity.abs(),
            average_speed,
            average_velocity,
            min_position_reached: state.min_position_reached,
            max_position_reached: state.max_position_reached,
            track_min: profile.track_min,
            track_max: profile.track_max,
            initial_position: profile.initial_position,
        }
    }

    /// Position as a fraction of the track, 0 at `track_min`
    pub fn track_fraction(&self, position: f64) -> f64 {
        (position - self.track_min) / (self.track_max - self.track_min)
    }

    /// Fractional span `(start, width)` of the traveled-path overlay
    pub fn traveled_span(&self) -> (f64, f64) {
        let start = self.track_fraction(self.min_position_reached);
        let end = self.track_fraction(self.max_position_reached);
        (start, end - start)
    }

    /// Fractional span `(start, width)` of the displacement arrow
    pub fn displacement_span(&self) -> (f64, f64) {
        let a = self.track_fraction(self.initial_position);
        let b = self.track_fraction(self.position);
        (a.min(b), (a - b).abs())
    }
}

/// A time-series chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphKind {
    Distance,
    Displacement,
    Velocity,
}

impl GraphKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphKind::Distance => "distance",
            GraphKind::Displacement => "displacement",
            GraphKind::Velocity => "velocity",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            GraphKind::Distance | GraphKind::Displacement => "m",
            GraphKind::Velocity => "m/s",
        }
    }

    /// Value of this quantity at one sample
    pub fn value(&self, sample: &SamplePoint, initial_position: f64) -> f64 {
        match self {
            GraphKind::Distance => sample.distance,
            // Rounded again so the plotted value stays at sample precision
            GraphKind::Displacement => round_sample(sample.position - initial_position),
            GraphKind::Velocity => sample.velocity,
        }
    }

    /// `(time, value)` points for the whole history
    pub fn series(&self, history: &[SamplePoint], initial_position: f64) -> Vec<(f64, f64)> {
        history
            .iter()
            .map(|s| (s.time, self.value(s, initial_position)))
            .collect()
    }
}
