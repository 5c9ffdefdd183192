//! Motion Track - a one-dimensional kinematics trainer
//!
//! Core modules:
//! - `sim`: Motion integration, sample history and user interaction
//! - `readout`: Read-only projections for the dashboard and graphs
//! - `settings`: Persisted user preferences

pub mod readout;
pub mod settings;
pub mod sim;

pub use readout::{GraphKind, Readout};
pub use settings::{Language, Settings};
pub use sim::{Controller, Level, LevelProfile, MotionState, SamplePoint};

/// Simulation configuration constants
pub mod consts {
    /// Frames further apart than this (seconds) are dropped, not integrated
    pub const MAX_FRAME_DT: f64 = 0.1;
    /// Minimum spacing between regular history samples (~25 Hz)
    pub const SAMPLE_INTERVAL: f64 = 0.04;
    /// Largest allowed gap between the last sample and the clock when stopped
    pub const SYNC_TOLERANCE: f64 = 0.01;
    /// Decimal places kept in history samples
    pub const SAMPLE_DECIMALS: i32 = 2;
}

/// Round to the fixed sample precision
#[inline]
pub fn round_sample(value: f64) -> f64 {
    let scale = 10f64.powi(consts::SAMPLE_DECIMALS);
    let rounded = (value * scale).round() / scale;
    // Avoid "-0" in samples
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Clamp `value` into `[min, max]` without panicking on inverted bounds
#[inline]
pub fn clamp_to(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
