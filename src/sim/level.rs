//! Difficulty levels and their static track configuration

use serde::{Deserialize, Serialize};

use crate::readout::GraphKind;

/// Learning level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Level {
    /// Distance only, forward motion
    #[default]
    Level1,
    /// Two directions, displacement
    Level2,
    /// Distance and displacement side by side
    Level3,
    /// Wide velocity range and direct position control
    Level4,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Level1, Level::Level2, Level::Level3, Level::Level4];

    /// Levels offered in the level picker
    pub const SELECTABLE: [Level; 3] = [Level::Level1, Level::Level2, Level::Level3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Level1 => "Level 1",
            Level::Level2 => "Level 2",
            Level::Level3 => "Level 3",
            Level::Level4 => "Level 4",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "level 1" | "level1" | "1" => Some(Level::Level1),
            "level 2" | "level2" | "2" => Some(Level::Level2),
            "level 3" | "level3" | "3" => Some(Level::Level3),
            "level 4" | "level4" | "4" => Some(Level::Level4),
            _ => None,
        }
    }

    /// Static profile for this level
    pub fn profile(&self) -> &'static LevelProfile {
        match self {
            Level::Level1 => &LEVEL_1,
            Level::Level2 => &LEVEL_2,
            Level::Level3 => &LEVEL_3,
            Level::Level4 => &LEVEL_4,
        }
    }

    /// Whether the position slider is available
    pub fn allows_position_edit(&self) -> bool {
        matches!(self, Level::Level4)
    }

    /// Whether displacement and signed velocity are shown
    pub fn shows_displacement(&self) -> bool {
        !matches!(self, Level::Level1)
    }

    /// Whether scalar speed and average speed are shown
    pub fn shows_speed(&self) -> bool {
        !matches!(self, Level::Level2)
    }

    /// Graphs drawn for this level, in display order
    pub fn graphs(&self) -> &'static [GraphKind] {
        match self {
            Level::Level1 => &[GraphKind::Distance],
            Level::Level2 => &[GraphKind::Displacement],
            Level::Level3 => &[GraphKind::Distance, GraphKind::Displacement],
            Level::Level4 => &[GraphKind::Distance, GraphKind::Velocity],
        }
    }
}

/// Track and velocity limits for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelProfile {
    pub track_min: f64,
    pub track_max: f64,
    pub vel_min: f64,
    pub vel_max: f64,
    pub initial_position: f64,
    /// Acceleration limits; `None` pins acceleration at zero
    pub accel_bounds: Option<(f64, f64)>,
    pub description: &'static str,
}

impl LevelProfile {
    pub fn clamp_position(&self, position: f64) -> f64 {
        crate::clamp_to(position, self.track_min, self.track_max)
    }

    pub fn clamp_velocity(&self, velocity: f64) -> f64 {
        crate::clamp_to(velocity, self.vel_min, self.vel_max)
    }

    pub fn track_length(&self) -> f64 {
        self.track_max - self.track_min
    }

    /// True if `velocity` would push further into the wall at `position`
    pub fn pressing_wall(&self, position: f64, velocity: f64) -> bool {
        (position >= self.track_max && velocity > 0.0)
            || (position <= self.track_min && velocity < 0.0)
    }
}

const LEVEL_1: LevelProfile = LevelProfile {
    track_min: 0.0,
    track_max: 100.0,
    vel_min: 0.0,
    vel_max: 10.0,
    initial_position: 0.0,
    accel_bounds: None,
    description: "Distance-only tracking with simple linear motion.",
};

const LEVEL_2: LevelProfile = LevelProfile {
    track_min: -50.0,
    track_max: 50.0,
    vel_min: -10.0,
    vel_max: 10.0,
    initial_position: 0.0,
    accel_bounds: None,
    description: "Introduce displacement by allowing movement in two directions.",
};

const LEVEL_3: LevelProfile = LevelProfile {
    track_min: -50.0,
    track_max: 50.0,
    vel_min: -10.0,
    vel_max: 10.0,
    initial_position: 0.0,
    accel_bounds: None,
    description: "Compare distance and displacement using side-by-side graphs.",
};

const LEVEL_4: LevelProfile = LevelProfile {
    track_min: -50.0,
    track_max: 50.0,
    vel_min: -20.0,
    vel_max: 20.0,
    initial_position: 0.0,
    accel_bounds: None,
    description: "Advanced motion analysis with a wider range of velocities.",
};
