//! Motion simulation module
//!
//! Everything that changes the vehicle's state lives here:
//! - Wall-clock integration only (no fixed timestep, no substeps)
//! - Single owner (`Controller`) for the live state
//! - No rendering or platform dependencies

pub mod controller;
pub mod history;
pub mod level;
pub mod state;
pub mod tick;

pub use controller::{Controller, FrameOutcome, FrameTicket, Motion};
pub use history::{record_step, should_sample, sync_on_stop};
pub use level::{Level, LevelProfile};
pub use state::{MotionState, SamplePoint};
pub use tick::{StepResult, step};
