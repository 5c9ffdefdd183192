//! User interaction against the running simulation
//!
//! The controller is the single owner of the live `MotionState`. The host
//! drives it with two kinds of calls:
//! - discrete edits (play/pause, velocity, position, level, reset), and
//! - frame callbacks carrying a `FrameTicket` obtained from `request_frame`.
//!
//! Every transition into `Stopped` cancels the pending ticket before touching
//! state, so a frame scheduled before a pause or reset is ignored when it
//! finally fires.

use super::history;
use super::level::{Level, LevelProfile};
use super::state::MotionState;
use super::tick;
use crate::readout::Readout;

/// Play/pause state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Motion {
    #[default]
    Stopped,
    Moving,
}

/// Handle for one scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket(u64);

/// Result of a frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Ticket was cancelled or superseded; nothing happened
    Stale,
    /// First frame after play: timestamp recorded, no integration
    Primed,
    /// Frame gap too large, dropped
    Skipped,
    /// State advanced
    Advanced { sampled: bool },
    /// State advanced into a wall and motion stopped
    BoundaryStop,
}

/// Why the vehicle stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopCause {
    Pause,
    Boundary,
    ZeroMotion,
    PositionEdit,
}

#[derive(Debug, Clone)]
pub struct Controller {
    level: Level,
    state: MotionState,
    motion: Motion,
    /// Currently scheduled frame, if any
    pending: Option<FrameTicket>,
    next_ticket: u64,
    /// Timestamp (ms) of the previous frame in this run
    last_timestamp: Option<f64>,
}

impl Controller {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            state: MotionState::new(level.profile()),
            motion: Motion::Stopped,
            pending: None,
            next_ticket: 1,
            last_timestamp: None,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn profile(&self) -> &'static LevelProfile {
        self.level.profile()
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn is_moving(&self) -> bool {
        self.motion == Motion::Moving
    }

    pub fn readout(&self) -> Readout {
        Readout::capture(self.level, &self.state, self.is_moving())
    }

    /// Start moving. Returns false if the start was rejected.
    pub fn play(&mut self) -> bool {
        if self.is_moving() {
            return false;
        }
        let state = &self.state;
        if state.velocity == 0.0 && state.acceleration == 0.0 {
            log::debug!("Play ignored: nothing would move");
            return false;
        }
        if self.profile().pressing_wall(state.position, state.velocity) {
            log::debug!("Play ignored: already at the wall (x={})", state.position);
            return false;
        }

        log::debug!("Moving at v={} from x={}", state.velocity, state.position);
        self.cancel_pending();
        self.motion = Motion::Moving;
        true
    }

    /// Stop moving. A no-op when already stopped.
    pub fn pause(&mut self) -> bool {
        if !self.is_moving() {
            return false;
        }
        self.stop(StopCause::Pause);
        true
    }

    pub fn toggle_play_pause(&mut self) -> bool {
        if self.is_moving() { self.pause() } else { self.play() }
    }

    /// Set velocity (clamped to the level range). Legal at any time.
    pub fn set_velocity(&mut self, velocity: f64) {
        self.state.velocity = self.profile().clamp_velocity(velocity);
        self.stop_if_motionless();
    }

    /// Set acceleration, clamped to the level range.
    ///
    /// Levels without acceleration bounds keep acceleration at zero.
    pub fn set_acceleration(&mut self, acceleration: f64) -> bool {
        let Some((min, max)) = self.profile().accel_bounds else {
            log::debug!("{} has no acceleration control", self.level.as_str());
            return false;
        };
        self.state.acceleration = crate::clamp_to(acceleration, min, max);
        self.stop_if_motionless();
        true
    }

    /// Move the vehicle directly. Stops motion first; counts as travel.
    pub fn set_position(&mut self, position: f64) -> bool {
        if !self.level.allows_position_edit() {
            log::debug!("{} has no position control", self.level.as_str());
            return false;
        }
        if self.is_moving() {
            self.stop(StopCause::PositionEdit);
        }

        let target = self.profile().clamp_position(position);
        let from = self.state.position;
        let distance_before = self.state.distance;

        self.state.distance += (target - from).abs();
        self.state.position = target;
        history::record_jump(&mut self.state, from, distance_before);
        self.state.update_watermarks();
        true
    }

    /// Discard the session and start over on the current level
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.motion = Motion::Stopped;
        self.state = MotionState::new(self.profile());
        log::info!("Simulation reset ({})", self.level.as_str());
    }

    /// Switch level; always starts a fresh session
    pub fn set_level(&mut self, level: Level) {
        if level != self.level {
            log::info!("Level {} -> {}", self.level.as_str(), level.as_str());
        }
        self.level = level;
        self.reset();
    }

    /// Ticket for the next frame, if one should be scheduled.
    ///
    /// Returns `None` when stopped or when a frame is already pending.
    pub fn request_frame(&mut self) -> Option<FrameTicket> {
        if !self.is_moving() || self.pending.is_some() {
            return None;
        }
        let ticket = FrameTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Frame callback. `timestamp_ms` is the host's monotonic frame clock.
    pub fn on_frame(&mut self, ticket: FrameTicket, timestamp_ms: f64) -> FrameOutcome {
        if self.pending != Some(ticket) || !self.is_moving() {
            return FrameOutcome::Stale;
        }
        self.pending = None;

        let Some(last) = self.last_timestamp.replace(timestamp_ms) else {
            return FrameOutcome::Primed;
        };
        let dt = (timestamp_ms - last) / 1000.0;

        let result = tick::step(&mut self.state, dt, self.level.profile(), true);
        if result.skipped {
            return FrameOutcome::Skipped;
        }

        let sampled = history::record_step(&mut self.state, result.hit_boundary);
        if result.hit_boundary {
            self.stop(StopCause::Boundary);
            return FrameOutcome::BoundaryStop;
        }
        FrameOutcome::Advanced { sampled }
    }

    fn stop_if_motionless(&mut self) {
        if self.is_moving() && self.state.velocity == 0.0 && self.state.acceleration == 0.0 {
            self.stop(StopCause::ZeroMotion);
        }
    }

    /// Invalidate any scheduled frame and restart the frame clock
    fn cancel_pending(&mut self) {
        self.pending = None;
        self.last_timestamp = None;
    }

    fn stop(&mut self, cause: StopCause) {
        self.cancel_pending();
        self.motion = Motion::Stopped;
        history::sync_on_stop(&mut self.state);
        match cause {
            StopCause::Boundary => log::info!("Boundary stop at x={}", self.state.position),
            _ => log::debug!("Stopped ({:?}) at t={:.2}", cause, self.state.time),
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Level::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SYNC_TOLERANCE;
    use proptest::prelude::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Drive the frame loop like a host would, starting at `start_ms`
    fn run_frames(c: &mut Controller, start_ms: f64, frames: usize) -> f64 {
        let mut now = start_ms;
        for _ in 0..frames {
            let Some(ticket) = c.request_frame() else { break };
            c.on_frame(ticket, now);
            now += FRAME_MS;
        }
        now
    }

    fn assert_synced(c: &Controller) {
        let state = c.state();
        assert!(
            (state.last_sample().time - state.time).abs() <= SYNC_TOLERANCE,
            "last sample t={} vs clock t={}",
            state.last_sample().time,
            state.time
        );
    }

    #[test]
    fn test_play_rejected_without_motion() {
        let mut c = Controller::new(Level::Level2);
        assert!(!c.play());
        assert_eq!(c.motion(), Motion::Stopped);
        assert!(c.request_frame().is_none());
    }

    #[test]
    fn test_play_rejected_against_wall() {
        let mut c = Controller::new(Level::Level1);
        c.set_velocity(10.0);
        assert!(c.play());
        run_frames(&mut c, 0.0, 2000);
        assert_eq!(c.state().position, 100.0);
        assert!(!c.is_moving());

        // Still pointing at the wall
        assert!(!c.play());
    }

    #[test]
    fn test_first_frame_only_primes() {
        let mut c = Controller::new(Level::Level2);
        c.set_velocity(5.0);
        c.play();
        let t = c.request_frame().unwrap();
        assert_eq!(c.on_frame(t, 1000.0), FrameOutcome::Primed);
        assert_eq!(c.state().time, 0.0);

        let t = c.request_frame().unwrap();
        assert!(matches!(c.on_frame(t, 1050.0), FrameOutcome::Advanced { .. }));
        assert!((c.state().time - 0.05).abs() < 1e-12);
        assert!((c.state().position - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_only_one_frame_pending() {
        let mut c = Controller::new(Level::Level2);
        c.set_velocity(5.0);
        c.play();
        assert!(c.request_frame().is_some());
        assert!(c.request_frame().is_none());
    }

    #[test]
    fn test_large_gap_skipped() {
        let mut c = Controller::new(Level::Level2);
        c.set_velocity(5.0);
        c.play();
        let now = run_frames(&mut c, 0.0, 3);
        let before = c.state().clone();
        let t = c.request_frame().unwrap();
        assert_eq!(c.on_frame(t, now + 5000.0), FrameOutcome::Skipped);
        assert_eq!(c.state(), &before);
        assert!(c.is_moving());
    }

    #[test]
    fn test_boundary_stop_forces_sample() {
        let mut c = Controller::new(Level::Level1);
        c.set_velocity(10.0);
        c.play();
        let mut now = 0.0;
        let mut outcome = FrameOutcome::Stale;
        for _ in 0..2000 {
            let Some(t) = c.request_frame() else { break };
            outcome = c.on_frame(t, now);
            now += FRAME_MS;
        }
        assert_eq!(outcome, FrameOutcome::BoundaryStop);
        assert_eq!(c.motion(), Motion::Stopped);
        assert_eq!(c.state().last_sample().position, 100.0);
        assert!((c.state().distance - 100.0).abs() < 1e-9);
        assert_synced(&c);
    }

    #[test]
    fn test_pause_syncs_history_and_is_idempotent() {
        let mut c = Controller::new(Level::Level2);
        c.set_velocity(-3.0);
        c.play();
        run_frames(&mut c, 0.0, 10);
        assert!(c.pause());
        assert_synced(&c);

        let len = c.state().history().len();
        let snapshot = c.state().clone();
        assert!(!c.pause());
        assert_eq!(c.state().history().len(), len);
        assert_eq!(c.state(), &snapshot);
    }

    #[test]
    fn test_stale_frame_after_pause_is_ignored() {
        let mut c = Controller::new(Level::Level2);
        c.set_velocity(4.0);
        c.play();
        let now = run_frames(&mut c, 0.0, 5);
        let in_flight = c.request_frame().unwrap();
        c.pause();
        let snapshot = c.state().clone();
        assert_eq!(c.on_frame(in_flight, now), FrameOutcome::Stale);
        assert_eq!(c.state(), &snapshot);

        // Resuming issues a new ticket; the old one stays dead
        c.play();
        let fresh = c.request_frame().unwrap();
        assert_ne!(fresh, in_flight);
        assert_eq!(c.on_frame(in_flight, now + FRAME_MS), FrameOutcome::Stale);
        assert_eq!(c.on_frame(fresh, now + FRAME_MS), FrameOutcome::Primed);
    }

    #[test]
    fn test_stale_frame_after_reset_is_ignored() {
        let mut c = Controller::new(Level::Level2);
        c.set_velocity(4.0);
        c.play();
        let now = run_frames(&mut c, 0.0, 5);
        let in_flight = c.request_frame().unwrap();
        c.reset();
        assert_eq!(c.on_frame(in_flight, now), FrameOutcome::Stale);
        assert_eq!(c.state(), &MotionState::new(Level::Level2.profile()));
    }

    #[test]
    fn test_velocity_to_zero_stops() {
        let mut c = Controller::new(Level::Level2);
        c.set_velocity(6.0);
        c.play();
        run_frames(&mut c, 0.0, 8);
        let position = c.state().position;
        c.set_velocity(0.0);
        assert_eq!(c.motion(), Motion::Stopped);
        assert_eq!(c.state().position, position);
        assert_synced(&c);
    }

    #[test]
    fn test_velocity_is_clamped() {
        let mut c = Controller::new(Level::Level1);
        c.set_velocity(-5.0);
        assert_eq!(c.state().velocity, 0.0);
        c.set_velocity(50.0);
        assert_eq!(c.state().velocity, 10.0);
    }

    #[test]
    fn test_velocity_change_while_moving_keeps_moving() {
        let mut c = Controller::new(Level::Level2);
        c.set_velocity(2.0);
        c.play();
        run_frames(&mut c, 0.0, 4);
        c.set_velocity(-2.0);
        assert!(c.is_moving());
    }

    #[test]
    fn test_acceleration_pinned_on_predefined_levels() {
        let mut c = Controller::new(Level::Level4);
        assert!(!c.set_acceleration(1.5));
        assert_eq!(c.state().acceleration, 0.0);
    }

    #[test]
    fn test_position_edit_requires_level4() {
        let mut c = Controller::new(Level::Level3);
        assert!(!c.set_position(20.0));
        assert_eq!(c.state().position, 0.0);
        assert_eq!(c.state().history().len(), 1);
    }

    #[test]
    fn test_position_edit_while_moving_stops_first() {
        let mut c = Controller::new(Level::Level4);
        c.set_velocity(12.0);
        c.play();
        run_frames(&mut c, 0.0, 30);
        let old_position = c.state().position;
        let old_distance = c.state().distance;

        assert!(c.set_position(-20.0));
        assert!(!c.is_moving());
        assert_eq!(c.state().position, -20.0);
        let expected = old_distance + (old_position + 20.0).abs();
        assert!((c.state().distance - expected).abs() < 1e-9);
        assert_eq!(c.state().min_position_reached, -20.0);
        assert_eq!(c.state().last_sample().position, -20.0);
        assert_synced(&c);
    }

    #[test]
    fn test_position_edit_clamped_to_track() {
        let mut c = Controller::new(Level::Level4);
        c.set_position(80.0);
        assert_eq!(c.state().position, 50.0);
        assert_eq!(c.state().distance, 50.0);
        assert_eq!(c.state().max_position_reached, 50.0);
    }

    #[test]
    fn test_repeated_scrubs_accumulate_distance() {
        let mut c = Controller::new(Level::Level4);
        c.set_position(10.0);
        c.set_position(-10.0);
        c.set_position(0.0);
        assert!((c.state().distance - 40.0).abs() < 1e-9);
        assert_eq!(c.readout().displacement, 0.0);
        let times: Vec<f64> = c.state().history().iter().map(|s| s.time).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_level_change_resets() {
        let mut c = Controller::new(Level::Level1);
        c.set_velocity(10.0);
        c.play();
        run_frames(&mut c, 0.0, 20);
        c.set_level(Level::Level4);
        assert_eq!(c.level(), Level::Level4);
        assert!(!c.is_moving());
        assert_eq!(c.state(), &MotionState::new(Level::Level4.profile()));
        assert!(c.request_frame().is_none());
    }

    #[test]
    fn test_toggle() {
        let mut c = Controller::new(Level::Level3);
        c.set_velocity(1.0);
        assert!(c.toggle_play_pause());
        assert!(c.is_moving());
        assert!(c.toggle_play_pause());
        assert!(!c.is_moving());
    }

    proptest! {
        #[test]
        fn prop_stopped_means_synced(
            actions in prop::collection::vec((0u8..6, -25.0f64..25.0, 1usize..40), 1..40),
        ) {
            let mut c = Controller::new(Level::Level4);
            let mut now = 0.0;
            let mut last_distance = 0.0;
            for (kind, value, frames) in actions {
                match kind {
                    0 => { c.play(); }
                    1 => { c.pause(); }
                    2 => c.set_velocity(value),
                    3 => { c.set_position(value); }
                    4 => now = run_frames(&mut c, now, frames),
                    _ => { c.toggle_play_pause(); }
                }
                let state = c.state();
                let p = c.profile();
                prop_assert!(state.position >= p.track_min && state.position <= p.track_max);
                prop_assert!(state.velocity >= p.vel_min && state.velocity <= p.vel_max);
                prop_assert!(state.distance >= last_distance);
                last_distance = state.distance;
                if !c.is_moving() {
                    prop_assert!((state.last_sample().time - state.time).abs() <= SYNC_TOLERANCE);
                }
                let times: Vec<f64> = state.history().iter().map(|s| s.time).collect();
                prop_assert!(times.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}
