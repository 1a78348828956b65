//! Behavior state machines
//!
//! Each autonomous mode is split into a pure decision part (testable with
//! plain values) and, where the maneuver is scripted, a blocking part that
//! runs against the collaborator traits and a [`Clock`](crate::traits::Clock).
//!
//! - [`ramp`]: distance → duty cycle
//! - [`obstacle`]: forward drive with scan-and-avoid
//! - [`line`]: line following with obstacle go-around
//! - [`park`]: scripted parallel parking
//! - [`custom`]: clearance creep used by the go-around and the custom mode
//! - [`remote`]: remote order mapping

pub mod custom;
pub mod line;
pub mod obstacle;
pub mod park;
pub mod ramp;
pub mod remote;

pub use custom::clearance_command;
pub use ramp::ramp;
pub use remote::{OrderSource, RemoteOrder};

/// State within the active mode
///
/// Shared by every mode; `Blocked` only occurs in obstacle avoidance and
/// `LineLost` only in line tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BehaviorState {
    /// Waiting for the first clear reading
    #[default]
    Start,
    /// Driving
    Forward,
    /// Obstacle detected, scanning or going around
    Obstacle,
    /// Timed rotation in progress
    Rotate,
    /// Timed half turn in progress (boxed in)
    Blocked,
    /// Line missing, recovery pending
    LineLost,
}

impl BehaviorState {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            BehaviorState::Start => "Start",
            BehaviorState::Forward => "Forward",
            BehaviorState::Obstacle => "Obstacle",
            BehaviorState::Rotate => "Rotate",
            BehaviorState::Blocked => "Blocked",
            BehaviorState::LineLost => "LineLost",
        }
    }
}

/// Scan scheduling: last sample time and the current interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTiming {
    /// Timestamp of the last due tick (ms)
    pub last_update: u32,
    /// Minimum time between due ticks (ms)
    pub interval: u32,
}

impl ScanTiming {
    /// Timing anchored at `now` with the given interval
    pub const fn new(now: u32, interval: u32) -> Self {
        Self {
            last_update: now,
            interval,
        }
    }

    /// True once `interval` has elapsed since the last update (wrapping)
    pub fn is_due(&self, now: u32) -> bool {
        now.wrapping_sub(self.last_update) >= self.interval
    }

    /// True once `period` has elapsed since the last update (wrapping)
    pub fn elapsed_at_least(&self, now: u32, period: u32) -> bool {
        now.wrapping_sub(self.last_update) >= period
    }

    /// Record a due tick at `now`
    pub fn mark(&mut self, now: u32) {
        self.last_update = now;
    }
}
