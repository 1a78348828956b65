//! Embassy-backed time source
//!
//! Implements both the behavior crate's millisecond [`Clock`] and the
//! microsecond [`TimerInterface`] on top of the `embassy-time` driver, so a
//! single value serves the controller and the ultrasonic trigger.

use embassy_time::{block_for, Duration, Instant};
use smartcar_core::traits::Clock;

use crate::platform::{traits::TimerInterface, Result};

/// Monotonic clock over `embassy_time::Instant`
///
/// Requires an embassy time driver to be linked in by the board crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl EmbassyClock {
    /// Create the clock
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation gives the wrapping millisecond counter
        Instant::now().as_millis() as u32
    }

    fn delay_ms(&self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }
}

impl TimerInterface for EmbassyClock {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        block_for(Duration::from_micros(u64::from(us)));
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        block_for(Duration::from_millis(u64::from(ms)));
        Ok(())
    }

    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
