//! Mock Timer implementation for testing

use core::cell::Cell;

use crate::platform::{traits::TimerInterface, Result};

/// Mock Timer implementation
///
/// Delays advance a simulated microsecond counter instead of blocking.
#[derive(Debug, Default)]
pub struct MockTimer {
    now_us: Cell<u64>,
}

impl MockTimer {
    /// Create a new mock timer at t = 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time (µs)
    pub fn elapsed_us(&self) -> u64 {
        self.now_us.get()
    }
}

impl TimerInterface for &MockTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        self.now_us.set(self.now_us.get().wrapping_add(u64::from(us)));
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}
