//! Microsecond timer interface trait

use crate::platform::Result;

/// Busy-wait timer for sub-millisecond pulses
pub trait TimerInterface {
    /// Block for `us` microseconds
    fn delay_us(&mut self, us: u32) -> Result<()>;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay_us(ms.saturating_mul(1000))
    }

    /// Microseconds since boot
    fn now_us(&self) -> u64;
}
