//! Echo pulse capture trait
//!
//! Measures how long an input stays high, the way the HC-SR04 reports its
//! round-trip time. Platforms implement it with input capture or a
//! polling loop.

use crate::platform::Result;

/// Pulse-width capture on an input pin
pub trait EchoInput {
    /// Wait for the next high pulse and return its width (µs)
    ///
    /// Returns `Ok(None)` if no complete pulse arrives within `timeout_us`.
    fn measure_high_us(&mut self, timeout_us: u32) -> Result<Option<u32>>;
}
