//! Time abstraction for tick scheduling and scripted maneuvers.
//!
//! This module provides the `Clock` trait that abstracts over different
//! time providers (Embassy, mock, etc.) so every behavior can be tested on
//! the host with a virtual clock.
//!
//! Timestamps are 32-bit milliseconds that wrap after ~49.7 days. All
//! interval checks go through [`Clock::elapsed_since`], which uses wrapping
//! subtraction so a comparison straddling the overflow stays correct.

use core::cell::Cell;

/// Monotonic millisecond clock with a blocking delay.
///
/// Implementations:
/// - `EmbassyClock` (in the `smartcar` crate) for embedded targets
/// - [`MockClock`] for host testing with controllable time
///
/// # Example
///
/// ```
/// use smartcar_core::traits::{Clock, MockClock};
///
/// fn due<C: Clock>(clock: &C, last_update: &mut u32, interval: u32) -> bool {
///     if clock.elapsed_since(*last_update) >= interval {
///         *last_update = clock.now_ms();
///         return true;
///     }
///     false
/// }
///
/// let clock = MockClock::new();
/// let mut last = 0;
/// assert!(!due(&clock, &mut last, 250));
/// clock.advance(250);
/// assert!(due(&clock, &mut last, 250));
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since system start (wrapping).
    fn now_ms(&self) -> u32;

    /// Blocks for at least `ms` milliseconds.
    fn delay_ms(&self, ms: u32);

    /// Returns elapsed milliseconds since a reference timestamp.
    ///
    /// Uses wrapping subtraction to tolerate counter overflow.
    fn elapsed_since(&self, reference_ms: u32) -> u32 {
        self.now_ms().wrapping_sub(reference_ms)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn delay_ms(&self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// Poll `condition` until it holds or `timeout_ms` elapses.
///
/// The condition is checked before the deadline, so a condition that is
/// already true returns immediately. Between polls the clock is delayed by
/// `poll_ms` (at least 1 ms, which keeps virtual clocks advancing).
///
/// Returns `true` if the condition was met, `false` on timeout.
pub fn wait_until<C, F>(clock: &C, timeout_ms: u32, poll_ms: u32, mut condition: F) -> bool
where
    C: Clock + ?Sized,
    F: FnMut() -> bool,
{
    let started = clock.now_ms();
    loop {
        if condition() {
            return true;
        }
        if clock.elapsed_since(started) >= timeout_ms {
            return false;
        }
        clock.delay_ms(poll_ms.max(1));
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock clock for testing with controllable time advancement.
///
/// `delay_ms` advances the virtual time instead of sleeping, so scripted
/// maneuvers run instantly in tests. Share it by reference between the
/// controller and the fakes that need to observe time.
///
/// # Example
///
/// ```
/// use smartcar_core::traits::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.delay_ms(650);
/// assert_eq!(clock.now_ms(), 650);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: Cell<u32>,
}

impl MockClock {
    /// Creates a new `MockClock` starting at time 0.
    pub const fn new() -> Self {
        Self {
            current_ms: Cell::new(0),
        }
    }

    /// Creates a new `MockClock` starting at the specified time.
    pub const fn with_initial(ms: u32) -> Self {
        Self {
            current_ms: Cell::new(ms),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, ms: u32) {
        self.current_ms.set(ms);
    }

    /// Advances the current time by the specified amount (wrapping).
    pub fn advance(&self, ms: u32) {
        self.current_ms.set(self.current_ms.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.current_ms.get()
    }

    fn delay_ms(&self, ms: u32) {
        self.advance(ms);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
