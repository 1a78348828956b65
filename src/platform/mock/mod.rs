//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! Every mock uses interior mutability and implements its trait for
//! `&Mock`, so a test keeps a shared handle to a pin that a driver owns.

#![cfg(any(test, feature = "mock"))]

mod echo;
mod gpio;
mod pwm;
mod timer;
mod uart;

pub use echo::MockEcho;
pub use gpio::MockGpio;
pub use pwm::MockPwm;
pub use timer::MockTimer;
pub use uart::MockUart;
