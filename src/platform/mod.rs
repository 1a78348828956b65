//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the car's peripherals.
//! Device drivers only see these traits; board crates supply the
//! implementations.

pub mod error;
pub mod traits;

#[cfg(feature = "embassy")]
pub mod time;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{EchoInput, GpioInterface, PwmInterface, TimerInterface, UartInterface};

#[cfg(feature = "embassy")]
pub use time::EmbassyClock;
