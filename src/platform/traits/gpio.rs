//! GPIO interface trait
//!
//! Digital pins used by the car: motor direction inputs, the ultrasonic
//! trigger and the three line tracker inputs.

use crate::platform::Result;

/// GPIO interface trait
///
/// # Safety Invariants
///
/// - Pin must be configured for its direction before use
/// - Only one owner per pin instance
pub trait GpioInterface {
    /// Drive the pin high
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin
    /// is not an output.
    fn set_high(&mut self) -> Result<()>;

    /// Drive the pin low
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin
    /// is not an output.
    fn set_low(&mut self) -> Result<()>;

    /// Sample the pin level
    fn is_high(&self) -> Result<bool>;

    /// Drive the pin to `high`
    fn set_level(&mut self, high: bool) -> Result<()> {
        if high {
            self.set_high()
        } else {
            self.set_low()
        }
    }
}
