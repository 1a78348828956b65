//! PWM interface trait

use crate::platform::Result;

/// PWM channel configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwmConfig {
    /// Output frequency (Hz)
    pub frequency: u32,
    /// Initial duty cycle (0.0 to 1.0)
    pub duty_cycle: f32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000,
            duty_cycle: 0.0,
        }
    }
}

/// PWM interface trait
///
/// One output channel. Motor enables run at the default frequency,
/// the servo at 50 Hz.
pub trait PwmInterface {
    /// Set duty cycle as a fraction
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidDutyCycle)` outside
    /// `[0.0, 1.0]`.
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()>;

    /// Current duty cycle
    fn duty_cycle(&self) -> f32;

    /// Set output frequency
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidFrequency)` for 0 Hz.
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;

    /// Current output frequency
    fn frequency(&self) -> u32;
}
