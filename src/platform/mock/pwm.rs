//! Mock PWM implementation for testing

use core::cell::Cell;

use crate::platform::{
    error::{PlatformError, PwmError},
    traits::{PwmConfig, PwmInterface},
    Result,
};

/// Mock PWM implementation
///
/// Tracks duty cycle and frequency for test verification.
#[derive(Debug)]
pub struct MockPwm {
    duty_cycle: Cell<f32>,
    frequency: Cell<u32>,
    fault: Cell<bool>,
}

impl MockPwm {
    /// Create a new mock PWM
    pub fn new(config: PwmConfig) -> Self {
        Self {
            duty_cycle: Cell::new(config.duty_cycle),
            frequency: Cell::new(config.frequency),
            fault: Cell::new(false),
        }
    }

    /// Current duty cycle
    pub fn duty(&self) -> f32 {
        self.duty_cycle.get()
    }

    /// Make writes fail with `PwmError::ChannelUnavailable`
    pub fn set_fault(&self, fault: bool) {
        self.fault.set(fault);
    }
}

impl Default for MockPwm {
    fn default() -> Self {
        Self::new(PwmConfig::default())
    }
}

impl PwmInterface for &MockPwm {
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        if self.fault.get() {
            return Err(PlatformError::Pwm(PwmError::ChannelUnavailable));
        }
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.duty_cycle.set(duty_cycle);
        Ok(())
    }

    fn duty_cycle(&self) -> f32 {
        self.duty_cycle.get()
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        if frequency == 0 {
            return Err(PlatformError::Pwm(PwmError::InvalidFrequency));
        }
        self.frequency.set(frequency);
        Ok(())
    }

    fn frequency(&self) -> u32 {
        self.frequency.get()
    }
}
