//! Mock echo capture for testing

use core::cell::Cell;

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::EchoInput,
    Result,
};

/// Mock echo input
///
/// Returns a scripted pulse width. Pulses longer than the requested
/// timeout are reported as missing, like a real capture would.
#[derive(Debug, Default)]
pub struct MockEcho {
    pulse_us: Cell<Option<u32>>,
    fault: Cell<bool>,
    last_timeout_us: Cell<u32>,
    captures: Cell<u32>,
}

impl MockEcho {
    /// Create a mock with no echo
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next pulse widths (`None` = no echo)
    pub fn set_pulse(&self, pulse_us: Option<u32>) {
        self.pulse_us.set(pulse_us);
    }

    /// Make captures fail with `GpioError::PinFault`
    pub fn set_fault(&self, fault: bool) {
        self.fault.set(fault);
    }

    /// Timeout passed to the most recent capture
    pub fn last_timeout_us(&self) -> u32 {
        self.last_timeout_us.get()
    }

    /// Number of captures requested
    pub fn captures(&self) -> u32 {
        self.captures.get()
    }
}

impl EchoInput for &MockEcho {
    fn measure_high_us(&mut self, timeout_us: u32) -> Result<Option<u32>> {
        self.captures.set(self.captures.get() + 1);
        self.last_timeout_us.set(timeout_us);
        if self.fault.get() {
            return Err(PlatformError::Gpio(GpioError::PinFault));
        }
        Ok(self.pulse_us.get().filter(|us| *us <= timeout_us))
    }
}
