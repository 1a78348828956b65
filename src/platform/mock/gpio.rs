//! Mock GPIO implementation for testing

use core::cell::Cell;

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::GpioInterface,
    Result,
};

/// Mock GPIO implementation
///
/// Tracks the pin level, direction and rising edges. The trait is
/// implemented for `&MockGpio` so a test can keep a handle while a driver
/// owns the pin.
#[derive(Debug)]
pub struct MockGpio {
    level: Cell<bool>,
    output: bool,
    rising_edges: Cell<u32>,
    fault: Cell<bool>,
}

impl MockGpio {
    /// Create a new mock GPIO in output mode, driven low
    pub fn new_output() -> Self {
        Self {
            level: Cell::new(false),
            output: true,
            rising_edges: Cell::new(0),
            fault: Cell::new(false),
        }
    }

    /// Create a new mock GPIO in input mode, reading low
    pub fn new_input() -> Self {
        Self {
            output: false,
            ..Self::new_output()
        }
    }

    /// Set the input state (for simulating input pin reads)
    pub fn set_input_state(&self, high: bool) {
        self.level.set(high);
    }

    /// Current level
    pub fn level(&self) -> bool {
        self.level.get()
    }

    /// Number of low-to-high transitions driven so far
    pub fn rising_edges(&self) -> u32 {
        self.rising_edges.get()
    }

    /// Make every access fail with `GpioError::PinFault`
    pub fn set_fault(&self, fault: bool) {
        self.fault.set(fault);
    }

    fn drive(&self, high: bool) -> Result<()> {
        if self.fault.get() {
            return Err(PlatformError::Gpio(GpioError::PinFault));
        }
        if !self.output {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        if high && !self.level.get() {
            self.rising_edges.set(self.rising_edges.get() + 1);
        }
        self.level.set(high);
        Ok(())
    }
}

impl GpioInterface for &MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn is_high(&self) -> Result<bool> {
        if self.fault.get() {
            return Err(PlatformError::Gpio(GpioError::PinFault));
        }
        Ok(self.level.get())
    }
}
