//! UART interface trait

use crate::platform::Result;

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Baud rate (the HC-08 Bluetooth module ships at 9600)
    pub baud_rate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baud_rate: 9600 }
    }
}

/// UART interface trait
///
/// Reads never block: `read` returns whatever is already buffered.
pub trait UartInterface {
    /// Write bytes, returning how many were accepted
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read buffered bytes into `buffer`, returning how many were copied
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// At least one received byte is waiting
    fn available(&self) -> bool;
}
