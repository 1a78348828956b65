//! Mock UART implementation for testing

use core::cell::RefCell;
use std::collections::VecDeque;
use std::vec::Vec;

use crate::platform::{
    traits::{UartConfig, UartInterface},
    Result,
};

/// Mock UART implementation
///
/// Bytes written land in a capture buffer; bytes injected by the test are
/// handed out by `read` in arrival order, like the HC-08 bridge would.
///
/// # Example
///
/// ```ignore
/// use smartcar::platform::mock::MockUart;
/// use smartcar::platform::traits::UartInterface;
///
/// let uart = MockUart::new(Default::default());
/// uart.inject_rx_data(b"{\"N\":5}");
///
/// let mut port = &uart;
/// let mut buf = [0u8; 8];
/// assert_eq!(port.read(&mut buf).unwrap(), 7);
/// ```
#[derive(Debug)]
pub struct MockUart {
    config: UartConfig,
    tx_buffer: RefCell<Vec<u8>>,
    rx_queue: RefCell<VecDeque<u8>>,
}

impl MockUart {
    /// Create a new mock UART
    pub fn new(config: UartConfig) -> Self {
        Self {
            config,
            tx_buffer: RefCell::new(Vec::new()),
            rx_queue: RefCell::new(VecDeque::new()),
        }
    }

    /// Everything written so far
    pub fn tx_buffer(&self) -> Vec<u8> {
        self.tx_buffer.borrow().clone()
    }

    /// Queue bytes as if the phone had sent them
    pub fn inject_rx_data(&self, data: &[u8]) {
        self.rx_queue.borrow_mut().extend(data.iter().copied());
    }

    /// Bytes received but not yet read
    pub fn rx_pending(&self) -> usize {
        self.rx_queue.borrow().len()
    }

    /// Configured baud rate
    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }
}

impl UartInterface for &MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.tx_buffer.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut rx = self.rx_queue.borrow_mut();
        let n = buffer.len().min(rx.len());
        for (slot, byte) in buffer.iter_mut().zip(rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn available(&self) -> bool {
        !self.rx_queue.borrow().is_empty()
    }
}
