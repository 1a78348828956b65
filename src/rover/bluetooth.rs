//! Bluetooth mode source
//!
//! The HC-08 module on the car's shield is a transparent UART bridge. The
//! phone app sends JSON command frames; [`BluetoothLink`] reads bytes into a
//! [`FrameAssembler`] and folds complete frames into a [`ModeSelector`].
//!
//! At most one frame is consumed per poll. Bytes behind it stay in the UART
//! buffer for the next main-loop iteration, so a one-shot park or an IR
//! toggle is always seen by the controller before the next frame lands.

use smartcar_core::mode::{ModeRequest, ModeSource};
use smartcar_core::remote::{FrameAssembler, ModeSelector};

use crate::platform::{Result, UartInterface};

/// Mode source fed by the Bluetooth UART
pub struct BluetoothLink<U> {
    uart: U,
    assembler: FrameAssembler,
    selector: ModeSelector,
}

impl<U: UartInterface> BluetoothLink<U> {
    /// Create a link in remote control mode, stopped
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            assembler: FrameAssembler::new(),
            selector: ModeSelector::new(),
        }
    }

    /// Read buffered bytes up to and including the end of the next frame
    ///
    /// Returns the number of bytes consumed.
    pub fn pump(&mut self) -> Result<usize> {
        let mut consumed = 0;
        let mut byte = [0u8; 1];
        while self.uart.available() {
            if self.uart.read(&mut byte)? == 0 {
                break;
            }
            consumed += 1;
            if self.selector.feed(byte[0], &mut self.assembler) {
                break;
            }
        }
        Ok(consumed)
    }

    /// Current request without consuming a pending park
    pub fn peek(&self) -> ModeRequest {
        self.selector.peek()
    }

    /// Bytes of a frame still being assembled
    pub fn pending(&self) -> usize {
        self.assembler.pending()
    }
}

impl<U: UartInterface> ModeSource for BluetoothLink<U> {
    fn poll(&mut self) -> ModeRequest {
        if let Err(e) = self.pump() {
            crate::log_warn!("bluetooth read failed: {}", e);
        }
        self.selector.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockUart;
    use smartcar_core::behavior::RemoteOrder;
    use smartcar_core::mode::Mode;

    #[test]
    fn test_default_is_remote_stop() {
        let uart = MockUart::new(Default::default());
        let mut link = BluetoothLink::new(&uart);
        assert_eq!(link.poll(), ModeRequest::remote(RemoteOrder::Stop, 0));
    }

    #[test]
    fn test_drive_frame() {
        let uart = MockUart::new(Default::default());
        let mut link = BluetoothLink::new(&uart);

        uart.inject_rx_data(br#"{"N":2,"D1":3,"D2":200}"#);
        let request = link.poll();

        assert_eq!(request.mode, Mode::RemoteControl);
        assert_eq!(request.order, RemoteOrder::Forward);
        assert_eq!(request.speed, 200);
        assert_eq!(uart.rx_pending(), 0);
    }

    #[test]
    fn test_frame_split_across_polls() {
        let uart = MockUart::new(Default::default());
        let mut link = BluetoothLink::new(&uart);

        uart.inject_rx_data(br#"{"N":3,"#);
        assert_eq!(link.poll().mode, Mode::RemoteControl);
        assert_eq!(link.pending(), 7);

        uart.inject_rx_data(br#""D1":2}"#);
        assert_eq!(link.poll().mode, Mode::ObstacleAvoidance);
        assert_eq!(link.poll().mode, Mode::ObstacleAvoidance);
    }

    #[test]
    fn test_burst_is_one_frame_per_poll() {
        let uart = MockUart::new(Default::default());
        let mut link = BluetoothLink::new(&uart);

        uart.inject_rx_data(br#"{"N":3,"D1":1}{"N":2,"D1":1,"D2":0}{"N":101}"#);
        assert_eq!(link.pump().unwrap(), 14);
        assert_eq!(link.peek().mode, Mode::LineTracking);
        assert_eq!(uart.rx_pending(), 30);

        assert_eq!(link.poll(), ModeRequest::remote(RemoteOrder::Left, 0));
        assert_eq!(link.poll().mode, Mode::Custom);
        assert_eq!(uart.rx_pending(), 0);
    }

    #[test]
    fn test_park_survives_following_frame() {
        let uart = MockUart::new(Default::default());
        let mut link = BluetoothLink::new(&uart);

        uart.inject_rx_data(br#"{"N":100}{"N":2,"D1":5,"D2":0}"#);
        assert_eq!(link.poll().mode, Mode::Park);
        assert_eq!(link.poll(), ModeRequest::remote(RemoteOrder::Stop, 0));
    }

    #[test]
    fn test_toggle_survives_following_frame() {
        let uart = MockUart::new(Default::default());
        let mut link = BluetoothLink::new(&uart);

        uart.inject_rx_data(br#"{"N":5}{"N":5}"#);
        assert_eq!(link.poll().mode, Mode::IRControl);
        assert_eq!(link.poll().mode, Mode::RemoteControl);
    }

    #[test]
    fn test_park_is_one_shot() {
        let uart = MockUart::new(Default::default());
        let mut link = BluetoothLink::new(&uart);

        uart.inject_rx_data(br#"{"N":100}"#);
        assert_eq!(link.poll().mode, Mode::Park);
        assert_eq!(link.poll().mode, Mode::RemoteControl);
    }

    #[test]
    fn test_malformed_frame_ignored() {
        let uart = MockUart::new(Default::default());
        let mut link = BluetoothLink::new(&uart);

        uart.inject_rx_data(br#"{"N":5}"#);
        assert_eq!(link.poll().mode, Mode::IRControl);

        uart.inject_rx_data(b"{garbage}");
        assert_eq!(link.poll().mode, Mode::IRControl);
    }
}
