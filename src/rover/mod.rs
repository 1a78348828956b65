//! Rover glue
//!
//! Wires the drivers to the behavior controller of `smartcar_core`.
//!
//! ## Modules
//!
//! - `bluetooth`: mode source fed by the Bluetooth UART
//! - `runner`: main-loop runner with runtime parameter reload

pub mod bluetooth;
pub mod runner;

// Re-export commonly used types
pub use bluetooth::BluetoothLink;
pub use runner::Rover;
