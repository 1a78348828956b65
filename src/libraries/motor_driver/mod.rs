//! Motor driver implementations
//!
//! The drive command model ([`MotorCommand`], [`DeadZone`]) and the
//! [`MotorDriver`] contract live in `smartcar_core::motor`; this module holds
//! the bridge drivers that put those commands on real pins.
//!
//! ## Example
//!
//! ```ignore
//! use smartcar::libraries::motor_driver::{L298n, L298nPins};
//! use smartcar_core::motor::{DeadZone, MotorDriver};
//!
//! let pins = L298nPins { in1, in2, in3, in4 };
//! let mut motors = L298n::new(ena, enb, pins, DeadZone::default())?;
//!
//! motors.forward(170);
//! motors.rotate_left(150);
//! motors.stop();
//! ```

pub mod l298n;

// Re-export main types
pub use l298n::{L298n, L298nPins};
pub use smartcar_core::motor::{DeadZone, MotorCommand, MotorDriver};
