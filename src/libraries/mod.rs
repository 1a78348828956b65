//! Common libraries
//!
//! Vehicle-agnostic building blocks shared by the rover glue.
//!
//! ## Libraries
//!
//! - `motor_driver`: H-bridge drivers implementing `MotorDriver`

pub mod motor_driver;

// Re-export commonly used types
pub use motor_driver::{L298n, L298nPins};
