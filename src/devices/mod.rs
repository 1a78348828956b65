//! Device drivers
//!
//! Drivers for the car's sensors and actuators, written against the
//! platform abstraction traits and implementing the collaborator traits of
//! `smartcar_core`.
//!
//! ## Modules
//!
//! - `servo`: SG90 scan head (`ServoHead`)
//! - `ultrasonic`: HC-SR04 range sensor (`RangeSensor`)
//! - `line_tracker`: three-channel IR line tracker (`LineSensorArray`)

pub mod line_tracker;
pub mod servo;
pub mod ultrasonic;

pub use line_tracker::LineTracker;
pub use servo::ServoSg90;
pub use ultrasonic::HcSr04;
