//! Sensor collaborator contracts and shared sensor state
//!
//! - [`range`]: ultrasonic range sensor contract and the 5-slot range map
//! - [`line`]: three-channel line tracker contract

pub mod line;
pub mod range;

pub use line::{LineReading, LineSensorArray};
pub use range::{RangeMap, RangeSensor, CENTER, FRONT_LEFT, FRONT_RIGHT, LEFT, RIGHT, SLOT_COUNT};
