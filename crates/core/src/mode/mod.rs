//! Mode selection and the behavior controller
//!
//! The outer loop polls a [`ModeSource`] once per iteration. When the
//! requested [`Mode`] differs from the active one the controller resets its
//! owned state, then the tick for the requested mode runs.
//!
//! - [`types`]: `Mode`, `ModeRequest` and the `ModeSource` contract
//! - [`controller`]: `ModeController` owning the peripherals and behavior state

mod controller;
mod types;

pub use controller::{ModeController, Peripherals};
pub use types::{Mode, ModeRequest, ModeSource};
