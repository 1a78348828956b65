//! Mode types

use crate::behavior::RemoteOrder;

/// Top-level behavior selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Manual driving from the app
    #[default]
    RemoteControl,
    /// Manual driving from the infrared remote
    IRControl,
    /// Autonomous driving with scan-and-avoid
    ObstacleAvoidance,
    /// Line following with obstacle go-around
    LineTracking,
    /// One-shot parallel parking
    Park,
    /// User-defined behavior (clearance creep)
    Custom,
}

impl Mode {
    /// Get mode name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mode::RemoteControl => "RemoteControl",
            Mode::IRControl => "IRControl",
            Mode::ObstacleAvoidance => "ObstacleAvoidance",
            Mode::LineTracking => "LineTracking",
            Mode::Park => "Park",
            Mode::Custom => "Custom",
        }
    }
}

/// Mode requested by the command source, with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeRequest {
    /// Requested mode
    pub mode: Mode,
    /// Manual order (remote control only)
    pub order: RemoteOrder,
    /// Requested speed for the order, 0 for the default
    pub speed: u8,
}

impl ModeRequest {
    /// Request a mode without an order
    pub const fn new(mode: Mode) -> Self {
        Self {
            mode,
            order: RemoteOrder::Stop,
            speed: 0,
        }
    }

    /// Remote control with an order and an optional speed
    pub const fn remote(order: RemoteOrder, speed: u8) -> Self {
        Self {
            mode: Mode::RemoteControl,
            order,
            speed,
        }
    }
}

/// Source of the requested mode, polled once per loop iteration
pub trait ModeSource {
    /// Currently requested mode and its parameters
    fn poll(&mut self) -> ModeRequest;
}

impl<T: ModeSource + ?Sized> ModeSource for &mut T {
    fn poll(&mut self) -> ModeRequest {
        (**self).poll()
    }
}
