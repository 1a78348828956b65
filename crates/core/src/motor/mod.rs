//! Differential-drive motor abstraction
//!
//! This module provides the drive command model shared by the behavior state
//! machines and the H-bridge driver: a pair of signed duty cycles (one per
//! side) plus the dead-zone rules that keep the brushed motors from buzzing
//! at duty cycles too low to turn the wheels.
//!
//! # Features
//!
//! - [`MotorCommand`]: signed left/right duty cycles in [-255, 255]
//! - [`DeadZone`]: crank/idle thresholds applied per side
//! - [`MotorDriver`]: the collaborator contract used by the controller
//!
//! # Design
//!
//! This module is pure `no_std` with no feature gates. The GPIO/PWM driver
//! for the L298N bridge lives in the `smartcar` crate and applies the same
//! [`DeadZone`] before touching the pins.

/// Maximum duty cycle magnitude
pub const MAX_DUTY: i16 = 255;

/// Signed duty cycles for the left and right wheel groups
///
/// Positive values drive forward, negative values reverse, zero stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotorCommand {
    /// Left side duty cycle (-255..=255)
    pub left: i16,
    /// Right side duty cycle (-255..=255)
    pub right: i16,
}

impl MotorCommand {
    /// Both sides stopped
    pub const STOP: Self = Self::new(0, 0);

    /// Create a command from raw per-side duty cycles
    pub const fn new(left: i16, right: i16) -> Self {
        Self { left, right }
    }

    /// Straight ahead
    pub const fn forward(speed: u8) -> Self {
        Self::new(speed as i16, speed as i16)
    }

    /// Straight back
    pub const fn backward(speed: u8) -> Self {
        Self::new(-(speed as i16), -(speed as i16))
    }

    /// Spin counter-clockwise in place
    pub const fn rotate_left(speed: u8) -> Self {
        Self::new(-(speed as i16), speed as i16)
    }

    /// Spin clockwise in place
    pub const fn rotate_right(speed: u8) -> Self {
        Self::new(speed as i16, -(speed as i16))
    }

    /// Forward arc to the left (inner wheels at half speed)
    pub const fn forward_left(speed: u8) -> Self {
        Self::new((speed / 2) as i16, speed as i16)
    }

    /// Forward arc to the right (inner wheels at half speed)
    pub const fn forward_right(speed: u8) -> Self {
        Self::new(speed as i16, (speed / 2) as i16)
    }

    /// Reverse arc to the left
    pub const fn backward_left(speed: u8) -> Self {
        Self::new(-((speed / 2) as i16), -(speed as i16))
    }

    /// Reverse arc to the right
    pub const fn backward_right(speed: u8) -> Self {
        Self::new(-(speed as i16), -((speed / 2) as i16))
    }

    /// Both sides at zero
    pub const fn is_stopped(&self) -> bool {
        self.left == 0 && self.right == 0
    }

    /// Left side reversing while right side drives forward
    pub const fn is_rotating_left(&self) -> bool {
        self.left < 0 && self.right > 0
    }

    /// Right side reversing while left side drives forward
    pub const fn is_rotating_right(&self) -> bool {
        self.left > 0 && self.right < 0
    }
}

/// Minimum duty cycles for the brushed motors
///
/// A stopped wheel needs at least `crank` to start turning; a wheel that is
/// already turning keeps moving down to `idle`. Requests below the relevant
/// minimum are replaced by 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadZone {
    /// Minimum duty cycle to start a stopped wheel
    pub crank: u8,
    /// Minimum duty cycle to keep a moving wheel turning
    pub idle: u8,
}

impl Default for DeadZone {
    fn default() -> Self {
        Self {
            crank: 140,
            idle: 90,
        }
    }
}

impl DeadZone {
    /// Resolve a requested command against the currently applied one
    ///
    /// Returns `None` when the request equals the current command (nothing to
    /// write), otherwise the command that should be applied to the bridge.
    pub fn apply(&self, current: MotorCommand, requested: MotorCommand) -> Option<MotorCommand> {
        if current == requested {
            return None;
        }

        Some(MotorCommand {
            left: self.gate(current.left, requested.left),
            right: self.gate(current.right, requested.right),
        })
    }

    fn gate(&self, current: i16, requested: i16) -> i16 {
        let requested = requested.clamp(-MAX_DUTY, MAX_DUTY);
        let minimum = if current == 0 { self.crank } else { self.idle };
        if requested.unsigned_abs() < u16::from(minimum) {
            0
        } else {
            requested
        }
    }
}

/// Motor driver contract (platform-independent)
///
/// Implementations only provide [`MotorDriver::drive`] and
/// [`MotorDriver::current`]; every maneuver and hysteresis query is derived
/// from those two. `drive` is expected to pass the request through
/// [`DeadZone::apply`], so `current` reports what the wheels actually get.
pub trait MotorDriver {
    /// Request new duty cycles for both sides
    fn drive(&mut self, command: MotorCommand);

    /// Duty cycles currently applied to the bridge
    fn current(&self) -> MotorCommand;

    /// Replace the crank / idle thresholds used by later requests
    ///
    /// Drivers without a dead zone ignore this.
    fn set_dead_zone(&mut self, _dead_zone: DeadZone) {}

    /// Stop both sides
    fn stop(&mut self) {
        self.drive(MotorCommand::STOP);
    }

    /// Drive straight ahead
    fn forward(&mut self, speed: u8) {
        self.drive(MotorCommand::forward(speed));
    }

    /// Drive straight back
    fn backward(&mut self, speed: u8) {
        self.drive(MotorCommand::backward(speed));
    }

    /// Spin left in place
    fn rotate_left(&mut self, speed: u8) {
        self.drive(MotorCommand::rotate_left(speed));
    }

    /// Spin right in place
    fn rotate_right(&mut self, speed: u8) {
        self.drive(MotorCommand::rotate_right(speed));
    }

    /// Both sides stopped
    fn is_stopped(&self) -> bool {
        self.current().is_stopped()
    }

    /// Currently spinning left
    fn is_rotating_left(&self) -> bool {
        self.current().is_rotating_left()
    }

    /// Currently spinning right
    fn is_rotating_right(&self) -> bool {
        self.current().is_rotating_right()
    }
}
