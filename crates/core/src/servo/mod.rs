//! Scan head servo abstraction and sweep sequencing
//!
//! The ultrasonic sensor is mounted on a hobby servo ("scan head"). This
//! module provides:
//! - The [`ServoHead`] collaborator contract (write/read angle)
//! - Pulse width conversion for calibrated servos
//! - The [`SweepSequencer`] that oscillates the head through the scan angles
//!
//! # Design
//!
//! This module is pure `no_std` with no feature gates. The PWM servo driver
//! belongs in the `smartcar` crate.
//!
//! Angles follow the mounting of the head: 0° looks right, 90° looks ahead,
//! 180° looks left.

/// Head looking to the right
pub const RIGHT: u8 = 0;
/// Head looking front-right
pub const FRONT_RIGHT: u8 = 30;
/// Head looking straight ahead
pub const CENTER: u8 = 90;
/// Head looking front-left
pub const FRONT_LEFT: u8 = 150;
/// Head looking to the left
pub const LEFT: u8 = 180;

/// Scan head servo contract
pub trait ServoHead {
    /// Command the head to an angle in degrees (0..=180)
    fn write(&mut self, angle: u8);

    /// Last commanded angle in degrees
    fn read(&self) -> u8;
}

/// Servo calibration configuration
///
/// Pulse widths (μs) the servo reaches at 0° and 180°.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoCalibration {
    /// Pulse width at 0° (μs)
    pub pulse_min_us: u16, // Default: 500 (calibrated, SG90 nominal 544)
    /// Pulse width at 180° (μs)
    pub pulse_max_us: u16, // Default: 2400
}

impl Default for ServoCalibration {
    fn default() -> Self {
        Self {
            pulse_min_us: 500,
            pulse_max_us: 2400,
        }
    }
}

/// Convert an angle to a PWM pulse width (microseconds)
///
/// # Arguments
///
/// * `angle` - Angle in degrees, clamped to 0..=180
/// * `calibration` - Pulse widths at the end stops
///
/// # Returns
///
/// Pulse width in microseconds
pub fn angle_to_pulse(angle: u8, calibration: &ServoCalibration) -> u16 {
    let angle = u32::from(angle.min(LEFT));
    let min = u32::from(calibration.pulse_min_us);
    let max = u32::from(calibration.pulse_max_us);

    if max <= min {
        return calibration.pulse_min_us;
    }

    (min + angle * (max - min) / u32::from(LEFT)) as u16
}

/// Convert pulse width to PWM duty cycle
///
/// # Arguments
///
/// * `pulse_us` - Pulse width in microseconds
/// * `frequency_hz` - PWM frequency in Hz (50 Hz for hobby servos)
///
/// # Returns
///
/// Duty cycle as fraction (0.0 to 1.0)
pub fn pulse_to_duty_cycle(pulse_us: u16, frequency_hz: u32) -> f32 {
    let period_us = 1_000_000.0 / frequency_hz as f32;
    (pulse_us as f32 / period_us).clamp(0.0, 1.0)
}

/// Sweep memory and sequencing for the scan head
///
/// The head always passes back through 90° before heading to a new extreme,
/// alternating between the two ends of a leg: `{90, 150, 90, 30}` for the
/// narrow leg and `{90, 180, 90, 0}` for the wide leg.
///
/// The sequencer remembers the angle the head was at before the last
/// advance; seeding that memory picks which extreme comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSequencer {
    previous: u8,
}

impl Default for SweepSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepSequencer {
    /// Create a sequencer with its memory at center
    pub const fn new() -> Self {
        Self { previous: CENTER }
    }

    /// Angle the head was at before the last advance
    pub fn previous(&self) -> u8 {
        self.previous
    }

    /// Seed the memory so the next advance from center heads away from `extreme`
    pub fn seed(&mut self, extreme: u8) {
        self.previous = extreme;
    }

    /// Reset the memory to center
    pub fn reset(&mut self) {
        self.previous = CENTER;
    }

    /// Compute the next target from the current head angle
    ///
    /// Off-center heads return to 90°. At center the opposite extreme of the
    /// remembered leg is returned; an unrecognized memory yields `None` and
    /// the head stays put. The memory is updated to `current` either way.
    pub fn next_angle(&mut self, current: u8) -> Option<u8> {
        let next = if current != CENTER {
            Some(CENTER)
        } else {
            match self.previous {
                FRONT_LEFT => Some(FRONT_RIGHT),
                FRONT_RIGHT => Some(FRONT_LEFT),
                LEFT => Some(RIGHT),
                RIGHT => Some(LEFT),
                _ => None,
            }
        };
        self.previous = current;
        next
    }

    /// Advance the head one step along the sweep
    pub fn advance<S: ServoHead + ?Sized>(&mut self, servo: &mut S) {
        if let Some(angle) = self.next_angle(servo.read()) {
            servo.write(angle);
        }
    }
}
