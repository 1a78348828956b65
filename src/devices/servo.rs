//! SG90 micro servo driver
//!
//! The scan head sits on an SG90 driven by a 50 Hz PWM channel. Angles are
//! converted to pulse widths with the calibrated end stops from
//! [`ServoCalibration`].

use smartcar_core::servo::{
    angle_to_pulse, pulse_to_duty_cycle, ServoCalibration, ServoHead, CENTER, LEFT,
};

use crate::platform::{PwmInterface, Result};

/// Servo frame rate (Hz)
pub const SERVO_FREQUENCY_HZ: u32 = 50;

/// SG90 scan head
pub struct ServoSg90<P> {
    pwm: P,
    calibration: ServoCalibration,
    angle: u8,
}

impl<P: PwmInterface> ServoSg90<P> {
    /// Configure the channel for 50 Hz and center the head
    ///
    /// # Errors
    ///
    /// Returns the platform error if the channel rejects the frequency or
    /// the initial pulse.
    pub fn new(mut pwm: P, calibration: ServoCalibration) -> Result<Self> {
        pwm.set_frequency(SERVO_FREQUENCY_HZ)?;
        let pulse = angle_to_pulse(CENTER, &calibration);
        pwm.set_duty_cycle(pulse_to_duty_cycle(pulse, SERVO_FREQUENCY_HZ))?;
        Ok(Self {
            pwm,
            calibration,
            angle: CENTER,
        })
    }

    fn apply(&mut self, angle: u8) -> Result<()> {
        let pulse = angle_to_pulse(angle, &self.calibration);
        self.pwm
            .set_duty_cycle(pulse_to_duty_cycle(pulse, SERVO_FREQUENCY_HZ))
    }
}

impl<P: PwmInterface> ServoHead for ServoSg90<P> {
    fn write(&mut self, angle: u8) {
        let angle = angle.min(LEFT);
        match self.apply(angle) {
            Ok(()) => self.angle = angle,
            Err(e) => crate::log_warn!("servo write {} failed: {}", angle, e),
        }
    }

    fn read(&self) -> u8 {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPwm;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_new_centers_at_50hz() {
        let pwm = MockPwm::default();
        let servo = ServoSg90::new(&pwm, ServoCalibration::default()).unwrap();

        assert_eq!(servo.read(), 90);
        assert_eq!((&pwm).frequency(), 50);
        // 1450 us of a 20 ms frame
        assert!(approx(pwm.duty(), 0.0725));
    }

    #[test]
    fn test_end_stops() {
        let pwm = MockPwm::default();
        let mut servo = ServoSg90::new(&pwm, ServoCalibration::default()).unwrap();

        servo.write(0);
        assert!(approx(pwm.duty(), 0.025));

        servo.write(180);
        assert!(approx(pwm.duty(), 0.12));
        assert_eq!(servo.read(), 180);
    }

    #[test]
    fn test_angle_clamped() {
        let pwm = MockPwm::default();
        let mut servo = ServoSg90::new(&pwm, ServoCalibration::default()).unwrap();

        servo.write(250);
        assert_eq!(servo.read(), 180);
        assert!(approx(pwm.duty(), 0.12));
    }

    #[test]
    fn test_failed_write_keeps_angle() {
        let pwm = MockPwm::default();
        let mut servo = ServoSg90::new(&pwm, ServoCalibration::default()).unwrap();

        pwm.set_fault(true);
        servo.write(30);
        assert_eq!(servo.read(), 90);
    }
}
