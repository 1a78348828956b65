//! L298N dual H-bridge driver
//!
//! Bridge A drives the right-hand wheels, bridge B the left-hand wheels.
//! Each side has one PWM enable and two direction inputs.
//!
//! ## Truth Table (per side)
//!
//! | Speed | IN_a | IN_b | EN           |
//! |-------|------|------|--------------|
//! | > 0   | fwd  | !fwd | duty = \|s\| |
//! | < 0   | !fwd | fwd  | duty = \|s\| |
//! | 0     | kept | kept | 0            |
//!
//! The left bridge is wired mirrored: IN3 high means the left wheels turn
//! backward, while IN1 high means the right wheels turn forward.

use smartcar_core::motor::{DeadZone, MotorCommand, MotorDriver, MAX_DUTY};

use crate::platform::{GpioInterface, PwmInterface, Result};

/// Direction inputs of the bridge
pub struct L298nPins<G> {
    /// Right side, forward when high
    pub in1: G,
    /// Right side, backward when high
    pub in2: G,
    /// Left side, backward when high
    pub in3: G,
    /// Left side, forward when high
    pub in4: G,
}

/// L298N motor driver
///
/// Implements [`MotorDriver`]: every request passes through
/// [`DeadZone::apply`] so `current()` reports what the wheels receive.
pub struct L298n<P, G> {
    ena: P,
    enb: P,
    pins: L298nPins<G>,
    dead_zone: DeadZone,
    current: MotorCommand,
}

impl<P, G> L298n<P, G>
where
    P: PwmInterface,
    G: GpioInterface,
{
    /// Create the driver with both sides stopped
    ///
    /// # Errors
    ///
    /// Returns the first platform error raised while parking the outputs.
    pub fn new(ena: P, enb: P, pins: L298nPins<G>, dead_zone: DeadZone) -> Result<Self> {
        let mut driver = Self {
            ena,
            enb,
            pins,
            dead_zone,
            current: MotorCommand::STOP,
        };
        driver.pins.in1.set_low()?;
        driver.pins.in2.set_low()?;
        driver.pins.in3.set_low()?;
        driver.pins.in4.set_low()?;
        driver.ena.set_duty_cycle(0.0)?;
        driver.enb.set_duty_cycle(0.0)?;
        Ok(driver)
    }

    fn write(&mut self, command: MotorCommand) -> Result<()> {
        if command.left != 0 {
            let backward = command.left < 0;
            self.pins.in3.set_level(backward)?;
            self.pins.in4.set_level(!backward)?;
        }
        self.enb.set_duty_cycle(duty(command.left))?;

        if command.right != 0 {
            let forward = command.right > 0;
            self.pins.in1.set_level(forward)?;
            self.pins.in2.set_level(!forward)?;
        }
        self.ena.set_duty_cycle(duty(command.right))?;
        Ok(())
    }
}

fn duty(speed: i16) -> f32 {
    f32::from(speed.unsigned_abs().min(MAX_DUTY as u16)) / MAX_DUTY as f32
}

impl<P, G> MotorDriver for L298n<P, G>
where
    P: PwmInterface,
    G: GpioInterface,
{
    fn drive(&mut self, command: MotorCommand) {
        let Some(applied) = self.dead_zone.apply(self.current, command) else {
            return;
        };

        match self.write(applied) {
            Ok(()) => self.current = applied,
            Err(e) => {
                crate::log_warn!("L298N write failed: {}", e);
                // Best effort: cut both enables
                let _ = self.ena.set_duty_cycle(0.0);
                let _ = self.enb.set_duty_cycle(0.0);
                self.current = MotorCommand::STOP;
            }
        }
    }

    fn current(&self) -> MotorCommand {
        self.current
    }

    fn set_dead_zone(&mut self, dead_zone: DeadZone) {
        self.dead_zone = dead_zone;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockGpio, MockPwm};

    struct Rig {
        ena: MockPwm,
        enb: MockPwm,
        pins: [MockGpio; 4],
    }

    impl Rig {
        fn new() -> Self {
            Self {
                ena: MockPwm::default(),
                enb: MockPwm::default(),
                pins: [
                    MockGpio::new_output(),
                    MockGpio::new_output(),
                    MockGpio::new_output(),
                    MockGpio::new_output(),
                ],
            }
        }

        fn driver(&self) -> L298n<&MockPwm, &MockGpio> {
            L298n::new(
                &self.ena,
                &self.enb,
                L298nPins {
                    in1: &self.pins[0],
                    in2: &self.pins[1],
                    in3: &self.pins[2],
                    in4: &self.pins[3],
                },
                DeadZone::default(),
            )
            .unwrap()
        }

        fn levels(&self) -> [bool; 4] {
            [
                self.pins[0].level(),
                self.pins[1].level(),
                self.pins[2].level(),
                self.pins[3].level(),
            ]
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_forward_sets_both_sides() {
        let rig = Rig::new();
        let mut motors = rig.driver();

        motors.forward(170);

        assert_eq!(motors.current(), MotorCommand::forward(170));
        assert_eq!(rig.levels(), [true, false, false, true]);
        assert!(approx(rig.ena.duty(), 170.0 / 255.0));
        assert!(approx(rig.enb.duty(), 170.0 / 255.0));
    }

    #[test]
    fn test_rotate_left_reverses_left_side() {
        let rig = Rig::new();
        let mut motors = rig.driver();

        motors.rotate_left(150);

        assert!(motors.is_rotating_left());
        // Right forward (IN1), left backward (IN3)
        assert_eq!(rig.levels(), [true, false, true, false]);
    }

    #[test]
    fn test_below_crank_stays_stopped() {
        let rig = Rig::new();
        let mut motors = rig.driver();

        motors.forward(100);

        assert!(motors.is_stopped());
        assert_eq!(rig.ena.duty(), 0.0);
        assert_eq!(rig.enb.duty(), 0.0);
    }

    #[test]
    fn test_stop_keeps_direction_pins() {
        let rig = Rig::new();
        let mut motors = rig.driver();

        motors.backward(200);
        motors.stop();

        assert!(motors.is_stopped());
        assert_eq!(rig.ena.duty(), 0.0);
        assert_eq!(rig.levels(), [false, true, true, false]);
    }

    #[test]
    fn test_dead_zone_swap_applies_to_next_request() {
        let rig = Rig::new();
        let mut motors = rig.driver();

        motors.set_dead_zone(DeadZone {
            crank: 100,
            idle: 60,
        });
        motors.forward(110);

        assert_eq!(motors.current(), MotorCommand::forward(110));
        assert!(approx(rig.ena.duty(), 110.0 / 255.0));
    }

    #[test]
    fn test_pwm_fault_stops() {
        let rig = Rig::new();
        let mut motors = rig.driver();
        motors.forward(200);

        rig.ena.set_fault(true);
        motors.backward(200);

        assert!(motors.is_stopped());
        assert_eq!(rig.enb.duty(), 0.0);
    }
}
