//! Line tracking decisions and scripted maneuvers
//!
//! The per-tick decisions are pure functions of the line reading and the
//! latest forward distance. The maneuvers that must not be interrupted by a
//! mode change (grace wait, lost-line recovery, rejoining the line after a
//! go-around) block on the injected [`Clock`] and are bounded by timeouts.

use super::ramp::ramp;
use crate::motor::MotorDriver;
use crate::parameters::BehaviorParams;
use crate::sensors::{LineReading, LineSensorArray};
use crate::servo::{self, ServoHead};
use crate::traits::{wait_until, Clock};

/// Poll period for line sensor waits (ms)
const LINE_POLL_MS: u32 = 1;

/// Steering decision for the Forward state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    /// Line under the left sensor
    RotateLeft,
    /// Line under the right sensor
    RotateRight,
    /// Line centered
    Forward,
    /// No sensor sees the line
    NoLine,
}

/// Pick the steering action; left wins over right, right over mid
pub fn steer(reading: LineReading) -> Steer {
    if reading.contains(LineReading::LEFT) {
        Steer::RotateLeft
    } else if reading.contains(LineReading::RIGHT) {
        Steer::RotateRight
    } else if reading.contains(LineReading::MID) {
        Steer::Forward
    } else {
        Steer::NoLine
    }
}

/// True when the car sits on the floor over a line with room ahead
pub fn start_ready(reading: LineReading, distance: u16, params: &BehaviorParams) -> bool {
    !reading.is_all() && !reading.is_empty() && distance >= params.detour_distance_cm
}

/// Forward speed while the line is centered
pub fn cruise_speed(distance: u16, params: &BehaviorParams) -> u8 {
    ramp(
        distance,
        params.detour_distance_cm,
        params.max_distance_line_cm,
        params.move_speed,
    )
}

/// Obstacle ahead: stop, look right and start turning left
///
/// Blocks for half a quarter turn so the line under the car is left behind
/// before the Rotate state starts watching the clock.
pub fn begin_evasion<M, S, C>(motors: &mut M, servo: &mut S, clock: &C, params: &BehaviorParams)
where
    M: MotorDriver + ?Sized,
    S: ServoHead + ?Sized,
    C: Clock + ?Sized,
{
    motors.stop();
    servo.write(servo::RIGHT);
    motors.rotate_left(params.rotate_speed);
    clock.delay_ms(params.rotate_90_ms / 2);
}

/// Wait up to `LT_UNTIL_LOST` for any sensor to see the line again
pub fn grace_wait<L, C>(line: &L, clock: &C, params: &BehaviorParams) -> bool
where
    L: LineSensorArray + ?Sized,
    C: Clock + ?Sized,
{
    wait_until(clock, params.until_lost_ms, LINE_POLL_MS, || line.any_active())
}

/// Lost-line recovery
///
/// Half turn to the right, drive back along the way we came and watch for
/// the line for up to `LT_LOST_MS`. Always ends stopped. Returns whether
/// the line was seen.
pub fn recover<M, L, C>(motors: &mut M, line: &L, clock: &C, params: &BehaviorParams) -> bool
where
    M: MotorDriver + ?Sized,
    L: LineSensorArray + ?Sized,
    C: Clock + ?Sized,
{
    motors.rotate_right(params.rotate_speed);
    clock.delay_ms(params.rotate_180_ms);
    motors.forward(params.move_speed);

    let found = wait_until(clock, params.lost_search_ms, LINE_POLL_MS, || {
        line.any_active()
    });
    motors.stop();
    found
}

/// Rejoin the line at the end of a go-around
///
/// Cross the line, recenter the head and rotate left until the middle
/// sensor is back on the line (bounded by `LT_REACQ_MS`). Always ends
/// stopped. Returns whether the middle sensor reacquired the line.
pub fn rejoin<M, S, L, C>(
    motors: &mut M,
    servo: &mut S,
    line: &L,
    clock: &C,
    params: &BehaviorParams,
) -> bool
where
    M: MotorDriver + ?Sized,
    S: ServoHead + ?Sized,
    L: LineSensorArray + ?Sized,
    C: Clock + ?Sized,
{
    motors.forward(params.move_speed);
    clock.delay_ms(params.extra_line_ms);
    motors.stop();
    servo.write(servo::CENTER);
    motors.rotate_left(params.rotate_speed);

    let found = wait_until(clock, params.reacquire_timeout_ms, LINE_POLL_MS, || {
        line.mid_active()
    });
    motors.stop();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::{MockLineSensors, MockMotors, MockServo};
    use crate::motor::MotorCommand;
    use crate::traits::MockClock;

    #[test]
    fn test_steer_priority() {
        assert_eq!(steer(LineReading::LEFT | LineReading::MID), Steer::RotateLeft);
        assert_eq!(steer(LineReading::all()), Steer::RotateLeft);
        assert_eq!(steer(LineReading::RIGHT | LineReading::MID), Steer::RotateRight);
        assert_eq!(steer(LineReading::MID), Steer::Forward);
        assert_eq!(steer(LineReading::empty()), Steer::NoLine);
    }

    #[test]
    fn test_start_ready() {
        let params = BehaviorParams::default();
        assert!(start_ready(LineReading::MID, 10, &params));
        assert!(!start_ready(LineReading::MID, 9, &params));
        assert!(!start_ready(LineReading::empty(), 100, &params));
        // Lifted off the floor
        assert!(!start_ready(LineReading::all(), 100, &params));
    }

    #[test]
    fn test_cruise_speed() {
        let params = BehaviorParams::default();
        assert_eq!(cruise_speed(10, &params), 170);
        assert_eq!(cruise_speed(100, &params), 255);
    }

    #[test]
    fn test_begin_evasion() {
        let params = BehaviorParams::default();
        let clock = MockClock::new();
        let motors = MockMotors::new();
        let servo = MockServo::new(90);

        begin_evasion(&mut &motors, &mut &servo, &clock, &params);
        assert_eq!(servo.angle(), 0);
        assert_eq!(motors.command(), MotorCommand::rotate_left(150));
        assert_eq!(clock.now_ms(), 325);
    }

    #[test]
    fn test_grace_wait_line_returns() {
        let params = BehaviorParams::default();
        let clock = MockClock::new();
        let line = MockLineSensors::with_clock(&clock);
        line.at(400, LineReading::MID);

        assert!(grace_wait(&line, &clock, &params));
        assert_eq!(clock.now_ms(), 400);
    }

    #[test]
    fn test_grace_wait_times_out() {
        let params = BehaviorParams::default();
        let clock = MockClock::new();
        let line = MockLineSensors::new();

        assert!(!grace_wait(&line, &clock, &params));
        assert_eq!(clock.now_ms(), 1000);
    }

    #[test]
    fn test_recover_always_stops() {
        let params = BehaviorParams::default();
        let clock = MockClock::new();
        let motors = MockMotors::new();
        let line = MockLineSensors::new();

        assert!(!recover(&mut &motors, &line, &clock, &params));
        assert!(motors.command().is_stopped());
        assert_eq!(clock.now_ms(), 1200 + 5000);
        assert!(motors.history().contains(&MotorCommand::rotate_right(150)));
        assert!(motors.history().contains(&MotorCommand::forward(170)));
    }

    #[test]
    fn test_rejoin_finds_mid() {
        let params = BehaviorParams::default();
        let clock = MockClock::new();
        let motors = MockMotors::new();
        let servo = MockServo::new(0);
        let line = MockLineSensors::with_clock(&clock);
        line.at(300, LineReading::MID);

        assert!(rejoin(&mut &motors, &mut &servo, &line, &clock, &params));
        assert_eq!(servo.angle(), 90);
        assert!(motors.command().is_stopped());
        assert_eq!(clock.now_ms(), 300);
    }

    #[test]
    fn test_rejoin_is_bounded() {
        let params = BehaviorParams::default();
        let clock = MockClock::new();
        let motors = MockMotors::new();
        let servo = MockServo::new(0);
        let line = MockLineSensors::new();

        assert!(!rejoin(&mut &motors, &mut &servo, &line, &clock, &params));
        assert_eq!(clock.now_ms(), 50 + 5000);
        assert!(motors.command().is_stopped());
    }
}
