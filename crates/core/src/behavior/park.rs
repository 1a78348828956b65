//! Scripted parallel parking
//!
//! A linear script run to completion in one call:
//!
//! 1. Look right (0°) and left (180°), sampling both sides
//! 2. Park on the side with more room, keep the head pointed there
//! 3. Creep past the first parked object
//! 4. Creep on until the next object shows up
//! 5. Back off, quarter turn toward the gap, creep in, quarter turn back
//!
//! Each search phase is bounded by `PK_SEARCH_MS`; a phase that times out
//! stops the car and aborts the script.

use crate::motor::MotorDriver;
use crate::parameters::BehaviorParams;
use crate::sensors::{RangeMap, RangeSensor};
use crate::servo::{self, ServoHead};
use crate::traits::{wait_until, Clock};

/// Range poll period while passing the first object (ms)
const PASS_POLL_MS: u32 = 20;

/// Range poll period while approaching the second object (ms)
const APPROACH_POLL_MS: u32 = 50;

/// Side of the road to park on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkSide {
    /// Gap on the right
    Right,
    /// Gap on the left
    Left,
}

impl ParkSide {
    /// Pick the side reporting the larger distance
    ///
    /// Ties go left.
    pub fn choose(right_cm: u16, left_cm: u16) -> Self {
        if right_cm > left_cm {
            ParkSide::Right
        } else {
            ParkSide::Left
        }
    }

    /// Head angle looking at this side
    pub fn head_angle(&self) -> u8 {
        match self {
            ParkSide::Right => servo::RIGHT,
            ParkSide::Left => servo::LEFT,
        }
    }
}

/// Script phase, reported when a phase times out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkPhase {
    /// Creeping alongside the first object
    PassFirst,
    /// Creeping toward the second object
    ReachSecond,
}

/// Result of a park run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkOutcome {
    /// Script completed on the given side
    Parked(ParkSide),
    /// Script stopped in the given phase
    Aborted(ParkPhase),
}

/// Collaborators the script drives
pub struct ParkRig<'a, M: ?Sized, S: ?Sized, R: ?Sized, C: ?Sized> {
    /// Drive motors
    pub motors: &'a mut M,
    /// Scan head
    pub servo: &'a mut S,
    /// Range sensor
    pub range: &'a mut R,
    /// Time source
    pub clock: &'a C,
}

/// Run the parking script
///
/// Side samples are stored in `map` at the 0° and 180° slots.
pub fn run<M, S, R, C>(
    rig: ParkRig<'_, M, S, R, C>,
    map: &mut RangeMap,
    params: &BehaviorParams,
) -> ParkOutcome
where
    M: MotorDriver + ?Sized,
    S: ServoHead + ?Sized,
    R: RangeSensor + ?Sized,
    C: Clock + ?Sized,
{
    let ParkRig {
        motors,
        servo,
        range,
        clock,
    } = rig;
    let settle_ms = 2 * params.scan_interval_ms;
    let max = params.max_distance_cm;
    let min = params.min_distance_cm;
    let crank = params.crank_speed;

    for angle in [servo::RIGHT, servo::LEFT] {
        servo.write(angle);
        clock.delay_ms(settle_ms);
        map.record_at(servo.read(), range.distance_cm(max));
    }

    let side = ParkSide::choose(
        map.get(crate::sensors::range::RIGHT),
        map.get(crate::sensors::range::LEFT),
    );
    log::info!("park: side {:?}", side);
    servo.write(side.head_angle());
    clock.delay_ms(settle_ms);

    let passed = wait_until(clock, params.park_search_ms, PASS_POLL_MS, || {
        if range.distance_cm(max) < min {
            motors.forward(crank);
            false
        } else {
            true
        }
    });
    if !passed {
        motors.stop();
        log::warn!("park: first object not cleared, aborting");
        return ParkOutcome::Aborted(ParkPhase::PassFirst);
    }

    let reached = wait_until(clock, params.park_search_ms, APPROACH_POLL_MS, || {
        if range.distance_cm(max) < min {
            true
        } else {
            motors.forward(crank);
            false
        }
    });
    if !reached {
        motors.stop();
        log::warn!("park: second object not found, aborting");
        return ParkOutcome::Aborted(ParkPhase::ReachSecond);
    }

    motors.backward(crank);
    clock.delay_ms(params.park_away_ms);

    turn_toward(motors, side, params.rotate_speed);
    clock.delay_ms(params.rotate_90_ms);
    motors.stop();

    motors.forward(crank);
    clock.delay_ms(params.park_move_ms);

    turn_away(motors, side, params.rotate_speed);
    clock.delay_ms(params.rotate_90_ms);
    motors.stop();

    ParkOutcome::Parked(side)
}

fn turn_toward<M: MotorDriver + ?Sized>(motors: &mut M, side: ParkSide, speed: u8) {
    match side {
        ParkSide::Right => motors.rotate_right(speed),
        ParkSide::Left => motors.rotate_left(speed),
    }
}

fn turn_away<M: MotorDriver + ?Sized>(motors: &mut M, side: ParkSide, speed: u8) {
    match side {
        ParkSide::Right => motors.rotate_left(speed),
        ParkSide::Left => motors.rotate_right(speed),
    }
}
