//! Obstacle avoidance state machine
//!
//! Drive forward at a speed ramped on the center distance while the scan
//! head sweeps the narrow leg (30°/150°). Side readings steer the car away
//! with an in-place rotation; a blocked center stops the car and sweeps the
//! wide leg (0°/180°) to pick a way out, which is then taken with an
//! open-loop timed rotation.
//!
//! [`step`] is the pure transition function. The controller samples the
//! range sensor into the [`RangeMap`] at the current head angle, calls
//! [`step`] and applies the returned [`ObstacleStep`].

use super::ramp::ramp;
use super::BehaviorState;
use crate::motor::MotorCommand;
use crate::parameters::BehaviorParams;
use crate::sensors::range::{self, RangeMap};
use crate::servo;

/// What to do with the scan head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    /// Leave the head where it is
    Hold,
    /// Advance one step along the current leg
    Advance,
    /// Seed the sweep memory with the given extreme, then advance
    SeedAndAdvance(u8),
}

/// Inputs to one due tick
#[derive(Debug, Clone, Copy)]
pub struct ObstacleInput<'a> {
    /// State before the tick
    pub state: BehaviorState,
    /// Current head angle
    pub head_angle: u8,
    /// Range map including the sample just taken
    pub map: &'a RangeMap,
    /// Motors already spinning left
    pub rotating_left: bool,
    /// Motors already spinning right
    pub rotating_right: bool,
}

/// Outcome of one due tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleStep {
    /// State after the tick
    pub state: BehaviorState,
    /// Motor command to issue, if any
    pub drive: Option<MotorCommand>,
    /// Scan head action
    pub sweep: SweepAction,
    /// New scan interval, if it changes
    pub interval: Option<u32>,
    /// Reset the front-left/front-right slots
    pub reset_sides: bool,
}

impl ObstacleStep {
    fn stay(state: BehaviorState) -> Self {
        Self {
            state,
            drive: None,
            sweep: SweepAction::Hold,
            interval: None,
            reset_sides: false,
        }
    }
}

/// Rotation away from the nearer outer reading
///
/// Turns left when the right-hand slot (0°) is nearer than the left-hand
/// slot (180°), otherwise right.
pub fn escape_rotation(map: &RangeMap, speed: u8) -> MotorCommand {
    if map.get(range::RIGHT) < map.get(range::LEFT) {
        MotorCommand::rotate_left(speed)
    } else {
        MotorCommand::rotate_right(speed)
    }
}

/// Advance the obstacle avoidance machine by one due tick
pub fn step(input: &ObstacleInput<'_>, params: &BehaviorParams) -> ObstacleStep {
    let map = input.map;
    let min = params.min_distance_cm;
    let center = map.get(range::CENTER);
    let cruise = || {
        MotorCommand::forward(ramp(
            center,
            min,
            params.max_distance_cm,
            params.move_speed,
        ))
    };

    match input.state {
        BehaviorState::Start => {
            if center >= min {
                ObstacleStep {
                    state: BehaviorState::Forward,
                    drive: Some(cruise()),
                    sweep: SweepAction::SeedAndAdvance(servo::FRONT_RIGHT),
                    interval: Some(params.scan_interval_ms),
                    reset_sides: false,
                }
            } else {
                ObstacleStep {
                    state: BehaviorState::Obstacle,
                    drive: Some(MotorCommand::STOP),
                    sweep: SweepAction::SeedAndAdvance(servo::RIGHT),
                    interval: Some(params.scan_interval_ms),
                    reset_sides: false,
                }
            }
        }
        BehaviorState::Forward => {
            if center < min {
                ObstacleStep {
                    state: BehaviorState::Obstacle,
                    drive: Some(MotorCommand::STOP),
                    sweep: SweepAction::SeedAndAdvance(servo::RIGHT),
                    interval: Some(params.scan_interval_ms),
                    reset_sides: false,
                }
            } else if map.get(range::FRONT_RIGHT) < min {
                ObstacleStep {
                    drive: (!input.rotating_left)
                        .then(|| MotorCommand::rotate_left(params.rotate_speed)),
                    interval: Some(0),
                    ..ObstacleStep::stay(BehaviorState::Forward)
                }
            } else if map.get(range::FRONT_LEFT) < min {
                ObstacleStep {
                    drive: (!input.rotating_right)
                        .then(|| MotorCommand::rotate_right(params.rotate_speed)),
                    interval: Some(0),
                    ..ObstacleStep::stay(BehaviorState::Forward)
                }
            } else {
                ObstacleStep {
                    state: BehaviorState::Forward,
                    drive: Some(cruise()),
                    sweep: SweepAction::Advance,
                    interval: Some(params.scan_interval_ms),
                    reset_sides: false,
                }
            }
        }
        BehaviorState::Obstacle => {
            if input.head_angle != servo::RIGHT {
                return ObstacleStep {
                    sweep: SweepAction::Advance,
                    ..ObstacleStep::stay(BehaviorState::Obstacle)
                };
            }

            let boxed_in = map.all_below(&[range::RIGHT, range::CENTER, range::LEFT], min);
            let (state, hold) = if boxed_in {
                (BehaviorState::Blocked, params.rotate_180_ms)
            } else {
                (BehaviorState::Rotate, params.rotate_90_ms)
            };
            ObstacleStep {
                state,
                drive: Some(escape_rotation(map, params.rotate_speed)),
                sweep: SweepAction::Advance,
                interval: Some(hold),
                reset_sides: true,
            }
        }
        BehaviorState::Rotate | BehaviorState::Blocked => ObstacleStep {
            state: BehaviorState::Start,
            drive: Some(MotorCommand::STOP),
            sweep: SweepAction::Hold,
            interval: Some(0),
            reset_sides: false,
        },
        // Not reachable in this mode; restart the cycle
        BehaviorState::LineLost => ObstacleStep {
            drive: Some(MotorCommand::STOP),
            interval: Some(params.scan_interval_ms),
            ..ObstacleStep::stay(BehaviorState::Start)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(state: BehaviorState, head_angle: u8, map: &RangeMap) -> ObstacleInput<'_> {
        ObstacleInput {
            state,
            head_angle,
            map,
            rotating_left: false,
            rotating_right: false,
        }
    }

    fn map_with(values: [u16; 5]) -> RangeMap {
        let mut map = RangeMap::new(250);
        for (slot, value) in values.iter().enumerate() {
            map.set(slot, *value);
        }
        map
    }

    #[test]
    fn test_start_clear_goes_forward() {
        let params = BehaviorParams::default();
        let map = map_with([250, 250, 50, 250, 250]);
        let out = step(&input(BehaviorState::Start, 90, &map), &params);

        assert_eq!(out.state, BehaviorState::Forward);
        assert_eq!(out.drive, Some(MotorCommand::forward(177)));
        assert_eq!(out.sweep, SweepAction::SeedAndAdvance(30));
        assert_eq!(out.interval, Some(250));
    }

    #[test]
    fn test_start_clear_for_any_distance_at_or_above_min() {
        let params = BehaviorParams::default();
        for d in [30u16, 31, 100, 249, 250] {
            let map = map_with([250, 250, d, 250, 250]);
            let out = step(&input(BehaviorState::Start, 90, &map), &params);
            assert_eq!(out.state, BehaviorState::Forward, "distance {}", d);
            assert_eq!(out.interval, Some(params.scan_interval_ms));
        }
    }

    #[test]
    fn test_start_blocked_scans_wide() {
        let params = BehaviorParams::default();
        let map = map_with([250, 250, 29, 250, 250]);
        let out = step(&input(BehaviorState::Start, 90, &map), &params);

        assert_eq!(out.state, BehaviorState::Obstacle);
        assert_eq!(out.drive, Some(MotorCommand::STOP));
        assert_eq!(out.sweep, SweepAction::SeedAndAdvance(0));
    }

    #[test]
    fn test_forward_center_blocked() {
        let params = BehaviorParams::default();
        let map = map_with([250, 250, 20, 250, 250]);
        let out = step(&input(BehaviorState::Forward, 90, &map), &params);

        assert_eq!(out.state, BehaviorState::Obstacle);
        assert_eq!(out.drive, Some(MotorCommand::STOP));
        assert_eq!(out.interval, Some(250));
    }

    #[test]
    fn test_forward_front_right_rotates_left_fast_rescan() {
        let params = BehaviorParams::default();
        let map = map_with([250, 20, 100, 250, 250]);
        let out = step(&input(BehaviorState::Forward, 30, &map), &params);

        assert_eq!(out.state, BehaviorState::Forward);
        assert_eq!(out.drive, Some(MotorCommand::rotate_left(150)));
        assert_eq!(out.sweep, SweepAction::Hold);
        assert_eq!(out.interval, Some(0));
    }

    #[test]
    fn test_forward_already_rotating_keeps_command() {
        let params = BehaviorParams::default();
        let map = map_with([250, 20, 100, 250, 250]);
        let mut inp = input(BehaviorState::Forward, 30, &map);
        inp.rotating_left = true;
        let out = step(&inp, &params);

        assert_eq!(out.drive, None);
        assert_eq!(out.interval, Some(0));
    }

    #[test]
    fn test_forward_front_left_rotates_right() {
        let params = BehaviorParams::default();
        let map = map_with([250, 250, 100, 15, 250]);
        let out = step(&input(BehaviorState::Forward, 150, &map), &params);

        assert_eq!(out.drive, Some(MotorCommand::rotate_right(150)));
        assert_eq!(out.interval, Some(0));
    }

    #[test]
    fn test_forward_clear_advances_sweep() {
        let params = BehaviorParams::default();
        let map = map_with([250, 250, 250, 250, 250]);
        let out = step(&input(BehaviorState::Forward, 150, &map), &params);

        assert_eq!(out.drive, Some(MotorCommand::forward(255)));
        assert_eq!(out.sweep, SweepAction::Advance);
        assert_eq!(out.interval, Some(250));
    }

    #[test]
    fn test_obstacle_keeps_sweeping_until_right() {
        let params = BehaviorParams::default();
        let map = map_with([250, 250, 20, 250, 250]);
        for angle in [180u8, 90] {
            let out = step(&input(BehaviorState::Obstacle, angle, &map), &params);
            assert_eq!(out.state, BehaviorState::Obstacle);
            assert_eq!(out.sweep, SweepAction::Advance);
            assert_eq!(out.drive, None);
        }
    }

    #[test]
    fn test_obstacle_boxed_in_turns_around() {
        let params = BehaviorParams::default();
        let map = map_with([10, 250, 20, 250, 25]);
        let out = step(&input(BehaviorState::Obstacle, 0, &map), &params);

        assert_eq!(out.state, BehaviorState::Blocked);
        assert_eq!(out.interval, Some(1200));
        assert!(out.reset_sides);
        assert_eq!(out.sweep, SweepAction::Advance);
        // Right side nearer: turn left
        assert_eq!(out.drive, Some(MotorCommand::rotate_left(150)));
    }

    #[test]
    fn test_obstacle_with_exit_rotates_quarter() {
        let params = BehaviorParams::default();
        let map = map_with([200, 250, 20, 250, 40]);
        let out = step(&input(BehaviorState::Obstacle, 0, &map), &params);

        assert_eq!(out.state, BehaviorState::Rotate);
        assert_eq!(out.interval, Some(650));
        assert_eq!(out.drive, Some(MotorCommand::rotate_right(150)));
    }

    #[test]
    fn test_rotation_done_returns_to_start() {
        let params = BehaviorParams::default();
        let map = map_with([250; 5]);
        for state in [BehaviorState::Rotate, BehaviorState::Blocked] {
            let out = step(&input(state, 90, &map), &params);
            assert_eq!(out.state, BehaviorState::Start);
            assert_eq!(out.drive, Some(MotorCommand::STOP));
            assert_eq!(out.interval, Some(0));
        }
    }
}
