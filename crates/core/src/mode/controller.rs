//! Behavior controller
//!
//! [`ModeController`] exclusively owns the peripherals and all behavior
//! state: the active [`BehaviorState`], the [`RangeMap`], the
//! [`ScanTiming`] and the sweep memory. Everything is reset to defaults
//! when the active mode changes and otherwise persists across ticks.
//!
//! Ticks return promptly except for the scripted maneuvers (park, lost-line
//! recovery, rejoining the line) which block on the clock until done. A
//! mode change requested during such a maneuver is seen on the next
//! iteration.

use super::types::{Mode, ModeSource};
use crate::behavior::line::{self, Steer};
use crate::behavior::obstacle::{self, ObstacleInput, SweepAction};
use crate::behavior::park::{self, ParkOutcome, ParkRig};
use crate::behavior::remote::order_command;
use crate::behavior::{clearance_command, BehaviorState, OrderSource, RemoteOrder, ScanTiming};
use crate::motor::MotorDriver;
use crate::parameters::BehaviorParams;
use crate::sensors::range;
use crate::sensors::{LineReading, LineSensorArray, RangeMap, RangeSensor};
use crate::servo::{self, ServoHead, SweepSequencer};
use crate::traits::Clock;

/// Collaborators owned by the controller
pub struct Peripherals<M, S, R, L, I, C> {
    /// Drive motors
    pub motors: M,
    /// Scan head
    pub servo: S,
    /// Ultrasonic range sensor
    pub range: R,
    /// Line tracker
    pub line: L,
    /// Infrared order source
    pub ir: I,
    /// Time source
    pub clock: C,
}

/// Behavior controller
pub struct ModeController<M, S, R, L, I, C> {
    hw: Peripherals<M, S, R, L, I, C>,
    params: BehaviorParams,
    active: Mode,
    state: BehaviorState,
    map: RangeMap,
    timing: ScanTiming,
    sweep: SweepSequencer,
    last_park: Option<ParkOutcome>,
}

impl<M, S, R, L, I, C> ModeController<M, S, R, L, I, C>
where
    M: MotorDriver,
    S: ServoHead,
    R: RangeSensor,
    L: LineSensorArray,
    I: OrderSource,
    C: Clock,
{
    /// Create a controller in remote control mode
    ///
    /// The motor driver takes its dead zone from `params`.
    pub fn new(mut hw: Peripherals<M, S, R, L, I, C>, params: BehaviorParams) -> Self {
        hw.motors.set_dead_zone(params.dead_zone());
        let now = hw.clock.now_ms();
        Self {
            hw,
            params,
            active: Mode::RemoteControl,
            state: BehaviorState::Start,
            map: RangeMap::new(params.max_distance_cm),
            timing: ScanTiming::new(now, params.scan_interval_ms),
            sweep: SweepSequencer::new(),
            last_park: None,
        }
    }

    /// One-time peripheral initialization: head centered, motors stopped
    pub fn begin(&mut self) {
        self.hw.servo.write(servo::CENTER);
        self.hw.motors.stop();
        self.timing.mark(self.hw.clock.now_ms());
        log::info!("controller ready in {}", self.active.name());
    }

    /// Reset every piece of behavior state
    ///
    /// Afterwards the range map holds the sentinel in every slot, the state
    /// is `Start`, the head is at 90°, the interval is the default scan
    /// interval and the motors are stopped.
    pub fn restart_state(&mut self) {
        if self.hw.servo.read() != servo::CENTER {
            self.hw.servo.write(servo::CENTER);
        }
        self.timing = ScanTiming::new(self.hw.clock.now_ms(), self.params.scan_interval_ms);
        if !self.hw.motors.is_stopped() {
            self.hw.motors.stop();
        }
        self.state = BehaviorState::Start;
        self.sweep.reset();
        self.map.reset();
    }

    /// Replace the tuning parameters and reset
    pub fn apply_params(&mut self, params: BehaviorParams) {
        self.params = params;
        self.hw.motors.set_dead_zone(params.dead_zone());
        self.map = RangeMap::new(params.max_distance_cm);
        self.restart_state();
    }

    /// Poll the mode source once and run the matching tick
    ///
    /// A changed mode resets the controller first. Park is one-shot: after
    /// the script the controller falls back to remote control.
    pub fn run_iteration<Src: ModeSource + ?Sized>(&mut self, source: &mut Src) {
        let request = source.poll();
        if request.mode != self.active {
            log::info!("mode {} -> {}", self.active.name(), request.mode.name());
            self.active = request.mode;
            self.restart_state();
        }

        match request.mode {
            Mode::RemoteControl => self.remote_control_tick_with_speed(request.order, request.speed),
            Mode::IRControl => self.ir_control_tick(),
            Mode::ObstacleAvoidance => self.obstacle_avoidance_tick(),
            Mode::LineTracking => self.line_tracking_tick(),
            Mode::Park => {
                self.park_tick();
                self.active = Mode::RemoteControl;
                self.restart_state();
            }
            Mode::Custom => self.custom_tick(),
        }
    }

    /// Apply a manual order at the default speeds
    pub fn remote_control_tick(&mut self, order: RemoteOrder) {
        self.remote_control_tick_with_speed(order, 0);
    }

    /// Apply a manual order; a non-zero `speed` overrides the default
    pub fn remote_control_tick_with_speed(&mut self, order: RemoteOrder, speed: u8) {
        match order_command(order, speed, &self.params) {
            Some(command) => self.hw.motors.drive(command),
            None => log::trace!("ignored order {:?}", order),
        }
    }

    /// Apply the next infrared order; stop when none arrives in time
    pub fn ir_control_tick(&mut self) {
        if let Some(order) = self.hw.ir.poll_order() {
            if let Some(command) = order_command(order, 0, &self.params) {
                self.hw.motors.drive(command);
                self.timing.mark(self.hw.clock.now_ms());
            }
        }

        let now = self.hw.clock.now_ms();
        if self.timing.elapsed_at_least(now, self.params.ir_move_ms) {
            self.timing.mark(now);
            self.hw.motors.stop();
        }
    }

    /// One obstacle avoidance tick
    pub fn obstacle_avoidance_tick(&mut self) {
        let now = self.hw.clock.now_ms();
        if !self.timing.is_due(now) {
            return;
        }
        self.timing.mark(now);

        let angle = self.hw.servo.read();
        let distance = self.hw.range.distance_cm(self.params.max_distance_cm);
        self.map.record_at(angle, distance);

        let step = obstacle::step(
            &ObstacleInput {
                state: self.state,
                head_angle: angle,
                map: &self.map,
                rotating_left: self.hw.motors.is_rotating_left(),
                rotating_right: self.hw.motors.is_rotating_right(),
            },
            &self.params,
        );

        match step.sweep {
            SweepAction::Hold => {}
            SweepAction::Advance => self.sweep.advance(&mut self.hw.servo),
            SweepAction::SeedAndAdvance(extreme) => {
                self.sweep.seed(extreme);
                self.sweep.advance(&mut self.hw.servo);
            }
        }
        if let Some(command) = step.drive {
            self.hw.motors.drive(command);
        }
        if let Some(interval) = step.interval {
            self.timing.interval = interval;
        }
        if step.reset_sides {
            self.map.reset_sides();
        }
        self.transition(step.state);
    }

    /// One line tracking tick
    pub fn line_tracking_tick(&mut self) {
        let now = self.hw.clock.now_ms();
        let reading = self.hw.line.reading();
        let scan_due = self
            .timing
            .elapsed_at_least(now, self.params.line_scan_interval_ms);

        match self.state {
            BehaviorState::Start => {
                if reading.is_all() || !scan_due {
                    return;
                }
                let distance = self.sample_line_range(range::CENTER);
                self.timing.mark(now);
                if line::start_ready(reading, distance, &self.params) {
                    self.transition(BehaviorState::Forward);
                }
            }
            BehaviorState::Forward => {
                if scan_due {
                    self.timing.mark(now);
                    let distance = self.sample_line_range(range::CENTER);
                    if distance < self.params.detour_distance_cm {
                        log::info!("line: obstacle at {} cm, going around", distance);
                        let hw = &mut self.hw;
                        line::begin_evasion(&mut hw.motors, &mut hw.servo, &hw.clock, &self.params);
                        self.transition(BehaviorState::Rotate);
                        return;
                    }
                }
                self.follow_line(reading);
            }
            BehaviorState::Obstacle => {
                if !reading.contains(LineReading::MID) {
                    if scan_due {
                        self.timing.mark(now);
                        let distance = self.sample_line_range(range::RIGHT);
                        self.hw.motors.drive(clearance_command(distance, &self.params));
                    }
                } else {
                    let hw = &mut self.hw;
                    let found = line::rejoin(
                        &mut hw.motors,
                        &mut hw.servo,
                        &hw.line,
                        &hw.clock,
                        &self.params,
                    );
                    if !found {
                        log::warn!("line: not reacquired after go-around");
                    }
                    self.transition(BehaviorState::Start);
                }
            }
            BehaviorState::Rotate => {
                if self.timing.elapsed_at_least(now, self.params.rotate_90_ms) {
                    self.hw.motors.stop();
                    self.timing.mark(now);
                    self.transition(BehaviorState::Obstacle);
                }
            }
            BehaviorState::LineLost => {
                log::info!("line: lost, searching");
                let hw = &mut self.hw;
                let found = line::recover(&mut hw.motors, &hw.line, &hw.clock, &self.params);
                log::info!("line: search done, found={}", found);
                self.transition(BehaviorState::Start);
            }
            BehaviorState::Blocked => {}
        }
    }

    /// Run the parking script to completion
    pub fn park_tick(&mut self) {
        log::info!("park: start");
        let hw = &mut self.hw;
        let outcome = park::run(
            ParkRig {
                motors: &mut hw.motors,
                servo: &mut hw.servo,
                range: &mut hw.range,
                clock: &hw.clock,
            },
            &mut self.map,
            &self.params,
        );
        log::info!("park: {:?}", outcome);
        self.last_park = Some(outcome);
    }

    /// One custom mode tick
    ///
    /// Points the head right first (with a settle delay), then creeps along
    /// the object on that side.
    pub fn custom_tick(&mut self) {
        if self.hw.servo.read() != servo::RIGHT {
            self.hw.servo.write(servo::RIGHT);
            self.hw.clock.delay_ms(self.params.servo_settle_ms);
            return;
        }
        let distance = self.sample_line_range(range::RIGHT);
        self.hw.motors.drive(clearance_command(distance, &self.params));
    }

    fn follow_line(&mut self, reading: LineReading) {
        match line::steer(reading) {
            Steer::RotateLeft => self.hw.motors.rotate_left(self.params.rotate_speed),
            Steer::RotateRight => self.hw.motors.rotate_right(self.params.rotate_speed),
            Steer::Forward => {
                let speed = line::cruise_speed(self.map.get(range::CENTER), &self.params);
                self.hw.motors.forward(speed);
            }
            Steer::NoLine => {
                if !line::grace_wait(&self.hw.line, &self.hw.clock, &self.params) {
                    self.hw.motors.stop();
                    self.transition(BehaviorState::LineLost);
                }
            }
        }
    }

    fn sample_line_range(&mut self, slot: usize) -> u16 {
        let distance = self.hw.range.distance_cm(self.params.max_distance_line_cm);
        self.map.set(slot, distance);
        distance
    }

    fn transition(&mut self, next: BehaviorState) {
        if next != self.state {
            log::debug!("{}: {} -> {}", self.active.name(), self.state.name(), next.name());
            self.state = next;
        }
    }

    /// Active mode
    pub fn active_mode(&self) -> Mode {
        self.active
    }

    /// Current behavior state
    pub fn state(&self) -> BehaviorState {
        self.state
    }

    /// Range map
    pub fn range_map(&self) -> &RangeMap {
        &self.map
    }

    /// Scan timing
    pub fn timing(&self) -> ScanTiming {
        self.timing
    }

    /// Sweep memory
    pub fn sweep(&self) -> SweepSequencer {
        self.sweep
    }

    /// Tuning parameters
    pub fn params(&self) -> &BehaviorParams {
        &self.params
    }

    /// Outcome of the last park run
    pub fn last_park(&self) -> Option<ParkOutcome> {
        self.last_park
    }

    /// Owned peripherals
    pub fn peripherals(&self) -> &Peripherals<M, S, R, L, I, C> {
        &self.hw
    }

    /// Force the behavior state (bench testing and diagnostics)
    pub fn set_state(&mut self, state: BehaviorState) {
        self.transition(state);
    }

    /// Force the active mode without resetting
    pub fn set_active_mode(&mut self, mode: Mode) {
        self.active = mode;
    }

    /// Overwrite one range map slot
    pub fn set_range_slot(&mut self, slot: usize, distance: u16) {
        self.map.set(slot, distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::{
        MockLineSensors, MockModeSource, MockMotors, MockOrderSource, MockRangeSensor, MockServo,
    };
    use crate::mode::ModeRequest;
    use crate::motor::{DeadZone, MotorCommand};
    use crate::traits::MockClock;

    struct Bench {
        clock: MockClock,
        motors: MockMotors,
        servo: MockServo,
        line: MockLineSensors<'static>,
        ir: MockOrderSource,
    }

    impl Bench {
        fn new() -> Self {
            Self {
                clock: MockClock::new(),
                motors: MockMotors::new(),
                servo: MockServo::new(90),
                line: MockLineSensors::new(),
                ir: MockOrderSource::new(),
            }
        }
    }

    type TestController<'a> = ModeController<
        &'a MockMotors,
        &'a MockServo,
        &'a MockRangeSensor<'a>,
        &'a MockLineSensors<'static>,
        &'a MockOrderSource,
        &'a MockClock,
    >;

    fn controller<'a>(bench: &'a Bench, sensor: &'a MockRangeSensor<'a>) -> TestController<'a> {
        ModeController::new(
            Peripherals {
                motors: &bench.motors,
                servo: &bench.servo,
                range: sensor,
                line: &bench.line,
                ir: &bench.ir,
                clock: &bench.clock,
            },
            BehaviorParams::default(),
        )
    }

    #[test]
    fn test_begin_centers_and_stops() {
        let bench = Bench::new();
        bench.servo.place(30);
        let sensor = MockRangeSensor::new();
        let mut ctl = controller(&bench, &sensor);
        ctl.begin();
        assert_eq!(bench.servo.angle(), 90);
        assert!(bench.motors.command().is_stopped());
    }

    #[test]
    fn test_restart_state_resets_everything() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        sensor.set_distance(12);
        let mut ctl = controller(&bench, &sensor);

        bench.clock.set(1000);
        ctl.obstacle_avoidance_tick();
        assert_eq!(ctl.state(), BehaviorState::Obstacle);
        bench.servo.place(180);
        (&bench.motors).forward(200);

        bench.clock.set(5000);
        ctl.restart_state();
        assert_eq!(ctl.state(), BehaviorState::Start);
        assert_eq!(ctl.range_map().slots(), &[250; 5]);
        assert_eq!(bench.servo.angle(), 90);
        assert_eq!(ctl.timing(), ScanTiming::new(5000, 250));
        assert!(bench.motors.command().is_stopped());
        assert_eq!(ctl.sweep(), SweepSequencer::new());
    }

    #[test]
    fn test_obstacle_tick_waits_for_interval() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        let mut ctl = controller(&bench, &sensor);

        bench.clock.set(249);
        ctl.obstacle_avoidance_tick();
        assert_eq!(sensor.samples(), 0);

        bench.clock.set(250);
        ctl.obstacle_avoidance_tick();
        assert_eq!(sensor.samples(), 1);
        assert_eq!(ctl.state(), BehaviorState::Forward);
    }

    #[test]
    fn test_remote_control_tick() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        let mut ctl = controller(&bench, &sensor);

        ctl.remote_control_tick(RemoteOrder::Forward);
        assert_eq!(bench.motors.command(), MotorCommand::forward(170));
        ctl.remote_control_tick(RemoteOrder::Unknown);
        assert_eq!(bench.motors.command(), MotorCommand::forward(170));
        ctl.remote_control_tick_with_speed(RemoteOrder::Left, 220);
        assert_eq!(bench.motors.command(), MotorCommand::rotate_left(220));
        ctl.remote_control_tick(RemoteOrder::Stop);
        assert!(bench.motors.command().is_stopped());
    }

    #[test]
    fn test_apply_params_moves_dead_zone() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        let mut ctl = controller(&bench, &sensor);
        assert_eq!(bench.motors.dead_zone(), DeadZone::default());

        let params = BehaviorParams {
            crank_speed: 200,
            ..BehaviorParams::default()
        };
        ctl.apply_params(params);
        assert_eq!(bench.motors.dead_zone().crank, 200);

        // 170 no longer starts the wheels from rest
        ctl.remote_control_tick(RemoteOrder::Forward);
        assert!(bench.motors.command().is_stopped());
    }

    #[test]
    fn test_ir_tick_dead_man() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        let mut ctl = controller(&bench, &sensor);

        bench.ir.push(RemoteOrder::Forward);
        ctl.ir_control_tick();
        assert_eq!(bench.motors.command(), MotorCommand::forward(170));

        bench.clock.set(150);
        ctl.ir_control_tick();
        assert_eq!(bench.motors.command(), MotorCommand::forward(170));

        bench.clock.set(200);
        ctl.ir_control_tick();
        assert!(bench.motors.command().is_stopped());
    }

    #[test]
    fn test_ir_tick_unknown_does_not_refresh_timer() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        let mut ctl = controller(&bench, &sensor);

        bench.ir.push(RemoteOrder::Right);
        ctl.ir_control_tick();
        bench.clock.set(190);
        bench.ir.push(RemoteOrder::Unknown);
        ctl.ir_control_tick();
        assert_eq!(bench.motors.command(), MotorCommand::rotate_right(150));
        bench.clock.set(200);
        ctl.ir_control_tick();
        assert!(bench.motors.command().is_stopped());
    }

    #[test]
    fn test_custom_tick_points_right_first() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        sensor.set_distance(40);
        let mut ctl = controller(&bench, &sensor);

        ctl.custom_tick();
        assert_eq!(bench.servo.angle(), 0);
        assert_eq!(bench.clock.now_ms(), 300);
        assert_eq!(sensor.samples(), 0);

        ctl.custom_tick();
        assert_eq!(bench.motors.command(), MotorCommand::new(204, 0));
        assert_eq!(ctl.range_map().get(range::RIGHT), 40);
    }

    #[test]
    fn test_line_rotate_then_go_around() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        sensor.set_distance(5);
        let mut ctl = controller(&bench, &sensor);
        bench.line.set(LineReading::MID);
        ctl.set_state(BehaviorState::Forward);

        bench.clock.set(20);
        ctl.line_tracking_tick();
        assert_eq!(ctl.state(), BehaviorState::Rotate);
        assert_eq!(bench.servo.angle(), 0);
        assert_eq!(bench.motors.command(), MotorCommand::rotate_left(150));
        assert_eq!(bench.clock.now_ms(), 20 + 325);

        bench.clock.set(20 + 649);
        ctl.line_tracking_tick();
        assert_eq!(ctl.state(), BehaviorState::Rotate);

        bench.clock.set(20 + 650);
        ctl.line_tracking_tick();
        assert_eq!(ctl.state(), BehaviorState::Obstacle);
        assert!(bench.motors.command().is_stopped());

        // Off the line: clearance creep on the right-hand reading
        bench.line.set(LineReading::empty());
        sensor.set_distance(40);
        bench.clock.set(700);
        ctl.line_tracking_tick();
        assert_eq!(bench.motors.command(), MotorCommand::new(204, 0));

        // Back on the line: rejoin and restart
        bench.line.set(LineReading::MID);
        ctl.line_tracking_tick();
        assert_eq!(ctl.state(), BehaviorState::Start);
        assert_eq!(bench.servo.angle(), 90);
        assert!(bench.motors.command().is_stopped());
    }

    #[test]
    fn test_line_start_waits_on_floor() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        let mut ctl = controller(&bench, &sensor);

        bench.line.set(LineReading::all());
        bench.clock.set(100);
        ctl.line_tracking_tick();
        assert_eq!(ctl.state(), BehaviorState::Start);
        assert_eq!(sensor.samples(), 0);

        bench.line.set(LineReading::MID);
        ctl.line_tracking_tick();
        assert_eq!(ctl.state(), BehaviorState::Forward);
        // Capped at the line tracking range
        assert_eq!(ctl.range_map().get(range::CENTER), 100);
    }

    #[test]
    fn test_line_lost_recovers_to_start() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        let mut ctl = controller(&bench, &sensor);
        ctl.set_state(BehaviorState::LineLost);

        ctl.line_tracking_tick();
        assert_eq!(ctl.state(), BehaviorState::Start);
        assert!(bench.motors.command().is_stopped());
        assert_eq!(bench.clock.now_ms(), 1200 + 5000);
    }

    #[test]
    fn test_run_iteration_resets_on_mode_change() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        let mut ctl = controller(&bench, &sensor);
        let source = MockModeSource::new();

        source.push(ModeRequest::remote(RemoteOrder::Forward, 0));
        ctl.run_iteration(&mut &source);
        assert_eq!(bench.motors.command(), MotorCommand::forward(170));

        source.push(ModeRequest::new(Mode::ObstacleAvoidance));
        ctl.run_iteration(&mut &source);
        assert_eq!(ctl.active_mode(), Mode::ObstacleAvoidance);
        // Reset stopped the motors; the first scan is not due yet
        assert!(bench.motors.command().is_stopped());
        assert_eq!(ctl.state(), BehaviorState::Start);
    }

    #[test]
    fn test_run_iteration_park_is_one_shot() {
        let bench = Bench::new();
        let sensor = MockRangeSensor::new();
        let mut ctl = controller(&bench, &sensor);
        let source = MockModeSource::new();

        source.push(ModeRequest::new(Mode::Park));
        ctl.run_iteration(&mut &source);
        assert!(ctl.last_park().is_some());
        assert_eq!(ctl.active_mode(), Mode::RemoteControl);
        assert_eq!(bench.servo.angle(), 90);
        assert!(bench.motors.command().is_stopped());
    }
}
