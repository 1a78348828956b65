//! Hardware-free collaborators for host tests
//!
//! Every fake uses interior mutability and implements its collaborator
//! trait for `&Fake`, so a test keeps a shared reference to inspect while
//! the controller owns another.
//!
//! ```
//! use smartcar_core::hal::mock::MockMotors;
//! use smartcar_core::motor::{MotorCommand, MotorDriver};
//!
//! let motors = MockMotors::new();
//! let mut handle = &motors;
//! handle.forward(170);
//! assert_eq!(motors.command(), MotorCommand::forward(170));
//! ```

use core::cell::{Cell, RefCell};

use heapless::{Deque, Vec};

use crate::behavior::{OrderSource, RemoteOrder};
use crate::mode::{ModeRequest, ModeSource};
use crate::motor::{DeadZone, MotorCommand, MotorDriver};
use crate::sensors::range::SLOT_COUNT;
use crate::sensors::{LineReading, LineSensorArray, RangeMap, RangeSensor};
use crate::servo::ServoHead;
use crate::traits::{Clock, MockClock};

/// Capacity of recorded histories
pub const HISTORY_LEN: usize = 64;

/// Capacity of scripted timelines and queues
pub const SCRIPT_LEN: usize = 16;

fn record<T: Copy, const N: usize>(log: &RefCell<Vec<T, N>>, item: T) {
    let mut log = log.borrow_mut();
    if log.is_full() {
        log.remove(0);
    }
    // Cannot fail after the removal above
    let _ = log.push(item);
}

/// Value from a `(time, value)` timeline: the latest entry not after `now`
fn timeline_value<T: Copy>(entries: &[(u32, T)], now: u32) -> Option<T> {
    entries
        .iter()
        .filter(|(at, _)| *at <= now)
        .max_by_key(|(at, _)| *at)
        .map(|(_, value)| *value)
}

// ============================================================================
// Motors
// ============================================================================

/// Motor fake applying the dead-zone rules
#[derive(Debug)]
pub struct MockMotors {
    dead_zone: Cell<DeadZone>,
    applied: Cell<MotorCommand>,
    history: RefCell<Vec<MotorCommand, HISTORY_LEN>>,
}

impl MockMotors {
    /// Stopped motors with the default dead zone
    pub fn new() -> Self {
        Self::with_dead_zone(DeadZone::default())
    }

    /// Stopped motors with a custom dead zone
    pub fn with_dead_zone(dead_zone: DeadZone) -> Self {
        Self {
            dead_zone: Cell::new(dead_zone),
            applied: Cell::new(MotorCommand::STOP),
            history: RefCell::new(Vec::new()),
        }
    }

    /// Command currently applied
    pub fn command(&self) -> MotorCommand {
        self.applied.get()
    }

    /// Every applied change, oldest first
    pub fn history(&self) -> Vec<MotorCommand, HISTORY_LEN> {
        self.history.borrow().clone()
    }

    /// Thresholds the fake currently applies
    pub fn dead_zone(&self) -> DeadZone {
        self.dead_zone.get()
    }
}

impl Default for MockMotors {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorDriver for &MockMotors {
    fn drive(&mut self, command: MotorCommand) {
        if let Some(next) = self.dead_zone.get().apply(self.applied.get(), command) {
            self.applied.set(next);
            record(&self.history, next);
        }
    }

    fn current(&self) -> MotorCommand {
        self.applied.get()
    }

    fn set_dead_zone(&mut self, dead_zone: DeadZone) {
        self.dead_zone.set(dead_zone);
    }
}

// ============================================================================
// Servo
// ============================================================================

/// Servo fake recording every write
#[derive(Debug)]
pub struct MockServo {
    angle: Cell<u8>,
    writes: RefCell<Vec<u8, HISTORY_LEN>>,
}

impl MockServo {
    /// Servo resting at `angle`
    pub fn new(angle: u8) -> Self {
        Self {
            angle: Cell::new(angle),
            writes: RefCell::new(Vec::new()),
        }
    }

    /// Current angle
    pub fn angle(&self) -> u8 {
        self.angle.get()
    }

    /// Move the head without recording a write
    pub fn place(&self, angle: u8) {
        self.angle.set(angle);
    }

    /// Every write, oldest first
    pub fn writes(&self) -> Vec<u8, HISTORY_LEN> {
        self.writes.borrow().clone()
    }
}

impl ServoHead for &MockServo {
    fn write(&mut self, angle: u8) {
        let angle = angle.min(crate::servo::LEFT);
        self.angle.set(angle);
        record(&self.writes, angle);
    }

    fn read(&self) -> u8 {
        self.angle.get()
    }
}

// ============================================================================
// Range sensor
// ============================================================================

/// Range sensor fake
///
/// Resolution order for each measurement:
/// 1. timeline entry at or before the linked clock's time
/// 2. slot distance for the linked servo's angle
/// 3. fixed distance
/// 4. no echo (returns `max_cm`)
///
/// Results are capped at `max_cm`, like the real sensor's timeout.
#[derive(Debug)]
pub struct MockRangeSensor<'a> {
    servo: Option<&'a MockServo>,
    clock: Option<&'a MockClock>,
    fixed: Cell<Option<u16>>,
    slots: Cell<[Option<u16>; SLOT_COUNT]>,
    timeline: RefCell<Vec<(u32, u16), SCRIPT_LEN>>,
    samples: Cell<usize>,
}

impl MockRangeSensor<'static> {
    /// Sensor that never receives an echo
    pub fn new() -> Self {
        Self {
            servo: None,
            clock: None,
            fixed: Cell::new(None),
            slots: Cell::new([None; SLOT_COUNT]),
            timeline: RefCell::new(Vec::new()),
            samples: Cell::new(0),
        }
    }
}

impl Default for MockRangeSensor<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> MockRangeSensor<'a> {
    /// Read per-slot distances at the angle of `servo`
    pub fn with_servo<'b>(self, servo: &'b MockServo) -> MockRangeSensor<'b>
    where
        'a: 'b,
    {
        MockRangeSensor {
            servo: Some(servo),
            clock: self.clock,
            fixed: self.fixed,
            slots: self.slots,
            timeline: self.timeline,
            samples: self.samples,
        }
    }

    /// Follow timeline entries against `clock`
    pub fn with_clock<'b>(self, clock: &'b MockClock) -> MockRangeSensor<'b>
    where
        'a: 'b,
    {
        MockRangeSensor {
            servo: self.servo,
            clock: Some(clock),
            fixed: self.fixed,
            slots: self.slots,
            timeline: self.timeline,
            samples: self.samples,
        }
    }

    /// Distance returned when nothing more specific applies
    pub fn set_distance(&self, cm: u16) {
        self.fixed.set(Some(cm));
    }

    /// Drop the fixed distance (no echo)
    pub fn clear_distance(&self) {
        self.fixed.set(None);
    }

    /// Distance seen when the linked servo points at `slot`'s angle
    pub fn set_slot(&self, slot: usize, cm: u16) {
        let mut slots = self.slots.get();
        if let Some(s) = slots.get_mut(slot) {
            *s = Some(cm);
        }
        self.slots.set(slots);
    }

    /// From `at_ms` on (until a later entry), the sensor reads `cm`
    pub fn at(&self, at_ms: u32, cm: u16) {
        let _ = self.timeline.borrow_mut().push((at_ms, cm));
    }

    /// Number of measurements taken
    pub fn samples(&self) -> usize {
        self.samples.get()
    }

    fn resolve(&self) -> Option<u16> {
        if let Some(clock) = self.clock {
            if let Some(cm) = timeline_value(&self.timeline.borrow(), clock.now_ms()) {
                return Some(cm);
            }
        }
        if let Some(servo) = self.servo {
            let slot = RangeMap::slot_for_angle(servo.angle());
            if let Some(cm) = self.slots.get()[slot] {
                return Some(cm);
            }
        }
        self.fixed.get()
    }
}

impl RangeSensor for &MockRangeSensor<'_> {
    fn distance_cm(&mut self, max_cm: u16) -> u16 {
        self.samples.set(self.samples.get() + 1);
        self.resolve().map_or(max_cm, |cm| cm.min(max_cm))
    }
}

// ============================================================================
// Line sensors
// ============================================================================

/// Line sensor fake with an optional clock-driven timeline
#[derive(Debug)]
pub struct MockLineSensors<'a> {
    clock: Option<&'a MockClock>,
    reading: Cell<LineReading>,
    timeline: RefCell<Vec<(u32, LineReading), SCRIPT_LEN>>,
}

impl MockLineSensors<'static> {
    /// No sensor on the line
    pub fn new() -> Self {
        Self {
            clock: None,
            reading: Cell::new(LineReading::empty()),
            timeline: RefCell::new(Vec::new()),
        }
    }
}

impl Default for MockLineSensors<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> MockLineSensors<'a> {
    /// No sensor on the line; timeline entries follow `clock`
    pub fn with_clock(clock: &'a MockClock) -> Self {
        Self {
            clock: Some(clock),
            reading: Cell::new(LineReading::empty()),
            timeline: RefCell::new(Vec::new()),
        }
    }

    /// Reading used when no timeline entry applies
    pub fn set(&self, reading: LineReading) {
        self.reading.set(reading);
    }

    /// From `at_ms` on (until a later entry), the sensors read `reading`
    pub fn at(&self, at_ms: u32, reading: LineReading) {
        let _ = self.timeline.borrow_mut().push((at_ms, reading));
    }

    fn current(&self) -> LineReading {
        self.clock
            .and_then(|clock| timeline_value(&self.timeline.borrow(), clock.now_ms()))
            .unwrap_or_else(|| self.reading.get())
    }
}

impl LineSensorArray for MockLineSensors<'_> {
    fn left_active(&self) -> bool {
        self.current().contains(LineReading::LEFT)
    }

    fn mid_active(&self) -> bool {
        self.current().contains(LineReading::MID)
    }

    fn right_active(&self) -> bool {
        self.current().contains(LineReading::RIGHT)
    }
}

// ============================================================================
// Order and mode sources
// ============================================================================

/// Queue of remote orders handed out one per poll
#[derive(Debug, Default)]
pub struct MockOrderSource {
    queue: RefCell<Deque<RemoteOrder, SCRIPT_LEN>>,
}

impl MockOrderSource {
    /// Empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an order for a later poll
    pub fn push(&self, order: RemoteOrder) {
        let _ = self.queue.borrow_mut().push_back(order);
    }

    /// Orders not yet polled
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl OrderSource for &MockOrderSource {
    fn poll_order(&mut self) -> Option<RemoteOrder> {
        self.queue.borrow_mut().pop_front()
    }
}

/// Mode source replaying queued requests, then repeating the last one
#[derive(Debug, Default)]
pub struct MockModeSource {
    queue: RefCell<Deque<ModeRequest, SCRIPT_LEN>>,
    last: Cell<ModeRequest>,
}

impl MockModeSource {
    /// Source reporting remote control / stop until told otherwise
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request for a later poll
    pub fn push(&self, request: ModeRequest) {
        let _ = self.queue.borrow_mut().push_back(request);
    }
}

impl ModeSource for &MockModeSource {
    fn poll(&mut self) -> ModeRequest {
        if let Some(next) = self.queue.borrow_mut().pop_front() {
            self.last.set(next);
        }
        self.last.get()
    }
}
