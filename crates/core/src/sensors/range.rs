//! Range sensor contract and range map
//!
//! The range map keeps the last distance seen at each of the five scan
//! angles. Slots are indexed by discretized head angle:
//!
//! | Slot | Angle | Looks        |
//! |------|-------|--------------|
//! | 0    | 0°    | right        |
//! | 1    | 30°   | front-right  |
//! | 2    | 90°   | ahead        |
//! | 3    | 150°  | front-left   |
//! | 4    | 180°  | left         |

use crate::servo;

/// Number of slots in the range map
pub const SLOT_COUNT: usize = 5;

/// Slot for the 0° sample
pub const RIGHT: usize = 0;
/// Slot for the 30° sample
pub const FRONT_RIGHT: usize = 1;
/// Slot for the 90° sample
pub const CENTER: usize = 2;
/// Slot for the 150° sample
pub const FRONT_LEFT: usize = 3;
/// Slot for the 180° sample
pub const LEFT: usize = 4;

/// Ultrasonic range sensor contract
///
/// `distance_cm` returns `max_cm` when no echo arrives within the window
/// for `max_cm`. Callers treat that sentinel as a clear path.
pub trait RangeSensor {
    /// Measure the distance in centimeters, capped at `max_cm`
    fn distance_cm(&mut self, max_cm: u16) -> u16;
}

/// Last known distance per scan angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeMap {
    slots: [u16; SLOT_COUNT],
    sentinel: u16,
}

impl RangeMap {
    /// Create a map with every slot at the no-echo sentinel
    pub const fn new(sentinel: u16) -> Self {
        Self {
            slots: [sentinel; SLOT_COUNT],
            sentinel,
        }
    }

    /// Map a head angle to its slot
    ///
    /// Angles outside the five scan angles fall back to slot 0.
    pub fn slot_for_angle(angle: u8) -> usize {
        match angle {
            servo::RIGHT => RIGHT,
            servo::FRONT_RIGHT => FRONT_RIGHT,
            servo::CENTER => CENTER,
            servo::FRONT_LEFT => FRONT_LEFT,
            servo::LEFT => LEFT,
            _ => RIGHT,
        }
    }

    /// The no-echo sentinel value
    pub fn sentinel(&self) -> u16 {
        self.sentinel
    }

    /// Distance stored in `slot`
    ///
    /// Out-of-range slots read as the sentinel.
    pub fn get(&self, slot: usize) -> u16 {
        self.slots.get(slot).copied().unwrap_or(self.sentinel)
    }

    /// Overwrite one slot
    pub fn set(&mut self, slot: usize, distance: u16) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = distance;
        }
    }

    /// Store a sample taken with the head at `angle`
    pub fn record_at(&mut self, angle: u8, distance: u16) {
        self.set(Self::slot_for_angle(angle), distance);
    }

    /// Every slot back to the sentinel
    pub fn reset(&mut self) {
        self.slots = [self.sentinel; SLOT_COUNT];
    }

    /// Front-left and front-right slots back to the sentinel
    pub fn reset_sides(&mut self) {
        self.slots[FRONT_RIGHT] = self.sentinel;
        self.slots[FRONT_LEFT] = self.sentinel;
    }

    /// True when all of `slots` hold a distance below `min`
    pub fn all_below(&self, slots: &[usize], min: u16) -> bool {
        slots.iter().all(|&slot| self.get(slot) < min)
    }

    /// Raw slot values
    pub fn slots(&self) -> &[u16; SLOT_COUNT] {
        &self.slots
    }
}

impl<T: RangeSensor + ?Sized> RangeSensor for &mut T {
    fn distance_cm(&mut self, max_cm: u16) -> u16 {
        (**self).distance_cm(max_cm)
    }
}
