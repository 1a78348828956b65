//! Line tracker contract
//!
//! Three reflective sensors under the chassis (left, middle, right). A
//! sensor is "active" when it sees the line.

use bitflags::bitflags;

bitflags! {
    /// Snapshot of the three line sensors
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LineReading: u8 {
        /// Left sensor over the line
        const LEFT = 0b0000_0001;
        /// Middle sensor over the line
        const MID = 0b0000_0010;
        /// Right sensor over the line
        const RIGHT = 0b0000_0100;
    }
}

/// Line sensor array contract
pub trait LineSensorArray {
    /// Left sensor sees the line
    fn left_active(&self) -> bool;

    /// Middle sensor sees the line
    fn mid_active(&self) -> bool;

    /// Right sensor sees the line
    fn right_active(&self) -> bool;

    /// At least one sensor sees the line
    fn any_active(&self) -> bool {
        self.left_active() || self.mid_active() || self.right_active()
    }

    /// All three sensors see the line (robot lifted or on a wide band)
    fn all_active(&self) -> bool {
        self.left_active() && self.mid_active() && self.right_active()
    }

    /// Read all three sensors at once
    fn reading(&self) -> LineReading {
        let mut reading = LineReading::empty();
        reading.set(LineReading::LEFT, self.left_active());
        reading.set(LineReading::MID, self.mid_active());
        reading.set(LineReading::RIGHT, self.right_active());
        reading
    }
}

impl<T: LineSensorArray + ?Sized> LineSensorArray for &T {
    fn left_active(&self) -> bool {
        (**self).left_active()
    }

    fn mid_active(&self) -> bool {
        (**self).mid_active()
    }

    fn right_active(&self) -> bool {
        (**self).right_active()
    }
}
