//! Three-channel line tracker
//!
//! Reflective IR sensors pull their output low over the dark line.

use smartcar_core::sensors::LineSensorArray;

use crate::platform::GpioInterface;

/// Line tracker on three active-low inputs
pub struct LineTracker<G> {
    left: G,
    mid: G,
    right: G,
}

impl<G: GpioInterface> LineTracker<G> {
    /// Create the tracker from its left, middle and right inputs
    pub fn new(left: G, mid: G, right: G) -> Self {
        Self { left, mid, right }
    }
}

fn sees_line<G: GpioInterface>(pin: &G, name: &str) -> bool {
    match pin.is_high() {
        Ok(high) => !high,
        Err(e) => {
            crate::log_warn!("line sensor {} fault: {}", name, e);
            false
        }
    }
}

impl<G: GpioInterface> LineSensorArray for LineTracker<G> {
    fn left_active(&self) -> bool {
        sees_line(&self.left, "left")
    }

    fn mid_active(&self) -> bool {
        sees_line(&self.mid, "mid")
    }

    fn right_active(&self) -> bool {
        sees_line(&self.right, "right")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockGpio;
    use smartcar_core::sensors::LineReading;

    fn inputs() -> [MockGpio; 3] {
        let pins = [
            MockGpio::new_input(),
            MockGpio::new_input(),
            MockGpio::new_input(),
        ];
        for pin in &pins {
            pin.set_input_state(true);
        }
        pins
    }

    #[test]
    fn test_active_low() {
        let pins = inputs();
        let tracker = LineTracker::new(&pins[0], &pins[1], &pins[2]);
        assert!(!tracker.any_active());

        pins[1].set_input_state(false);
        assert_eq!(tracker.reading(), LineReading::MID);

        pins[0].set_input_state(false);
        pins[2].set_input_state(false);
        assert!(tracker.all_active());
    }

    #[test]
    fn test_fault_reads_inactive() {
        let pins = inputs();
        pins[0].set_input_state(false);
        pins[0].set_fault(true);
        let tracker = LineTracker::new(&pins[0], &pins[1], &pins[2]);
        assert!(!tracker.left_active());
    }
}
