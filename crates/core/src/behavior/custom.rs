//! Clearance creep
//!
//! Keeps the car at a fixed distance from an object on its right while
//! creeping forward. Used by the line tracking go-around and by the custom
//! mode. With the head at 0° the reading is the lateral distance to the
//! object.

use super::ramp::ramp;
use crate::motor::MotorCommand;
use crate::parameters::BehaviorParams;

/// Motor command that holds `distance` inside the clearance band
///
/// Inside `(detour - margin, detour + margin)` the car drives straight.
/// Farther out only the left side drives (curve toward the object); closer
/// in only the right side drives (curve away). Side speeds ramp on the
/// distance between 0 and the line tracking range cap.
pub fn clearance_command(distance: u16, params: &BehaviorParams) -> MotorCommand {
    let detour = params.detour_distance_cm;
    let margin = params.detour_margin_cm;
    let creep = ramp(distance, 0, params.max_distance_line_cm, params.move_speed);

    if distance > detour.saturating_sub(margin) && distance < detour.saturating_add(margin) {
        MotorCommand::forward(params.move_speed)
    } else if distance > detour {
        MotorCommand::new(i16::from(creep), 0)
    } else {
        MotorCommand::new(0, i16::from(creep))
    }
}
