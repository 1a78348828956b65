//! Distance to duty-cycle ramp

/// Maximum duty cycle produced by the ramp
pub const FULL_SPEED: u8 = 255;

/// Map a distance reading linearly onto `[min_speed, 255]`
///
/// `min_distance` maps to `min_speed` and `max_distance` to full speed.
/// Distances outside the range are clamped first; a degenerate range
/// (`max_distance <= min_distance`) yields `min_speed`.
///
/// # Example
///
/// ```
/// use smartcar_core::behavior::ramp;
///
/// assert_eq!(ramp(30, 30, 250, 170), 170);
/// assert_eq!(ramp(250, 30, 250, 170), 255);
/// assert_eq!(ramp(140, 30, 250, 170), 212);
/// ```
pub fn ramp(distance: u16, min_distance: u16, max_distance: u16, min_speed: u8) -> u8 {
    if max_distance <= min_distance {
        return min_speed;
    }

    let distance = u32::from(distance.clamp(min_distance, max_distance));
    let span = u32::from(max_distance - min_distance);
    let headroom = u32::from(FULL_SPEED - min_speed);
    let offset = (distance - u32::from(min_distance)) * headroom / span;

    min_speed.saturating_add(offset as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(ramp(30, 30, 250, 170), 170);
        assert_eq!(ramp(250, 30, 250, 170), 255);
        assert_eq!(ramp(10, 10, 100, 170), 170);
        assert_eq!(ramp(100, 10, 100, 170), 255);
    }

    #[test]
    fn test_midpoint() {
        // 170 + (50 - 30) * 85 / 220 = 170 + 7
        assert_eq!(ramp(50, 30, 250, 170), 177);
    }

    #[test]
    fn test_monotonic() {
        let mut last = 0;
        for d in 30..=250 {
            let speed = ramp(d, 30, 250, 170);
            assert!(speed >= last);
            last = speed;
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(ramp(5, 30, 250, 170), 170);
        assert_eq!(ramp(400, 30, 250, 170), 255);
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(ramp(50, 30, 30, 170), 170);
        assert_eq!(ramp(50, 100, 30, 120), 120);
    }

    #[test]
    fn test_zero_floor() {
        assert_eq!(ramp(0, 0, 100, 0), 0);
        assert_eq!(ramp(50, 0, 100, 0), 127);
        assert_eq!(ramp(100, 0, 100, 0), 255);
    }
}
