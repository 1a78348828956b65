//! HC-SR04 ultrasonic range sensor
//!
//! A 10 µs trigger pulse starts a ping; the echo line then stays high for
//! the round-trip time of the sound. Distance is half the round trip at
//! 343 m/s, i.e. `echo_us * 0.01715` cm.
//!
//! The capture timeout is derived from the requested maximum distance, so a
//! short-range query never waits for a far echo. No echo, or any pin fault,
//! reports `max_cm`: an open road.

use smartcar_core::sensors::RangeSensor;

use crate::platform::{EchoInput, GpioInterface, Result, TimerInterface};

/// Centimeters per microsecond of echo (half the speed of sound)
pub const CM_PER_ECHO_US: f32 = 0.01715;

/// Trigger pulse width (µs)
const TRIGGER_US: u32 = 10;

/// Trigger line settle time before the pulse (µs)
const SETTLE_US: u32 = 3;

/// Echo timeout for a maximum distance
pub fn echo_timeout_us(max_cm: u16) -> u32 {
    (f32::from(max_cm) / CM_PER_ECHO_US) as u32
}

/// Distance for an echo width, capped at `max_cm`
pub fn echo_to_cm(echo_us: u32, max_cm: u16) -> u16 {
    let cm = echo_us as f32 * CM_PER_ECHO_US;
    if cm >= f32::from(max_cm) {
        max_cm
    } else {
        cm as u16
    }
}

/// HC-SR04 driver
pub struct HcSr04<T, E, D> {
    trigger: T,
    echo: E,
    timer: D,
}

impl<T, E, D> HcSr04<T, E, D>
where
    T: GpioInterface,
    E: EchoInput,
    D: TimerInterface,
{
    /// Create the driver with the trigger idle low
    ///
    /// # Errors
    ///
    /// Returns the platform error if the trigger pin cannot be driven.
    pub fn new(mut trigger: T, echo: E, timer: D) -> Result<Self> {
        trigger.set_low()?;
        Ok(Self {
            trigger,
            echo,
            timer,
        })
    }

    /// Ping once
    ///
    /// Returns `Ok(None)` when no echo arrives within the timeout for
    /// `max_cm`.
    pub fn measure(&mut self, max_cm: u16) -> Result<Option<u16>> {
        self.trigger.set_low()?;
        self.timer.delay_us(SETTLE_US)?;
        self.trigger.set_high()?;
        self.timer.delay_us(TRIGGER_US)?;
        self.trigger.set_low()?;

        let echo = self.echo.measure_high_us(echo_timeout_us(max_cm))?;
        Ok(echo.map(|us| echo_to_cm(us, max_cm)))
    }
}

impl<T, E, D> RangeSensor for HcSr04<T, E, D>
where
    T: GpioInterface,
    E: EchoInput,
    D: TimerInterface,
{
    fn distance_cm(&mut self, max_cm: u16) -> u16 {
        match self.measure(max_cm) {
            Ok(Some(cm)) => cm,
            Ok(None) => max_cm,
            Err(e) => {
                crate::log_warn!("ultrasonic fault: {}", e);
                max_cm
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockEcho, MockGpio, MockTimer};

    #[test]
    fn test_conversions() {
        assert_eq!(echo_timeout_us(250), 14_577);
        assert_eq!(echo_timeout_us(100), 5_830);
        assert_eq!(echo_to_cm(2_916, 250), 50);
        assert_eq!(echo_to_cm(1_750, 250), 30);
        assert_eq!(echo_to_cm(20_000, 250), 250);
    }

    #[test]
    fn test_ping_sequence() {
        let trigger = MockGpio::new_output();
        let echo = MockEcho::new();
        let timer = MockTimer::new();
        echo.set_pulse(Some(2_916));
        let mut sensor = HcSr04::new(&trigger, &echo, &timer).unwrap();

        assert_eq!(sensor.distance_cm(250), 50);
        assert_eq!(trigger.rising_edges(), 1);
        assert!(!trigger.level());
        assert_eq!(timer.elapsed_us(), 13);
        assert_eq!(echo.last_timeout_us(), 14_577);
    }

    #[test]
    fn test_no_echo_is_max_range() {
        let trigger = MockGpio::new_output();
        let echo = MockEcho::new();
        let timer = MockTimer::new();
        let mut sensor = HcSr04::new(&trigger, &echo, &timer).unwrap();

        assert_eq!(sensor.measure(100), Ok(None));
        assert_eq!(sensor.distance_cm(100), 100);

        // Echo beyond the short-range timeout
        echo.set_pulse(Some(10_000));
        assert_eq!(sensor.distance_cm(100), 100);
        assert_eq!(sensor.distance_cm(250), 171);
    }

    #[test]
    fn test_fault_fails_open() {
        let trigger = MockGpio::new_output();
        let echo = MockEcho::new();
        let timer = MockTimer::new();
        echo.set_pulse(Some(600));
        let mut sensor = HcSr04::new(&trigger, &echo, &timer).unwrap();

        echo.set_fault(true);
        assert_eq!(sensor.distance_cm(250), 250);

        echo.set_fault(false);
        trigger.set_fault(true);
        assert_eq!(sensor.distance_cm(250), 250);
        assert_eq!(echo.captures(), 1);
    }
}
