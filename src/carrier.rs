//! Carrier generator.
//!
//! Owns the carrier peripheral and the divider derived for the target
//! frequency. Nothing else in the crate may touch the carrier seam
//! ([`CarrierOutput`]); the beacon only sees [`CarrierGenerator::enable`]
//! and [`CarrierGenerator::disable`].
//!
//! # Off phase
//!
//! Stopping the peripheral freezes the line wherever the square wave
//! happened to be, which may be the emitter-on level. `disable()` therefore
//! always writes the inactive level after stopping. The order matters:
//! writing first would let the still-running peripheral toggle the line
//! back.

use embedded_hal::digital::PinState;

use crate::config::BeaconConfig;
use crate::hal::gpio::inactive_level;

/// Hardware seam for a square-wave generator on the IR line.
pub trait CarrierOutput {
    /// Load the half-period divider. Called once at startup.
    fn configure(&mut self, period: u32);

    /// Reset the phase counter, clear pending status and start toggling.
    fn start(&mut self);

    /// Stop toggling. The line is left at whatever level it had.
    fn stop(&mut self);

    /// Drive the line directly, bypassing the generator.
    fn force_line(&mut self, state: PinState);
}

impl<T: CarrierOutput + ?Sized> CarrierOutput for &mut T {
    fn configure(&mut self, period: u32) {
        (**self).configure(period)
    }

    fn start(&mut self) {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn force_line(&mut self, state: PinState) {
        (**self).force_line(state)
    }
}

/// Half-period divider for a toggle-on-compare generator.
///
/// `period = (clock_hz / target_hz - 1) / 2`, truncating. 8 MHz and 38 kHz
/// give 104. `target_hz` must not exceed `clock_hz`.
#[inline]
pub const fn carrier_period(clock_hz: u32, target_hz: u32) -> u32 {
    (clock_hz / target_hz - 1) / 2
}

/// Frequency actually produced by `period`: `clock_hz / (2 * (period + 1))`.
#[inline]
pub const fn carrier_frequency(clock_hz: u32, period: u32) -> u32 {
    clock_hz / (2 * (period + 1))
}

/// Carrier generator with a fixed divider.
pub struct CarrierGenerator<C> {
    output: C,
    period: u32,
    off_level: PinState,
    enabled: bool,
}

impl<C: CarrierOutput> CarrierGenerator<C> {
    /// Take ownership of `output`, load `period` and park the line off.
    pub fn new(mut output: C, period: u32, off_level: PinState) -> Self {
        output.configure(period);
        output.stop();
        output.force_line(off_level);

        Self {
            output,
            period,
            off_level,
            enabled: false,
        }
    }

    /// Generator for the configured clock, carrier and polarity.
    pub fn from_config(output: C, config: &BeaconConfig) -> Self {
        Self::new(
            output,
            carrier_period(config.clock_hz, config.carrier_hz),
            inactive_level(config.pins.active_low),
        )
    }

    /// Start the carrier on the IR line.
    #[inline]
    pub fn enable(&mut self) {
        self.output.start();
        self.enabled = true;
    }

    /// Stop the carrier and force the IR line off.
    #[inline]
    pub fn disable(&mut self) {
        self.output.stop();
        self.output.force_line(self.off_level);
        self.enabled = false;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Divider loaded at startup.
    #[inline]
    pub fn period(&self) -> u32 {
        self.period
    }

    /// Level the IR line is parked at while disabled.
    #[inline]
    pub fn off_level(&self) -> PinState {
        self.off_level
    }

    /// Read-only access to the peripheral (diagnostics and tests).
    pub fn output(&self) -> &C {
        &self.output
    }

    /// Give the peripheral back, leaving the line off.
    pub fn release(mut self) -> C {
        self.disable();
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        period: Option<u32>,
        running: bool,
        line: Option<PinState>,
        calls: Vec<&'static str>,
    }

    impl CarrierOutput for Recorder {
        fn configure(&mut self, period: u32) {
            self.period = Some(period);
            self.calls.push("configure");
        }

        fn start(&mut self) {
            self.running = true;
            self.calls.push("start");
        }

        fn stop(&mut self) {
            self.running = false;
            self.calls.push("stop");
        }

        fn force_line(&mut self, state: PinState) {
            assert!(!self.running, "line written while generator running");
            self.line = Some(state);
            self.calls.push("force_line");
        }
    }

    #[test]
    fn test_reference_period() {
        assert_eq!(carrier_period(8_000_000, 38_000), 104);
    }

    #[test]
    fn test_period_truncates() {
        // 8 MHz / 40 kHz = 200 exactly, (200 - 1) / 2 = 99.5 -> 99
        assert_eq!(carrier_period(8_000_000, 40_000), 99);
        // 8 MHz / 36 kHz = 222.2 -> 222, (222 - 1) / 2 = 110.5 -> 110
        assert_eq!(carrier_period(8_000_000, 36_000), 110);
    }

    #[test]
    fn test_frequency_inverse() {
        assert_eq!(carrier_frequency(8_000_000, 104), 38_095);
    }

    #[test]
    fn test_new_parks_line_off() {
        let gen = CarrierGenerator::new(Recorder::default(), 104, PinState::High);

        assert!(!gen.is_enabled());
        assert_eq!(gen.output().period, Some(104));
        assert_eq!(gen.output().line, Some(PinState::High));
        assert_eq!(gen.output().calls, ["configure", "stop", "force_line"]);
    }

    #[test]
    fn test_disable_stops_before_writing() {
        let mut gen = CarrierGenerator::new(Recorder::default(), 104, PinState::High);
        gen.enable();
        assert!(gen.is_enabled());

        gen.disable();
        assert!(!gen.is_enabled());

        let calls = &gen.output().calls;
        assert_eq!(&calls[calls.len() - 3..], ["start", "stop", "force_line"]);
    }

    #[test]
    fn test_release_leaves_line_off() {
        let mut gen = CarrierGenerator::new(Recorder::default(), 104, PinState::High);
        gen.enable();

        let rec = gen.release();
        assert!(!rec.running);
        assert_eq!(rec.line, Some(PinState::High));
    }
}
