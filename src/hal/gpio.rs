//! GPIO HAL for the status LED and line polarity.

use embedded_hal::digital::{OutputPin, PinState};

/// Pin level that lights an LED.
#[inline]
pub const fn active_level(active_low: bool) -> PinState {
    if active_low {
        PinState::Low
    } else {
        PinState::High
    }
}

/// Pin level that keeps an LED dark.
#[inline]
pub const fn inactive_level(active_low: bool) -> PinState {
    if active_low {
        PinState::High
    } else {
        PinState::Low
    }
}

/// Register bit for a pin level.
#[inline]
pub const fn level_bit(state: PinState) -> u32 {
    match state {
        PinState::Low => 0,
        PinState::High => 1,
    }
}

/// Visible status LED on a plain output pin.
pub struct StatusLed<P> {
    pin: P,
    active_low: bool,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Wrap `pin` and drive it dark.
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut led = Self {
            pin,
            active_low,
            lit: false,
        };
        let _ = led.set(false);
        led
    }

    /// Light or darken the LED.
    ///
    /// The IR output does not depend on this pin, so callers may log a
    /// failed write and carry on.
    #[inline]
    pub fn set(&mut self, lit: bool) -> Result<(), P::Error> {
        let state = if lit {
            active_level(self.active_low)
        } else {
            inactive_level(self.active_low)
        };
        self.lit = lit;
        self.pin.set_state(state)
    }

    #[inline]
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }

    pub fn release(self) -> P {
        self.pin
    }
}
