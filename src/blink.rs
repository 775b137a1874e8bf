//! Status LED blink counter.
//!
//! Counts beacon cycles and marks a short window in which the visible LED
//! is lit. With the reference values (on at 2000, period 2005) the LED is
//! on for 5 of every 2005 cycles, about 51 ms every 20.5 s.
//!
//! The counter is advanced by the beacon loop itself, once per cycle, so it
//! can never drift against the transmit loop.

use crate::config::BeaconConfig;

/// Cycle counter in `[0, period]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlinkCounter {
    count: u16,
    on_at: u16,
    period: u16,
    /// Completed periods since startup (wraps).
    periods: u32,
}

impl BlinkCounter {
    pub const fn new(on_at: u16, period: u16) -> Self {
        Self {
            count: 0,
            on_at,
            period,
            periods: 0,
        }
    }

    pub const fn from_config(config: &BeaconConfig) -> Self {
        Self::new(config.blink_on_at, config.blink_period)
    }

    /// Start-of-cycle step: increment.
    ///
    /// Returns `true` when the LED must be turned on.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.count = self.count.wrapping_add(1);
        self.count == self.on_at
    }

    /// End-of-cycle step: wrap at the period.
    ///
    /// Returns `true` when the LED must be turned off. The counter is reset
    /// to 0 in the same step.
    #[inline]
    pub fn wrap(&mut self) -> bool {
        if self.count == self.period {
            self.count = 0;
            self.periods = self.periods.wrapping_add(1);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn count(&self) -> u16 {
        self.count
    }

    #[inline]
    pub fn periods(&self) -> u32 {
        self.periods
    }

    /// True while the counter is inside `[on_at, period)`.
    #[inline]
    pub fn in_window(&self) -> bool {
        self.count >= self.on_at && self.count < self.period
    }
}
