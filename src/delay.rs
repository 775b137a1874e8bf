//! Calibrated busy-wait delay.
//!
//! The beacon has no timer interrupt and no scheduler on its path: every
//! microsecond of the waveform is produced by spinning. One outer iteration
//! is one microsecond, made of `spins_per_us` inner iterations of
//! [`SPIN_CYCLES`](crate::config::SPIN_CYCLES) cycles each.
//!
//! # Calibration
//!
//! Accuracy depends only on how closely the inner iteration matches
//! `SPIN_CYCLES` on the target clock. A wrong value scales every mark and
//! space by the same factor; nothing at runtime can detect it.

use core::hint::{black_box, spin_loop};

use embedded_hal::delay::DelayNs;

use crate::config::{BeaconConfig, CONFIG};

/// Blocking spin-loop delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusyWaitDelay {
    spins_per_us: u32,
}

impl BusyWaitDelay {
    /// Delay calibrated for this build's clock.
    pub const fn new() -> Self {
        Self::from_config(&CONFIG)
    }

    pub const fn from_config(config: &BeaconConfig) -> Self {
        Self::with_spins_per_us(config.spins_per_us())
    }

    /// Explicit calibration, clamped to at least one spin per microsecond.
    pub const fn with_spins_per_us(spins_per_us: u32) -> Self {
        Self {
            spins_per_us: if spins_per_us == 0 { 1 } else { spins_per_us },
        }
    }

    #[inline]
    pub fn spins_per_us(&self) -> u32 {
        self.spins_per_us
    }

    /// Block for approximately `us` microseconds.
    ///
    /// Cannot fail and cannot be cancelled.
    #[inline]
    pub fn delay(&self, us: u16) {
        self.spin(us as u32);
    }

    // black_box keeps both counters opaque so the loop cannot be folded
    // away or merged with its neighbours.
    #[inline(never)]
    fn spin(&self, us: u32) {
        let mut remaining = black_box(us);
        while remaining != 0 {
            let mut spins = black_box(self.spins_per_us);
            while spins != 0 {
                spin_loop();
                spins = black_box(spins - 1);
            }
            remaining = black_box(remaining - 1);
        }
    }
}

impl Default for BusyWaitDelay {
    fn default() -> Self {
        Self::new()
    }
}

/// Round a nanosecond request up to whole microseconds.
#[inline]
pub const fn ns_to_us(ns: u32) -> u32 {
    ns.div_ceil(1000)
}

impl DelayNs for BusyWaitDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.spin(ns_to_us(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.spin(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.spin(1000);
        }
    }
}
