//! Module: config
//!
//! Purpose: Compile-time configuration for the beacon.
//!
//! Architecture:
//! - Every value is a `const`; there is no runtime configuration surface
//! - `build.rs` may override clock, carrier and spin calibration from the
//!   build environment (`IR_BEACON_CLOCK_HZ`, `IR_BEACON_CARRIER_HZ`,
//!   `IR_BEACON_SPIN_CYCLES`)
//! - Invariants are checked with `const` assertions, so a bad
//!   configuration fails to compile
//!
//! Safety: Safe. No unsafe blocks.

mod build_env;

use build_env::env_or;

use crate::pattern::{pattern_is_valid, Pattern};

/// Reference AVR resonator. ESP-IDF targets run the core at 240 MHz (S3)
/// or 160 MHz (C3).
#[cfg(not(target_os = "espidf"))]
const DEFAULT_CLOCK_HZ: u32 = 8_000_000;
#[cfg(all(target_os = "espidf", not(feature = "esp32c3")))]
const DEFAULT_CLOCK_HZ: u32 = 240_000_000;
#[cfg(all(target_os = "espidf", feature = "esp32c3"))]
const DEFAULT_CLOCK_HZ: u32 = 160_000_000;

/// Cycles one spin iteration of [`crate::delay::BusyWaitDelay`] consumes.
///
/// This is the calibration constant. Measure it with a scope on the IR line
/// (one 622 us mark should read 622 us) and adjust; every timing in the
/// beacon scales with it.
const DEFAULT_SPIN_CYCLES: u32 = 8;

const DEFAULT_CARRIER_HZ: u32 = 38_000;

/// Clock driving both the spin loop and the carrier timebase, in Hz.
pub const CLOCK_HZ: u32 = env_or(option_env!("IR_BEACON_CLOCK_HZ"), DEFAULT_CLOCK_HZ);

/// Target IR carrier frequency in Hz.
pub const CARRIER_HZ: u32 = env_or(option_env!("IR_BEACON_CARRIER_HZ"), DEFAULT_CARRIER_HZ);

/// Cycles per spin-loop iteration.
pub const SPIN_CYCLES: u32 = env_or(option_env!("IR_BEACON_SPIN_CYCLES"), DEFAULT_SPIN_CYCLES);

#[cfg(not(feature = "private-beacon"))]
const DEFAULT_PATTERN: Pattern = crate::pattern::MEASURED_BEACON;
#[cfg(feature = "private-beacon")]
const DEFAULT_PATTERN: Pattern = crate::pattern::PRIVATE_BEACON;

/// GPIO assignment for the two output lines and the log UART.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinConfig {
    /// IR emitter driver input (carrier output).
    pub ir_gpio: u8,
    /// Visible status LED.
    pub led_gpio: u8,
    /// UART TX for the log drain.
    pub log_tx_gpio: u8,
    /// Both LEDs are lit when their pin is driven low.
    pub active_low: bool,
}

#[cfg(not(feature = "esp32c3"))]
const DEFAULT_PINS: PinConfig = PinConfig {
    ir_gpio: 4,
    led_gpio: 2,
    log_tx_gpio: 6, // GPIO6 - UART TX (Quad flash, GPIO6 free for UART)
    active_low: true,
};
#[cfg(feature = "esp32c3")]
const DEFAULT_PINS: PinConfig = PinConfig {
    ir_gpio: 4,
    led_gpio: 8,
    log_tx_gpio: 21,
    active_low: true,
};

/// Complete beacon configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeaconConfig {
    pub clock_hz: u32,
    pub carrier_hz: u32,
    pub spin_cycles: u32,
    pub pattern: Pattern,
    /// Counter value at which the status LED turns on.
    pub blink_on_at: u16,
    /// Counter value at which the LED turns off and the counter wraps.
    pub blink_period: u16,
    pub pins: PinConfig,
}

impl BeaconConfig {
    /// Cycles of the clock per microsecond.
    #[inline]
    pub const fn cycles_per_us(&self) -> u32 {
        self.clock_hz / 1_000_000
    }

    /// Spin iterations needed for one microsecond (at least one).
    #[inline]
    pub const fn spins_per_us(&self) -> u32 {
        let spins = self.cycles_per_us() / self.spin_cycles;
        if spins == 0 {
            1
        } else {
            spins
        }
    }

    /// Checks every build-time invariant.
    pub const fn is_valid(&self) -> bool {
        self.clock_hz >= 1_000_000
            && self.spin_cycles > 0
            && self.carrier_hz > 0
            // carrier below half the clock, so the divider is at least 1
            && self.clock_hz / self.carrier_hz >= 3
            && pattern_is_valid(&self.pattern)
            // the counter is incremented before it is compared
            && self.blink_on_at > 0
            && self.blink_on_at < self.blink_period
    }
}

/// The build's configuration.
pub const CONFIG: BeaconConfig = BeaconConfig {
    clock_hz: CLOCK_HZ,
    carrier_hz: CARRIER_HZ,
    spin_cycles: SPIN_CYCLES,
    pattern: DEFAULT_PATTERN,
    blink_on_at: 2000,
    blink_period: 2005,
    pins: DEFAULT_PINS,
};

const _: () = assert!(CONFIG.is_valid(), "invalid beacon configuration");
