//! Beacon loop.
//!
//! Two phases:
//!
//! - **Startup** ([`Beacon::startup`], once): LED and IR lines driven to
//!   their inactive level, carrier divider computed and loaded, carrier
//!   left disabled.
//! - **Running** ([`Beacon::step`], forever): one beacon cycle per step.
//!
//! # Cycle
//!
//! ```text
//! counter += 1
//! counter == on_at  → LED on
//! transmit pattern (3 pulse pairs)
//! counter == period → LED off, counter = 0
//! ```
//!
//! Each pattern is transmitted inside a critical section, so no interrupt
//! on the beacon's core can stretch a mark or a space. Interrupts are taken
//! between patterns, at the end of the long space.
//!
//! [`Beacon::run`] never returns. Tests drive the running phase with
//! [`Beacon::step`] or [`Beacon::run_for`] instead.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::blink::BlinkCounter;
use crate::carrier::{carrier_frequency, CarrierGenerator, CarrierOutput};
use crate::config::BeaconConfig;
use crate::hal::gpio::StatusLed;
use crate::logging::LogStream;
use crate::pattern::{pattern_duration_us, pattern_duty_permille, Pattern};
use crate::transmitter::CodeElementTransmitter;
use crate::{rt_debug, rt_info, rt_warn};

/// Running beacon.
pub struct Beacon<'a, C, L, D> {
    transmitter: CodeElementTransmitter<C, D>,
    led: StatusLed<L>,
    counter: BlinkCounter,
    pattern: Pattern,
    log: &'a LogStream,
    /// Nominal elapsed time: sum of every emitted mark and space.
    elapsed_us: u64,
    cycles: u64,
}

impl<'a, C, L, D> Beacon<'a, C, L, D>
where
    C: CarrierOutput,
    L: OutputPin,
    D: DelayNs,
{
    /// Startup phase. Returns the beacon ready to run, emitting nothing.
    ///
    /// `config` must satisfy [`BeaconConfig::is_valid`].
    pub fn startup(
        carrier: C,
        led_pin: L,
        delay: D,
        config: &BeaconConfig,
        log: &'a LogStream,
    ) -> Self {
        debug_assert!(config.is_valid(), "invalid beacon configuration");

        let led = StatusLed::new(led_pin, config.pins.active_low);
        let carrier = CarrierGenerator::from_config(carrier, config);

        rt_info!(
            log,
            0,
            "startup: period {} ({} Hz), cycle {} us, duty {} permille",
            carrier.period(),
            carrier_frequency(config.clock_hz, carrier.period()),
            pattern_duration_us(&config.pattern),
            pattern_duty_permille(&config.pattern)
        );

        Self {
            transmitter: CodeElementTransmitter::new(carrier, delay),
            led,
            counter: BlinkCounter::from_config(config),
            pattern: config.pattern,
            log,
            elapsed_us: 0,
            cycles: 0,
        }
    }

    /// One beacon cycle.
    #[inline]
    pub fn step(&mut self) {
        if self.counter.advance() {
            if self.led.set(true).is_err() {
                rt_warn!(self.log, self.elapsed_us, "LED write failed");
            }
            rt_info!(
                self.log,
                self.elapsed_us,
                "LED on, blink period {}",
                self.counter.periods().wrapping_add(1)
            );
        }

        let cycle_us =
            critical_section::with(|_| self.transmitter.transmit_pattern(&self.pattern));
        self.elapsed_us = self.elapsed_us.wrapping_add(cycle_us as u64);
        self.cycles = self.cycles.wrapping_add(1);

        if self.counter.wrap() {
            if self.led.set(false).is_err() {
                rt_warn!(self.log, self.elapsed_us, "LED write failed");
            }
            rt_debug!(self.log, self.elapsed_us, "LED off after {} cycles", self.cycles);
        }
    }

    /// Run `cycles` beacon cycles, then return.
    pub fn run_for(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.step();
        }
    }

    /// Run for the lifetime of the device.
    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Blink counter state.
    pub fn counter(&self) -> &BlinkCounter {
        &self.counter
    }

    pub fn led(&self) -> &StatusLed<L> {
        &self.led
    }

    pub fn transmitter(&self) -> &CodeElementTransmitter<C, D> {
        &self.transmitter
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Nominal time spent transmitting since startup, in microseconds.
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    /// Beacon cycles completed since startup.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Stop the beacon and hand back the transmitter and the LED pin.
    pub fn release(self) -> (CodeElementTransmitter<C, D>, L) {
        (self.transmitter, self.led.release())
    }
}
