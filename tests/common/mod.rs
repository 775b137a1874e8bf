//! Simulated hardware on a shared virtual clock.
//!
//! Time only advances inside `VirtualDelay`, so every timestamp recorded
//! by the carrier or the LED is exact and reproducible.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use ir_beacon::CarrierOutput;

/// Nanoseconds since the test started.
#[derive(Clone, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ns(&self) -> u64 {
        self.0.get()
    }

    pub fn now_us(&self) -> u64 {
        self.0.get() / 1000
    }

    fn advance_ns(&self, ns: u64) {
        self.0.set(self.0.get() + ns);
    }
}

/// Delay that moves the virtual clock instead of spinning.
pub struct VirtualDelay {
    clock: Clock,
    pub calls: Rc<RefCell<Vec<u32>>>,
}

impl VirtualDelay {
    pub fn new(clock: &Clock) -> Self {
        Self {
            clock: clock.clone(),
            calls: Rc::default(),
        }
    }
}

impl DelayNs for VirtualDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.calls.borrow_mut().push(us);
        self.clock.advance_ns(us as u64 * 1000);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarrierEvent {
    Configure(u32),
    Start,
    /// Generator stopped; the line froze at this level.
    Stop(PinState),
    Force(PinState),
}

fn toggle(state: PinState) -> PinState {
    match state {
        PinState::Low => PinState::High,
        PinState::High => PinState::Low,
    }
}

/// Toggle-on-compare generator: the line flips every `period + 1` clocks
/// while running and freezes where it is when stopped.
pub struct SimCarrier {
    clock: Clock,
    clock_hz: u64,
    period: u32,
    running: bool,
    started_ns: u64,
    line: PinState,
    pub events: Vec<(u64, CarrierEvent)>,
}

impl SimCarrier {
    pub fn new(clock: &Clock, clock_hz: u32) -> Self {
        Self {
            clock: clock.clone(),
            clock_hz: clock_hz as u64,
            period: 0,
            running: false,
            started_ns: 0,
            line: PinState::Low,
            events: Vec::new(),
        }
    }

    /// Nanoseconds between two toggles.
    pub fn half_period_ns(&self) -> u64 {
        (self.period as u64 + 1) * 1_000_000_000 / self.clock_hz
    }

    /// Current line level, following the square wave while running.
    pub fn line(&self) -> PinState {
        if !self.running {
            return self.line;
        }
        let toggles = (self.clock.now_ns() - self.started_ns) / self.half_period_ns();
        if toggles % 2 == 0 {
            self.line
        } else {
            toggle(self.line)
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn starts(&self) -> usize {
        self.events
            .iter()
            .filter(|(_, e)| *e == CarrierEvent::Start)
            .count()
    }

    /// (on_us, off_us) for every completed pulse pair, measured from the
    /// recorded events; the last space ends at `end_ns`.
    pub fn pulse_pairs(&self, end_ns: u64) -> Vec<(u64, u64)> {
        let starts: Vec<u64> = self
            .events
            .iter()
            .filter(|(_, e)| *e == CarrierEvent::Start)
            .map(|(t, _)| *t)
            .collect();
        let forces: Vec<u64> = self
            .events
            .iter()
            .filter(|(_, e)| matches!(e, CarrierEvent::Force(_)))
            .map(|(t, _)| *t)
            // the first force is the startup park
            .skip(1)
            .collect();

        starts
            .iter()
            .zip(forces.iter())
            .enumerate()
            .map(|(i, (start, force))| {
                let next = starts.get(i + 1).copied().unwrap_or(end_ns);
                ((force - start) / 1000, (next - force) / 1000)
            })
            .collect()
    }
}

impl CarrierOutput for SimCarrier {
    fn configure(&mut self, period: u32) {
        self.period = period;
        self.events
            .push((self.clock.now_ns(), CarrierEvent::Configure(period)));
    }

    fn start(&mut self) {
        self.started_ns = self.clock.now_ns();
        self.running = true;
        self.events.push((self.started_ns, CarrierEvent::Start));
    }

    fn stop(&mut self) {
        self.line = self.line();
        self.running = false;
        self.events
            .push((self.clock.now_ns(), CarrierEvent::Stop(self.line)));
    }

    fn force_line(&mut self, state: PinState) {
        assert!(!self.running, "line forced while the generator drives it");
        self.line = state;
        self.events
            .push((self.clock.now_ns(), CarrierEvent::Force(state)));
    }
}

/// Output pin that records every write with its virtual timestamp.
pub struct RecordingPin {
    clock: Clock,
    pub writes: Vec<(u64, PinState)>,
}

impl RecordingPin {
    pub fn new(clock: &Clock) -> Self {
        Self {
            clock: clock.clone(),
            writes: Vec::new(),
        }
    }

    pub fn level(&self) -> Option<PinState> {
        self.writes.last().map(|(_, s)| *s)
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.writes.push((self.clock.now_ns(), PinState::Low));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.writes.push((self.clock.now_ns(), PinState::High));
        Ok(())
    }
}
