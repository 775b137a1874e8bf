//! # IrBeacon
//!
//! Infrared beacon firmware: repeats a fixed three-pulse IR pattern forever
//! and blinks a status LED every 2005 cycles.
//!
//! ## Architecture
//!
//! ```text
//! Beacon ──▶ CodeElementTransmitter ──▶ CarrierGenerator ──▶ CarrierOutput (HAL)
//!                                   └─▶ BusyWaitDelay
//! ```
//!
//! - Single thread of control; the only suspension is the busy-wait
//! - All timing is compile-time configuration (see [`config`])
//! - Hardware sits behind `CarrierOutput` and `embedded_hal` pins, so the
//!   whole beacon runs on the host under test

#![cfg_attr(not(test), no_std)]

pub mod beacon;
pub mod blink;
pub mod carrier;
pub mod config;
pub mod delay;
pub mod error;
pub mod hal;
pub mod log_globals;
pub mod logging;
pub mod pattern;
pub mod transmitter;
pub mod uart_logger;

pub use beacon::Beacon;
pub use blink::BlinkCounter;
pub use carrier::{carrier_frequency, carrier_period, CarrierGenerator, CarrierOutput};
pub use config::{BeaconConfig, CONFIG};
pub use delay::BusyWaitDelay;
pub use error::BeaconError;
pub use log_globals::BEACON_LOG;
pub use pattern::{PulsePair, MEASURED_BEACON, PRIVATE_BEACON};
pub use transmitter::CodeElementTransmitter;
