//! Hardware Abstraction Layer for IrBeacon.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Beacon logic stays in core modules, HAL is just I/O.

pub mod gpio;

#[cfg(target_os = "espidf")]
pub mod ledc;

pub use gpio::{active_level, inactive_level, StatusLed};

#[cfg(target_os = "espidf")]
pub use ledc::LedcCarrier;
