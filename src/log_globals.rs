//! Global log stream instance.
//!
//! One producer (the beacon loop), one consumer (the UART drain on ESP32,
//! stdout in the host simulation).

use crate::logging::LogStream;

/// Beacon log stream.
pub static BEACON_LOG: LogStream = LogStream::new();
