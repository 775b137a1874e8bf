//! Hardware bring-up errors.
//!
//! The beacon loop itself cannot fail. Only taking and configuring the
//! peripherals at startup can, and then the firmware parks instead of
//! emitting anything. Variants carry the raw `esp_err_t` when there is one.

/// Startup error with code and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeaconError {
    /// E01: Peripherals already taken
    PeripheralsTaken,
    /// E02: Carrier timer/channel configuration rejected
    CarrierInit(i32),
    /// E03: Status LED pin configuration rejected
    LedInit(i32),
    /// E04: Log UART configuration rejected
    LoggerInit(i32),
    /// E05: Log drain thread could not be started
    LoggerSpawn,
    /// E06: Any other ESP-IDF call failed during bring-up
    Idf(i32),
}

impl BeaconError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::PeripheralsTaken => "E01",
            Self::CarrierInit(_) => "E02",
            Self::LedInit(_) => "E03",
            Self::LoggerInit(_) => "E04",
            Self::LoggerSpawn => "E05",
            Self::Idf(_) => "E06",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::PeripheralsTaken => "peripherals already taken",
            Self::CarrierInit(_) => "carrier init failed",
            Self::LedInit(_) => "status LED init failed",
            Self::LoggerInit(_) => "log UART init failed",
            Self::LoggerSpawn => "log drain spawn failed",
            Self::Idf(_) => "ESP-IDF call failed",
        }
    }

    /// Raw ESP-IDF error code, if the failure came from the IDF.
    pub fn esp_code(&self) -> Option<i32> {
        match self {
            Self::CarrierInit(code)
            | Self::LedInit(code)
            | Self::LoggerInit(code)
            | Self::Idf(code) => Some(*code),
            Self::PeripheralsTaken | Self::LoggerSpawn => None,
        }
    }
}

impl From<i32> for BeaconError {
    /// Raw `esp_err_t` from a call outside the named bring-up steps.
    fn from(code: i32) -> Self {
        Self::Idf(code)
    }
}

#[cfg(target_os = "espidf")]
impl From<esp_idf_svc::sys::EspError> for BeaconError {
    fn from(e: esp_idf_svc::sys::EspError) -> Self {
        Self::from(e.code())
    }
}

impl core::fmt::Display for BeaconError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.esp_code() {
            Some(code) => write!(f, "{}: {} (esp_err 0x{:x})", self.code(), self.message(), code),
            None => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}
