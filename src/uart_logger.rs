//! Log output over UART.
//!
//! Drains [`BEACON_LOG`](crate::BEACON_LOG) on the core that does not run
//! the beacon, so UART writes never stretch a mark or a space.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32 log TX GPIO ──────▶ USB-UART RX
//!                            └─▶ PC Serial Monitor
//! ```

use crate::logging::{BufWriter, LogEntry};

#[cfg(target_os = "espidf")]
use crate::logging::LogStream;

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// Interval between dropped-message reports.
pub const DROP_REPORT_INTERVAL_US: i64 = 10_000_000;

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            tx_pin: crate::CONFIG.pins.log_tx_gpio,
        }
    }
}

/// Format log entry to text.
///
/// Format: `[timestamp_us] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    let mut writer = BufWriter::new(buf);
    let _ = writeln!(
        writer,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    );
    writer.len()
}

/// Format the periodic dropped-messages report.
pub fn format_dropped(dropped: u32, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    let mut writer = BufWriter::new(buf);
    let _ = writeln!(writer, "[WARN] Dropped: {}", dropped);
    writer.len()
}

/// Initialize UART1 TX-only for logging output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = esp_idf_svc::hal::uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// UART log consumer task.
///
/// Drains `stream` forever, writing to UART.
#[cfg(target_os = "espidf")]
pub fn uart_logger_task(uart: &mut UartTxDriver<'_>, stream: &LogStream) -> ! {
    let mut format_buf = [0u8; 160];
    let mut last_dropped_report = 0i64;

    loop {
        let mut work_done = false;

        while let Some(entry) = stream.drain() {
            let len = format_log_entry(&entry, &mut format_buf);
            let _ = uart.write(&format_buf[..len]);
            work_done = true;
        }

        let now = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        if now - last_dropped_report > DROP_REPORT_INTERVAL_US {
            let dropped = stream.dropped();
            if dropped > 0 {
                let len = format_dropped(dropped, &mut format_buf);
                let _ = uart.write(&format_buf[..len]);
                stream.reset_dropped();
            }
            last_dropped_report = now;
        }

        // If no work, wait before checking again
        if !work_done {
            unsafe {
                esp_idf_svc::sys::vTaskDelay(10);
            }
        }
    }
}
