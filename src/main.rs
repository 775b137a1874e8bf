//! IrBeacon - Main entry point
//!
//! On ESP-IDF: bring up the log UART, the status LED and the LEDC carrier,
//! then hand the main task to the beacon loop for good.
//!
//! On the host: run one blink period against simulated hardware and print
//! the beacon log, as a quick end-to-end check of the timing logic.

fn main() {
    #[cfg(target_os = "espidf")]
    firmware::run();

    #[cfg(not(target_os = "espidf"))]
    host::run();
}

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, PinDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;

    use ir_beacon::hal::LedcCarrier;
    use ir_beacon::uart_logger::{init_uart_logger, UartLoggerConfig};
    use ir_beacon::{carrier_period, rt_error, rt_info, Beacon, BeaconError, BusyWaitDelay, BEACON_LOG, CONFIG};

    type FirmwareBeacon =
        Beacon<'static, LedcCarrier, PinDriver<'static, AnyOutputPin, Output>, BusyWaitDelay>;

    pub fn run() -> ! {
        // Initialize ESP-IDF
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::hal::task::critical_section::link();

        match start() {
            Ok(beacon) => beacon.run(),
            Err(err) => {
                rt_error!(BEACON_LOG, 0, "startup failed: {}", err);
                // The drain may not be up; also print to the IDF console.
                println!("beacon startup failed: {}", err);
                loop {
                    unsafe {
                        esp_idf_svc::sys::vTaskDelay(1000);
                    }
                }
            }
        }
    }

    fn start() -> Result<FirmwareBeacon, BeaconError> {
        let peripherals = Peripherals::take().map_err(|_| BeaconError::PeripheralsTaken)?;
        let pins = CONFIG.pins;
        let log_config = UartLoggerConfig::default();

        // SAFETY: pin numbers come from CONFIG; each is claimed exactly once
        // here and nothing else in the firmware touches GPIO.
        let (log_tx, led) = unsafe {
            (
                AnyOutputPin::new(log_config.tx_pin as _),
                AnyOutputPin::new(pins.led_gpio as _),
            )
        };

        let uart = init_uart_logger(peripherals.uart1, log_tx, &log_config)
            .map_err(|e| BeaconError::LoggerInit(e.code()))?;
        spawn_log_drain(uart)?;

        rt_info!(BEACON_LOG, 0, "{}", env!("VERSION_STRING"));

        let led = PinDriver::output(led).map_err(|e| BeaconError::LedInit(e.code()))?;

        let period = carrier_period(CONFIG.clock_hz, CONFIG.carrier_hz);
        let carrier = LedcCarrier::new(pins.ir_gpio, CONFIG.clock_hz, period)
            .map_err(|e| BeaconError::CarrierInit(e.code()))?;

        Ok(Beacon::startup(carrier, led, BusyWaitDelay::new(), &CONFIG, &BEACON_LOG))
    }

    /// Drain the log on core 1 so UART writes never land inside a pulse.
    #[cfg(not(feature = "esp32c3"))]
    fn spawn_log_drain(
        mut uart: esp_idf_svc::hal::uart::UartTxDriver<'static>,
    ) -> Result<(), BeaconError> {
        use esp_idf_svc::hal::cpu::Core;
        use esp_idf_svc::hal::task::thread::ThreadSpawnConfiguration;
        use ir_beacon::uart_logger::uart_logger_task;

        ThreadSpawnConfiguration {
            name: Some(b"log_drain\0"),
            pin_to_core: Some(Core::Core1),
            ..Default::default()
        }
        .set()?;

        let spawned = std::thread::Builder::new()
            .stack_size(4096)
            .spawn(move || uart_logger_task(&mut uart, &BEACON_LOG));

        // Restore defaults for anything spawned later
        ThreadSpawnConfiguration::default().set()?;

        spawned.map(|_| ()).map_err(|_| BeaconError::LoggerSpawn)
    }

    /// Single-core part: a drain task would preempt the spin loop and
    /// stretch pulses, so records stay in the ring.
    #[cfg(feature = "esp32c3")]
    fn spawn_log_drain(
        _uart: esp_idf_svc::hal::uart::UartTxDriver<'static>,
    ) -> Result<(), BeaconError> {
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use core::convert::Infallible;

    use embedded_hal::digital::{ErrorType, OutputPin, PinState};

    use ir_beacon::uart_logger::format_log_entry;
    use ir_beacon::{Beacon, BusyWaitDelay, CarrierOutput, BEACON_LOG, CONFIG};

    /// Counts carrier bursts instead of toggling a pin.
    #[derive(Default)]
    struct SimCarrier {
        bursts: u64,
    }

    impl CarrierOutput for SimCarrier {
        fn configure(&mut self, _period: u32) {}

        fn start(&mut self) {
            self.bursts += 1;
        }

        fn stop(&mut self) {}

        fn force_line(&mut self, _state: PinState) {}
    }

    #[derive(Default)]
    struct SimLed {
        lit_count: u32,
    }

    impl ErrorType for SimLed {
        type Error = Infallible;
    }

    impl OutputPin for SimLed {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.lit_count += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    pub fn run() {
        println!("{} (host simulation)", env!("VERSION_STRING"));

        let mut beacon = Beacon::startup(
            SimCarrier::default(),
            SimLed::default(),
            BusyWaitDelay::new(),
            &CONFIG,
            &BEACON_LOG,
        );

        let mut line = [0u8; 160];
        for _ in 0..CONFIG.blink_period {
            beacon.step();
            while let Some(entry) = BEACON_LOG.drain() {
                let len = format_log_entry(&entry, &mut line);
                print!("{}", String::from_utf8_lossy(&line[..len]));
            }
        }

        println!(
            "{} cycles, {} carrier bursts, LED lit {} times, {} us nominal",
            beacon.cycles(),
            beacon.transmitter().carrier().output().bursts,
            beacon.led().pin().lit_count,
            beacon.elapsed_us()
        );
    }
}
