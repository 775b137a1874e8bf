//! LEDC-based carrier output for ESP32 targets.
//!
//! LEDC timer 0 drives channel 0 at the carrier frequency with a 50 % duty
//! square wave. The divider computed by [`crate::carrier::carrier_period`]
//! is turned back into a frequency so the emitted carrier matches the one a
//! toggle-on-compare timer would produce from the same clock.
//!
//! - `start`: reset the timer counter, reload duty, route the pin to the
//!   LEDC signal, resume
//! - `stop`: pause the timer; the channel output freezes mid-cycle
//! - `force_line`: route the pin back to its GPIO output register and write
//!   the level there, so the pin changes immediately
//!
//! A paused low-speed timer never latches channel updates, so the idle level
//! cannot be set through the channel itself.

use embedded_hal::digital::PinState;
use esp_idf_svc::sys::{self, esp, EspError};

use crate::carrier::{carrier_frequency, CarrierOutput};
use crate::hal::gpio::level_bit;

const SPEED_MODE: sys::ledc_mode_t = sys::ledc_mode_t_LEDC_LOW_SPEED_MODE;
const TIMER: sys::ledc_timer_t = sys::ledc_timer_t_LEDC_TIMER_0;
const CHANNEL: sys::ledc_channel_t = sys::ledc_channel_t_LEDC_CHANNEL_0;

/// 8-bit duty resolution; half scale is a symmetric square wave.
const RESOLUTION: sys::ledc_timer_bit_t = sys::ledc_timer_bit_t_LEDC_TIMER_8_BIT;
const HALF_DUTY: u32 = 1 << 7;

// GPIO matrix output signals (soc/gpio_sig_map.h)
#[cfg(not(feature = "esp32c3"))]
const LEDC_SIG_OUT0: u32 = 73;
#[cfg(not(feature = "esp32c3"))]
const SIG_GPIO_OUT: u32 = 256;
#[cfg(feature = "esp32c3")]
const LEDC_SIG_OUT0: u32 = 45;
#[cfg(feature = "esp32c3")]
const SIG_GPIO_OUT: u32 = 128;

/// Carrier generator on one LEDC channel.
pub struct LedcCarrier {
    gpio: u8,
    clock_hz: u32,
}

impl LedcCarrier {
    /// Configure LEDC timer 0 and channel 0 on `gpio`, stopped.
    ///
    /// `period` is the divider the generator will load; `clock_hz` is the
    /// clock it was derived from.
    pub fn new(gpio: u8, clock_hz: u32, period: u32) -> Result<Self, EspError> {
        let timer = sys::ledc_timer_config_t {
            speed_mode: SPEED_MODE,
            duty_resolution: RESOLUTION,
            timer_num: TIMER,
            freq_hz: carrier_frequency(clock_hz, period),
            ..Default::default()
        };
        esp!(unsafe { sys::ledc_timer_config(&timer) })?;

        let channel = sys::ledc_channel_config_t {
            gpio_num: gpio as i32,
            speed_mode: SPEED_MODE,
            channel: CHANNEL,
            timer_sel: TIMER,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        esp!(unsafe { sys::ledc_channel_config(&channel) })?;

        esp!(unsafe { sys::ledc_timer_pause(SPEED_MODE, TIMER) })?;

        Ok(Self { gpio, clock_hz })
    }
}

// The register calls below only fail on invalid arguments, and every
// argument is a constant validated by `new`.
impl CarrierOutput for LedcCarrier {
    fn configure(&mut self, period: u32) {
        unsafe {
            sys::ledc_set_freq(SPEED_MODE, TIMER, carrier_frequency(self.clock_hz, period));
        }
    }

    #[inline]
    fn start(&mut self) {
        unsafe {
            sys::ledc_timer_rst(SPEED_MODE, TIMER);
            sys::ledc_set_duty(SPEED_MODE, CHANNEL, HALF_DUTY);
            sys::ledc_update_duty(SPEED_MODE, CHANNEL);
            sys::esp_rom_gpio_connect_out_signal(self.gpio as u32, LEDC_SIG_OUT0, false, false);
            sys::ledc_timer_resume(SPEED_MODE, TIMER);
        }
    }

    #[inline]
    fn stop(&mut self) {
        unsafe {
            sys::ledc_timer_pause(SPEED_MODE, TIMER);
        }
    }

    #[inline]
    fn force_line(&mut self, state: PinState) {
        // Level first, then the switch: the pin goes straight to `state`.
        unsafe {
            sys::gpio_set_level(self.gpio as sys::gpio_num_t, level_bit(state));
            sys::esp_rom_gpio_connect_out_signal(self.gpio as u32, SIG_GPIO_OUT, false, false);
        }
    }
}
