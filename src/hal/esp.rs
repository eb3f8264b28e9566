//! ESP32 board implementation.
//!
//! DAC channel 1 in oneshot mode, a general-purpose timer for the sample
//! tick, and raw GPIO for the activity LED. Handles are stored in atomics so
//! the board can be a `static` shared with both interrupt handlers.

use core::ffi::c_void;
use core::fmt;
use core::ptr;
use core::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

use esp_idf_svc::hal::uart::UartDriver;
use esp_idf_svc::sys::{self, esp, EspError};

use super::{Board, BoardPins, Entropy, Terminal};

/// Tick timer resolution.
const TIMER_RESOLUTION_HZ: u32 = 1_000_000;

/// Alarm callback signature expected by the gptimer driver.
pub type AlarmCallback = unsafe extern "C" fn(
    sys::gptimer_handle_t,
    *const sys::gptimer_alarm_event_data_t,
    *mut c_void,
) -> bool;

/// DAC + sample timer + LED.
pub struct EspBoard {
    dac: AtomicPtr<sys::dac_oneshot_s>,
    timer: AtomicPtr<sys::gptimer_t>,
    running: AtomicBool,
    /// Table codes are wider than the 8-bit DAC
    dac_shift: u8,
    led_pin: i32,
    led_active_high: bool,
}

impl EspBoard {
    pub const fn new(pins: &BoardPins, dac_bits: u8) -> Self {
        Self {
            dac: AtomicPtr::new(ptr::null_mut()),
            timer: AtomicPtr::new(ptr::null_mut()),
            running: AtomicBool::new(false),
            dac_shift: dac_bits.saturating_sub(8),
            led_pin: pins.led.pin,
            led_active_high: pins.led.active_high,
        }
    }

    /// Create the DAC channel, LED output and (stopped) sample timer.
    ///
    /// `on_alarm` runs in interrupt context at `sample_rate_hz`.
    pub fn init(&self, sample_rate_hz: u32, on_alarm: AlarmCallback) -> Result<(), EspError> {
        let mut dac: sys::dac_oneshot_handle_t = ptr::null_mut();
        let dac_config = sys::dac_oneshot_config_t {
            chan_id: sys::dac_channel_t_DAC_CHAN_0,
        };
        esp!(unsafe { sys::dac_oneshot_new_channel(&dac_config, &mut dac) })?;
        self.dac.store(dac, Ordering::Release);

        esp!(unsafe {
            sys::gpio_set_direction(self.led_pin, sys::gpio_mode_t_GPIO_MODE_OUTPUT)
        })?;

        let mut timer: sys::gptimer_handle_t = ptr::null_mut();
        let timer_config = sys::gptimer_config_t {
            clk_src: sys::soc_periph_gptimer_clk_src_t_GPTIMER_CLK_SRC_DEFAULT,
            direction: sys::gptimer_count_direction_t_GPTIMER_COUNT_UP,
            resolution_hz: TIMER_RESOLUTION_HZ,
            ..Default::default()
        };
        esp!(unsafe { sys::gptimer_new_timer(&timer_config, &mut timer) })?;

        let mut alarm = sys::gptimer_alarm_config_t {
            alarm_count: alarm_count(sample_rate_hz),
            reload_count: 0,
            ..Default::default()
        };
        alarm.flags.set_auto_reload_on_alarm(1);
        esp!(unsafe { sys::gptimer_set_alarm_action(timer, &alarm) })?;

        let callbacks = sys::gptimer_event_callbacks_t {
            on_alarm: Some(on_alarm),
        };
        esp!(unsafe {
            sys::gptimer_register_event_callbacks(timer, &callbacks, ptr::null_mut())
        })?;
        esp!(unsafe { sys::gptimer_enable(timer) })?;
        self.timer.store(timer, Ordering::Release);

        self.set_activity(true);
        Ok(())
    }

    /// Sample period in microseconds, for overrun checks.
    pub const fn period_us(sample_rate_hz: u32) -> i64 {
        alarm_count(sample_rate_hz) as i64 * 1_000_000 / TIMER_RESOLUTION_HZ as i64
    }
}

const fn alarm_count(sample_rate_hz: u32) -> u64 {
    let rate = if sample_rate_hz == 0 { 1 } else { sample_rate_hz as u64 };
    (TIMER_RESOLUTION_HZ as u64 + rate / 2) / rate
}

impl Board for EspBoard {
    #[inline]
    fn write_dac(&self, code: u16) {
        let dac = self.dac.load(Ordering::Acquire);
        if !dac.is_null() {
            let value = (code >> self.dac_shift).min(u8::MAX as u16) as u8;
            unsafe {
                sys::dac_oneshot_output_voltage(dac, value);
            }
        }
    }

    fn start_sample_timer(&self) {
        let timer = self.timer.load(Ordering::Acquire);
        if !timer.is_null() && !self.running.swap(true, Ordering::AcqRel) {
            unsafe {
                sys::gptimer_set_raw_count(timer, 0);
                sys::gptimer_start(timer);
            }
        }
    }

    fn stop_sample_timer(&self) {
        let timer = self.timer.load(Ordering::Acquire);
        if !timer.is_null() && self.running.swap(false, Ordering::AcqRel) {
            unsafe {
                sys::gptimer_stop(timer);
            }
        }
    }

    fn set_activity(&self, asserted: bool) {
        let level = (asserted == self.led_active_high) as u32;
        unsafe {
            sys::gpio_set_level(self.led_pin, level);
        }
    }

    #[inline]
    fn now_us(&self) -> i64 {
        unsafe { sys::esp_timer_get_time() }
    }
}

/// Operator terminal on a UART, polled without blocking.
pub struct UartTerminal<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartTerminal<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

impl fmt::Write for UartTerminal<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut bytes = s.as_bytes();
        while !bytes.is_empty() {
            let n = self.uart.write(bytes).map_err(|_| fmt::Error)?;
            bytes = &bytes[n..];
        }
        Ok(())
    }
}

impl Terminal for UartTerminal<'_> {
    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte, 0) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}

/// Hardware random number generator.
pub struct EspEntropy;

impl Entropy for EspEntropy {
    fn next_u32(&mut self) -> u32 {
        unsafe { sys::esp_random() }
    }
}
