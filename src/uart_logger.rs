//! Log output on the dedicated log UART.
//!
//! The main loop drains both log streams here once per iteration. The
//! operator terminal never carries log lines.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32 GPIO4 (TX) ──────▶ USB-UART RX
//!                           └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::log_globals::{ISR_LOG_STREAM, MAIN_LOG_STREAM};
use crate::logging::{LogEntry, LogStream};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// Interval between drop-count reports.
pub const DROP_REPORT_INTERVAL_US: i64 = 10_000_000;

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: i32,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: crate::config::CONFIG.log_baud,
            tx_pin: crate::hal::PINS.log_tx,
        }
    }
}

/// Write one entry as `[timestamp_us] LEVEL: message\r\n`.
pub fn write_log_entry<W: Write>(out: &mut W, entry: &LogEntry) -> core::fmt::Result {
    write!(
        out,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.text()
    )
}

/// Drains the log streams into a sink.
pub struct UartLogger {
    last_drop_report_us: i64,
}

impl UartLogger {
    pub const fn new() -> Self {
        Self {
            last_drop_report_us: 0,
        }
    }

    /// Drain the global streams, interrupt stream first. Returns the number
    /// of entries written.
    pub fn poll<W: Write>(&mut self, out: &mut W, now_us: i64) -> usize {
        self.poll_streams(out, now_us, &ISR_LOG_STREAM, &MAIN_LOG_STREAM)
    }

    /// Same as [`poll`](Self::poll) over explicit streams.
    pub fn poll_streams<W: Write, const N: usize>(
        &mut self,
        out: &mut W,
        now_us: i64,
        isr: &LogStream<N>,
        main: &LogStream<N>,
    ) -> usize {
        let mut written = 0;
        while let Some(entry) = isr.drain() {
            let _ = write_log_entry(out, &entry);
            written += 1;
        }
        while let Some(entry) = main.drain() {
            let _ = write_log_entry(out, &entry);
            written += 1;
        }

        if now_us - self.last_drop_report_us >= DROP_REPORT_INTERVAL_US {
            let isr_dropped = isr.dropped();
            let main_dropped = main.dropped();
            if isr_dropped > 0 || main_dropped > 0 {
                let _ = write!(
                    out,
                    "[{:10}] WARN: Dropped: ISR={}, MAIN={}\r\n",
                    now_us, isr_dropped, main_dropped
                );
                isr.reset_dropped();
                main.reset_dropped();
            }
            self.last_drop_report_us = now_us;
        }
        written
    }
}

impl Default for UartLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize UART2 TX-only for logging output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = uart::UART2> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config =
        uart::config::Config::default().baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// `core::fmt::Write` over the log UART.
#[cfg(target_os = "espidf")]
pub struct LogUart<'d>(pub UartTxDriver<'d>);

#[cfg(target_os = "espidf")]
impl Write for LogUart<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.0.write(s.as_bytes()).map(|_| ()).map_err(|_| core::fmt::Error)
    }
}
