//! Hardware boundary for SweepSynth.
//!
//! Thin traits around the peripherals. The core logic only talks to these;
//! register access, UART drivers and entropy live behind them.

pub mod gpio;

#[cfg(target_os = "espidf")]
pub mod esp;

pub use gpio::{BoardPins, ButtonPin, LedPin, PINS};

/// Peripherals touched from interrupt context.
///
/// Methods take `&self`: the same board is used by the main loop and both
/// interrupt handlers, so implementations write registers directly or use
/// interior mutability.
pub trait Board {
    /// Write one code to the DAC. Must not block.
    fn write_dac(&self, code: u16);

    /// Enable the periodic sample-tick interrupt.
    fn start_sample_timer(&self);

    /// Disable the periodic sample-tick interrupt. Safe from the tick ISR.
    fn stop_sample_timer(&self);

    /// Drive the activity indicator (asserted while idle or armed).
    fn set_activity(&self, asserted: bool);

    /// Free-running microsecond clock.
    fn now_us(&self) -> i64;
}

/// Operator terminal: non-blocking byte input, formatted output.
pub trait Terminal: core::fmt::Write {
    /// Next received byte, `None` if nothing is pending.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Source of random numbers for the game.
pub trait Entropy {
    fn next_u32(&mut self) -> u32;
}
