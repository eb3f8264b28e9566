//! Module: config
//!
//! Purpose: Build-time configuration for SweepSynth.
//!
//! Everything resets to these values at power-on; nothing is persisted.
//! Table geometry and fixed-point format are compile-time constants because
//! they size static data and the interrupt hot path. The remaining knobs
//! live in [`SynthConfig`].

use crate::audio::sweep::SweepParams;
use crate::fixed::Fixed;
use crate::mode::Mode;

/// Entries in the one-period waveform table (power of two).
pub const TABLE_SIZE: usize = 8192;

/// Fractional bits of the phase increment.
pub const FRAC_BITS: u32 = 16;

/// Terminal input buffer in bytes, terminator included.
pub const LINE_BUFFER_SIZE: usize = 10;

/// Phase increment format used by the firmware.
pub type Increment = Fixed<u32, FRAC_BITS>;

/// Runtime-independent configuration.
#[derive(Debug, Clone, Copy)]
pub struct SynthConfig {
    /// Sample-tick rate in Hz.
    pub sample_rate_hz: u32,
    /// DAC resolution in bits (1..=16).
    pub dac_bits: u8,
    /// Code written whenever output must be forced safe.
    pub neutral_code: u16,
    /// Game targets are drawn from `[0, game_max_hz)`.
    pub game_max_hz: u32,
    /// Button edges closer than this to the last accepted edge are ignored.
    pub debounce_us: u32,
    /// Operator terminal line rate.
    pub terminal_baud: u32,
    /// Diagnostic log line rate.
    pub log_baud: u32,
    /// Mode entered at boot.
    pub initial_mode: Mode,
    /// Sweep parameters before the operator enters any.
    pub default_sweep: SweepParams,
}

impl SynthConfig {
    /// Reference configuration.
    pub const DEFAULT: Self = Self {
        sample_rate_hz: 16384,
        dac_bits: 10,
        neutral_code: 0,
        game_max_hz: 2000,
        debounce_us: 50_000,
        terminal_baud: 9600,
        log_baud: 115_200,
        initial_mode: Mode::GameArm,
        default_sweep: SweepParams::DEFAULT,
    };

    /// Same configuration booting into the sweep menu.
    pub const fn with_initial_mode(self, initial_mode: Mode) -> Self {
        Self {
            initial_mode,
            ..self
        }
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration compiled into the firmware.
#[cfg(not(feature = "sweep-menu"))]
pub const CONFIG: SynthConfig = SynthConfig::DEFAULT;

/// Configuration compiled into the firmware.
#[cfg(feature = "sweep-menu")]
pub const CONFIG: SynthConfig = SynthConfig::DEFAULT.with_initial_mode(Mode::ConfigDuration);
