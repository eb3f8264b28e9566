//! # SweepSynth
//!
//! Swept-frequency DDS generator and frequency guessing game for a single
//! DAC channel.
//!
//! ## Architecture
//!
//! Three timing domains share one [`SharedState`]:
//! - Sample tick (periodic ISR): steps the sweep law, reads the table,
//!   writes the DAC, halts on wrap or stop request
//! - Button edge (ISR): cancels generation or requests a new game round
//! - Main loop: terminal menu, arming, reporting, log drain
//!
//! Interrupts own the DAC while generating; the main loop only arms and
//! observes. Every Mode change is a compare-and-swap against the
//! transition table in [`mode`].

#![cfg_attr(not(test), no_std)]

pub mod audio;
pub mod config;
pub mod console;
pub mod event;
pub mod fault;
pub mod fixed;
pub mod game;
pub mod hal;
pub mod interrupts;
pub mod log_globals;
pub mod logging;
pub mod mode;
pub mod shared;
pub mod uart_logger;

pub use audio::{Oscillator, SweepLaw, SweepParams, Tuning};
pub use config::{SynthConfig, CONFIG};
pub use console::Menu;
pub use fault::{FaultCode, FaultState};
pub use fixed::Fixed;
pub use interrupts::{on_button_edge, on_sample_tick};
pub use log_globals::{ISR_LOG_STREAM, MAIN_LOG_STREAM};
pub use mode::Mode;
pub use shared::SharedState;
