//! Audio subsystem: direct digital synthesis on one DAC channel
//!
//! Architecture:
//! - Cosine LUT: one period, 8192 entries
//! - Sweep law: phase increment ramp with exact wrap bound
//! - Generator: index step, table read, DAC scaling
//! - Oscillator: generator + law, owned by the sample tick while armed

pub mod generator;
pub mod lut;
pub mod sweep;

pub use generator::{OutputScale, Oscillator, Tick, WaveformGenerator};
pub use lut::{COSINE_LUT, LUT_SIZE};
pub use sweep::{SweepError, SweepLaw, SweepParams, SweepStep, Tuning};
