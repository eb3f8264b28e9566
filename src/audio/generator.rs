//! Waveform generator and oscillator
//!
//! Runs in the sample-tick interrupt: advances the table index by the whole
//! part of the phase increment, reads the table and scales the sample to an
//! unsigned DAC code. No blocking, no allocation, no division.

use super::lut::COSINE_LUT;
use super::sweep::{SweepLaw, SweepStep};
use crate::config::{Increment, FRAC_BITS, TABLE_SIZE};

/// Signed table sample → unsigned midpoint-centred DAC code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputScale {
    shift: u32,
    midpoint: i32,
    max_code: i32,
}

impl OutputScale {
    /// Scale for a DAC of `bits` resolution (clamped to 1..=16).
    pub const fn for_dac_bits(bits: u8) -> Self {
        let bits: u32 = if bits == 0 {
            1
        } else if bits > 16 {
            16
        } else {
            bits as u32
        };
        Self {
            shift: 16 - bits,
            midpoint: 1 << (bits - 1),
            max_code: (1 << bits) - 1,
        }
    }

    /// `(sample >> (16 - bits)) + 2^(bits - 1)`
    #[inline]
    pub fn code(&self, sample: i16) -> u16 {
        let code = ((sample as i32) >> self.shift) + self.midpoint;
        code.clamp(0, self.max_code) as u16
    }

    /// Code for a zero sample.
    #[inline]
    pub fn midpoint(&self) -> u16 {
        self.midpoint as u16
    }
}

/// Table reader with a wrapping index.
pub struct WaveformGenerator<'a, const N: usize> {
    table: &'a [i16; N],
    index: usize,
    scale: OutputScale,
}

impl<'a, const N: usize> WaveformGenerator<'a, N> {
    const MASK: usize = N - 1;

    /// Create generator at index 0.
    pub const fn new(table: &'a [i16; N], scale: OutputScale) -> Self {
        const { assert!(N.is_power_of_two(), "Table size must be power of 2") };
        Self {
            table,
            index: 0,
            scale,
        }
    }

    /// `index = (index + step) mod N`, return the scaled sample there.
    #[inline]
    pub fn next_code(&mut self, step: usize) -> u16 {
        self.index = self.index.wrapping_add(step) & Self::MASK;
        self.scale.code(self.table[self.index])
    }

    /// Current table index, always in `[0, N)`.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn scale(&self) -> OutputScale {
        self.scale
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Output of one oscillator tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// DAC code to write
    pub code: u16,
    /// Sweep wrapped to zero on this tick
    pub wrapped: bool,
}

/// Generator + sweep law: everything the sample tick mutates.
pub struct Oscillator {
    generator: WaveformGenerator<'static, TABLE_SIZE>,
    law: SweepLaw<u32, FRAC_BITS>,
    elapsed: u64,
    last_increment: Increment,
}

impl Oscillator {
    /// Oscillator over the cosine table, index 0, law at its start.
    pub fn new(law: SweepLaw<u32, FRAC_BITS>, scale: OutputScale) -> Self {
        Self {
            generator: WaveformGenerator::new(&COSINE_LUT, scale),
            last_increment: law.start(),
            law,
            elapsed: 0,
        }
    }

    /// One sample tick.
    ///
    /// With `sweeping` the increment is stepped first and the index then
    /// advances by the new increment.
    #[inline]
    pub fn tick(&mut self, sweeping: bool) -> Tick {
        let wrapped = sweeping && self.law.step() == SweepStep::Wrapped;
        let step = self.law.increment().whole() as usize;
        let code = self.generator.next_code(step);
        self.elapsed += 1;
        Tick { code, wrapped }
    }

    /// Stop generation: remember the increment in effect, then return the
    /// law to its lower-bound increment.
    pub fn halt(&mut self) {
        self.last_increment = self.law.increment();
        self.law.reset();
    }

    /// Increment currently driving the index.
    #[inline]
    pub fn increment(&self) -> Increment {
        self.law.increment()
    }

    /// Increment in effect when generation last stopped.
    #[inline]
    pub fn last_increment(&self) -> Increment {
        self.last_increment
    }

    #[inline]
    pub fn law(&self) -> &SweepLaw<u32, FRAC_BITS> {
        &self.law
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.generator.index()
    }

    /// Ticks since arm.
    #[inline]
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }
}
