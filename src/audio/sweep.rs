//! Sweep law controller
//!
//! Derives the starting increment and per-tick increment change that move
//! the output frequency linearly from `F0` to `F1` in `T` seconds.
//!
//! ```text
//! increment0 = round(M * F0 / Fs * 2^B)
//! delta      = round(M * (F1 - F0) / (T * Fs^2) * 2^B)
//! wrap       = round(M * F1 / Fs * 2^B)
//! ```
//!
//! The rounded `delta` would drift for most parameter sets, so the span
//! `wrap - increment0` is spread over the `T * Fs` ticks as a whole step
//! plus a remainder carried error-diffusion style. At tick `n` the increment
//! is exactly `increment0 + floor(n * span / (T * Fs))`; at tick `T * Fs` it
//! reaches `wrap` and returns to zero, which is the completion signal.

use crate::fixed::{Fixed, Word};

/// Operator-entered sweep parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepParams {
    /// Lower bound F0 in Hz
    pub lower_hz: u32,
    /// Upper bound F1 in Hz
    pub upper_hz: u32,
    /// Duration T in seconds
    pub duration_s: u32,
}

impl SweepParams {
    /// Power-on values.
    pub const DEFAULT: Self = Self {
        lower_hz: 1000,
        upper_hz: 2000,
        duration_s: 2,
    };
}

impl Default for SweepParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Reasons a sweep cannot be armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepError {
    /// S01: duration is zero
    ZeroDuration,
    /// S02: upper bound not above lower bound
    EmptyRange,
    /// S03: upper bound above half the sample rate
    AboveNyquist,
    /// S04: increment does not fit the accumulator
    OutOfRange,
}

impl SweepError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroDuration => "S01",
            Self::EmptyRange => "S02",
            Self::AboveNyquist => "S03",
            Self::OutOfRange => "S04",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::ZeroDuration => "duration must be at least 1 s",
            Self::EmptyRange => "upper frequency must be above lower frequency",
            Self::AboveNyquist => "upper frequency above half the sample rate",
            Self::OutOfRange => "frequency out of range",
        }
    }
}

impl core::fmt::Display for SweepError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// Frequency ↔ increment conversion for one table size and sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning {
    pub sample_rate_hz: u32,
    pub table_size: usize,
}

impl Tuning {
    pub const fn new(sample_rate_hz: u32, table_size: usize) -> Self {
        Self {
            sample_rate_hz,
            table_size,
        }
    }

    /// `round(M * hz / Fs * 2^B)`
    pub fn increment_for<W: Word, const FRAC: u32>(&self, hz: u32) -> Option<Fixed<W, FRAC>> {
        let num = (self.table_size as u64).checked_mul(hz as u64)?;
        Fixed::from_ratio(num, self.sample_rate_hz as u64)
    }

    /// Frequency actually produced by an increment, whose fractional part
    /// is dropped by the index step: `(increment >> B) * Fs / M`.
    pub fn sounded_hz<W: Word, const FRAC: u32>(&self, increment: Fixed<W, FRAC>) -> u32 {
        if self.table_size == 0 {
            return 0;
        }
        let hz = increment.whole() * self.sample_rate_hz as u64 / self.table_size as u64;
        u32::try_from(hz).unwrap_or(u32::MAX)
    }

    /// Sample ticks in `seconds`.
    #[inline]
    pub fn ticks_in(&self, seconds: u32) -> u64 {
        seconds as u64 * self.sample_rate_hz as u64
    }
}

/// Result of one sweep step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStep {
    /// Increment moved, sweep continues
    Running,
    /// Increment reached the wrap bound and is now zero
    Wrapped,
    /// Fixed tone, increment unchanged
    Holding,
}

/// Phase increment evolution for one armed sweep or tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepLaw<W: Word, const FRAC: u32> {
    start: Fixed<W, FRAC>,
    increment: Fixed<W, FRAC>,
    /// Whole part of the per-tick change
    step: Fixed<W, FRAC>,
    /// Remainder of `span / ticks`, carried into `error`
    remainder: u64,
    /// Sweep length in ticks (denominator of the carry)
    ticks: u64,
    error: u64,
    /// `None` for a fixed tone
    wrap: Option<Fixed<W, FRAC>>,
    nominal_delta: Fixed<W, FRAC>,
}

impl<W: Word, const FRAC: u32> SweepLaw<W, FRAC> {
    /// Linear sweep from `params.lower_hz` to `params.upper_hz`.
    pub fn sweep(params: &SweepParams, tuning: &Tuning) -> Result<Self, SweepError> {
        if params.duration_s == 0 {
            return Err(SweepError::ZeroDuration);
        }
        if params.upper_hz <= params.lower_hz {
            return Err(SweepError::EmptyRange);
        }
        if params.upper_hz as u64 * 2 > tuning.sample_rate_hz as u64 {
            return Err(SweepError::AboveNyquist);
        }

        let start: Fixed<W, FRAC> = tuning
            .increment_for(params.lower_hz)
            .ok_or(SweepError::OutOfRange)?;
        let wrap: Fixed<W, FRAC> = tuning
            .increment_for(params.upper_hz)
            .ok_or(SweepError::OutOfRange)?;
        let span = wrap.checked_span(start).ok_or(SweepError::EmptyRange)?;
        let ticks = tuning.ticks_in(params.duration_s);

        let step = W::from_u64(span / ticks)
            .map(Fixed::from_raw)
            .ok_or(SweepError::OutOfRange)?;
        let nominal_delta = W::from_u64((span + ticks / 2) / ticks)
            .map(Fixed::from_raw)
            .ok_or(SweepError::OutOfRange)?;

        Ok(Self {
            start,
            increment: start,
            step,
            remainder: span % ticks,
            ticks,
            error: 0,
            wrap: Some(wrap),
            nominal_delta,
        })
    }

    /// Constant tone at `hz` (zero sweep rate, never wraps).
    pub fn tone(hz: u32, tuning: &Tuning) -> Result<Self, SweepError> {
        if hz as u64 * 2 > tuning.sample_rate_hz as u64 {
            return Err(SweepError::AboveNyquist);
        }
        let start: Fixed<W, FRAC> = tuning.increment_for(hz).ok_or(SweepError::OutOfRange)?;
        Ok(Self {
            start,
            increment: start,
            step: Fixed::ZERO,
            remainder: 0,
            ticks: 1,
            error: 0,
            wrap: None,
            nominal_delta: Fixed::ZERO,
        })
    }

    /// Advance the increment by one tick.
    #[inline]
    pub fn step(&mut self) -> SweepStep {
        let Some(wrap) = self.wrap else {
            return SweepStep::Holding;
        };

        let mut next = self.increment.checked_add(self.step);
        self.error += self.remainder;
        if self.error >= self.ticks {
            self.error -= self.ticks;
            next = next.and_then(|n| n.checked_add(Fixed::LSB));
        }

        match next {
            Some(n) if n < wrap => {
                self.increment = n;
                SweepStep::Running
            }
            _ => {
                self.increment = Fixed::ZERO;
                SweepStep::Wrapped
            }
        }
    }

    /// Current increment.
    #[inline]
    pub fn increment(&self) -> Fixed<W, FRAC> {
        self.increment
    }

    /// Increment computed for the lower bound at arm time.
    #[inline]
    pub fn start(&self) -> Fixed<W, FRAC> {
        self.start
    }

    /// Wrap bound (upper-bound increment), `None` for a tone.
    #[inline]
    pub fn wrap(&self) -> Option<Fixed<W, FRAC>> {
        self.wrap
    }

    /// `round(span / ticks)`, the per-tick delta of the closed-form law.
    #[inline]
    pub fn nominal_delta(&self) -> Fixed<W, FRAC> {
        self.nominal_delta
    }

    /// Ticks from arm to wrap (1 for a tone).
    #[inline]
    pub fn length_ticks(&self) -> u64 {
        self.ticks
    }

    /// Back to the lower-bound increment.
    #[inline]
    pub fn reset(&mut self) {
        self.increment = self.start;
        self.error = 0;
    }
}
