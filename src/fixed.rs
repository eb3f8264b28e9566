//! Fixed-point phase increment arithmetic.
//!
//! A [`Fixed`] value is an unsigned number of table steps per sample with
//! `FRAC` fractional bits, stored in an accumulator word `W`. The word width
//! bounds the highest representable increment; all additions are checked so
//! that overflow is reported instead of silently wrapping.

use core::cmp::Ordering;
use core::fmt;

/// Unsigned accumulator word usable as [`Fixed`] storage.
pub trait Word: Copy + Eq + Ord + Default + fmt::Debug {
    /// Width of the word in bits.
    const BITS: u32;
    /// Additive identity.
    const ZERO: Self;
    /// One least-significant bit.
    const ONE: Self;

    /// Narrow from `u64`, `None` if the value does not fit.
    fn from_u64(value: u64) -> Option<Self>;

    /// Widen to `u64` (lossless for every implemented word).
    fn to_u64(self) -> u64;

    fn checked_add(self, rhs: Self) -> Option<Self>;

    fn wrapping_add(self, rhs: Self) -> Self;
}

macro_rules! impl_word {
    ($($t:ty),*) => {
        $(
            impl Word for $t {
                const BITS: u32 = <$t>::BITS;
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn from_u64(value: u64) -> Option<Self> {
                    <$t>::try_from(value).ok()
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$t>::wrapping_add(self, rhs)
                }
            }
        )*
    };
}

impl_word!(u16, u32, u64);

/// Unsigned fixed-point number with `FRAC` fractional bits in a `W` word.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Fixed<W: Word, const FRAC: u32>(W);

impl<W: Word, const FRAC: u32> Fixed<W, FRAC> {
    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = FRAC;

    /// Zero.
    pub const ZERO: Self = Fixed(W::ZERO);

    /// Smallest representable non-zero value.
    pub const LSB: Self = Fixed(W::ONE);

    /// Wrap a raw word.
    #[inline]
    pub fn from_raw(raw: W) -> Self {
        const { assert!(FRAC < W::BITS, "fractional bits must leave an integer part") };
        Fixed(raw)
    }

    /// Raw word value.
    #[inline]
    pub fn raw(self) -> W {
        self.0
    }

    /// Build from a whole number, `None` on overflow.
    pub fn from_int(value: u64) -> Option<Self> {
        let raw = value.checked_mul(1u64 << FRAC)?;
        W::from_u64(raw).map(Self::from_raw)
    }

    /// `round(num / den * 2^FRAC)`, `None` when `den` is zero or the result
    /// does not fit the word.
    pub fn from_ratio(num: u64, den: u64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let den = den as u128;
        let scaled = ((num as u128) << FRAC) + den / 2;
        let raw = u64::try_from(scaled / den).ok()?;
        W::from_u64(raw).map(Self::from_raw)
    }

    /// Integer part (`raw >> FRAC`).
    #[inline]
    pub fn whole(self) -> u64 {
        self.0.to_u64() >> FRAC
    }

    /// Raw value widened to `u64`.
    #[inline]
    pub fn to_u64(self) -> u64 {
        self.0.to_u64()
    }

    #[inline]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Fixed)
    }

    /// Modular addition in the accumulator word.
    #[inline]
    pub fn wrapping_add(self, rhs: Self) -> Self {
        Fixed(self.0.wrapping_add(rhs.0))
    }

    /// Raw difference `self - rhs`, `None` if `rhs > self`.
    #[inline]
    pub fn checked_span(self, rhs: Self) -> Option<u64> {
        match self.cmp(&rhs) {
            Ordering::Less => None,
            _ => Some(self.0.to_u64() - rhs.0.to_u64()),
        }
    }
}

impl<W: Word, const FRAC: u32> fmt::Debug for Fixed<W, FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.0.to_u64();
        let frac_mask = (1u64 << FRAC) - 1;
        write!(f, "Fixed({}+{}/2^{})", raw >> FRAC, raw & frac_mask, FRAC)
    }
}
