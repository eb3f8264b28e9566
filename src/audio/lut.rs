//! Cosine lookup table for the DDS output
//!
//! 8192-entry table covering one full period.
//! Values are i16, scaled to the DAC range by the generator.

use crate::config::TABLE_SIZE;

/// Number of entries in the cosine LUT
pub const LUT_SIZE: usize = TABLE_SIZE;

/// Peak amplitude of the table
pub const LUT_AMPLITUDE: i16 = 32767;

/// Pre-computed cosine lookup table
///
/// 8192 samples covering 0 to 2π
/// Index 0 = 0° (peak), 2048 = 90°, 4096 = 180° (trough), 6144 = 270°
pub static COSINE_LUT: [i16; LUT_SIZE] = build_table();

const fn build_table() -> [i16; LUT_SIZE] {
    const { assert!(LUT_SIZE.is_power_of_two() && LUT_SIZE >= 4, "LUT size must be power of 2") };

    let quarter = LUT_SIZE / 4;
    let mut table = [0i16; LUT_SIZE];
    let mut i = 0;
    while i < LUT_SIZE {
        // Reduce to [0, π/2) and fold by quadrant
        let r = i % quarter;
        let x = (r as f64) * core::f64::consts::FRAC_PI_2 / (quarter as f64);
        let v = match i / quarter {
            0 => quarter_cos(x),
            1 => -quarter_sin(x),
            2 => -quarter_cos(x),
            _ => quarter_sin(x),
        };
        table[i] = round_i16(v * LUT_AMPLITUDE as f64);
        i += 1;
    }
    table
}

/// sin(x) for x in [0, π/2], Taylor series through x^15
const fn quarter_sin(x: f64) -> f64 {
    let x2 = x * x;
    let mut acc = 1.0;
    let mut k = 15;
    // Horner form: x * (1 - x²/(2·3) * (1 - x²/(4·5) * (...)))
    while k > 1 {
        acc = 1.0 - x2 / ((k * (k - 1)) as f64) * acc;
        k -= 2;
    }
    x * acc
}

/// cos(x) for x in [0, π/2], Taylor series through x^16
const fn quarter_cos(x: f64) -> f64 {
    let x2 = x * x;
    let mut acc = 1.0;
    let mut k = 16;
    while k > 0 {
        acc = 1.0 - x2 / ((k * (k - 1)) as f64) * acc;
        k -= 2;
    }
    acc
}

const fn round_i16(v: f64) -> i16 {
    if v >= 0.0 {
        (v + 0.5) as i16
    } else {
        (v - 0.5) as i16
    }
}
