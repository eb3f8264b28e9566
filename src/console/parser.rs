//! Operator input parsing
//!
//! Numeric prompts read leading decimal digits the way `atoi` does: leading
//! whitespace and a `+` are skipped, parsing stops at the first non-digit,
//! and input with no digits yields 0. Values saturate at `u32::MAX`.
//! A leading `-` yields 0 since every parameter is unsigned.

/// Lenient unsigned decimal parse.
pub fn parse_number(line: &str) -> u32 {
    let trimmed = line.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let mut value: u32 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add((b - b'0') as u32);
    }
    value
}

/// Answer at the confirm prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmToken {
    /// "OK": arm the sweep
    Ok,
    /// "RESTART": re-enter the parameters
    Restart,
    /// Anything else: prompt again
    Other,
}

impl ConfirmToken {
    /// Exact, case-sensitive match.
    pub fn parse(line: &str) -> Self {
        match line {
            "OK" => ConfirmToken::Ok,
            "RESTART" => ConfirmToken::Restart,
            _ => ConfirmToken::Other,
        }
    }
}
