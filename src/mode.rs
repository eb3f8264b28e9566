//! Mode state machine
//!
//! `Mode` is the single control-flow variable shared by the main loop, the
//! sample-tick interrupt and the button interrupt. It is stored as an
//! `AtomicU8` so every domain reads and writes it without locking; writes go
//! through compare-and-swap against the mode the writer observed, so a
//! concurrent transition from another domain is never overwritten.

use core::sync::atomic::{AtomicU8, Ordering};

/// Operating mode.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Pick a new random target and start its tone (boot default)
    GameArm = 0,
    /// Game tone is sounding
    TonePlaying = 1,
    /// Tone stopped, difference shown, waiting for the replay button
    GameResult = 2,
    /// Prompt for the sweep duration
    ConfigDuration = 3,
    /// Prompt for the upper frequency bound
    ConfigUpper = 4,
    /// Prompt for the lower frequency bound
    ConfigLower = 5,
    /// Show the sweep parameters, wait for OK / RESTART
    Confirm = 6,
    /// Sweep is being generated
    SweepRunning = 7,
}

impl Mode {
    /// Every mode, in discriminant order.
    pub const ALL: [Mode; 8] = [
        Mode::GameArm,
        Mode::TonePlaying,
        Mode::GameResult,
        Mode::ConfigDuration,
        Mode::ConfigUpper,
        Mode::ConfigLower,
        Mode::Confirm,
        Mode::SweepRunning,
    ];

    /// Convert from u8, `None` for unknown codes.
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.get(v as usize).copied()
    }

    /// Short name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::GameArm => "GAME_ARM",
            Mode::TonePlaying => "TONE_PLAYING",
            Mode::GameResult => "GAME_RESULT",
            Mode::ConfigDuration => "CONFIG_DURATION",
            Mode::ConfigUpper => "CONFIG_UPPER",
            Mode::ConfigLower => "CONFIG_LOWER",
            Mode::Confirm => "CONFIRM",
            Mode::SweepRunning => "SWEEP_RUNNING",
        }
    }

    /// True while the sample timer is expected to be producing output.
    #[inline]
    pub fn is_generating(self) -> bool {
        matches!(self, Mode::TonePlaying | Mode::SweepRunning)
    }

    /// True for modes that wait for one line of operator input.
    #[inline]
    pub fn awaits_line(self) -> bool {
        matches!(
            self,
            Mode::ConfigDuration | Mode::ConfigLower | Mode::ConfigUpper | Mode::Confirm
        )
    }
}

impl From<Mode> for u8 {
    fn from(m: Mode) -> Self {
        m as u8
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timing domain performing a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    MainLoop,
    SampleTick,
    Button,
}

/// Every legal transition and the domain allowed to perform it.
///
/// Duration configuration continues with the LOWER bound, then the upper
/// one. The sweep's "finished" state is `ConfigDuration`.
pub const TRANSITIONS: &[(Mode, Mode, Domain)] = &[
    (Mode::ConfigDuration, Mode::ConfigLower, Domain::MainLoop),
    (Mode::ConfigLower, Mode::ConfigUpper, Domain::MainLoop),
    (Mode::ConfigUpper, Mode::Confirm, Domain::MainLoop),
    (Mode::Confirm, Mode::SweepRunning, Domain::MainLoop),
    (Mode::Confirm, Mode::ConfigDuration, Domain::MainLoop),
    (Mode::GameArm, Mode::TonePlaying, Domain::MainLoop),
    (Mode::SweepRunning, Mode::ConfigDuration, Domain::SampleTick),
    (Mode::TonePlaying, Mode::GameResult, Domain::SampleTick),
    (Mode::TonePlaying, Mode::GameResult, Domain::Button),
    (Mode::SweepRunning, Mode::ConfigDuration, Domain::Button),
    (Mode::GameResult, Mode::GameArm, Domain::Button),
];

/// Check a transition against [`TRANSITIONS`].
pub fn is_legal(from: Mode, to: Mode, domain: Domain) -> bool {
    TRANSITIONS
        .iter()
        .any(|&(f, t, d)| f == from && t == to && d == domain)
}

/// Lock-free mode cell shared by all timing domains.
pub struct ModeCell {
    mode: AtomicU8,
}

impl ModeCell {
    /// Create cell holding `initial`.
    pub const fn new(initial: Mode) -> Self {
        Self {
            mode: AtomicU8::new(initial as u8),
        }
    }

    /// Current mode.
    #[inline]
    pub fn get(&self) -> Mode {
        // Only valid discriminants are ever stored.
        Mode::from_u8(self.mode.load(Ordering::Acquire)).unwrap_or(Mode::GameArm)
    }

    /// Move `from` → `to` if the cell still holds `from`.
    ///
    /// Returns `false` (and leaves the cell untouched) if another domain
    /// changed the mode first or the transition is not in the table.
    #[inline]
    pub fn transition(&self, from: Mode, to: Mode, domain: Domain) -> bool {
        if !is_legal(from, to, domain) {
            return false;
        }
        self.mode
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Unconditional store, for boot-time initialisation only.
    #[inline]
    pub fn reset(&self, mode: Mode) {
        self.mode.store(mode as u8, Ordering::Release);
    }
}

impl Default for ModeCell {
    fn default() -> Self {
        Self::new(Mode::GameArm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_roundtrip_all() {
        for m in Mode::ALL {
            assert_eq!(Mode::from_u8(m as u8), Some(m));
        }
        assert_eq!(Mode::from_u8(8), None);
    }

    #[test]
    fn test_transition_requires_matching_source() {
        let cell = ModeCell::new(Mode::ConfigLower);
        assert!(!cell.transition(Mode::ConfigDuration, Mode::ConfigLower, Domain::MainLoop));
        assert_eq!(cell.get(), Mode::ConfigLower);
    }

    #[test]
    fn test_illegal_transition_rejected() {
        let cell = ModeCell::new(Mode::ConfigDuration);
        assert!(!cell.transition(Mode::ConfigDuration, Mode::ConfigUpper, Domain::MainLoop));
        assert_eq!(cell.get(), Mode::ConfigDuration);
    }
}
