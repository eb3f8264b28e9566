//! Fault accounting for SweepSynth.
//!
//! Faults here are never fatal: the handler that detects one forces the
//! output neutral and stops the sample timer itself. The record exists so the
//! main loop can report that the timing contract was broken.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// Sample tick fired with no oscillator armed.
    SpuriousTick = 1,

    /// Sample tick handler ran longer than one sample period.
    /// Data: handler duration in µs.
    TickOverrun = 2,

    /// Main loop tried to arm while generation was still active.
    ArmRefused = 3,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::SpuriousTick,
            2 => FaultCode::TickOverrun,
            3 => FaultCode::ArmRefused,
            _ => FaultCode::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FaultCode::None => "none",
            FaultCode::SpuriousTick => "spurious tick",
            FaultCode::TickOverrun => "tick overrun",
            FaultCode::ArmRefused => "arm refused",
        }
    }
}

/// Fault state shared by all timing domains.
///
/// # Usage
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// // In the tick ISR:
/// if elapsed_us > period_us {
///     FAULT.set(FaultCode::TickOverrun, elapsed_us);
/// }
///
/// // In main loop:
/// if FAULT.is_active() {
///     report(FAULT.snapshot());
///     FAULT.clear();
/// }
/// ```
pub struct FaultState {
    /// True if an unreported fault is pending.
    active: AtomicBool,

    /// Code of the most recent fault.
    code: AtomicU8,

    /// Additional data for the most recent fault.
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Record a fault.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Check if a fault is pending.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Most recent fault code.
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Data of the most recent fault.
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Mark reported. The counter is kept.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Get a snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}
