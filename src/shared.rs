//! State shared between the main loop and the two interrupt handlers.
//!
//! # Writers per field
//!
//! | field            | main loop                  | sample tick            | button                  |
//! |------------------|----------------------------|------------------------|-------------------------|
//! | mode             | config/confirm/arm edges   | generating → idle      | stop and replay edges   |
//! | oscillator       | only while not generating  | every tick while armed | never                   |
//! | stop request     | cleared at arm             | consumed every tick    | raised on cancel        |
//! | generating       | set at arm                 | cleared at halt        | never                   |
//! | DAC              | neutral, not generating    | samples, neutral       | neutral on cancel       |
//!
//! Multi-field updates (arm, halt) run inside `critical_section::with`, which
//! masks both interrupt sources. Single fields are atomics. The main loop
//! re-reads `mode` on every iteration and treats every field as stale the
//! moment it has read it.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use critical_section::Mutex;

use crate::audio::Oscillator;
use crate::config::{Increment, SynthConfig};
use crate::event::{Event, EventQueue};
use crate::fault::{FaultCode, FaultState};
use crate::hal::Board;
use crate::mode::{Domain, Mode, ModeCell};

/// Why an arm request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmError {
    /// Sample timer still enabled from the previous sweep or tone
    Busy,
    /// Mode was changed by an interrupt before the arm took effect
    ModeChanged,
}

impl core::fmt::Display for ArmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ArmError::Busy => f.write_str("generation still active"),
            ArmError::ModeChanged => f.write_str("mode changed"),
        }
    }
}

/// Explicit container for every cross-domain field.
pub struct SharedState {
    mode: ModeCell,
    stop_requested: AtomicBool,
    generating: AtomicBool,
    oscillator: Mutex<RefCell<Option<Oscillator>>>,
    events: EventQueue,
    fault: FaultState,
    neutral_code: u16,
    debounce_us: u32,
    last_edge_us: AtomicU32,
    edge_seen: AtomicBool,
}

impl SharedState {
    /// Boot state: configured initial mode, nothing armed.
    pub const fn new(config: &SynthConfig) -> Self {
        Self {
            mode: ModeCell::new(config.initial_mode),
            stop_requested: AtomicBool::new(false),
            generating: AtomicBool::new(false),
            oscillator: Mutex::new(RefCell::new(None)),
            events: EventQueue::new(),
            fault: FaultState::new(),
            neutral_code: config.neutral_code,
            debounce_us: config.debounce_us,
            last_edge_us: AtomicU32::new(0),
            edge_seen: AtomicBool::new(false),
        }
    }

    /// Current mode. Never cache across statements.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode.get()
    }

    /// Compare-and-swap mode transition, see [`ModeCell::transition`].
    #[inline]
    pub fn transition(&self, from: Mode, to: Mode, domain: Domain) -> bool {
        self.mode.transition(from, to, domain)
    }

    /// Safe DAC code.
    #[inline]
    pub fn neutral_code(&self) -> u16 {
        self.neutral_code
    }

    /// True from arm until the sample tick has halted the oscillator.
    #[inline]
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    /// Ask the sample tick to halt at its next invocation.
    #[inline]
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Consume a pending stop request.
    #[inline]
    pub fn take_stop_request(&self) -> bool {
        self.stop_requested.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub fn stop_pending(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Install `oscillator`, move `from` → `to` and start the sample timer.
    ///
    /// Refused while a previous oscillator is still generating.
    pub fn arm<B: Board>(
        &self,
        from: Mode,
        to: Mode,
        oscillator: Oscillator,
        board: &B,
    ) -> Result<(), ArmError> {
        critical_section::with(|cs| {
            if self.generating.load(Ordering::Acquire) {
                return Err(ArmError::Busy);
            }
            if !self.mode.transition(from, to, Domain::MainLoop) {
                return Err(ArmError::ModeChanged);
            }
            self.oscillator.borrow(cs).replace(Some(oscillator));
            self.stop_requested.store(false, Ordering::Release);
            self.generating.store(true, Ordering::Release);
            Ok(())
        })
        .inspect_err(|e| {
            if *e == ArmError::Busy {
                self.fault.set(FaultCode::ArmRefused, to as u32);
            }
        })?;

        board.set_activity(false);
        board.start_sample_timer();
        Ok(())
    }

    /// Mark generation finished. Sample tick only, after the halt.
    #[inline]
    pub(crate) fn finish_generation(&self) {
        self.generating.store(false, Ordering::Release);
    }

    /// Run `f` on the armed oscillator inside a critical section.
    #[inline]
    pub(crate) fn with_oscillator_mut<R>(&self, f: impl FnOnce(Option<&mut Oscillator>) -> R) -> R {
        critical_section::with(|cs| f(self.oscillator.borrow_ref_mut(cs).as_mut()))
    }

    /// Increment in effect when generation last stopped.
    pub fn last_increment(&self) -> Option<Increment> {
        critical_section::with(|cs| {
            self.oscillator
                .borrow_ref(cs)
                .as_ref()
                .map(Oscillator::last_increment)
        })
    }

    /// Increment currently driving the oscillator.
    pub fn current_increment(&self) -> Option<Increment> {
        critical_section::with(|cs| {
            self.oscillator
                .borrow_ref(cs)
                .as_ref()
                .map(Oscillator::increment)
        })
    }

    /// Current table index of the oscillator.
    pub fn table_index(&self) -> Option<usize> {
        critical_section::with(|cs| self.oscillator.borrow_ref(cs).as_ref().map(Oscillator::index))
    }

    /// Debounce filter for button edges. No division.
    #[inline]
    pub(crate) fn accept_edge(&self, now_us: i64) -> bool {
        let now = now_us as u32;
        if self.edge_seen.load(Ordering::Acquire)
            && now.wrapping_sub(self.last_edge_us.load(Ordering::Acquire)) < self.debounce_us
        {
            return false;
        }
        self.last_edge_us.store(now, Ordering::Release);
        self.edge_seen.store(true, Ordering::Release);
        true
    }

    #[inline]
    pub fn post(&self, event: Event) -> bool {
        self.events.post(event)
    }

    #[inline]
    pub fn next_event(&self) -> Option<Event> {
        self.events.next()
    }

    #[inline]
    pub fn fault(&self) -> &FaultState {
        &self.fault
    }
}
