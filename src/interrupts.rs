//! Interrupt handler bodies.
//!
//! The firmware's ISR trampolines call these with the global
//! [`SharedState`] and the board. Both are bounded, allocation-free and
//! non-blocking. The button handler does no arithmetic beyond a wrapping
//! subtract and never formats numbers.

use crate::event::Event;
use crate::fault::FaultCode;
use crate::hal::Board;
use crate::log_globals::ISR_LOG_STREAM;
use crate::logging::LogLevel;
use crate::mode::{Domain, Mode};
use crate::shared::SharedState;
use crate::rt_info;

/// What the tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Sample written, keep going
    Running,
    /// Sweep wrapped to zero and generation stopped
    Completed { ticks: u64 },
    /// Stop request (or mode left generation) honoured
    Halted { sweep: bool, ticks: u64 },
    /// Timer fired with nothing armed or after the halt
    Spurious,
}

/// Sample-tick interrupt body.
///
/// Steps the sweep law (in `SweepRunning`), advances the table index and
/// writes the DAC. On wrap-to-zero or a stop request it forces the output
/// neutral, disables the timer, resets the increment to its lower bound and
/// moves the mode out of generation.
pub fn on_sample_tick<B: Board>(shared: &SharedState, board: &B) -> TickOutcome {
    // Stop flag and mode are read with interrupts masked so a button edge
    // cannot land between the check and the DAC write.
    let (mode, outcome) = shared.with_oscillator_mut(|osc| {
        let stop = shared.take_stop_request();
        let mode = shared.mode();
        let Some(osc) = osc.filter(|_| shared.is_generating()) else {
            return (mode, TickOutcome::Spurious);
        };
        if stop || !mode.is_generating() {
            osc.halt();
            let halted = TickOutcome::Halted {
                sweep: osc.law().wrap().is_some(),
                ticks: osc.elapsed(),
            };
            return (mode, halted);
        }
        let tick = osc.tick(mode == Mode::SweepRunning);
        if tick.wrapped {
            osc.halt();
            return (mode, TickOutcome::Completed { ticks: osc.elapsed() });
        }
        board.write_dac(tick.code);
        (mode, TickOutcome::Running)
    });

    if outcome != TickOutcome::Running {
        finish(shared, board, mode, outcome);
    }
    outcome
}

/// Cleanup branch shared by completion, cancellation and spurious ticks.
fn finish<B: Board>(shared: &SharedState, board: &B, mode: Mode, outcome: TickOutcome) {
    board.write_dac(shared.neutral_code());
    board.stop_sample_timer();
    board.set_activity(true);

    match mode {
        Mode::SweepRunning => {
            shared.transition(Mode::SweepRunning, Mode::ConfigDuration, Domain::SampleTick);
        }
        Mode::TonePlaying => {
            shared.transition(Mode::TonePlaying, Mode::GameResult, Domain::SampleTick);
        }
        // Button already moved the mode
        _ => {}
    }

    let now = board.now_us();
    match outcome {
        TickOutcome::Completed { ticks } => {
            shared.post(Event::SweepCompleted { ticks });
            rt_info!(ISR_LOG_STREAM, now, "sweep complete after {} ticks", ticks);
        }
        TickOutcome::Halted { sweep: true, ticks } => {
            shared.post(Event::SweepCancelled { ticks });
            rt_info!(ISR_LOG_STREAM, now, "sweep halted after {} ticks", ticks);
        }
        TickOutcome::Halted { sweep: false, ticks } => {
            shared.post(Event::ToneStopped);
            rt_info!(ISR_LOG_STREAM, now, "tone halted after {} ticks", ticks);
        }
        TickOutcome::Spurious => {
            shared.fault().set(FaultCode::SpuriousTick, mode as u32);
            ISR_LOG_STREAM.push(now, LogLevel::Warn, b"spurious sample tick");
        }
        TickOutcome::Running => {}
    }
    // Last: the main loop waits on this before touching the DAC again
    shared.finish_generation();
}

/// What the button edge did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonOutcome {
    /// Generation cancelled, output forced neutral
    Cancelled,
    /// New game round requested
    Replay,
    /// Edge meaningless in the current mode
    Ignored,
    /// Edge inside the debounce window
    Bounced,
}

/// Button-edge interrupt body.
///
/// During generation the output is forced neutral before returning and the
/// sample tick is told to halt; on the result screen a new round is armed.
pub fn on_button_edge<B: Board>(shared: &SharedState, board: &B) -> ButtonOutcome {
    let now = board.now_us();
    if !shared.accept_edge(now) {
        return ButtonOutcome::Bounced;
    }

    match shared.mode() {
        Mode::TonePlaying => {
            shared.request_stop();
            board.write_dac(shared.neutral_code());
            shared.transition(Mode::TonePlaying, Mode::GameResult, Domain::Button);
            ISR_LOG_STREAM.push(now, LogLevel::Info, b"button: tone stopped");
            ButtonOutcome::Cancelled
        }
        Mode::SweepRunning => {
            shared.request_stop();
            board.write_dac(shared.neutral_code());
            shared.transition(Mode::SweepRunning, Mode::ConfigDuration, Domain::Button);
            ISR_LOG_STREAM.push(now, LogLevel::Info, b"button: sweep cancelled");
            ButtonOutcome::Cancelled
        }
        Mode::GameResult => {
            if shared.transition(Mode::GameResult, Mode::GameArm, Domain::Button) {
                shared.post(Event::Replay);
                ISR_LOG_STREAM.push(now, LogLevel::Debug, b"button: replay");
                ButtonOutcome::Replay
            } else {
                ButtonOutcome::Ignored
            }
        }
        _ => ButtonOutcome::Ignored,
    }
}
