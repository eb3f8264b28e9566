//! Main-loop dispatcher
//!
//! One [`Menu::poll`] per main-loop iteration: report what the interrupts
//! did, re-read the mode, run that mode's entry action once, then feed any
//! received bytes into the pending line. A prompt never blocks; the mode
//! simply stays in its awaiting-line state until CR or LF arrives.

use core::fmt::Write;

use super::line_buffer::{Feed, LineBuffer};
use super::parser::{parse_number, ConfirmToken};
use crate::audio::{OutputScale, Oscillator, SweepLaw, SweepParams, Tuning};
use crate::config::{SynthConfig, TABLE_SIZE};
use crate::event::Event;
use crate::game::{pick_target, GameRound, GameScore};
use crate::hal::{Board, Entropy, Terminal};
use crate::log_globals::MAIN_LOG_STREAM;
use crate::mode::{Domain, Mode};
use crate::shared::{ArmError, SharedState};
use crate::{rt_debug, rt_info, rt_warn};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Main-loop state. Owns everything only the main loop writes.
pub struct Menu<'a> {
    shared: &'a SharedState,
    config: SynthConfig,
    tuning: Tuning,
    scale: OutputScale,
    params: SweepParams,
    line: LineBuffer,
    /// Mode whose entry action already ran
    entered: Option<Mode>,
    round: Option<GameRound>,
    last_score: Option<GameScore>,
}

impl<'a> Menu<'a> {
    pub fn new(shared: &'a SharedState, config: SynthConfig) -> Self {
        Self {
            shared,
            tuning: Tuning::new(config.sample_rate_hz, TABLE_SIZE),
            scale: OutputScale::for_dac_bits(config.dac_bits),
            params: config.default_sweep,
            config,
            line: LineBuffer::new(),
            entered: None,
            round: None,
            last_score: None,
        }
    }

    /// Sweep parameters as entered so far.
    pub fn params(&self) -> SweepParams {
        self.params
    }

    /// Hidden target of the current round.
    pub fn round(&self) -> Option<GameRound> {
        self.round
    }

    /// Most recent game result.
    pub fn last_score(&self) -> Option<GameScore> {
        self.last_score
    }

    /// Print welcome banner
    pub fn print_banner<T: Terminal>(&self, term: &mut T) {
        let _ = write!(term, "\r\n{}\r\n", VERSION);
        let _ = write!(
            term,
            "DDS sweep generator, {} Hz sample rate.\r\n",
            self.tuning.sample_rate_hz
        );
    }

    /// One main-loop iteration. Returns the mode it acted on.
    pub fn poll<T: Terminal, B: Board, E: Entropy>(
        &mut self,
        term: &mut T,
        board: &B,
        rng: &mut E,
    ) -> Mode {
        self.report_events(term, board);
        self.report_faults(board);

        let mode = self.shared.mode();
        if self.entered != Some(mode) {
            if self.enter(mode, term, board, rng) {
                self.entered = Some(mode);
            }
            return mode;
        }

        if mode.awaits_line() && self.pump_line(term) {
            self.handle_line(mode, term, board);
        }
        mode
    }

    fn report_events<T: Terminal, B: Board>(&mut self, term: &mut T, board: &B) {
        while let Some(event) = self.shared.next_event() {
            let now = board.now_us();
            match event {
                Event::SweepCompleted { ticks } => {
                    let _ = write!(term, "\r\nSweep complete ({} samples).\r\n", ticks);
                    rt_info!(MAIN_LOG_STREAM, now, "sweep complete, {} ticks", ticks);
                }
                Event::SweepCancelled { ticks } => {
                    let _ = write!(term, "\r\nSweep stopped.\r\n");
                    rt_info!(MAIN_LOG_STREAM, now, "sweep cancelled, {} ticks", ticks);
                }
                Event::ToneStopped => {
                    rt_debug!(MAIN_LOG_STREAM, now, "tone stopped");
                }
                Event::Replay => {
                    rt_debug!(MAIN_LOG_STREAM, now, "replay requested");
                }
            }
        }
    }

    fn report_faults<B: Board>(&self, board: &B) {
        let fault = self.shared.fault();
        if fault.is_active() {
            let snap = fault.snapshot();
            rt_warn!(
                MAIN_LOG_STREAM,
                board.now_us(),
                "fault: {} data={} total={}",
                snap.code.as_str(),
                snap.data,
                snap.count
            );
            fault.clear();
        }
    }

    /// Entry action for `mode`. Returns `false` to retry next iteration.
    fn enter<T: Terminal, B: Board, E: Entropy>(
        &mut self,
        mode: Mode,
        term: &mut T,
        board: &B,
        rng: &mut E,
    ) -> bool {
        // Nothing but the sample tick touches the oscillator or the DAC until
        // it has halted.
        if !mode.is_generating() && self.shared.is_generating() {
            return false;
        }

        match mode {
            Mode::ConfigDuration => {
                board.write_dac(self.shared.neutral_code());
                self.prompt(term, format_args!("Enter duration T (s): "));
            }
            Mode::ConfigLower => {
                self.prompt(term, format_args!("Enter lowest frequency (Hz): "));
            }
            Mode::ConfigUpper => {
                self.prompt(term, format_args!("Enter highest frequency (Hz): "));
            }
            Mode::Confirm => {
                let p = self.params;
                self.prompt(
                    term,
                    format_args!(
                        "Highest frequency: {} Hz\r\nLowest frequency: {} Hz\r\nDuration T: {} s\r\n\
                         Type OK to continue, RESTART to enter new values.\r\n",
                        p.upper_hz, p.lower_hz, p.duration_s
                    ),
                );
            }
            Mode::GameArm => return self.arm_round(term, board, rng),
            Mode::GameResult => self.show_result(term, board),
            Mode::TonePlaying | Mode::SweepRunning => {}
        }
        true
    }

    /// Discard stale input, clear the line, print the prompt.
    fn prompt<T: Terminal>(&mut self, term: &mut T, text: core::fmt::Arguments<'_>) {
        while term.read_byte().is_some() {}
        self.line.clear();
        let _ = term.write_fmt(text);
    }

    /// Move received bytes into the line. `true` once a line is complete.
    fn pump_line<T: Terminal>(&mut self, term: &mut T) -> bool {
        while let Some(byte) = term.read_byte() {
            match self.line.feed(byte) {
                Feed::Complete => return true,
                Feed::Stored => {
                    let _ = term.write_char(byte as char);
                }
                Feed::Erased => {
                    let _ = term.write_str("\x08 \x08");
                }
                Feed::Ignored => {}
            }
        }
        false
    }

    fn handle_line<T: Terminal, B: Board>(&mut self, mode: Mode, term: &mut T, board: &B) {
        let now = board.now_us();
        match mode {
            Mode::ConfigDuration | Mode::ConfigLower | Mode::ConfigUpper => {
                let value = parse_number(self.line.as_str());
                let _ = write!(term, "\r\nYou entered: {}\r\n", value);
                let next = match mode {
                    Mode::ConfigDuration => {
                        self.params.duration_s = value;
                        Mode::ConfigLower
                    }
                    Mode::ConfigLower => {
                        self.params.lower_hz = value;
                        Mode::ConfigUpper
                    }
                    _ => {
                        self.params.upper_hz = value;
                        Mode::Confirm
                    }
                };
                self.shared.transition(mode, next, Domain::MainLoop);
            }
            Mode::Confirm => match ConfirmToken::parse(self.line.as_str()) {
                ConfirmToken::Ok => {
                    let _ = write!(term, "\r\n");
                    self.arm_sweep(term, board);
                }
                ConfirmToken::Restart => {
                    let _ = write!(term, "\r\nRestarting...\r\n");
                    self.shared
                        .transition(Mode::Confirm, Mode::ConfigDuration, Domain::MainLoop);
                    rt_debug!(MAIN_LOG_STREAM, now, "confirm: restart");
                }
                ConfirmToken::Other => {
                    let _ = write!(term, "\r\n");
                    // Same mode, prompt again
                    self.entered = None;
                }
            },
            _ => {}
        }
        self.line.clear();
    }

    fn arm_sweep<T: Terminal, B: Board>(&mut self, term: &mut T, board: &B) {
        let now = board.now_us();
        let law = match SweepLaw::sweep(&self.params, &self.tuning) {
            Ok(law) => law,
            Err(e) => {
                let _ = write!(term, "{}\r\n", e);
                rt_warn!(MAIN_LOG_STREAM, now, "sweep rejected: {}", e.code());
                self.shared
                    .transition(Mode::Confirm, Mode::ConfigDuration, Domain::MainLoop);
                return;
            }
        };

        let osc = Oscillator::new(law, self.scale);
        match self
            .shared
            .arm(Mode::Confirm, Mode::SweepRunning, osc, board)
        {
            Ok(()) => {
                let p = self.params;
                let _ = write!(term, "Sweeping... press the button to stop.\r\n");
                rt_info!(
                    MAIN_LOG_STREAM,
                    now,
                    "sweep {}..{} Hz in {} s",
                    p.lower_hz,
                    p.upper_hz,
                    p.duration_s
                );
            }
            Err(e) => {
                // Retry the confirm prompt
                self.entered = None;
                rt_warn!(MAIN_LOG_STREAM, now, "sweep arm failed: {}", e);
            }
        }
    }

    fn arm_round<T: Terminal, B: Board, E: Entropy>(
        &mut self,
        term: &mut T,
        board: &B,
        rng: &mut E,
    ) -> bool {
        let now = board.now_us();
        let target = pick_target(rng, self.config.game_max_hz);
        let law = match SweepLaw::tone(target, &self.tuning) {
            Ok(law) => law,
            Err(e) => {
                // Only reachable with a game bound above Nyquist
                rt_warn!(MAIN_LOG_STREAM, now, "tone rejected: {}", e.code());
                return false;
            }
        };

        match self
            .shared
            .arm(Mode::GameArm, Mode::TonePlaying, Oscillator::new(law, self.scale), board)
        {
            Ok(()) => {
                self.round = Some(GameRound::new(target));
                let _ = write!(term, "\r\nTone playing. Press the button to stop it.\r\n");
                rt_debug!(MAIN_LOG_STREAM, now, "round armed");
                true
            }
            Err(ArmError::ModeChanged) => true,
            Err(ArmError::Busy) => false,
        }
    }

    fn show_result<T: Terminal, B: Board>(&mut self, term: &mut T, board: &B) {
        let (Some(round), Some(increment)) = (self.round, self.shared.last_increment()) else {
            return;
        };
        let score = round.score(self.tuning.sounded_hz(increment));
        self.last_score = Some(score);

        let _ = write!(
            term,
            "Frequency difference: {}\r\nYou hit the frequency: {}\r\n\
             The frequency to hit: {}\r\nPress the button to play again.\r\n",
            score.difference_hz, score.sounded_hz, score.target_hz
        );
        rt_info!(
            MAIN_LOG_STREAM,
            board.now_us(),
            "round: target {} sounded {} diff {}",
            score.target_hz,
            score.sounded_hz,
            score.difference_hz
        );
    }
}
