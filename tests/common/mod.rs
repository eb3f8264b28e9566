//! Host doubles for the board, the operator terminal and the RNG.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;

use sweep_synth::hal::{Board, Entropy, Terminal};
use sweep_synth::interrupts::{on_sample_tick, TickOutcome};
use sweep_synth::mode::Mode;
use sweep_synth::{SharedState, SynthConfig};

/// Reference configuration without debounce, booting into `mode`.
pub fn config(mode: Mode) -> SynthConfig {
    SynthConfig {
        debounce_us: 0,
        ..SynthConfig::DEFAULT.with_initial_mode(mode)
    }
}

/// Records every peripheral access.
#[derive(Default)]
pub struct MockBoard {
    pub dac: Cell<Option<u16>>,
    pub dac_writes: Cell<usize>,
    pub timer_running: Cell<bool>,
    pub timer_starts: Cell<usize>,
    pub activity: Cell<bool>,
    pub now: Cell<i64>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_us(&self, us: i64) {
        self.now.set(self.now.get() + us);
    }
}

impl Board for MockBoard {
    fn write_dac(&self, code: u16) {
        self.dac.set(Some(code));
        self.dac_writes.set(self.dac_writes.get() + 1);
    }

    fn start_sample_timer(&self) {
        self.timer_running.set(true);
        self.timer_starts.set(self.timer_starts.get() + 1);
    }

    fn stop_sample_timer(&self) {
        self.timer_running.set(false);
    }

    fn set_activity(&self, asserted: bool) {
        self.activity.set(asserted);
    }

    fn now_us(&self) -> i64 {
        self.now.get()
    }
}

/// Terminal fed from a byte queue, capturing everything written.
#[derive(Default)]
pub struct MockTerminal {
    pub input: VecDeque<u8>,
    pub output: String,
}

impl MockTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `line` followed by a carriage return.
    pub fn type_line(&mut self, line: &str) {
        self.input.extend(line.bytes());
        self.input.push_back(b'\r');
    }

    /// Return and clear the captured output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl fmt::Write for MockTerminal {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

impl Terminal for MockTerminal {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }
}

/// Replays a fixed sequence, repeating the last value.
pub struct ScriptedEntropy {
    values: VecDeque<u32>,
    last: u32,
}

impl ScriptedEntropy {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.iter().copied().collect(),
            last: 0,
        }
    }
}

impl Entropy for ScriptedEntropy {
    fn next_u32(&mut self) -> u32 {
        if let Some(v) = self.values.pop_front() {
            self.last = v;
        }
        self.last
    }
}

/// Fire sample ticks until one does something other than produce a sample,
/// at most `limit` times.
pub fn run_ticks(shared: &SharedState, board: &MockBoard, limit: u64) -> (u64, TickOutcome) {
    for n in 1..=limit {
        let outcome = on_sample_tick(shared, board);
        if outcome != TickOutcome::Running {
            return (n, outcome);
        }
    }
    (limit, TickOutcome::Running)
}
