//! Sample-tick and button handler tests

mod common;

use common::{config, run_ticks, MockBoard};
use sweep_synth::audio::{OutputScale, Oscillator, SweepLaw, SweepParams, Tuning};
use sweep_synth::config::{SynthConfig, TABLE_SIZE};
use sweep_synth::event::Event;
use sweep_synth::fault::FaultCode;
use sweep_synth::hal::Board;
use sweep_synth::interrupts::{on_button_edge, on_sample_tick, ButtonOutcome, TickOutcome};
use sweep_synth::mode::Mode;
use sweep_synth::shared::{ArmError, SharedState};

const TUNING: Tuning = Tuning::new(16384, TABLE_SIZE);

fn sweep() -> Oscillator {
    Oscillator::new(
        SweepLaw::sweep(&SweepParams::DEFAULT, &TUNING).unwrap(),
        OutputScale::for_dac_bits(10),
    )
}

fn tone(hz: u32) -> Oscillator {
    Oscillator::new(
        SweepLaw::tone(hz, &TUNING).unwrap(),
        OutputScale::for_dac_bits(10),
    )
}

/// Shared state with a sweep armed.
fn armed_sweep(board: &MockBoard) -> SharedState {
    let shared = SharedState::new(&config(Mode::Confirm));
    shared
        .arm(Mode::Confirm, Mode::SweepRunning, sweep(), board)
        .unwrap();
    shared
}

/// Shared state with a game tone armed.
fn armed_tone(board: &MockBoard, hz: u32) -> SharedState {
    let shared = SharedState::new(&config(Mode::GameArm));
    shared
        .arm(Mode::GameArm, Mode::TonePlaying, tone(hz), board)
        .unwrap();
    shared
}

#[test]
fn test_arm_starts_timer() {
    let board = MockBoard::new();
    let shared = armed_sweep(&board);

    assert_eq!(shared.mode(), Mode::SweepRunning);
    assert!(shared.is_generating());
    assert!(board.timer_running.get());
    assert!(!board.activity.get());
    assert_eq!(shared.table_index(), Some(0));
}

#[test]
fn test_sweep_completes_at_duration() {
    let board = MockBoard::new();
    let shared = armed_sweep(&board);
    let start = shared.current_increment().unwrap();

    let (n, outcome) = run_ticks(&shared, &board, 40_000);

    assert_eq!(n, 32_768);
    assert_eq!(outcome, TickOutcome::Completed { ticks: 32_768 });
    assert_eq!(shared.mode(), Mode::ConfigDuration);
    assert!(!shared.is_generating());
    assert!(!board.timer_running.get());
    assert!(board.activity.get());
    assert_eq!(board.dac.get(), Some(shared.neutral_code()));
    // Increment back at the value computed for the lower bound
    assert_eq!(shared.current_increment(), Some(start));
    assert_eq!(start.raw(), 1000 << 15);
    assert_eq!(shared.next_event(), Some(Event::SweepCompleted { ticks: 32_768 }));
}

#[test]
fn test_button_cancels_sweep() {
    let board = MockBoard::new();
    let shared = armed_sweep(&board);
    run_ticks(&shared, &board, 100);
    assert_ne!(board.dac.get(), Some(shared.neutral_code()));

    assert_eq!(on_button_edge(&shared, &board), ButtonOutcome::Cancelled);

    // Output is neutral before the next tick runs
    assert_eq!(board.dac.get(), Some(shared.neutral_code()));
    assert_eq!(shared.mode(), Mode::ConfigDuration);
    assert!(shared.stop_pending());

    let writes = board.dac_writes.get();
    let outcome = on_sample_tick(&shared, &board);
    assert_eq!(outcome, TickOutcome::Halted { sweep: true, ticks: 100 });
    assert_eq!(board.dac.get(), Some(shared.neutral_code()));
    // Only the neutral write, no sample
    assert_eq!(board.dac_writes.get(), writes + 1);
    assert!(!board.timer_running.get());
    assert!(!shared.is_generating());
    assert_eq!(shared.mode(), Mode::ConfigDuration);
    assert_eq!(shared.next_event(), Some(Event::SweepCancelled { ticks: 100 }));
}

#[test]
fn test_button_stops_tone() {
    let board = MockBoard::new();
    let shared = armed_tone(&board, 440);
    let playing = shared.current_increment().unwrap();
    run_ticks(&shared, &board, 50);

    assert_eq!(on_button_edge(&shared, &board), ButtonOutcome::Cancelled);
    assert_eq!(shared.mode(), Mode::GameResult);

    let outcome = on_sample_tick(&shared, &board);
    assert_eq!(outcome, TickOutcome::Halted { sweep: false, ticks: 50 });
    assert_eq!(shared.last_increment(), Some(playing));
    assert_eq!(shared.next_event(), Some(Event::ToneStopped));
}

#[test]
fn test_tone_never_completes_by_itself() {
    let board = MockBoard::new();
    let shared = armed_tone(&board, 1500);
    let (_, outcome) = run_ticks(&shared, &board, 100_000);
    assert_eq!(outcome, TickOutcome::Running);
    assert_eq!(shared.mode(), Mode::TonePlaying);
}

#[test]
fn test_button_replay_from_result() {
    let board = MockBoard::new();
    let shared = armed_tone(&board, 440);
    on_button_edge(&shared, &board);
    on_sample_tick(&shared, &board);
    assert_eq!(shared.next_event(), Some(Event::ToneStopped));

    assert_eq!(on_button_edge(&shared, &board), ButtonOutcome::Replay);
    assert_eq!(shared.mode(), Mode::GameArm);
    assert_eq!(shared.next_event(), Some(Event::Replay));
}

#[test]
fn test_button_ignored_while_configuring() {
    let board = MockBoard::new();
    for mode in [
        Mode::ConfigDuration,
        Mode::ConfigLower,
        Mode::ConfigUpper,
        Mode::Confirm,
        Mode::GameArm,
    ] {
        let shared = SharedState::new(&config(mode));
        assert_eq!(on_button_edge(&shared, &board), ButtonOutcome::Ignored);
        assert_eq!(shared.mode(), mode);
        assert!(!shared.stop_pending());
    }
    assert_eq!(board.dac_writes.get(), 0);
}

#[test]
fn test_button_debounce() {
    let board = MockBoard::new();
    let shared = SharedState::new(&SynthConfig::DEFAULT.with_initial_mode(Mode::GameResult));
    board.now.set(1_000);

    assert_eq!(on_button_edge(&shared, &board), ButtonOutcome::Replay);

    // Contact bounce well inside the 50 ms window
    board.advance_us(2_000);
    assert_eq!(on_button_edge(&shared, &board), ButtonOutcome::Bounced);

    board.advance_us(60_000);
    assert_eq!(on_button_edge(&shared, &board), ButtonOutcome::Ignored);
}

#[test]
fn test_spurious_tick() {
    let board = MockBoard::new();
    let shared = SharedState::new(&config(Mode::ConfigDuration));
    board.start_sample_timer();

    assert_eq!(on_sample_tick(&shared, &board), TickOutcome::Spurious);
    assert!(!board.timer_running.get());
    assert_eq!(board.dac.get(), Some(shared.neutral_code()));
    assert!(shared.fault().is_active());
    assert_eq!(shared.fault().code(), FaultCode::SpuriousTick);
    assert_eq!(shared.mode(), Mode::ConfigDuration);
}

#[test]
fn test_tick_after_halt_is_spurious() {
    let board = MockBoard::new();
    let shared = armed_sweep(&board);
    on_button_edge(&shared, &board);
    on_sample_tick(&shared, &board);

    assert_eq!(on_sample_tick(&shared, &board), TickOutcome::Spurious);
}

#[test]
fn test_arm_refused_while_generating() {
    let board = MockBoard::new();
    let shared = armed_sweep(&board);
    // Button moved the mode but the tick has not halted yet
    on_button_edge(&shared, &board);
    assert!(shared.is_generating());

    let result = shared.arm(Mode::ConfigDuration, Mode::SweepRunning, sweep(), &board);
    assert_eq!(result, Err(ArmError::Busy));
    assert_eq!(shared.fault().code(), FaultCode::ArmRefused);
    assert_eq!(board.timer_starts.get(), 1);
}

#[test]
fn test_arm_refused_after_mode_change() {
    let board = MockBoard::new();
    let shared = SharedState::new(&config(Mode::GameResult));

    let result = shared.arm(Mode::GameArm, Mode::TonePlaying, tone(440), &board);
    assert_eq!(result, Err(ArmError::ModeChanged));
    assert!(!shared.is_generating());
    assert!(!board.timer_running.get());
    assert!(!shared.fault().is_active());
}
