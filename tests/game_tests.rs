//! Frequency guessing game tests

mod common;

use common::{config, run_ticks, MockBoard, MockTerminal, ScriptedEntropy};
use sweep_synth::console::Menu;
use sweep_synth::game::{pick_target, GameRound};
use sweep_synth::interrupts::{on_button_edge, on_sample_tick, ButtonOutcome, TickOutcome};
use sweep_synth::mode::Mode;
use sweep_synth::shared::SharedState;

/// Entropy word that makes `pick_target(_, 2000)` return 1001.
const TARGET_1001: u32 = 2_149_631_132;

#[test]
fn test_pick_target_range() {
    let mut rng = ScriptedEntropy::new(&[0, u32::MAX, 1 << 31, TARGET_1001]);
    assert_eq!(pick_target(&mut rng, 2000), 0);
    assert_eq!(pick_target(&mut rng, 2000), 1999);
    assert_eq!(pick_target(&mut rng, 2000), 1000);
    assert_eq!(pick_target(&mut rng, 2000), 1001);
}

#[test]
fn test_round_score() {
    let score = GameRound::new(1234).score(1200);
    assert_eq!(score.target_hz, 1234);
    assert_eq!(score.sounded_hz, 1200);
    assert_eq!(score.difference_hz, 34);
}

#[test]
fn test_full_round() {
    let cfg = config(Mode::GameArm);
    let shared = SharedState::new(&cfg);
    let mut menu = Menu::new(&shared, cfg);
    let board = MockBoard::new();
    let mut term = MockTerminal::new();
    let mut rng = ScriptedEntropy::new(&[TARGET_1001]);

    // Arm: tone starts without any operator input
    assert_eq!(menu.poll(&mut term, &board, &mut rng), Mode::GameArm);
    assert_eq!(shared.mode(), Mode::TonePlaying);
    assert_eq!(menu.round(), Some(GameRound::new(1001)));
    assert!(board.timer_running.get());
    assert!(term.take_output().contains("Tone playing."));

    run_ticks(&shared, &board, 1_000);
    assert_eq!(on_button_edge(&shared, &board), ButtonOutcome::Cancelled);
    assert_eq!(shared.mode(), Mode::GameResult);

    // Result waits for the tick to halt the oscillator
    menu.poll(&mut term, &board, &mut rng);
    assert!(term.take_output().is_empty());

    assert!(matches!(
        on_sample_tick(&shared, &board),
        TickOutcome::Halted { sweep: false, .. }
    ));
    menu.poll(&mut term, &board, &mut rng);

    // 1001 Hz has a half table step, so 1000 Hz was actually sounding
    let out = term.take_output();
    assert!(out.contains("Frequency difference: 1\r\n"));
    assert!(out.contains("You hit the frequency: 1000\r\n"));
    assert!(out.contains("The frequency to hit: 1001\r\n"));
    assert!(out.contains("Press the button to play again."));
    let score = menu.last_score().unwrap();
    assert_eq!(score.difference_hz, 1);

    // Stays on the result screen until the button
    menu.poll(&mut term, &board, &mut rng);
    assert_eq!(shared.mode(), Mode::GameResult);
    assert!(!board.timer_running.get());
}

#[test]
fn test_replay_arms_new_round() {
    let cfg = config(Mode::GameArm);
    let shared = SharedState::new(&cfg);
    let mut menu = Menu::new(&shared, cfg);
    let board = MockBoard::new();
    let mut term = MockTerminal::new();
    let mut rng = ScriptedEntropy::new(&[1 << 31, 0]);

    menu.poll(&mut term, &board, &mut rng);
    assert_eq!(menu.round(), Some(GameRound::new(1000)));
    on_button_edge(&shared, &board);
    on_sample_tick(&shared, &board);
    menu.poll(&mut term, &board, &mut rng);
    assert_eq!(menu.last_score().unwrap().difference_hz, 0);

    assert_eq!(on_button_edge(&shared, &board), ButtonOutcome::Replay);
    assert_eq!(shared.mode(), Mode::GameArm);

    menu.poll(&mut term, &board, &mut rng);
    assert_eq!(shared.mode(), Mode::TonePlaying);
    assert_eq!(menu.round(), Some(GameRound::new(0)));
    assert_eq!(board.timer_starts.get(), 2);
}
