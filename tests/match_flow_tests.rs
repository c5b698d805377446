//! Whole-match properties: conservation, determinism, checkpoints and
//! phase gating.

mod common;

use common::{init, step};
use proptest::prelude::*;
use war_of_attrition::cards::{Card, Rank, Suit};
use war_of_attrition::controller::{AutoPlayer, MatchController, MatchSnapshot};
use war_of_attrition::core::{EngineError, MatchConfig, Phase, Side};

const TOTAL_CARDS: usize = 52;
const STEP_LIMIT: usize = 1_000;

/// Play to the end, checking conservation after every move.
fn play_out(controller: &mut MatchController) -> Vec<String> {
    let mut messages = Vec::new();
    for _ in 0..STEP_LIMIT {
        let Some(outcome) = step(controller) else {
            break;
        };
        assert_eq!(controller.state().total_cards(), TOTAL_CARDS);
        messages.push(outcome.message);
    }
    messages
}

#[test]
fn test_full_match_conserves_cards() {
    init();
    for seed in 0..20 {
        let mut controller = MatchController::new(MatchConfig::default().with_seed(seed)).unwrap();
        play_out(&mut controller);

        let state = controller.state();
        assert!(state.is_over(), "seed {seed} did not finish");
        let stats = state.stats();
        assert_eq!(
            stats.player_card_count + stats.opponent_card_count + stats.discarded_card_count,
            TOTAL_CARDS
        );
    }
}

#[test]
fn test_deterministic_replay() {
    init();
    let mut a = MatchController::new(MatchConfig::default().with_seed(99)).unwrap();
    let mut b = MatchController::new(MatchConfig::default().with_seed(99)).unwrap();

    assert_eq!(play_out(&mut a), play_out(&mut b));
    assert_eq!(a.current_state(), b.current_state());
}

#[test]
fn test_checkpoint_resumes_identically() {
    init();
    let config = MatchConfig::default().with_seed(5);
    let mut original = MatchController::new(config).unwrap();
    for _ in 0..6 {
        step(&mut original);
    }

    let bytes = original.state().save().unwrap();
    let mut resumed = MatchController::resume(&bytes).unwrap();
    assert_eq!(resumed.current_state().phase, original.current_state().phase);
    assert_eq!(resumed.current_state().stats, original.current_state().stats);
    assert_eq!(resumed.challenge_offered(), original.challenge_offered());

    assert_eq!(play_out(&mut original), play_out(&mut resumed));
    assert_eq!(original.state().winner(), resumed.state().winner());
    assert_eq!(original.state().stats(), resumed.state().stats());
}

#[test]
fn test_resume_keeps_saved_config() {
    init();
    let config = MatchConfig::default()
        .with_seed(11)
        .with_opponent_challenges(false)
        .with_battle_hand_size(2);
    let mut original = MatchController::new(config.clone()).unwrap();
    for _ in 0..4 {
        step(&mut original);
    }

    let mut resumed = MatchController::resume(&original.state().save().unwrap()).unwrap();
    assert_eq!(resumed.config(), &config);
    assert_eq!(resumed.state().battle_minimum(), 3);

    for _ in 0..STEP_LIMIT {
        if resumed.state().phase() == Phase::Battle {
            assert!(resumed.battle_hand(Side::Player).len() <= 2);
        }
        let Some(outcome) = step(&mut resumed) else {
            break;
        };
        assert!(!outcome.opponent_is_challenging);
        assert_eq!(resumed.state().total_cards(), TOTAL_CARDS);
    }
    assert!(resumed.state().is_over());
}

#[test]
fn test_corrupt_checkpoint_rejected() {
    let result = MatchController::resume(&[0xff; 3]);
    assert!(matches!(result, Err(EngineError::Checkpoint(_))));
}

/// Every call not allowed in the current phase must fail without touching
/// the snapshot.
fn assert_gated(controller: &mut MatchController) {
    let before = controller.current_state();
    let phase = before.phase;
    let stray = Card::new(Suit::Hearts, Rank::Ace);

    if phase != Phase::Normal {
        assert!(controller.reveal_turn().is_err());
    }
    if phase != Phase::Challenge || !before.challenge_offered {
        assert!(controller.respond_to_challenge(true).is_err());
    }
    if phase != Phase::Challenge {
        assert!(controller.submit_challenge_card().is_err());
    }
    if phase != Phase::Battle {
        assert!(controller.select_battle_card(stray).is_err());
    }

    assert_eq!(controller.current_state(), before);
}

#[test]
fn test_invalid_phase_calls_leave_snapshot_unchanged() {
    init();
    for seed in [1, 2, 3] {
        let mut controller = MatchController::new(MatchConfig::default().with_seed(seed)).unwrap();
        for _ in 0..STEP_LIMIT {
            assert_gated(&mut controller);
            if step(&mut controller).is_none() {
                break;
            }
        }
        assert!(controller.state().is_over());
        assert_gated(&mut controller);
    }
}

#[test]
fn test_turn_number_counts_reveals_only() {
    init();
    let mut controller = MatchController::new(MatchConfig::default().with_seed(17)).unwrap();
    let mut reveals = 0;

    for _ in 0..STEP_LIMIT {
        let phase = controller.state().phase();
        let before = controller.state().turn_number();
        let Some(outcome) = step(&mut controller) else {
            break;
        };
        let after = controller.state().turn_number();

        if phase != Phase::Normal {
            assert_eq!(after, before);
        } else if after == before {
            // Only an exhausted deck skips the draw
            assert!(outcome.is_game_over());
        } else {
            assert_eq!(after, before + 1);
            reveals += 1;
        }
    }
    assert_eq!(controller.state().turn_number(), reveals);
}

#[test]
fn test_snapshot_json_roundtrip() {
    let mut controller = MatchController::new(MatchConfig::default().with_seed(8)).unwrap();
    for _ in 0..3 {
        step(&mut controller);
    }

    let snapshot = controller.current_state();
    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: MatchSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, restored);
}

#[test]
fn test_config_json_roundtrip() {
    let config = MatchConfig::default()
        .with_seed(123)
        .with_opponent_challenges(false)
        .with_challenge_probability(2, 0.5);

    let json = serde_json::to_string(&config).unwrap();
    let restored: MatchConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, restored);

    // Missing fields fall back to defaults
    let partial: MatchConfig = serde_json::from_str(r#"{"seed": 9}"#).unwrap();
    assert_eq!(partial, MatchConfig::default().with_seed(9));
}

#[test]
fn test_without_opponent_challenges() {
    init();
    let config = MatchConfig::default().with_seed(4).with_opponent_challenges(false);
    let mut controller = MatchController::new(config).unwrap();

    for _ in 0..STEP_LIMIT {
        let Some(outcome) = step(&mut controller) else {
            break;
        };
        assert!(!outcome.opponent_is_challenging);
    }
}

#[test]
fn test_autoplay_series() {
    init();
    let mut autoplay = AutoPlayer::new(MatchConfig::default().with_seed(21));
    let tally = autoplay.play_series(25).unwrap();

    assert_eq!(tally.played, 25);
    assert_eq!(tally.won + tally.lost + tally.drawn, 25);
    assert!(tally.win_rate() <= 1.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_any_seed_finishes_with_52_cards(seed in any::<u64>()) {
        let mut controller = MatchController::new(MatchConfig::default().with_seed(seed)).unwrap();
        play_out(&mut controller);

        let state = controller.state();
        prop_assert!(state.is_over());
        prop_assert!(state.active_turn().is_none());
        prop_assert_eq!(state.total_cards(), TOTAL_CARDS);
        if state.winner().is_some() {
            prop_assert_eq!(state.phase(), Phase::GameOver);
        }
    }

    #[test]
    fn prop_winner_holds_more_cards_on_exhaustion(seed in any::<u64>()) {
        let mut controller = MatchController::new(MatchConfig::default().with_seed(seed)).unwrap();
        play_out(&mut controller);

        let stats = controller.state().stats();
        match controller.state().winner() {
            Some(Side::Player) => prop_assert!(stats.player_card_count > stats.opponent_card_count),
            Some(Side::Opponent) => prop_assert!(stats.opponent_card_count > stats.player_card_count),
            None => {}
        }
    }
}
