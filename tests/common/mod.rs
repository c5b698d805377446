//! Shared helpers for integration tests.

#![allow(dead_code)]

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

use war_of_attrition::ai::{ChallengePolicy, NeverChallenge};
use war_of_attrition::cards::{Card, Deck, Rank, Suit};
use war_of_attrition::controller::{ChallengeResponse, MatchController};
use war_of_attrition::core::{MatchConfig, MatchState, Phase, Side};
use war_of_attrition::rules::{CardComparator, StandardComparator, TurnOutcome, TurnResolver};

static LOGGING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_env("TEST_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
});

/// Route engine logs to the test harness. `TEST_LOG` or `RUST_LOG` set the
/// level; the default is `warn`.
pub fn init() {
    Lazy::force(&LOGGING);
}

pub fn hearts(rank: Rank) -> Card {
    Card::new(Suit::Hearts, rank)
}

pub fn spades(rank: Rank) -> Card {
    Card::new(Suit::Spades, rank)
}

/// Controller over scripted decks, listed bottom to top. The opponent never
/// challenges.
pub fn scripted(player: &[Rank], opponent: &[Rank]) -> MatchController<StandardComparator, NeverChallenge> {
    let config = MatchConfig::default().with_shuffle(false);
    let state = MatchState::from_decks(
        Deck::from_cards(player.iter().map(|&r| hearts(r))),
        Deck::from_cards(opponent.iter().map(|&r| spades(r))),
        &config,
    );
    MatchController::with_parts(config, state, TurnResolver::with_parts(StandardComparator, NeverChallenge, true))
}

/// Make the next legal move: always challenge, always play the first battle
/// card. Returns `None` once the match is over.
pub fn step<C: CardComparator, P: ChallengePolicy>(controller: &mut MatchController<C, P>) -> Option<TurnOutcome> {
    let outcome = match controller.state().phase() {
        Phase::Normal => controller.reveal_turn(),
        Phase::Challenge if controller.challenge_offered() => match controller.respond_to_challenge(true) {
            Ok(ChallengeResponse::Accepted { .. }) => controller.submit_challenge_card(),
            Ok(ChallengeResponse::Declined(outcome)) => Ok(outcome),
            Err(err) => Err(err),
        },
        Phase::Challenge => controller.submit_challenge_card(),
        Phase::Battle => {
            let card = controller.battle_hand(Side::Player)[0];
            controller.select_battle_card(card)
        }
        Phase::Setup | Phase::GameOver => return None,
    };
    Some(outcome.expect("legal move rejected"))
}
