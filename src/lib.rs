//! # war-of-attrition
//!
//! Rules engine for War of Attrition, a two-player card game of the "War"
//! family with challenges and escalating battles.
//!
//! ## Design Principles
//!
//! 1. **No I/O**: The engine only mutates its own state. Hosts render from
//!    [`MatchSnapshot`] and drive the match through [`MatchController`].
//!
//! 2. **Deferred Commit**: Cards from a contestable loss stay staged in the
//!    active turn and move to a deck or the discard pile exactly once.
//!
//! 3. **Deterministic**: One seeded [`GameRng`] per match drives the shuffle,
//!    the opponent's challenge roll and its battle pick.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) deck cloning via `im-rs`.
//!
//! - **Traits at the seams**: the comparison law ([`CardComparator`]) and the
//!   opponent's challenge decision ([`ChallengePolicy`]) are pluggable.
//!
//! ## Modules
//!
//! - `core`: Sides, match state, phases, errors, RNG, configuration
//! - `cards`: Cards, decks and the discard pile
//! - `rules`: Comparison law and the turn resolver state machine
//! - `ai`: The opponent's challenge and battle decisions
//! - `controller`: Phase-gated match orchestration, observers, autoplay

pub mod core;
pub mod cards;
pub mod rules;
pub mod ai;
pub mod controller;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Side, SideMap,
    GameRng, GameRngState,
    MatchConfig, MatchState, MatchStats, Phase,
    ActiveTurn, BattleStaging, PendingChallenge, Stake,
    EngineError, EngineResult,
};

pub use crate::cards::{Card, Rank, Suit, Deck, DiscardPile, MIN_CARDS_FOR_BATTLE};

pub use crate::rules::{CardComparator, Comparison, StandardComparator, TurnOutcome, TurnResolver};

pub use crate::ai::{ChallengePolicy, ChallengeTable, AlwaysChallenge, NeverChallenge};

pub use crate::controller::{
    MatchController, ChallengeResponse, MatchSnapshot, TurnView, BattleSubPhase,
    MatchObserver,
    AutoPlayer, PlayerStrategy, RandomStrategy, GreedyStrategy, MatchReport, MatchTally,
};
