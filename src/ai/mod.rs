//! Opponent decision making.
//!
//! The opponent makes exactly two kinds of decision:
//! - `ChallengePolicy`: whether to challenge after losing a reveal
//! - `choose_battle_card`: which battle card decides a battle round

pub mod battle;
pub mod challenge;

pub use battle::choose_battle_card;
pub use challenge::{
    AlwaysChallenge, ChallengePolicy, ChallengeTable, NeverChallenge, DEFAULT_CHALLENGE_PROBABILITY,
};
