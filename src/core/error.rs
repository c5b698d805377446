//! Engine errors.
//!
//! Only caller mistakes are errors. Running out of cards is a normal game
//! path and is reported through `Option`/empty results instead.

use thiserror::Error;

use super::state::Phase;
use crate::cards::Card;

/// Errors returned by the match controller and state.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An action was requested in a phase that does not permit it.
    /// The match state is left unchanged.
    #[error("cannot {action} during the {phase} phase")]
    InvalidPhase { action: &'static str, phase: Phase },

    /// The player tried to answer a challenge that was never offered.
    #[error("no challenge is being offered to the player")]
    ChallengeNotOffered,

    /// A challenge or battle step needs an active turn and none exists.
    #[error("no active turn")]
    NoActiveTurn,

    /// `submit_challenge_card` was called before a challenge card was drawn.
    #[error("no challenge card has been drawn")]
    NoChallengeCard,

    /// The selected battle card is not in the player's battle hand.
    #[error("{0} is not in the player's battle hand")]
    NotInBattleHand(Card),

    /// Battle hands have not been dealt yet.
    #[error("battle hands are not ready for selection")]
    BattleNotReady,

    /// A config that no match can be played under.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    /// Checkpoint encode/decode failure.
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] bincode::Error),
}

impl EngineError {
    pub(crate) fn invalid_phase(action: &'static str, phase: Phase) -> Self {
        EngineError::InvalidPhase { action, phase }
    }
}

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;
