//! Match configuration.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// Match configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for the match RNG.
    /// Same seed and same actions produce the same match.
    pub seed: u64,

    /// Shuffle both decks at setup (disable for scripted tests).
    pub shuffle_decks: bool,

    /// Whether the opponent may challenge after losing a reveal.
    pub opponent_challenges: bool,

    /// Cards each side draws into its battle hand (default: 3).
    pub battle_hand_size: usize,

    /// Per-value overrides of the opponent's challenge probabilities.
    /// Values not listed fall back to the built-in table.
    pub challenge_overrides: Vec<(u8, f64)>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            shuffle_decks: true,
            opponent_challenges: true,
            battle_hand_size: 3,
            challenge_overrides: Vec::new(),
        }
    }
}

impl MatchConfig {
    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with shuffling enabled or disabled.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle_decks = shuffle;
        self
    }

    /// Create a new config with opponent challenges enabled or disabled.
    pub fn with_opponent_challenges(mut self, enabled: bool) -> Self {
        self.opponent_challenges = enabled;
        self
    }

    /// Create a new config with a custom battle hand size.
    pub fn with_battle_hand_size(mut self, size: usize) -> Self {
        self.battle_hand_size = size;
        self
    }

    /// Override the opponent's challenge probability for one card value.
    pub fn with_challenge_probability(mut self, value: u8, probability: f64) -> Self {
        self.challenge_overrides.push((value, probability.clamp(0.0, 1.0)));
        self
    }

    /// Reject configs a match cannot be played under.
    pub fn validate(&self) -> EngineResult<()> {
        if self.battle_hand_size == 0 {
            return Err(EngineError::InvalidConfig("battle_hand_size must be at least 1"));
        }
        if self.battle_hand_size > 25 {
            return Err(EngineError::InvalidConfig("battle_hand_size must leave a card to reveal"));
        }
        if self
            .challenge_overrides
            .iter()
            .any(|&(_, p)| !(0.0..=1.0).contains(&p))
        {
            return Err(EngineError::InvalidConfig("challenge probabilities must lie in [0, 1]"));
        }
        Ok(())
    }

    /// Cards a deck needs to enter a battle: one reveal plus the battle hand.
    #[must_use]
    pub fn battle_minimum(&self) -> usize {
        self.battle_hand_size + 1
    }
}
