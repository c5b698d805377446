//! Opponent challenge decision.
//!
//! After losing a reveal the opponent may challenge, risking one more card
//! to overturn the result. It is far more willing to fight for a low card
//! than for a high one.

use rustc_hash::FxHashMap;

use crate::cards::Card;
use crate::core::GameRng;

/// Challenge probability for values missing from the table.
pub const DEFAULT_CHALLENGE_PROBABILITY: f64 = 0.20;

/// Built-in probabilities by card value, Two (2) through Ace (14).
const CHALLENGE_TABLE: [(u8, f64); 13] = [
    (2, 0.95),
    (3, 0.80),
    (4, 0.65),
    (5, 0.50),
    (6, 0.40),
    (7, 0.30),
    (8, 0.25),
    (9, 0.20),
    (10, 0.15),
    (11, 0.10),
    (12, 0.05),
    (13, 0.03),
    (14, 0.01),
];

/// Decides whether the opponent challenges after losing a reveal.
pub trait ChallengePolicy: Send + Sync {
    /// Probability in `[0, 1]` of challenging to save `losing_card`.
    fn challenge_probability(&self, losing_card: &Card) -> f64;

    /// One uniform draw; challenge iff it falls below the probability.
    fn should_challenge(&self, losing_card: &Card, rng: &mut GameRng) -> bool {
        rng.gen_unit() < self.challenge_probability(losing_card)
    }
}

/// Table-driven policy.
///
/// ```
/// use war_of_attrition::ai::{ChallengePolicy, ChallengeTable};
/// use war_of_attrition::cards::{Card, Rank, Suit};
///
/// let table = ChallengeTable::default();
/// assert_eq!(table.challenge_probability(&Card::new(Suit::Clubs, Rank::Two)), 0.95);
/// assert_eq!(table.challenge_probability(&Card::new(Suit::Clubs, Rank::Ace)), 0.01);
/// ```
#[derive(Clone, Debug)]
pub struct ChallengeTable {
    probabilities: FxHashMap<u8, f64>,
    fallback: f64,
}

impl Default for ChallengeTable {
    fn default() -> Self {
        Self {
            probabilities: CHALLENGE_TABLE.iter().copied().collect(),
            fallback: DEFAULT_CHALLENGE_PROBABILITY,
        }
    }
}

impl ChallengeTable {
    /// Built-in table with the given per-value overrides applied.
    #[must_use]
    pub fn with_overrides(overrides: &[(u8, f64)]) -> Self {
        overrides
            .iter()
            .fold(Self::default(), |table, &(value, p)| table.with_probability(value, p))
    }

    /// Set the probability for one card value.
    #[must_use]
    pub fn with_probability(mut self, value: u8, probability: f64) -> Self {
        self.probabilities.insert(value, probability.clamp(0.0, 1.0));
        self
    }

    /// Drop a value from the table so it uses the fallback.
    #[must_use]
    pub fn without(mut self, value: u8) -> Self {
        self.probabilities.remove(&value);
        self
    }

    /// Probability for a raw card value.
    #[must_use]
    pub fn probability_for_value(&self, value: u8) -> f64 {
        self.probabilities.get(&value).copied().unwrap_or(self.fallback)
    }
}

impl ChallengePolicy for ChallengeTable {
    fn challenge_probability(&self, losing_card: &Card) -> f64 {
        self.probability_for_value(losing_card.value())
    }
}

/// Challenges every time.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysChallenge;

impl ChallengePolicy for AlwaysChallenge {
    fn challenge_probability(&self, _losing_card: &Card) -> f64 {
        1.0
    }
}

/// Never challenges.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverChallenge;

impl ChallengePolicy for NeverChallenge {
    fn challenge_probability(&self, _losing_card: &Card) -> f64 {
        0.0
    }
}
