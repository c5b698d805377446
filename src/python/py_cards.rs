//! Card and outcome bindings for Python.

use pyo3::prelude::*;

use crate::cards::Card;
use crate::core::Side;
use crate::rules::{Comparison, TurnOutcome};

/// Python wrapper for Card.
#[pyclass(name = "Card")]
#[derive(Clone, Debug)]
pub struct PyCard(pub Card);

#[pymethods]
impl PyCard {
    /// Suit name, e.g. "hearts".
    #[getter]
    fn suit(&self) -> &'static str {
        self.0.suit.name()
    }

    /// Rank label, e.g. "K".
    #[getter]
    fn rank(&self) -> &'static str {
        self.0.rank.label()
    }

    #[getter]
    fn value(&self) -> u8 {
        self.0.value()
    }

    #[getter]
    fn is_red(&self) -> bool {
        self.0.is_red()
    }

    fn short(&self) -> String {
        self.0.short()
    }

    fn __str__(&self) -> String {
        self.0.to_string()
    }

    fn __repr__(&self) -> String {
        format!("Card({})", self.0.short())
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        u64::from(self.0.value()) * 4 + self.0.suit as u64
    }
}

pub(crate) fn side_name(side: Option<Side>) -> Option<String> {
    side.map(|s| s.to_string())
}

/// Python wrapper for TurnOutcome.
#[pyclass(name = "TurnOutcome")]
#[derive(Clone, Debug)]
pub struct PyTurnOutcome(pub TurnOutcome);

#[pymethods]
impl PyTurnOutcome {
    /// "player", "opponent" or None.
    #[getter]
    fn winner(&self) -> Option<String> {
        side_name(self.0.winner)
    }

    /// "player_wins", "opponent_wins" or "tie".
    #[getter]
    fn comparison(&self) -> &'static str {
        match self.0.comparison {
            Comparison::PlayerWins => "player_wins",
            Comparison::OpponentWins => "opponent_wins",
            Comparison::Tie => "tie",
        }
    }

    #[getter]
    fn message(&self) -> String {
        self.0.message.clone()
    }

    #[getter]
    fn cards_lost(&self) -> Vec<PyCard> {
        self.0.cards_lost.iter().copied().map(PyCard).collect()
    }

    #[getter]
    fn cards_kept(&self) -> Vec<PyCard> {
        self.0.cards_kept.iter().copied().map(PyCard).collect()
    }

    #[getter]
    fn next_phase(&self) -> String {
        self.0.next_phase.to_string()
    }

    #[getter]
    fn player_may_challenge(&self) -> bool {
        self.0.player_may_challenge
    }

    #[getter]
    fn opponent_is_challenging(&self) -> bool {
        self.0.opponent_is_challenging
    }

    fn is_game_over(&self) -> bool {
        self.0.is_game_over()
    }

    fn __repr__(&self) -> String {
        format!(
            "TurnOutcome(winner={:?}, next_phase='{}', message='{}')",
            self.winner(),
            self.0.next_phase,
            self.0.message
        )
    }
}
