//! Python bindings for the war-of-attrition rules engine.
//!
//! # Quick Start
//!
//! ```python
//! import war_of_attrition as woa
//!
//! match = woa.Match(seed=7)
//! while not match.is_over():
//!     if match.phase == "normal":
//!         outcome = match.reveal_turn()
//!     elif match.phase == "challenge" and match.challenge_offered:
//!         card, outcome = match.respond_to_challenge(True)
//!         if card is not None:
//!             outcome = match.submit_challenge_card()
//!     elif match.phase == "challenge":
//!         outcome = match.submit_challenge_card()
//!     else:
//!         outcome = match.select_battle_card(match.battle_hand()[0])
//!
//! print(match.winner, match.stats())
//! ```

use pyo3::prelude::*;

mod py_cards;
mod py_match;

pub use py_cards::*;
pub use py_match::*;

/// war_of_attrition: a War-family card game rules engine.
#[pymodule]
fn war_of_attrition(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCard>()?;
    m.add_class::<PyTurnOutcome>()?;
    m.add_class::<PyMatch>()?;

    Ok(())
}
